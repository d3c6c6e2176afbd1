//! Victory evaluation over hand-built rosters.

use battle_core::config::BattleConfig;
use battle_core::roster::Roster;
use battle_core::unit::Side;
use battle_core::victory::{tie_break, VictoryEvaluator, VictoryReason};
use battle_test_utils::fixtures::{attacker, fixed_f};

/// Roster of `deployed` attackers with the first `dead` of them killed.
fn roster(side: Side, first_id: u32, deployed: u32, dead: u32) -> Roster {
    let mut roster = Roster::new(side);
    for i in 0..deployed {
        roster.deploy(attacker(first_id + i, side, 0, 0), 0);
    }
    for unit in roster.units_mut().iter_mut().take(dead as usize) {
        unit.apply_damage(u32::MAX);
    }
    roster.remove_dead();
    roster
}

#[test]
fn test_total_wipe_three_against_ten() {
    let config = BattleConfig::default();
    let player = roster(Side::Player, 1, 3, 0);
    let opponent = roster(Side::Opponent, 100, 10, 10);

    let verdict = VictoryEvaluator::new(&config)
        .evaluate(&player, &opponent, 40_000)
        .expect("decided");
    assert_eq!(verdict.winner, Side::Player);
    assert_eq!(verdict.reason, VictoryReason::TotalWipe);
}

#[test]
fn test_time_limit_goes_to_better_survival() {
    let config = BattleConfig::default();
    let player = roster(Side::Player, 1, 5, 2); // 0.6 surviving
    let opponent = roster(Side::Opponent, 100, 5, 3); // 0.4 surviving

    let evaluator = VictoryEvaluator::new(&config);
    let verdict = evaluator
        .evaluate(&player, &opponent, config.battle_time_limit_ms)
        .expect("decided");
    assert_eq!(verdict.winner, Side::Player);
    assert_eq!(verdict.reason, VictoryReason::TimeLimit);
}

#[test]
fn test_elimination_needs_strictly_more_than_threshold() {
    let config = BattleConfig::default();
    let evaluator = VictoryEvaluator::new(&config);
    let player = roster(Side::Player, 1, 4, 0);

    // Exactly half gone: not yet.
    let half = roster(Side::Opponent, 100, 4, 2);
    assert_eq!(evaluator.evaluate(&player, &half, 10_000), None);

    let most = roster(Side::Opponent, 100, 4, 3);
    let verdict = evaluator.evaluate(&player, &most, 10_000).expect("decided");
    assert_eq!(verdict.winner, Side::Player);
    assert_eq!(verdict.reason, VictoryReason::Elimination);
}

#[test]
fn test_both_crossed_uses_tie_break() {
    let config = BattleConfig::default();
    let player = roster(Side::Player, 1, 10, 6); // 0.4 surviving
    let opponent = roster(Side::Opponent, 100, 10, 8); // 0.2 surviving

    let verdict = VictoryEvaluator::new(&config)
        .evaluate(&player, &opponent, 10_000)
        .expect("decided");
    assert_eq!(verdict.reason, VictoryReason::Elimination);
    assert_eq!(verdict.winner, Side::Player);
}

#[test]
fn test_mutual_wipe_is_not_a_total_wipe() {
    let config = BattleConfig::default();
    let player = roster(Side::Player, 1, 2, 2);
    let opponent = roster(Side::Opponent, 100, 2, 2);

    let verdict = VictoryEvaluator::new(&config)
        .evaluate(&player, &opponent, 10_000)
        .expect("decided");
    assert_eq!(verdict.reason, VictoryReason::Elimination);
    // Nobody ever struck: the defending side keeps its tank.
    assert_eq!(verdict.winner, Side::Opponent);
}

#[test]
fn test_tie_break_chain() {
    let mut player = roster(Side::Player, 1, 2, 0);
    let mut opponent = roster(Side::Opponent, 100, 2, 0);
    assert_eq!(tie_break(&player, &opponent), Side::Opponent);

    // Earlier first strike wins when damage is level.
    opponent.record_damage(30, 900);
    player.record_damage(30, 500);
    assert_eq!(tie_break(&player, &opponent), Side::Player);

    // More damage beats an earlier strike.
    opponent.record_damage(1, 1_000);
    assert_eq!(tie_break(&player, &opponent), Side::Opponent);
}

#[test]
fn test_empty_sides_are_undecided() {
    let config = BattleConfig::default();
    let evaluator = VictoryEvaluator::new(&config);
    let player = Roster::new(Side::Player);
    let opponent = Roster::new(Side::Opponent);
    assert_eq!(evaluator.evaluate(&player, &opponent, 5_000), None);
}

#[test]
fn test_hud_progress() {
    let config = BattleConfig::default();
    let evaluator = VictoryEvaluator::new(&config);
    let player = roster(Side::Player, 1, 4, 0);
    let opponent = roster(Side::Opponent, 100, 4, 1);

    let hud = evaluator.hud(&player, &opponent, 150_000);
    assert_eq!(hud.time_remaining_ms, 150_000);
    assert_eq!(hud.time_progress, fixed_f(0.5));
    assert_eq!(hud.player_progress, fixed_f(0.5));
    assert!(!hud.victory_close);

    let late = evaluator.hud(&player, &opponent, 280_000);
    assert!(late.victory_close);
}
