//! Whole-match behaviour: completion, invariants, determinism and payout.

use battle_core::battle::{Battle, Phase};
use battle_core::config::{BattleConfig, MAX_TANK_EXTENT};
use battle_core::data::FishCatalog;
use battle_core::result::MatchResult;
use battle_core::reward::Achievement;
use battle_core::sinks::FrameSnapshot;
use battle_core::unit::Side;
use battle_core::victory::VictoryReason;
use battle_test_utils::determinism::strategies::{arb_lineup, arb_seed};
use battle_test_utils::determinism::{find_first_divergence, verify_determinism};
use battle_test_utils::fixtures::{point, quick_config, BattleBuilder};
use battle_test_utils::proptest::prelude::*;

/// Every per-tick invariant that must hold between ticks.
fn check_invariants(battle: &Battle<FishCatalog>) {
    let bounds = battle.config().bounds();
    for side in [Side::Player, Side::Opponent] {
        let roster = battle.roster(side);
        let enemies = battle.roster(side.opposite());
        assert_eq!(
            roster.alive_count() + roster.dead_count(),
            roster.deployed_count(),
            "{side:?} lost track of a unit"
        );
        for unit in roster.units() {
            assert!(unit.is_alive(), "{} left in roster after death", unit.id);
            assert!(unit.current_hp <= unit.max_hp);
            assert!(bounds.contains(unit.position), "{} escaped the tank", unit.id);
            if let Some(target) = unit.target {
                assert!(enemies.is_alive(target), "{} targets a dead unit", unit.id);
            }
        }
    }
}

fn short_config() -> BattleConfig {
    BattleConfig {
        battle_time_limit_ms: 30_000,
        ..quick_config()
    }
}

#[test]
fn test_overwhelming_player_wins_cleanly() {
    let mut battle = BattleBuilder::new(12)
        .config(quick_config())
        .player(&["fish_009", "fish_009", "fish_009", "fish_009", "fish_009"])
        .opponent(&["fish_005", "fish_005", "fish_005"])
        .start();

    let result = battle.run_to_completion(10_000).cloned().expect("finished");
    assert_eq!(result.winner, Side::Player);
    assert_ne!(result.reason, VictoryReason::Forfeit);
    assert!(result.player_units_lost.is_empty());
    assert!(result.achievements.contains(&Achievement::PerfectVictory));
    if result.kills.player > 0 {
        assert_eq!(result.first_kill, Some(Side::Player));
        assert!(result.achievements.contains(&Achievement::FirstBlood));
    }

    let breakdown = battle.reward_breakdown().expect("finished");
    assert_eq!(breakdown.total, result.tickets_earned);
    assert!(result.tickets_earned >= battle.config().rewards.victory_tickets);
}

#[test]
fn test_time_limit_always_ends_match() {
    // Two neutral lineups never fight.
    let mut battle = BattleBuilder::new(2)
        .config(short_config())
        .player(&["fish_005"])
        .opponent(&["fish_005"])
        .start();

    let result = battle.run_to_completion(2_000).cloned().expect("finished");
    assert_eq!(result.reason, VictoryReason::TimeLimit);
    assert_eq!(result.duration_ms, 30_000);
    // Level on everything: the defending side keeps its tank.
    assert_eq!(result.winner, Side::Opponent);
    assert_eq!(battle.phase(), Phase::Finished);
}

#[test]
fn test_finished_battle_is_frozen() {
    let mut battle = BattleBuilder::new(8)
        .config(short_config())
        .player(&["fish_002", "fish_008"])
        .opponent(&["fish_001", "fish_004"])
        .start();
    battle.run_to_completion(2_000).expect("finished");

    let hash = battle.state_hash();
    let result = battle.result().cloned();
    for _ in 0..100 {
        let events = battle.tick();
        assert!(events.damage_events.is_empty());
        assert!(events.verdict.is_none());
    }
    assert_eq!(battle.state_hash(), hash);
    assert_eq!(battle.result().cloned(), result);
    assert!(battle.forfeit(Side::Player).is_err());
}

#[test]
fn test_battle_determinism_harness() {
    let setup = || {
        BattleBuilder::new(77)
            .player(&["fish_002", "fish_006", "fish_008", "fish_009"])
            .opponent(&["fish_001", "fish_003", "fish_004", "fish_005", "fish_007"])
            .start()
    };
    verify_determinism(
        4,
        1_500,
        setup,
        |battle| {
            battle.tick();
        },
        |battle| battle.state_hash(),
    )
    .assert_deterministic();
    assert_eq!(find_first_divergence(setup, 600), None);
}

#[test]
fn test_frames_follow_ticks() {
    let mut battle = BattleBuilder::new(5)
        .player(&["fish_002"])
        .opponent(&["fish_001"])
        .start();

    let mut frames: Vec<FrameSnapshot> = Vec::new();
    let mut sink = |frame: &FrameSnapshot| frames.push(frame.clone());
    for _ in 0..10 {
        battle.tick_with(&mut sink);
    }

    assert_eq!(frames.len(), 10);
    assert!(frames.windows(2).all(|w| w[1].tick == w[0].tick + 1));
    assert!(frames.iter().all(|f| f.units.len() == 2));
}

#[test]
fn test_persist_after_completion() {
    let mut battle = BattleBuilder::new(9)
        .config(short_config())
        .player(&["fish_002"])
        .opponent(&["fish_006"])
        .start();
    battle.run_to_completion(2_000).expect("finished");

    let mut store: Vec<MatchResult> = Vec::new();
    battle.persist(&mut store).expect("in-memory sink accepts");
    assert_eq!(store.len(), 1);
    assert_eq!(Some(&store[0]), battle.result());
}

#[test]
fn test_largest_tank_ticks_across_its_diagonal() {
    let config = BattleConfig {
        tank_width: MAX_TANK_EXTENT,
        tank_height: MAX_TANK_EXTENT,
        ..short_config()
    };
    let half = i32::try_from(MAX_TANK_EXTENT / 2).unwrap_or(i32::MAX);
    let mut battle = BattleBuilder::new(10)
        .config(config)
        .player_at("fish_002", point(-half, -half))
        .player_at("fish_007", point(half, half))
        .opponent(&["fish_001", "fish_004", "fish_005"])
        .start();

    for _ in 0..90 {
        battle.tick();
        check_invariants(&battle);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn prop_invariants_hold_every_tick(
        seed in arb_seed(),
        player in arb_lineup(8),
        opponent in arb_lineup(8),
    ) {
        let mut battle = BattleBuilder::new(seed)
            .config(short_config())
            .player(&player)
            .opponent(&opponent)
            .start();

        check_invariants(&battle);
        let mut deaths = 0usize;
        while battle.phase() != Phase::Finished {
            let events = battle.tick();
            deaths += events.deaths.len();
            check_invariants(&battle);
            prop_assert!(battle.tick_count() <= 1_000, "match overran the time limit");
        }

        let result = battle.result().cloned().expect("finished");
        let player_roster = battle.roster(Side::Player);
        let opponent_roster = battle.roster(Side::Opponent);
        prop_assert_eq!(result.player_units_lost.len(), player_roster.dead_count());
        prop_assert_eq!(result.opponent_units_lost.len(), opponent_roster.dead_count());
        prop_assert_eq!(deaths, player_roster.dead_count() + opponent_roster.dead_count());
        prop_assert_eq!(result.damage_dealt.player, player_roster.damage_dealt());
        prop_assert!(result.duration_ms <= 30_000);
        prop_assert!(result.tickets_earned >= battle.config().rewards.minimum_tickets);
    }

    #[test]
    fn prop_same_seed_same_outcome(seed in arb_seed(), lineup in arb_lineup(6)) {
        let run = || {
            let mut battle = BattleBuilder::new(seed)
                .config(short_config())
                .player(&lineup)
                .opponent(&lineup)
                .start();
            battle.run_to_completion(1_000);
            (battle.state_hash(), battle.result().cloned())
        };
        prop_assert_eq!(run(), run());
    }
}
