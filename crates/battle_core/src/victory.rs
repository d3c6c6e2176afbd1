//! Victory conditions.
//!
//! Checked in priority order:
//! 1. **Time limit**: the side with the higher survival ratio wins.
//! 2. **Total wipe**: a side with no survivors loses to one with survivors.
//! 3. **Elimination**: killing more than the threshold share of the enemy's
//!    deployed units wins.
//!
//! Whenever two sides cannot be separated the tie-break chain decides:
//! survival ratio, then damage dealt, then who struck first, then the
//! defending side. A check therefore never ends undecided.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::config::BattleConfig;
use crate::math::{percent, Fixed};
use crate::roster::Roster;
use crate::unit::Side;

/// Why a match ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VictoryReason {
    /// The winner killed more than the threshold share of the loser.
    Elimination,
    /// The loser has no units left.
    TotalWipe,
    /// Time ran out.
    TimeLimit,
    /// The loser gave up.
    Forfeit,
}

/// A decided match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    /// Winning side.
    pub winner: Side,
    /// Deciding rule.
    pub reason: VictoryReason,
}

/// Evaluates victory conditions over a pair of rosters.
///
/// Stateless apart from the configuration; the caller decides when to check.
#[derive(Debug, Clone, Copy)]
pub struct VictoryEvaluator<'a> {
    config: &'a BattleConfig,
}

impl<'a> VictoryEvaluator<'a> {
    /// Create an evaluator using `config`'s thresholds.
    #[must_use]
    pub const fn new(config: &'a BattleConfig) -> Self {
        Self { config }
    }

    /// Check every condition at simulated time `elapsed_ms` since combat
    /// started.
    #[must_use]
    pub fn evaluate(&self, player: &Roster, opponent: &Roster, elapsed_ms: u64) -> Option<Verdict> {
        if elapsed_ms >= self.config.battle_time_limit_ms {
            return Some(Verdict {
                winner: tie_break(player, opponent),
                reason: VictoryReason::TimeLimit,
            });
        }

        let player_survival = player.survival();
        let opponent_survival = opponent.survival();
        if player_survival.is_zero() != opponent_survival.is_zero() {
            let winner = if player_survival.is_zero() {
                Side::Opponent
            } else {
                Side::Player
            };
            return Some(Verdict {
                winner,
                reason: VictoryReason::TotalWipe,
            });
        }

        let threshold = self.config.elimination_threshold_percent;
        let player_crossed = opponent.eliminated().exceeds_percent(threshold);
        let opponent_crossed = player.eliminated().exceeds_percent(threshold);
        let winner = match (player_crossed, opponent_crossed) {
            (true, false) => Side::Player,
            (false, true) => Side::Opponent,
            (true, true) => tie_break(player, opponent),
            (false, false) => return None,
        };
        Some(Verdict {
            winner,
            reason: VictoryReason::Elimination,
        })
    }

    /// Progress readouts for a heads-up display.
    #[must_use]
    pub fn hud(&self, player: &Roster, opponent: &Roster, elapsed_ms: u64) -> HudStatus {
        let limit = self.config.battle_time_limit_ms;
        let time_progress = if limit == 0 {
            Fixed::ONE
        } else {
            (Fixed::from_num(elapsed_ms) / Fixed::from_num(limit)).min(Fixed::ONE)
        };

        let threshold = percent(self.config.elimination_threshold_percent);
        let progress = |roster: &Roster| {
            let eliminated = roster.eliminated().to_fixed();
            if threshold == Fixed::ZERO {
                return if eliminated > Fixed::ZERO { Fixed::ONE } else { Fixed::ZERO };
            }
            (eliminated / threshold).min(Fixed::ONE)
        };

        let player_progress = progress(opponent);
        let opponent_progress = progress(player);
        let close = percent(80);
        HudStatus {
            time_remaining_ms: limit.saturating_sub(elapsed_ms),
            time_progress,
            player_progress,
            opponent_progress,
            victory_close: player_progress > close
                || opponent_progress > close
                || time_progress > percent(90),
        }
    }
}

/// Decide between two sides that no rule separates.
///
/// Survival ratio, then cumulative damage dealt, then the earlier first
/// strike; if neither side ever struck, the defending side wins.
#[must_use]
pub fn tie_break(player: &Roster, opponent: &Roster) -> Side {
    let by_survival = player.survival().cmp(&opponent.survival());
    let by_damage = player.damage_dealt().cmp(&opponent.damage_dealt());
    let decided = by_survival.then(by_damage);
    match decided {
        Ordering::Greater => return Side::Player,
        Ordering::Less => return Side::Opponent,
        Ordering::Equal => {}
    }

    match (player.first_strike_at(), opponent.first_strike_at()) {
        (Some(p), Some(o)) if p < o => Side::Player,
        (Some(_), None) => Side::Player,
        _ => Side::Opponent,
    }
}

/// HUD readouts, all fractions in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HudStatus {
    /// Simulated time left before the time limit.
    pub time_remaining_ms: u64,
    /// Elapsed share of the time limit.
    #[serde(with = "crate::math::fixed_serde")]
    pub time_progress: Fixed,
    /// Player's progress toward an elimination win.
    #[serde(with = "crate::math::fixed_serde")]
    pub player_progress: Fixed,
    /// Opponent's progress toward an elimination win.
    #[serde(with = "crate::math::fixed_serde")]
    pub opponent_progress: Fixed,
    /// Some condition is close to firing.
    pub victory_close: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::BattleStats;
    use crate::math::Vec2Fixed;
    use crate::unit::{Role, Unit, UnitId};

    fn roster(side: Side, alive: u32, dead: u32) -> Roster {
        let mut roster = Roster::new(side);
        for i in 0..alive + dead {
            let unit = Unit::new(
                UnitId(i + if side == Side::Player { 0 } else { 1_000 }),
                side,
                "test",
                BattleStats {
                    role: Role::Attacker,
                    hp: 10,
                    damage: 5,
                    speed: 10,
                    attack_range: 10,
                },
                Vec2Fixed::ZERO,
                2,
            );
            roster.deploy(unit, 0);
        }
        for unit in roster.units_mut().iter_mut().take(dead as usize) {
            unit.apply_damage(100);
        }
        roster.remove_dead();
        roster
    }

    #[test]
    fn test_no_verdict_while_balanced() {
        let config = BattleConfig::default();
        let evaluator = VictoryEvaluator::new(&config);
        let player = roster(Side::Player, 4, 1);
        let opponent = roster(Side::Opponent, 4, 1);
        assert_eq!(evaluator.evaluate(&player, &opponent, 10_000), None);
    }

    #[test]
    fn test_total_wipe_beats_elimination() {
        let config = BattleConfig::default();
        let evaluator = VictoryEvaluator::new(&config);
        let player = roster(Side::Player, 0, 3);
        let opponent = roster(Side::Opponent, 10, 0);
        assert_eq!(
            evaluator.evaluate(&player, &opponent, 5_000),
            Some(Verdict {
                winner: Side::Opponent,
                reason: VictoryReason::TotalWipe,
            })
        );
    }

    #[test]
    fn test_elimination_is_strictly_above_threshold() {
        let config = BattleConfig::default();
        let evaluator = VictoryEvaluator::new(&config);
        let player = roster(Side::Player, 4, 0);

        let half = roster(Side::Opponent, 2, 2);
        assert_eq!(evaluator.evaluate(&player, &half, 5_000), None);

        let most = roster(Side::Opponent, 1, 3);
        assert_eq!(
            evaluator.evaluate(&player, &most, 5_000),
            Some(Verdict {
                winner: Side::Player,
                reason: VictoryReason::Elimination,
            })
        );
    }

    #[test]
    fn test_time_limit_prefers_survival_over_damage() {
        let config = BattleConfig::default();
        let evaluator = VictoryEvaluator::new(&config);
        let mut player = roster(Side::Player, 6, 4);
        let mut opponent = roster(Side::Opponent, 4, 6);
        opponent.record_damage(10_000, 100);
        player.record_damage(1, 200);

        assert_eq!(
            evaluator.evaluate(&player, &opponent, 300_000),
            Some(Verdict {
                winner: Side::Player,
                reason: VictoryReason::TimeLimit,
            })
        );
    }

    #[test]
    fn test_tie_break_chain() {
        let mut player = roster(Side::Player, 2, 0);
        let mut opponent = roster(Side::Opponent, 2, 0);
        assert_eq!(tie_break(&player, &opponent), Side::Opponent);

        player.record_damage(10, 500);
        opponent.record_damage(10, 400);
        assert_eq!(tie_break(&player, &opponent), Side::Opponent);

        let mut player2 = roster(Side::Player, 2, 0);
        player2.record_damage(10, 300);
        assert_eq!(tie_break(&player2, &opponent), Side::Player);

        player.record_damage(1, 600);
        assert_eq!(tie_break(&player, &opponent), Side::Player);
    }

    #[test]
    fn test_hud_progress() {
        let config = BattleConfig::default();
        let evaluator = VictoryEvaluator::new(&config);
        let player = roster(Side::Player, 4, 0);
        let opponent = roster(Side::Opponent, 3, 1);

        let hud = evaluator.hud(&player, &opponent, 30_000);
        assert_eq!(hud.time_remaining_ms, 270_000);
        assert_eq!(hud.player_progress, Fixed::from_num(0.5));
        assert_eq!(hud.opponent_progress, Fixed::ZERO);
        assert!(!hud.victory_close);

        let late = evaluator.hud(&player, &opponent, 290_000);
        assert!(late.victory_close);
    }
}
