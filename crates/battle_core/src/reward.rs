//! Ticket payouts and achievements, from the player's point of view.

use serde::{Deserialize, Serialize};

use crate::config::{AchievementConfig, RewardConfig};
use crate::result::MatchResult;
use crate::unit::Side;
use crate::victory::VictoryReason;

/// Player accomplishments that pay bonus tickets. Only awarded on victory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Achievement {
    /// The player scored the match's first kill.
    FirstBlood,
    /// No player unit was lost.
    PerfectVictory,
    /// The player killed many units.
    FishSlayer,
    /// The player dealt a lot of damage.
    DamageDealer,
    /// The match was won fast.
    QuickVictory,
}

impl Achievement {
    /// Tickets this achievement pays.
    #[must_use]
    pub const fn tickets(self, config: &AchievementConfig) -> u32 {
        match self {
            Self::FirstBlood => config.first_blood_tickets,
            Self::PerfectVictory => config.perfect_victory_tickets,
            Self::FishSlayer => config.fish_slayer_tickets,
            Self::DamageDealer => config.damage_dealer_tickets,
            Self::QuickVictory => config.quick_victory_tickets,
        }
    }
}

/// Achievements a finished match unlocks for the player.
///
/// Reads the outcome fields of `result` and ignores its `achievements`
/// and `tickets_earned`.
#[must_use]
pub fn determine_achievements(result: &MatchResult, config: &AchievementConfig) -> Vec<Achievement> {
    if !result.player_won() {
        return Vec::new();
    }

    let mut earned = Vec::new();
    if result.first_kill == Some(Side::Player) {
        earned.push(Achievement::FirstBlood);
    }
    if result.player_units_lost.is_empty() {
        earned.push(Achievement::PerfectVictory);
    }
    if result.kills.player >= config.fish_slayer_kills {
        earned.push(Achievement::FishSlayer);
    }
    if result.damage_dealt.player >= config.damage_dealer_threshold {
        earned.push(Achievement::DamageDealer);
    }
    if result.duration_ms < config.quick_victory_ms {
        earned.push(Achievement::QuickVictory);
    }
    earned
}

/// Itemised payout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardBreakdown {
    /// Victory, defeat or forfeit base.
    pub base: u32,
    /// Per-kill bonus.
    pub kills: u32,
    /// Elimination or total-wipe bonus.
    pub decisive: u32,
    /// Fast victory tier bonus.
    pub time: u32,
    /// Sum over achievements.
    pub achievements: u32,
    /// Paid total, never under the configured minimum.
    pub total: u32,
}

/// Compute the ticket payout for `result`.
///
/// A player forfeit pays the flat forfeit amount. Bonuses only apply to
/// victories.
///
/// # Example
///
/// ```
/// use battle_core::config::RewardConfig;
/// use battle_core::result::{MatchResult, PerSide};
/// use battle_core::reward::calculate_reward;
/// use battle_core::unit::Side;
/// use battle_core::victory::VictoryReason;
///
/// let result = MatchResult {
///     winner: Side::Opponent,
///     reason: VictoryReason::TimeLimit,
///     player_units_lost: Vec::new(),
///     opponent_units_lost: Vec::new(),
///     duration_ms: 300_000,
///     damage_dealt: PerSide::default(),
///     kills: PerSide::default(),
///     first_kill: None,
///     achievements: Vec::new(),
///     tickets_earned: 0,
/// };
/// assert_eq!(calculate_reward(&result, &RewardConfig::default()).total, 2);
/// ```
#[must_use]
pub fn calculate_reward(result: &MatchResult, config: &RewardConfig) -> RewardBreakdown {
    let mut breakdown = RewardBreakdown::default();

    if result.reason == VictoryReason::Forfeit && result.winner == Side::Opponent {
        breakdown.base = config.forfeit_tickets;
    } else if result.player_won() {
        breakdown.base = config.victory_tickets;
        breakdown.kills = result.kills.player.saturating_mul(config.kill_bonus);
        if matches!(
            result.reason,
            VictoryReason::Elimination | VictoryReason::TotalWipe
        ) {
            breakdown.decisive = config.decisive_bonus;
        }
        breakdown.time = config
            .time_bonus_tiers
            .iter()
            .find(|tier| result.duration_ms <= tier.within_ms)
            .map_or(0, |tier| tier.tickets);
        breakdown.achievements = result
            .achievements
            .iter()
            .map(|a| a.tickets(&config.achievements))
            .fold(0u32, u32::saturating_add);
    } else {
        breakdown.base = config.defeat_tickets;
    }

    breakdown.total = [
        breakdown.base,
        breakdown.kills,
        breakdown.decisive,
        breakdown.time,
        breakdown.achievements,
    ]
    .into_iter()
    .fold(0u32, u32::saturating_add)
    .max(config.minimum_tickets);

    breakdown
}
