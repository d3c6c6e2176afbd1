//! Tunable battle and reward parameters.
//!
//! Every constant the simulation depends on lives here with its default
//! value. Configs deserialize from RON; missing fields fall back to the
//! defaults, so a file only needs to list what it overrides.
//!
//! # Example RON
//!
//! ```ron
//! BattleConfig(
//!     battle_time_limit_ms: 120000,
//!     elimination_threshold_percent: 60,
//!     ai: AiConfig(territory_radius: 200),
//! )
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{BattleError, Result};
use crate::math::{percent, Bounds, Fixed};

/// Largest tank width or height accepted.
///
/// Squared distances across the tank must fit in [`Fixed`].
pub const MAX_TANK_EXTENT: u32 = 30_000;

/// Parameters of the combat simulation and deployment gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleConfig {
    /// Tank width in world units.
    pub tank_width: u32,
    /// Tank height in world units.
    pub tank_height: u32,
    /// Simulation ticks per simulated second.
    pub update_frequency_hz: u32,
    /// Simulated match length before the time-limit rule decides.
    pub battle_time_limit_ms: u64,
    /// Cadence of victory checks while combat is running.
    pub victory_check_interval_ms: u64,
    /// Share of an enemy's deployed units a side must kill to win.
    pub elimination_threshold_percent: u32,
    /// Minimum gap between two deployments by the same side.
    pub deployment_cooldown_ms: u64,
    /// Deployment cap per side before combat starts.
    pub max_deployments: usize,
    /// Cap on simultaneously alive units per side once combat started.
    pub max_concurrent_units: usize,
    /// Whether sides may deploy reinforcements after combat started.
    pub allow_reinforcements: bool,
    /// Minimum time between two attacks by the same unit.
    pub attack_cooldown_ms: u64,
    /// Length of the bounded combat event history.
    pub max_combat_events: usize,
    /// Post-attack withdrawal.
    pub retreat: RetreatConfig,
    /// Targeting AI thresholds.
    pub ai: AiConfig,
    /// Ticket payout rules.
    pub rewards: RewardConfig,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            tank_width: 600,
            tank_height: 400,
            update_frequency_hz: 30,
            battle_time_limit_ms: 300_000,
            victory_check_interval_ms: 1_000,
            elimination_threshold_percent: 50,
            deployment_cooldown_ms: 2_000,
            max_deployments: 15,
            max_concurrent_units: 20,
            allow_reinforcements: true,
            attack_cooldown_ms: 1_000,
            max_combat_events: 100,
            retreat: RetreatConfig::default(),
            ai: AiConfig::default(),
            rewards: RewardConfig::default(),
        }
    }
}

impl BattleConfig {
    /// Parse a config from RON text.
    ///
    /// # Errors
    ///
    /// Returns [`BattleError::DataParseError`] on malformed RON and
    /// [`BattleError::InvalidConfig`] if the values fail [`validate`](Self::validate).
    pub fn from_ron_str(text: &str) -> Result<Self> {
        let config: Self = ron::from_str(text).map_err(|e| BattleError::DataParseError {
            what: "battle config".to_string(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the simulation cannot run with.
    ///
    /// # Errors
    ///
    /// Returns [`BattleError::InvalidConfig`] naming the first bad field.
    pub fn validate(&self) -> Result<()> {
        if self.update_frequency_hz == 0 {
            return Err(BattleError::InvalidConfig(
                "update_frequency_hz must be positive".to_string(),
            ));
        }
        if self.tank_width == 0 || self.tank_height == 0 {
            return Err(BattleError::InvalidConfig(
                "tank dimensions must be positive".to_string(),
            ));
        }
        if self.tank_width > MAX_TANK_EXTENT || self.tank_height > MAX_TANK_EXTENT {
            return Err(BattleError::InvalidConfig(format!(
                "tank dimensions {}x{} exceed {MAX_TANK_EXTENT}",
                self.tank_width, self.tank_height
            )));
        }
        if self.victory_check_interval_ms == 0 {
            return Err(BattleError::InvalidConfig(
                "victory_check_interval_ms must be positive".to_string(),
            ));
        }
        if self.elimination_threshold_percent > 100 {
            return Err(BattleError::InvalidConfig(format!(
                "elimination_threshold_percent {} exceeds 100",
                self.elimination_threshold_percent
            )));
        }
        if self.ai.patrol_min > self.ai.patrol_max || self.ai.wander_min > self.ai.wander_max {
            return Err(BattleError::InvalidConfig(
                "patrol and wander ranges must have min <= max".to_string(),
            ));
        }
        Ok(())
    }

    /// Tank rectangle, centred on the origin.
    #[must_use]
    pub fn bounds(&self) -> Bounds {
        Bounds::centered(self.tank_width, self.tank_height)
    }

    /// Simulated time at the start of tick number `tick`.
    #[must_use]
    pub fn tick_to_ms(&self, tick: u64) -> u64 {
        tick * 1_000 / u64::from(self.update_frequency_hz)
    }

    /// Fraction of a second covered by one tick.
    #[must_use]
    pub fn tick_seconds(&self) -> Fixed {
        Fixed::ONE / Fixed::from_num(self.update_frequency_hz)
    }
}

/// The forced withdrawal after a landed attack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetreatConfig {
    /// Distance to withdraw directly away from the target.
    pub distance: u32,
    /// Retreat speed as a percentage of the unit's speed.
    pub speed_percent: u32,
    /// Shortest possible withdrawal.
    pub min_duration_ms: u64,
}

impl Default for RetreatConfig {
    fn default() -> Self {
        Self {
            distance: 50,
            speed_percent: 150,
            min_duration_ms: 300,
        }
    }
}

/// Thresholds and distances used by the targeting AI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// Detection range as a multiple of attack range.
    pub detection_range_multiplier: u32,
    /// Attackers flee above this threat...
    pub attacker_flee_threat_percent: u32,
    /// ...when support is below this.
    pub attacker_flee_support_percent: u32,
    /// Neutral units seek safety above this threat.
    pub neutral_safety_threat_percent: u32,
    /// Allies further than this add no support.
    pub support_range: u32,
    /// Summed ally damage that counts as full support.
    pub support_normaliser: u32,
    /// Radius around a defender's home it guards.
    pub territory_radius: u32,
    /// Defender patrol circle as a percentage of the territory radius.
    pub patrol_radius_percent: u32,
    /// Shortest attacker patrol leg.
    pub patrol_min: u32,
    /// Longest attacker patrol leg.
    pub patrol_max: u32,
    /// Shortest neutral wander leg.
    pub wander_min: u32,
    /// Longest neutral wander leg.
    pub wander_max: u32,
    /// How far a threatened neutral moves toward safety.
    pub safety_distance: u32,
    /// Weight of proximity in the target score.
    pub score_distance_weight_percent: u32,
    /// Weight of missing health in the target score.
    pub score_health_weight_percent: u32,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            detection_range_multiplier: 2,
            attacker_flee_threat_percent: 70,
            attacker_flee_support_percent: 30,
            neutral_safety_threat_percent: 30,
            support_range: 200,
            support_normaliser: 100,
            territory_radius: 150,
            patrol_radius_percent: 70,
            patrol_min: 100,
            patrol_max: 200,
            wander_min: 50,
            wander_max: 100,
            safety_distance: 150,
            score_distance_weight_percent: 60,
            score_health_weight_percent: 40,
        }
    }
}

impl AiConfig {
    /// Attacker flee threat threshold as a fraction.
    #[must_use]
    pub fn flee_threat(&self) -> Fixed {
        percent(self.attacker_flee_threat_percent)
    }

    /// Attacker flee support threshold as a fraction.
    #[must_use]
    pub fn flee_support(&self) -> Fixed {
        percent(self.attacker_flee_support_percent)
    }

    /// Neutral safety-seeking threshold as a fraction.
    #[must_use]
    pub fn safety_threat(&self) -> Fixed {
        percent(self.neutral_safety_threat_percent)
    }
}

/// A fast-victory payout tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeBonusTier {
    /// Victories at or under this duration qualify.
    pub within_ms: u64,
    /// Tickets awarded.
    pub tickets: u32,
}

/// Ticket payout rules, from the player's point of view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardConfig {
    /// Base payout for a win.
    pub victory_tickets: u32,
    /// Base payout for a loss.
    pub defeat_tickets: u32,
    /// Flat payout when the player forfeits.
    pub forfeit_tickets: u32,
    /// Per opponent unit killed, on victory.
    pub kill_bonus: u32,
    /// For elimination or total-wipe victories.
    pub decisive_bonus: u32,
    /// Checked in order; the first matching tier pays.
    pub time_bonus_tiers: Vec<TimeBonusTier>,
    /// Payout never drops below this.
    pub minimum_tickets: u32,
    /// Achievement thresholds and values.
    pub achievements: AchievementConfig,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            victory_tickets: 5,
            defeat_tickets: 2,
            forfeit_tickets: 1,
            kill_bonus: 1,
            decisive_bonus: 3,
            time_bonus_tiers: vec![
                TimeBonusTier {
                    within_ms: 60_000,
                    tickets: 8,
                },
                TimeBonusTier {
                    within_ms: 120_000,
                    tickets: 5,
                },
            ],
            minimum_tickets: 1,
            achievements: AchievementConfig::default(),
        }
    }
}

impl RewardConfig {
    /// Parse reward rules from RON text.
    ///
    /// # Errors
    ///
    /// Returns [`BattleError::DataParseError`] on malformed RON.
    pub fn from_ron_str(text: &str) -> Result<Self> {
        ron::from_str(text).map_err(|e| BattleError::DataParseError {
            what: "reward config".to_string(),
            message: e.to_string(),
        })
    }
}

/// When achievements unlock and what they pay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AchievementConfig {
    /// Victories strictly faster than this earn `QuickVictory`.
    pub quick_victory_ms: u64,
    /// Kills needed for `FishSlayer`.
    pub fish_slayer_kills: u32,
    /// Damage needed for `DamageDealer`.
    pub damage_dealer_threshold: u64,
    /// Payout for `FirstBlood`.
    pub first_blood_tickets: u32,
    /// Payout for `PerfectVictory`.
    pub perfect_victory_tickets: u32,
    /// Payout for `FishSlayer`.
    pub fish_slayer_tickets: u32,
    /// Payout for `DamageDealer`.
    pub damage_dealer_tickets: u32,
    /// Payout for `QuickVictory`.
    pub quick_victory_tickets: u32,
}

impl Default for AchievementConfig {
    fn default() -> Self {
        Self {
            quick_victory_ms: 60_000,
            fish_slayer_kills: 10,
            damage_dealer_threshold: 500,
            first_blood_tickets: 3,
            perfect_victory_tickets: 10,
            fish_slayer_tickets: 8,
            damage_dealer_tickets: 6,
            quick_victory_tickets: 5,
        }
    }
}
