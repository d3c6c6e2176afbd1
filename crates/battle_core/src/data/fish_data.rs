//! Fish type definitions and their battle stat derivation.

use serde::{Deserialize, Serialize};

use crate::unit::Role;

/// Data-driven fish type definition.
///
/// A fish's battle role is not stored; it follows from which of the combat
/// health pools the type carries. See [`FishProfile::battle_stats`].
///
/// # Example RON
///
/// ```ron
/// (
///     id: "fish_002",
///     name: "Abyssal Pike",
///     health: 30,
///     attack_hp: Some(150),
///     damage: Some(35),
///     speed: Some(80),
///     attack_range: Some(120),
/// )
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FishProfile {
    /// Unique string identifier for this fish type.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Base health, used as hit points by neutral fish.
    pub health: u32,

    /// Combat health when fighting as an attacker.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attack_hp: Option<u32>,

    /// Combat health when fighting as a defender.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defense_hp: Option<u32>,

    /// Damage per landed attack.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub damage: Option<u32>,

    /// Movement speed in units per second.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<u32>,

    /// Attack reach in world units.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attack_range: Option<u32>,
}

/// Combat stats a fish type deploys with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleStats {
    /// Role fixed for the unit's lifetime.
    pub role: Role,
    /// Starting and maximum hit points.
    pub hp: u32,
    /// Damage per landed attack.
    pub damage: u32,
    /// Movement speed in units per second.
    pub speed: u32,
    /// Attack reach in world units.
    pub attack_range: u32,
}

impl FishProfile {
    /// Derive the stats a unit of this type fights with.
    ///
    /// A positive attack pool makes an attacker even when a defense pool is
    /// also present. Missing damage, speed or range take the role default
    /// (attacker 20/60/100, defender 15/50/90, neutral 10/40/60).
    #[must_use]
    pub fn battle_stats(&self) -> BattleStats {
        let positive = |pool: Option<u32>| pool.filter(|&hp| hp > 0);

        let (role, hp) = if let Some(hp) = positive(self.attack_hp) {
            (Role::Attacker, hp)
        } else if let Some(hp) = positive(self.defense_hp) {
            (Role::Defender, hp)
        } else {
            (Role::Neutral, self.health)
        };

        let (damage, speed, attack_range) = match role {
            Role::Attacker => (20, 60, 100),
            Role::Defender => (15, 50, 90),
            Role::Neutral => (10, 40, 60),
        };

        BattleStats {
            role,
            hp,
            damage: self.damage.unwrap_or(damage),
            speed: self.speed.unwrap_or(speed),
            attack_range: self.attack_range.unwrap_or(attack_range),
        }
    }
}
