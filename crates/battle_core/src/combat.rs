//! Damage resolution and combat events.
//!
//! Damage is computed in exact integer arithmetic:
//!
//! ```text
//! damage = max(1, floor((attacker.damage - defense / 2) * factor))
//! defense = max(1, target.max_hp / 10)
//! factor  = uniform in [0.8, 1.2] at 1/10000 resolution
//! ```
//!
//! Working in twentieths of a hit point keeps `defense / 2` integral, so no
//! rounding happens before the final floor.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::unit::{Side, Unit, UnitId};
use crate::victory::VictoryReason;

/// Lowest damage roll factor, in ten-thousandths.
pub const FACTOR_MIN: u32 = 8_000;
/// Highest damage roll factor, in ten-thousandths.
pub const FACTOR_MAX: u32 = 12_000;
/// Denominator of the roll factor.
pub const FACTOR_SCALE: u32 = 10_000;

/// Draw a damage roll factor in `[FACTOR_MIN, FACTOR_MAX]`.
pub fn roll_factor<R: Rng + ?Sized>(rng: &mut R) -> u32 {
    rng.gen_range(FACTOR_MIN..=FACTOR_MAX)
}

/// Damage dealt by an attack of `attack_damage` against a target with
/// `target_max_hp`, for a given roll `factor`.
///
/// Always at least 1.
///
/// # Example
///
/// ```
/// use battle_core::combat::resolve_damage;
///
/// // 50 damage into a 100 HP target: (50 - 5) * factor
/// assert_eq!(resolve_damage(50, 100, 8_000), 36);
/// assert_eq!(resolve_damage(50, 100, 12_000), 54);
/// assert_eq!(resolve_damage(1, 5_000, 10_000), 1);
/// ```
#[must_use]
pub fn resolve_damage(attack_damage: u32, target_max_hp: u32, factor: u32) -> u32 {
    // 20 * (damage - max(1, hp / 10) / 2) == 20 * damage - max(10, hp)
    let base_twentieths = 20 * i64::from(attack_damage) - i64::from(target_max_hp).max(10);
    let scaled = (base_twentieths * i64::from(factor)).div_euclid(20 * i64::from(FACTOR_SCALE));
    u32::try_from(scaled.max(1)).unwrap_or(u32::MAX)
}

/// Roll the damage `attacker` deals to `target`.
pub fn roll_damage<R: Rng + ?Sized>(attacker: &Unit, target: &Unit, rng: &mut R) -> u32 {
    resolve_damage(attacker.damage, target.max_hp, roll_factor(rng))
}

/// A landed hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageEvent {
    /// Unit that attacked.
    pub attacker: UnitId,
    /// Unit that was hit.
    pub target: UnitId,
    /// Hit points removed.
    pub amount: u32,
    /// Simulated time.
    pub at_ms: u64,
}

/// A unit killed by a hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeathEvent {
    /// Unit that landed the killing hit.
    pub killer: UnitId,
    /// Unit that died.
    pub victim: UnitId,
    /// Side of the unit that died.
    pub victim_side: Side,
    /// Simulated time.
    pub at_ms: u64,
}

/// Entry of the bounded battle history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CombatEvent {
    /// A unit entered the tank.
    Deployed {
        /// New unit.
        unit: UnitId,
        /// Owning side.
        side: Side,
        /// Fish type.
        fish_type: String,
        /// Simulated time.
        at_ms: u64,
    },
    /// A hit landed.
    Attack(DamageEvent),
    /// A unit died.
    Death(DeathEvent),
    /// The match was decided.
    Victory {
        /// Winning side.
        winner: Side,
        /// Deciding rule.
        reason: VictoryReason,
        /// Simulated time.
        at_ms: u64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_damage_bounds_for_fifty_vs_hundred() {
        assert_eq!(resolve_damage(50, 100, FACTOR_MIN), 36);
        assert_eq!(resolve_damage(50, 100, FACTOR_SCALE), 45);
        assert_eq!(resolve_damage(50, 100, FACTOR_MAX), 54);
    }

    #[test]
    fn test_small_targets_use_minimum_defense() {
        // max_hp 5 -> defense 1 -> 20 - 0.5
        assert_eq!(resolve_damage(20, 5, FACTOR_SCALE), 19);
        assert_eq!(resolve_damage(20, 250, FACTOR_SCALE), 7);
    }

    #[test]
    fn test_damage_floor_when_defense_exceeds_attack() {
        assert_eq!(resolve_damage(10, 8_000, FACTOR_MAX), 1);
        assert_eq!(resolve_damage(0, 0, FACTOR_MIN), 1);
    }

    #[test]
    fn test_fractional_defense() {
        // max_hp 45 -> defense 4.5 -> (20 - 2.25) * 1.0 = 17.75
        assert_eq!(resolve_damage(20, 45, FACTOR_SCALE), 17);
    }

    #[test]
    fn test_roll_factor_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..1_000 {
            let factor = roll_factor(&mut rng);
            assert!((FACTOR_MIN..=FACTOR_MAX).contains(&factor));
        }
    }
}
