//! Deployed combatants.
//!
//! A [`Unit`] is plain data. The targeting AI reads it; only the combat
//! resolver and the deployment gate write to it.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::data::BattleStats;
use crate::math::{fixed_serde, Fixed, Vec2Fixed};

/// Unique identifier of a unit within one match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UnitId(pub u32);

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unit#{}", self.0)
    }
}

/// The two sides of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// The local player, attacking.
    Player,
    /// The owner of the tank being attacked.
    Opponent,
}

impl Side {
    /// The other side.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Player => Self::Opponent,
            Self::Opponent => Self::Player,
        }
    }

    /// Horizontal direction a freshly deployed unit of this side looks.
    #[must_use]
    pub const fn initial_facing(self) -> Facing {
        match self {
            Self::Player => Facing::Right,
            Self::Opponent => Facing::Left,
        }
    }
}

/// Combat role, fixed at deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Hunts the weakest enemy; flees when outmatched.
    Attacker,
    /// Guards the area around where it was deployed.
    Defender,
    /// Never attacks of its own accord; avoids enemies.
    Neutral,
}

/// Horizontal facing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Facing {
    /// Looking toward negative x.
    Left,
    /// Looking toward positive x.
    Right,
}

/// What a unit is currently doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CombatState {
    /// Standing still.
    #[default]
    Idle,
    /// Moving to a waypoint without a target.
    Patrolling,
    /// Moving toward a target.
    Chasing,
    /// Engaged with a target in reach, waiting to strike.
    Attacking,
    /// Withdrawing after a hit.
    Retreating,
    /// Running from danger.
    Fleeing,
}

/// Result of applying damage to a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// The unit was already dead; nothing changed.
    Ignored,
    /// The unit survived with the given hit points.
    Wounded(u32),
    /// This hit killed the unit.
    Killed,
}

/// One deployed fighter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Unit {
    /// Match-unique id.
    pub id: UnitId,
    /// Owning side.
    pub side: Side,
    /// Fish type this unit was built from.
    pub source_type: String,
    /// Combat role.
    pub role: Role,
    /// Hit point pool at deployment.
    pub max_hp: u32,
    /// Remaining hit points.
    pub current_hp: u32,
    /// False once hit points reach zero.
    pub alive: bool,
    /// Damage per landed attack.
    pub damage: u32,
    /// Units per second.
    #[serde(with = "fixed_serde")]
    pub speed: Fixed,
    /// Reach of an attack.
    #[serde(with = "fixed_serde")]
    pub attack_range: Fixed,
    /// Radius within which enemies are noticed.
    #[serde(with = "fixed_serde")]
    pub detection_range: Fixed,
    /// Current position.
    pub position: Vec2Fixed,
    /// Deployment position.
    pub home_position: Vec2Fixed,
    /// Horizontal facing.
    pub facing: Facing,
    /// Enemy currently pursued or attacked.
    pub target: Option<UnitId>,
    /// No attack before this simulated time.
    pub attack_cooldown_until: u64,
    /// Current behaviour.
    pub combat_state: CombatState,
    /// When a timed state (retreat) ends.
    pub state_ends_at: Option<u64>,
    /// Withdrawal destination while retreating.
    pub retreat_to: Option<Vec2Fixed>,
    /// Patrol or wander destination, kept until reached.
    pub waypoint: Option<Vec2Fixed>,
}

impl Unit {
    /// Build a fresh unit at `position`.
    #[must_use]
    pub fn new(
        id: UnitId,
        side: Side,
        source_type: impl Into<String>,
        stats: BattleStats,
        position: Vec2Fixed,
        detection_range_multiplier: u32,
    ) -> Self {
        let attack_range = Fixed::from_num(stats.attack_range);
        Self {
            id,
            side,
            source_type: source_type.into(),
            role: stats.role,
            max_hp: stats.hp,
            current_hp: stats.hp,
            alive: stats.hp > 0,
            damage: stats.damage,
            speed: Fixed::from_num(stats.speed),
            attack_range,
            detection_range: attack_range * Fixed::from_num(detection_range_multiplier),
            position,
            home_position: position,
            facing: side.initial_facing(),
            target: None,
            attack_cooldown_until: 0,
            combat_state: CombatState::Idle,
            state_ends_at: None,
            retreat_to: None,
            waypoint: None,
        }
    }

    /// Check if the unit is alive.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.alive
    }

    /// Remaining hit points as a fraction of the maximum.
    #[must_use]
    pub fn health_fraction(&self) -> Fixed {
        if self.max_hp == 0 {
            return Fixed::ZERO;
        }
        Fixed::from_num(self.current_hp) / Fixed::from_num(self.max_hp)
    }

    /// Subtract `amount` hit points.
    ///
    /// Dead units ignore further damage, so a unit reports
    /// [`DamageOutcome::Killed`] at most once.
    pub fn apply_damage(&mut self, amount: u32) -> DamageOutcome {
        if !self.alive {
            return DamageOutcome::Ignored;
        }
        self.current_hp = self.current_hp.saturating_sub(amount);
        if self.current_hp == 0 {
            self.alive = false;
            self.target = None;
            DamageOutcome::Killed
        } else {
            DamageOutcome::Wounded(self.current_hp)
        }
    }

    /// Whether the unit looks toward `point` horizontally.
    ///
    /// A point directly above or below counts as faced.
    #[must_use]
    pub fn faces(&self, point: Vec2Fixed) -> bool {
        let dx = point.x - self.position.x;
        match self.facing {
            Facing::Right => dx >= Fixed::ZERO,
            Facing::Left => dx <= Fixed::ZERO,
        }
    }

    /// Turn to look toward `point`. Leaves facing unchanged for dx == 0.
    pub fn turn_toward(&mut self, point: Vec2Fixed) {
        let dx = point.x - self.position.x;
        if dx > Fixed::ZERO {
            self.facing = Facing::Right;
        } else if dx < Fixed::ZERO {
            self.facing = Facing::Left;
        }
    }

    /// Whether a target at `point` can be struck from here.
    ///
    /// Close targets (under half the attack range) are always reachable.
    /// Between half range and full range the unit must face the target.
    #[must_use]
    pub fn can_strike(&self, point: Vec2Fixed) -> bool {
        let distance = self.position.distance(point);
        if distance > self.attack_range {
            return false;
        }
        if distance < self.attack_range / Fixed::from_num(2) {
            return true;
        }
        self.faces(point)
    }

    /// Move to `position`, updating facing from the horizontal motion.
    pub fn move_to(&mut self, position: Vec2Fixed) {
        self.turn_toward(position);
        self.position = position;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(hp: u32) -> Unit {
        Unit::new(
            UnitId(1),
            Side::Player,
            "fish_002",
            BattleStats {
                role: Role::Attacker,
                hp,
                damage: 35,
                speed: 80,
                attack_range: 100,
            },
            Vec2Fixed::ZERO,
            2,
        )
    }

    #[test]
    fn test_new_unit() {
        let u = unit(150);
        assert!(u.is_alive());
        assert_eq!(u.current_hp, 150);
        assert_eq!(u.detection_range, Fixed::from_num(200));
        assert_eq!(u.facing, Facing::Right);
        assert_eq!(u.home_position, u.position);
    }

    #[test]
    fn test_damage_then_death_once() {
        let mut u = unit(50);
        assert_eq!(u.apply_damage(20), DamageOutcome::Wounded(30));
        assert_eq!(u.apply_damage(40), DamageOutcome::Killed);
        assert!(!u.is_alive());
        assert_eq!(u.current_hp, 0);
        assert_eq!(u.apply_damage(10), DamageOutcome::Ignored);
        assert_eq!(u.current_hp, 0);
    }

    #[test]
    fn test_facing_band() {
        let mut u = unit(50);
        u.facing = Facing::Left;

        // Inside half range: always reachable.
        assert!(u.can_strike(Vec2Fixed::from_ints(40, 0)));
        // Borderline band behind the unit: must turn first.
        assert!(!u.can_strike(Vec2Fixed::from_ints(80, 0)));
        u.turn_toward(Vec2Fixed::from_ints(80, 0));
        assert!(u.can_strike(Vec2Fixed::from_ints(80, 0)));
        // Out of range.
        assert!(!u.can_strike(Vec2Fixed::from_ints(101, 0)));
    }

    #[test]
    fn test_vertical_target_counts_as_faced() {
        let u = unit(50);
        assert!(u.faces(Vec2Fixed::from_ints(0, 90)));
        assert!(u.can_strike(Vec2Fixed::from_ints(0, 90)));
    }

    #[test]
    fn test_side_helpers() {
        assert_eq!(Side::Player.opposite(), Side::Opponent);
        assert_eq!(Side::Opponent.initial_facing(), Facing::Left);
        assert_eq!(UnitId(7).to_string(), "unit#7");
    }
}
