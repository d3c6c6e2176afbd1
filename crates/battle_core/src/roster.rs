//! Per-side unit collections and deployment bookkeeping.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::BattleConfig;
use crate::math::Fixed;
use crate::unit::{Role, Side, Unit, UnitId};

/// Reasons the deployment gate rejects a unit.
///
/// A rejected deployment never mutates any state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeployError {
    /// The side hit its deployment or concurrent unit cap.
    #[error("{side:?} reached the cap of {limit} units")]
    CapReached {
        /// Side that was rejected.
        side: Side,
        /// The cap in force.
        limit: usize,
    },

    /// The side deployed too recently.
    #[error("deployment cooldown active for another {remaining_ms}ms")]
    CooldownActive {
        /// Time until the next deployment is allowed.
        remaining_ms: u64,
    },

    /// No profile for the requested fish type.
    #[error("unknown fish type '{0}'")]
    UnknownFishType(String),

    /// The fish type resolves to a unit with no hit points.
    #[error("fish type '{0}' has no hit points")]
    NoHitPoints(String),

    /// Combat has started and reinforcements are disabled.
    #[error("reinforcements are disabled once combat starts")]
    ReinforcementsClosed,

    /// The opponent roster is fixed once combat starts.
    #[error("the opponent roster is fixed once combat starts")]
    CombatStarted,

    /// The match already has a result.
    #[error("the match is finished")]
    MatchFinished,
}

/// An exact non-negative fraction, compared without rounding.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Ratio {
    /// Top.
    pub numerator: u64,
    /// Bottom; never zero.
    pub denominator: u64,
}

impl Ratio {
    /// Build `numerator / denominator`; an empty denominator yields zero.
    #[must_use]
    pub const fn new(numerator: u64, denominator: u64) -> Self {
        if denominator == 0 {
            Self {
                numerator: 0,
                denominator: 1,
            }
        } else {
            Self {
                numerator,
                denominator,
            }
        }
    }

    /// Check if the ratio is zero.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.numerator == 0
    }

    /// Strictly greater than `percent` / 100.
    #[must_use]
    pub fn exceeds_percent(self, percent: u32) -> bool {
        u128::from(self.numerator) * 100 > u128::from(percent) * u128::from(self.denominator)
    }

    /// Approximate value for display.
    #[must_use]
    pub fn to_fixed(self) -> Fixed {
        Fixed::from_num(self.numerator) / Fixed::from_num(self.denominator)
    }
}

impl PartialEq for Ratio {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Ratio {}

impl PartialOrd for Ratio {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Ratio {
    fn cmp(&self, other: &Self) -> Ordering {
        let lhs = u128::from(self.numerator) * u128::from(other.denominator);
        let rhs = u128::from(other.numerator) * u128::from(self.denominator);
        lhs.cmp(&rhs)
    }
}

/// One accepted deployment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeploymentRecord {
    /// Unit created by the deployment.
    pub unit_id: UnitId,
    /// Fish type deployed.
    pub fish_type: String,
    /// Role the unit fought with.
    pub role: Role,
    /// Simulated time of deployment.
    pub deployed_at: u64,
    /// Cleared when the unit dies.
    pub survived: bool,
}

/// One side's units plus deployment bookkeeping and combat tallies.
///
/// Units stay in insertion order. Dead units remain in [`units`](Self::units)
/// only until the end of the tick they died in, when
/// [`remove_dead`](Self::remove_dead) moves them to the fallen list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Roster {
    side: Side,
    units: Vec<Unit>,
    fallen: Vec<UnitId>,
    deployed: Vec<DeploymentRecord>,
    last_deployment_at: Option<u64>,
    damage_dealt: u64,
    kills: u32,
    first_strike_at: Option<u64>,
}

impl Roster {
    /// Create an empty roster.
    #[must_use]
    pub fn new(side: Side) -> Self {
        Self {
            side,
            units: Vec::new(),
            fallen: Vec::new(),
            deployed: Vec::new(),
            last_deployment_at: None,
            damage_dealt: 0,
            kills: 0,
            first_strike_at: None,
        }
    }

    /// Owning side.
    #[must_use]
    pub const fn side(&self) -> Side {
        self.side
    }

    /// Check whether another unit may be deployed at `now`.
    ///
    /// Before combat the cap counts every deployment; once combat started it
    /// counts units alive at the same time.
    ///
    /// # Errors
    ///
    /// Returns the first failing gate condition.
    pub fn check_deploy(
        &self,
        now: u64,
        combat_started: bool,
        config: &BattleConfig,
    ) -> Result<(), DeployError> {
        if combat_started {
            if !config.allow_reinforcements {
                return Err(DeployError::ReinforcementsClosed);
            }
            if self.alive_count() >= config.max_concurrent_units {
                return Err(DeployError::CapReached {
                    side: self.side,
                    limit: config.max_concurrent_units,
                });
            }
        } else {
            self.check_capacity(config)?;
        }

        if let Some(last) = self.last_deployment_at {
            let ready_at = last + config.deployment_cooldown_ms;
            if now < ready_at {
                return Err(DeployError::CooldownActive {
                    remaining_ms: ready_at - now,
                });
            }
        }
        Ok(())
    }

    /// Check only the pre-combat deployment cap.
    ///
    /// # Errors
    ///
    /// Returns [`DeployError::CapReached`] once `max_deployments` is used up.
    pub fn check_capacity(&self, config: &BattleConfig) -> Result<(), DeployError> {
        if self.deployed_count() >= config.max_deployments {
            return Err(DeployError::CapReached {
                side: self.side,
                limit: config.max_deployments,
            });
        }
        Ok(())
    }

    /// Add a unit and record its deployment. Callers gate first.
    pub fn deploy(&mut self, unit: Unit, now: u64) -> UnitId {
        let id = unit.id;
        self.deployed.push(DeploymentRecord {
            unit_id: id,
            fish_type: unit.source_type.clone(),
            role: unit.role,
            deployed_at: now,
            survived: true,
        });
        self.units.push(unit);
        self.last_deployment_at = Some(now);
        id
    }

    /// Units in insertion order.
    #[must_use]
    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    /// Mutable units in insertion order.
    pub fn units_mut(&mut self) -> &mut [Unit] {
        &mut self.units
    }

    /// Look up a unit by id.
    #[must_use]
    pub fn get(&self, id: UnitId) -> Option<&Unit> {
        self.units.iter().find(|u| u.id == id)
    }

    /// Look up a unit by id, mutably.
    pub fn get_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        self.units.iter_mut().find(|u| u.id == id)
    }

    /// Whether `id` names a living member.
    #[must_use]
    pub fn is_alive(&self, id: UnitId) -> bool {
        self.get(id).is_some_and(Unit::is_alive)
    }

    /// Ids of members in insertion order.
    #[must_use]
    pub fn ids(&self) -> Vec<UnitId> {
        self.units.iter().map(|u| u.id).collect()
    }

    /// Living members.
    #[must_use]
    pub fn alive_count(&self) -> usize {
        self.units.iter().filter(|u| u.alive).count()
    }

    /// Members that died, swept or not.
    #[must_use]
    pub fn dead_count(&self) -> usize {
        self.fallen.len() + self.units.iter().filter(|u| !u.alive).count()
    }

    /// Total accepted deployments.
    #[must_use]
    pub fn deployed_count(&self) -> usize {
        self.deployed.len()
    }

    /// Alive over deployed; zero when nothing was deployed.
    #[must_use]
    pub fn survival(&self) -> Ratio {
        Ratio::new(self.alive_count() as u64, self.deployed_count() as u64)
    }

    /// Dead over deployed; zero when nothing was deployed.
    #[must_use]
    pub fn eliminated(&self) -> Ratio {
        Ratio::new(self.dead_count() as u64, self.deployed_count() as u64)
    }

    /// Move dead members to the fallen list.
    ///
    /// Returns the removed ids in insertion order.
    pub fn remove_dead(&mut self) -> Vec<UnitId> {
        let removed: Vec<UnitId> = self
            .units
            .iter()
            .filter(|u| !u.alive)
            .map(|u| u.id)
            .collect();
        if removed.is_empty() {
            return removed;
        }

        self.units.retain(|u| u.alive);
        for record in &mut self.deployed {
            if removed.contains(&record.unit_id) {
                record.survived = false;
            }
        }
        self.fallen.extend_from_slice(&removed);
        removed
    }

    /// Clear every member's target that is not in `alive_enemies`.
    pub fn clear_targets_not_in(&mut self, enemies: &Roster) {
        for unit in &mut self.units {
            if let Some(target) = unit.target {
                if !enemies.is_alive(target) {
                    unit.target = None;
                }
            }
        }
    }

    /// Ids of members that died, in the order they were removed.
    #[must_use]
    pub fn fallen(&self) -> &[UnitId] {
        &self.fallen
    }

    /// Every deployment, in order.
    #[must_use]
    pub fn records(&self) -> &[DeploymentRecord] {
        &self.deployed
    }

    /// Ids of every unit ever deployed, in deployment order.
    #[must_use]
    pub fn deployed_ids(&self) -> Vec<UnitId> {
        self.deployed.iter().map(|r| r.unit_id).collect()
    }

    /// Tally damage dealt by this side.
    pub fn record_damage(&mut self, amount: u32, now: u64) {
        self.damage_dealt += u64::from(amount);
        self.first_strike_at.get_or_insert(now);
    }

    /// Tally a kill by this side.
    pub fn record_kill(&mut self) {
        self.kills += 1;
    }

    /// Cumulative damage dealt by this side.
    #[must_use]
    pub const fn damage_dealt(&self) -> u64 {
        self.damage_dealt
    }

    /// Enemy units killed by this side.
    #[must_use]
    pub const fn kills(&self) -> u32 {
        self.kills
    }

    /// When this side first landed a hit.
    #[must_use]
    pub const fn first_strike_at(&self) -> Option<u64> {
        self.first_strike_at
    }

    /// Last accepted deployment time.
    #[must_use]
    pub const fn last_deployment_at(&self) -> Option<u64> {
        self.last_deployment_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::BattleStats;
    use crate::math::Vec2Fixed;

    fn unit(id: u32) -> Unit {
        Unit::new(
            UnitId(id),
            Side::Player,
            "fish_006",
            BattleStats {
                role: Role::Attacker,
                hp: 40,
                damage: 20,
                speed: 100,
                attack_range: 80,
            },
            Vec2Fixed::ZERO,
            2,
        )
    }

    #[test]
    fn test_ratio_compares_exactly() {
        assert_eq!(Ratio::new(1, 2), Ratio::new(2, 4));
        assert!(Ratio::new(3, 5) > Ratio::new(2, 5));
        assert!(Ratio::new(0, 0).is_zero());
        assert!(Ratio::new(6, 10).exceeds_percent(50));
        assert!(!Ratio::new(5, 10).exceeds_percent(50));
    }

    #[test]
    fn test_deploy_records() {
        let mut roster = Roster::new(Side::Player);
        roster.deploy(unit(1), 0);
        roster.deploy(unit(2), 2_000);

        assert_eq!(roster.deployed_count(), 2);
        assert_eq!(roster.alive_count(), 2);
        assert_eq!(roster.last_deployment_at(), Some(2_000));
        assert_eq!(roster.records()[1].fish_type, "fish_006");
        assert!(roster.records().iter().all(|r| r.survived));
    }

    #[test]
    fn test_cooldown_gate() {
        let config = BattleConfig::default();
        let mut roster = Roster::new(Side::Player);
        assert!(roster.check_deploy(0, false, &config).is_ok());
        roster.deploy(unit(1), 0);

        assert_eq!(
            roster.check_deploy(1_500, false, &config),
            Err(DeployError::CooldownActive { remaining_ms: 500 })
        );
        assert!(roster.check_deploy(2_000, false, &config).is_ok());
    }

    #[test]
    fn test_precombat_cap() {
        let config = BattleConfig {
            max_deployments: 2,
            deployment_cooldown_ms: 0,
            ..BattleConfig::default()
        };
        let mut roster = Roster::new(Side::Player);
        roster.deploy(unit(1), 0);
        roster.deploy(unit(2), 0);

        assert_eq!(
            roster.check_deploy(10, false, &config),
            Err(DeployError::CapReached {
                side: Side::Player,
                limit: 2
            })
        );
    }

    #[test]
    fn test_combat_cap_counts_alive_units() {
        let config = BattleConfig {
            max_deployments: 1,
            max_concurrent_units: 2,
            deployment_cooldown_ms: 0,
            ..BattleConfig::default()
        };
        let mut roster = Roster::new(Side::Player);
        roster.deploy(unit(1), 0);
        roster.deploy(unit(2), 0);
        assert!(roster.check_deploy(0, true, &config).is_err());

        roster.units_mut()[0].apply_damage(1_000);
        roster.remove_dead();
        assert!(roster.check_deploy(0, true, &config).is_ok());

        let closed = BattleConfig {
            allow_reinforcements: false,
            ..config
        };
        assert_eq!(
            roster.check_deploy(0, true, &closed),
            Err(DeployError::ReinforcementsClosed)
        );
    }

    #[test]
    fn test_remove_dead_keeps_conservation() {
        let mut roster = Roster::new(Side::Player);
        for id in 1..=3 {
            roster.deploy(unit(id), 0);
        }
        roster.units_mut()[1].apply_damage(1_000);

        assert_eq!(roster.alive_count() + roster.dead_count(), 3);
        assert_eq!(roster.remove_dead(), vec![UnitId(2)]);
        assert_eq!(roster.alive_count() + roster.dead_count(), 3);
        assert_eq!(roster.fallen(), &[UnitId(2)]);
        assert!(!roster.records()[1].survived);
        assert_eq!(roster.survival(), Ratio::new(2, 3));
        assert_eq!(roster.eliminated(), Ratio::new(1, 3));
    }

    #[test]
    fn test_tallies() {
        let mut roster = Roster::new(Side::Opponent);
        assert_eq!(roster.first_strike_at(), None);
        roster.record_damage(30, 1_200);
        roster.record_damage(12, 2_400);
        roster.record_kill();

        assert_eq!(roster.damage_dealt(), 42);
        assert_eq!(roster.kills(), 1);
        assert_eq!(roster.first_strike_at(), Some(1_200));
    }
}
