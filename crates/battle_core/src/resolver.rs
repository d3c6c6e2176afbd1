//! Per-tick combat state machine.
//!
//! # Tick Order
//!
//! 1. Every alive player unit, then every alive opponent unit, in insertion
//!    order, consults the targeting AI and acts on its decision.
//! 2. Units killed during the tick are swept from their rosters.
//! 3. Targets pointing at swept units are cleared.
//!
//! A unit that landed a hit withdraws until its retreat completes; only a
//! flee decision interrupts the withdrawal.

use rand::Rng;

use crate::ai::{self, Decision};
use crate::combat::{roll_damage, DamageEvent, DeathEvent};
use crate::config::BattleConfig;
use crate::math::{Bounds, Fixed, Vec2Fixed};
use crate::roster::Roster;
use crate::unit::{CombatState, DamageOutcome, Facing, Side, Unit, UnitId};

/// Events produced by one tick.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickOutcome {
    /// Hits landed, in resolution order.
    pub damage_events: Vec<DamageEvent>,
    /// Units killed, in resolution order.
    pub deaths: Vec<DeathEvent>,
}

/// Advances a pair of rosters by one tick.
#[derive(Debug, Clone, Copy)]
pub struct CombatResolver<'a> {
    config: &'a BattleConfig,
    bounds: Bounds,
    tick_seconds: Fixed,
}

impl<'a> CombatResolver<'a> {
    /// Create a resolver for `config`.
    #[must_use]
    pub fn new(config: &'a BattleConfig) -> Self {
        Self {
            config,
            bounds: config.bounds(),
            tick_seconds: config.tick_seconds(),
        }
    }

    /// Run one tick at simulated time `now`.
    pub fn tick<R: Rng + ?Sized>(
        &self,
        player: &mut Roster,
        opponent: &mut Roster,
        now: u64,
        rng: &mut R,
    ) -> TickOutcome {
        let mut outcome = TickOutcome::default();

        for side in [Side::Player, Side::Opponent] {
            let (acting, enemies) = match side {
                Side::Player => (&mut *player, &mut *opponent),
                Side::Opponent => (&mut *opponent, &mut *player),
            };
            for id in acting.ids() {
                self.act(id, acting, enemies, now, rng, &mut outcome);
            }
        }

        player.remove_dead();
        opponent.remove_dead();
        player.clear_targets_not_in(opponent);
        opponent.clear_targets_not_in(player);

        outcome
    }

    fn act<R: Rng + ?Sized>(
        &self,
        id: UnitId,
        acting: &mut Roster,
        enemies: &mut Roster,
        now: u64,
        rng: &mut R,
        outcome: &mut TickOutcome,
    ) {
        let Some(unit) = acting.get(id) else {
            return;
        };
        if !unit.is_alive() {
            return;
        }

        let decision = ai::decide(
            unit,
            enemies.units(),
            acting.units(),
            &self.config.ai,
            &self.bounds,
            rng,
        );
        let retreating = unit.combat_state == CombatState::Retreating;

        if retreating && !matches!(decision, Decision::Flee { .. }) {
            if let Some(unit) = acting.get_mut(id) {
                self.continue_retreat(unit, now);
            }
            return;
        }

        match decision {
            Decision::Attack(target) => self.attack(id, target, acting, enemies, now, rng, outcome),
            Decision::Move {
                destination,
                via,
                patrol,
            } => {
                if let Some(unit) = acting.get_mut(id) {
                    self.move_unit(unit, destination, via, patrol);
                }
            }
            Decision::Flee { direction } => {
                if let Some(unit) = acting.get_mut(id) {
                    self.flee(unit, direction);
                }
            }
            Decision::Idle => {
                if let Some(unit) = acting.get_mut(id) {
                    unit.combat_state = CombatState::Idle;
                }
            }
        }
    }

    fn attack<R: Rng + ?Sized>(
        &self,
        id: UnitId,
        target_id: UnitId,
        acting: &mut Roster,
        enemies: &mut Roster,
        now: u64,
        rng: &mut R,
        outcome: &mut TickOutcome,
    ) {
        let Some(target) = enemies.get(target_id).filter(|target| target.is_alive()) else {
            if let Some(unit) = acting.get_mut(id) {
                unit.target = None;
            }
            return;
        };
        let target_position = target.position;

        let Some(unit) = acting.get_mut(id) else {
            return;
        };
        unit.target = Some(target_id);
        unit.waypoint = None;

        if now < unit.attack_cooldown_until || !unit.can_strike(target_position) {
            unit.turn_toward(target_position);
            unit.combat_state = CombatState::Attacking;
            return;
        }

        let amount = roll_damage(unit, target, rng);
        unit.attack_cooldown_until = now + self.config.attack_cooldown_ms;
        self.begin_retreat(unit, target_position, now);

        let killed = enemies
            .get_mut(target_id)
            .map(|target| target.apply_damage(amount));

        acting.record_damage(amount, now);
        outcome.damage_events.push(DamageEvent {
            attacker: id,
            target: target_id,
            amount,
            at_ms: now,
        });

        if killed == Some(DamageOutcome::Killed) {
            acting.record_kill();
            outcome.deaths.push(DeathEvent {
                killer: id,
                victim: target_id,
                victim_side: enemies.side(),
                at_ms: now,
            });
            tracing::debug!(killer = %id, victim = %target_id, at_ms = now, "Unit killed");
        }
    }

    fn retreat_speed(&self, unit: &Unit) -> Fixed {
        unit.speed * Fixed::from_num(self.config.retreat.speed_percent) / Fixed::from_num(100)
    }

    fn begin_retreat(&self, unit: &mut Unit, threat: Vec2Fixed, now: u64) {
        let mut away = (unit.position - threat).normalize();
        if away.is_zero() {
            away = match unit.facing {
                Facing::Right => Vec2Fixed::new(-Fixed::ONE, Fixed::ZERO),
                Facing::Left => Vec2Fixed::new(Fixed::ONE, Fixed::ZERO),
            };
        }
        let distance = Fixed::from_num(self.config.retreat.distance);
        let destination = self.bounds.clamp(unit.position + away.scale(distance));

        let speed = self.retreat_speed(unit);
        let travel_ms = if speed > Fixed::ZERO {
            (unit.position.distance(destination) * Fixed::from_num(1_000) / speed).to_num::<u64>()
        } else {
            0
        };

        unit.combat_state = CombatState::Retreating;
        unit.retreat_to = Some(destination);
        unit.state_ends_at = Some(now + travel_ms.max(self.config.retreat.min_duration_ms));
    }

    fn continue_retreat(&self, unit: &mut Unit, now: u64) {
        let mut arrived = true;
        if let Some(destination) = unit.retreat_to {
            let step = self.retreat_speed(unit) * self.tick_seconds;
            let (next, reached) = unit.position.step_toward(destination, step);
            unit.move_to(self.bounds.clamp(next));
            arrived = reached;
        }

        let expired = unit.state_ends_at.map_or(true, |ends| now >= ends);
        if arrived || expired {
            unit.combat_state = CombatState::Idle;
            unit.retreat_to = None;
            unit.state_ends_at = None;
        }
    }

    fn move_unit(
        &self,
        unit: &mut Unit,
        destination: Vec2Fixed,
        via: Option<UnitId>,
        patrol: bool,
    ) {
        unit.target = via;
        unit.combat_state = if via.is_some() {
            CombatState::Chasing
        } else {
            CombatState::Patrolling
        };

        let destination = self.bounds.clamp(destination);
        let (next, arrived) = unit
            .position
            .step_toward(destination, unit.speed * self.tick_seconds);
        // Rounding can land a step a hair past a wall.
        unit.move_to(self.bounds.clamp(next));

        unit.waypoint = if patrol && !arrived {
            Some(destination)
        } else {
            None
        };
    }

    fn flee(&self, unit: &mut Unit, direction: Vec2Fixed) {
        unit.combat_state = CombatState::Fleeing;
        unit.target = None;
        unit.waypoint = None;
        unit.retreat_to = None;
        unit.state_ends_at = None;

        let step = unit.speed * self.tick_seconds;
        let next = self.bounds.clamp(unit.position + direction.scale(step));
        unit.move_to(next);
    }
}
