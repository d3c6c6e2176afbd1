//! The match driver.
//!
//! [`Battle`] owns both rosters, the simulated clock and the seeded RNG.
//! It moves through three phases:
//!
//! 1. **Deployment**: sides place units; ticking only advances the clock.
//! 2. **Combat**: every tick runs the resolver, and victory is checked on
//!    its cadence.
//! 3. **Finished**: the [`MatchResult`] is fixed and ticking is a no-op.
//!
//! Two battles built with the same seed, config and inputs replay
//! identically; [`Battle::state_hash`] exposes that for testing.

use std::collections::hash_map::DefaultHasher;
use std::collections::VecDeque;
use std::hash::{Hash, Hasher};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::combat::{CombatEvent, DamageEvent, DeathEvent};
use crate::config::BattleConfig;
use crate::data::{BattleStats, ProfileSource};
use crate::error::{BattleError, Result};
use crate::math::Vec2Fixed;
use crate::result::{MatchResult, PerSide};
use crate::resolver::CombatResolver;
use crate::reward::{calculate_reward, determine_achievements, RewardBreakdown};
use crate::roster::{DeployError, Roster};
use crate::sinks::{FrameSink, FrameSnapshot, MatchSink, UnitFrame};
use crate::unit::{Side, Unit, UnitId};
use crate::victory::{HudStatus, Verdict, VictoryEvaluator, VictoryReason};

/// Lifecycle phase of a battle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Units are being placed.
    Deployment,
    /// Units are fighting.
    Combat,
    /// A result exists.
    Finished,
}

/// Events generated during a single tick.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickEvents {
    /// Simulated time the tick ran at.
    pub now_ms: u64,
    /// Hits landed.
    pub damage_events: Vec<DamageEvent>,
    /// Units killed.
    pub deaths: Vec<DeathEvent>,
    /// Set on the tick the match was decided.
    pub verdict: Option<Verdict>,
}

/// One match between a player and an opponent.
#[derive(Debug, Clone)]
pub struct Battle<S: ProfileSource> {
    config: BattleConfig,
    profiles: S,
    seed: u64,
    rng: ChaCha8Rng,
    tick: u64,
    phase: Phase,
    next_unit_id: u32,
    player: Roster,
    opponent: Roster,
    combat_started_at: Option<u64>,
    last_victory_check_at: u64,
    first_kill: Option<Side>,
    history: VecDeque<CombatEvent>,
    result: Option<MatchResult>,
}

impl<S: ProfileSource> Battle<S> {
    /// Create a battle in the deployment phase.
    ///
    /// # Example
    ///
    /// ```
    /// use battle_core::battle::{Battle, Phase};
    /// use battle_core::config::BattleConfig;
    /// use battle_core::data::FishCatalog;
    ///
    /// let catalog = FishCatalog::builtin().unwrap();
    /// let battle = Battle::new(BattleConfig::default(), catalog, 7).unwrap();
    /// assert_eq!(battle.phase(), Phase::Deployment);
    /// assert_eq!(battle.now_ms(), 0);
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`BattleError::InvalidConfig`] if `config` fails validation.
    pub fn new(config: BattleConfig, profiles: S, seed: u64) -> Result<Self> {
        config.validate()?;
        let history = VecDeque::with_capacity(config.max_combat_events);
        Ok(Self {
            config,
            profiles,
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
            tick: 0,
            phase: Phase::Deployment,
            next_unit_id: 1,
            player: Roster::new(Side::Player),
            opponent: Roster::new(Side::Opponent),
            combat_started_at: None,
            last_victory_check_at: 0,
            first_kill: None,
            history,
            result: None,
        })
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Number of ticks run.
    #[must_use]
    pub const fn tick_count(&self) -> u64 {
        self.tick
    }

    /// Simulated time.
    #[must_use]
    pub fn now_ms(&self) -> u64 {
        self.config.tick_to_ms(self.tick)
    }

    /// Simulated combat time so far.
    #[must_use]
    pub fn combat_elapsed_ms(&self) -> u64 {
        self.combat_started_at
            .map_or(0, |start| self.now_ms().saturating_sub(start))
    }

    /// Seed the RNG was built from.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &BattleConfig {
        &self.config
    }

    /// A side's roster.
    #[must_use]
    pub const fn roster(&self, side: Side) -> &Roster {
        match side {
            Side::Player => &self.player,
            Side::Opponent => &self.opponent,
        }
    }

    fn roster_mut(&mut self, side: Side) -> &mut Roster {
        match side {
            Side::Player => &mut self.player,
            Side::Opponent => &mut self.opponent,
        }
    }

    /// Look up a living unit on either side.
    #[must_use]
    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.player.get(id).or_else(|| self.opponent.get(id))
    }

    /// Recent events, oldest first, bounded by `max_combat_events`.
    #[must_use]
    pub fn history(&self) -> &VecDeque<CombatEvent> {
        &self.history
    }

    /// The result, once the match is finished.
    #[must_use]
    pub fn result(&self) -> Option<&MatchResult> {
        self.result.as_ref()
    }

    /// Itemised ticket payout, once the match is finished.
    #[must_use]
    pub fn reward_breakdown(&self) -> Option<RewardBreakdown> {
        self.result
            .as_ref()
            .map(|result| calculate_reward(result, &self.config.rewards))
    }

    /// Deploy a unit of `fish_type` for `side` at `position`.
    ///
    /// The position is clamped into the tank.
    ///
    /// # Errors
    ///
    /// Returns a [`DeployError`] and changes nothing if the match is
    /// finished, the fish type is unknown or has no hit points, the side's
    /// cap is reached, or its deployment cooldown is still running.
    pub fn try_deploy(
        &mut self,
        side: Side,
        fish_type: &str,
        position: Vec2Fixed,
    ) -> std::result::Result<UnitId, DeployError> {
        if self.phase == Phase::Finished {
            return Err(DeployError::MatchFinished);
        }
        let stats = self.deployable_stats(fish_type)?;

        let now = self.now_ms();
        let combat_started = self.phase == Phase::Combat;
        self.roster(side)
            .check_deploy(now, combat_started, &self.config)?;

        let position = self.config.bounds().clamp(position);
        let id = self.spawn(side, fish_type, stats, position, now);
        tracing::info!(?side, fish_type, unit = %id, at_ms = now, "Unit deployed");
        Ok(id)
    }

    /// Fill the opponent roster from a collection snapshot of fish type ids.
    ///
    /// Every id is validated before anything is placed. Units land at random
    /// points in the tank, skip the deployment cooldown, and stop at the
    /// deployment cap; the excess is logged and dropped.
    ///
    /// # Errors
    ///
    /// Returns the error for the first id that cannot be deployed,
    /// [`DeployError::CombatStarted`] once combat is under way, or
    /// [`DeployError::MatchFinished`]. Nothing is placed in any case.
    pub fn populate_opponent(
        &mut self,
        snapshot: &[String],
    ) -> std::result::Result<Vec<UnitId>, DeployError> {
        match self.phase {
            Phase::Deployment => {}
            Phase::Combat => return Err(DeployError::CombatStarted),
            Phase::Finished => return Err(DeployError::MatchFinished),
        }
        let mut stats = Vec::with_capacity(snapshot.len());
        for fish_type in snapshot {
            stats.push((fish_type.as_str(), self.deployable_stats(fish_type)?));
        }

        let now = self.now_ms();
        let bounds = self.config.bounds();
        let mut placed = Vec::new();
        for (index, (fish_type, stats)) in stats.into_iter().enumerate() {
            if self.opponent.check_capacity(&self.config).is_err() {
                tracing::warn!(
                    skipped = snapshot.len() - index,
                    cap = self.config.max_deployments,
                    "Opponent roster truncated at deployment cap"
                );
                break;
            }
            let position = bounds.random_point(&mut self.rng);
            placed.push(self.spawn(Side::Opponent, fish_type, stats, position, now));
        }

        tracing::info!(count = placed.len(), "Opponent roster populated");
        Ok(placed)
    }

    fn deployable_stats(&self, fish_type: &str) -> std::result::Result<BattleStats, DeployError> {
        let stats = self
            .profiles
            .profile(fish_type)
            .map(|profile| profile.battle_stats())
            .ok_or_else(|| DeployError::UnknownFishType(fish_type.to_string()))?;
        if stats.hp == 0 {
            return Err(DeployError::NoHitPoints(fish_type.to_string()));
        }
        Ok(stats)
    }

    fn spawn(
        &mut self,
        side: Side,
        fish_type: &str,
        stats: BattleStats,
        position: Vec2Fixed,
        now: u64,
    ) -> UnitId {
        let id = UnitId(self.next_unit_id);
        self.next_unit_id += 1;

        let unit = Unit::new(
            id,
            side,
            fish_type,
            stats,
            position,
            self.config.ai.detection_range_multiplier,
        );
        self.roster_mut(side).deploy(unit, now);
        self.push_history(CombatEvent::Deployed {
            unit: id,
            side,
            fish_type: fish_type.to_string(),
            at_ms: now,
        });
        id
    }

    /// Leave the deployment phase and start fighting.
    ///
    /// # Errors
    ///
    /// Returns [`BattleError::InvalidState`] unless the battle is in the
    /// deployment phase.
    pub fn start_combat(&mut self) -> Result<()> {
        if self.phase != Phase::Deployment {
            return Err(BattleError::InvalidState(format!(
                "cannot start combat from {:?}",
                self.phase
            )));
        }
        let now = self.now_ms();
        self.phase = Phase::Combat;
        self.combat_started_at = Some(now);
        self.last_victory_check_at = now;
        tracing::info!(
            at_ms = now,
            player_units = self.player.deployed_count(),
            opponent_units = self.opponent.deployed_count(),
            "Combat started"
        );
        Ok(())
    }

    /// Advance the simulation by one tick.
    ///
    /// During deployment only the clock moves. During combat the resolver
    /// runs, then victory is checked if a check is due. Once finished this
    /// does nothing.
    pub fn tick(&mut self) -> TickEvents {
        let now = self.now_ms();
        let mut events = TickEvents {
            now_ms: now,
            ..TickEvents::default()
        };

        match self.phase {
            Phase::Finished => return events,
            Phase::Deployment => {}
            Phase::Combat => {
                let resolver = CombatResolver::new(&self.config);
                let outcome =
                    resolver.tick(&mut self.player, &mut self.opponent, now, &mut self.rng);

                for hit in &outcome.damage_events {
                    self.push_history(CombatEvent::Attack(*hit));
                }
                for death in &outcome.deaths {
                    self.first_kill.get_or_insert(death.victim_side.opposite());
                    self.push_history(CombatEvent::Death(*death));
                }
                events.damage_events = outcome.damage_events;
                events.deaths = outcome.deaths;

                let elapsed = self.combat_elapsed_ms();
                let check_due = now - self.last_victory_check_at
                    >= self.config.victory_check_interval_ms
                    || elapsed >= self.config.battle_time_limit_ms;
                if check_due {
                    self.last_victory_check_at = now;
                    let verdict = VictoryEvaluator::new(&self.config).evaluate(
                        &self.player,
                        &self.opponent,
                        elapsed,
                    );
                    if let Some(verdict) = verdict {
                        self.finish(verdict, elapsed);
                        events.verdict = Some(verdict);
                    }
                }
            }
        }

        self.tick += 1;

        #[cfg(feature = "debug-validation")]
        for roster in [&self.player, &self.opponent] {
            assert_eq!(
                roster.alive_count() + roster.dead_count(),
                roster.deployed_count(),
                "{:?} roster lost track of a unit",
                roster.side()
            );
        }

        #[cfg(debug_assertions)]
        {
            let hash = self.state_hash();
            tracing::debug!(tick = self.tick, state_hash = hash, "Battle state hash");
        }

        events
    }

    /// Tick, then hand a frame of the new state to `sink`.
    pub fn tick_with<F: FrameSink>(&mut self, sink: &mut F) -> TickEvents {
        let events = self.tick();
        sink.frame(&self.snapshot());
        events
    }

    /// Tick until the match is decided or `max_ticks` have run.
    ///
    /// Returns the result if the match finished.
    pub fn run_to_completion(&mut self, max_ticks: u64) -> Option<&MatchResult> {
        for _ in 0..max_ticks {
            if self.phase == Phase::Finished {
                break;
            }
            self.tick();
        }
        self.result.as_ref()
    }

    /// `side` gives up.
    ///
    /// Every unit the forfeiting side deployed counts as lost.
    ///
    /// # Errors
    ///
    /// Returns [`BattleError::InvalidState`] if the match is already
    /// finished.
    pub fn forfeit(&mut self, side: Side) -> Result<&MatchResult> {
        if self.phase == Phase::Finished {
            return Err(BattleError::InvalidState(
                "cannot forfeit a finished match".to_string(),
            ));
        }
        let elapsed = self.combat_elapsed_ms();
        tracing::info!(?side, at_ms = self.now_ms(), "Side forfeited");
        self.finish(
            Verdict {
                winner: side.opposite(),
                reason: VictoryReason::Forfeit,
            },
            elapsed,
        );
        self.result
            .as_ref()
            .ok_or_else(|| BattleError::InvalidState("forfeit produced no result".to_string()))
    }

    fn finish(&mut self, verdict: Verdict, duration_ms: u64) {
        let lost = |roster: &Roster| {
            if verdict.reason == VictoryReason::Forfeit && roster.side() != verdict.winner {
                roster.deployed_ids()
            } else {
                roster.fallen().to_vec()
            }
        };

        let mut result = MatchResult {
            winner: verdict.winner,
            reason: verdict.reason,
            player_units_lost: lost(&self.player),
            opponent_units_lost: lost(&self.opponent),
            duration_ms,
            damage_dealt: PerSide {
                player: self.player.damage_dealt(),
                opponent: self.opponent.damage_dealt(),
            },
            kills: PerSide {
                player: self.player.kills(),
                opponent: self.opponent.kills(),
            },
            first_kill: self.first_kill,
            achievements: Vec::new(),
            tickets_earned: 0,
        };
        if verdict.reason != VictoryReason::Forfeit || verdict.winner == Side::Player {
            result.achievements = determine_achievements(&result, &self.config.rewards.achievements);
        }
        result.tickets_earned = calculate_reward(&result, &self.config.rewards).total;

        tracing::info!(
            winner = ?result.winner,
            reason = ?result.reason,
            duration_ms,
            tickets = result.tickets_earned,
            "Battle finished"
        );

        self.push_history(CombatEvent::Victory {
            winner: verdict.winner,
            reason: verdict.reason,
            at_ms: self.now_ms(),
        });
        self.phase = Phase::Finished;
        self.result = Some(result);
    }

    /// Hand the result to a persistence sink.
    ///
    /// Failures are logged and returned; the in-memory result stays
    /// authoritative and nothing is retried.
    ///
    /// # Errors
    ///
    /// Returns [`BattleError::InvalidState`] if the match is not finished,
    /// or [`BattleError::Sink`] if the sink refused the result.
    pub fn persist<M: MatchSink + ?Sized>(&self, sink: &mut M) -> Result<()> {
        let result = self
            .result
            .as_ref()
            .ok_or_else(|| BattleError::InvalidState("match is not finished".to_string()))?;
        sink.persist(result).map_err(|error| {
            tracing::warn!(%error, "Failed to persist match result");
            BattleError::Sink(error)
        })
    }

    /// HUD readouts for the current state.
    #[must_use]
    pub fn hud(&self) -> HudStatus {
        VictoryEvaluator::new(&self.config).hud(
            &self.player,
            &self.opponent,
            self.combat_elapsed_ms(),
        )
    }

    /// Read-only projection for rendering.
    #[must_use]
    pub fn snapshot(&self) -> FrameSnapshot {
        let units = self
            .player
            .units()
            .iter()
            .chain(self.opponent.units())
            .map(|unit| UnitFrame {
                id: unit.id,
                side: unit.side,
                source_type: unit.source_type.clone(),
                position: unit.position,
                current_hp: unit.current_hp,
                max_hp: unit.max_hp,
                alive: unit.alive,
                state: unit.combat_state,
                facing: unit.facing,
            })
            .collect();

        FrameSnapshot {
            tick: self.tick,
            now_ms: self.now_ms(),
            units,
            time_progress: self.hud().time_progress,
        }
    }

    /// Hash of the simulation state.
    ///
    /// Two battles with identical state produce identical hashes.
    #[must_use]
    pub fn state_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.tick.hash(&mut hasher);
        self.phase.hash(&mut hasher);
        self.next_unit_id.hash(&mut hasher);
        self.player.hash(&mut hasher);
        self.opponent.hash(&mut hasher);
        self.first_kill.hash(&mut hasher);
        hasher.finish()
    }

    fn push_history(&mut self, event: CombatEvent) {
        if self.config.max_combat_events == 0 {
            return;
        }
        while self.history.len() >= self.config.max_combat_events {
            self.history.pop_front();
        }
        self.history.push_back(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::FishCatalog;

    fn battle() -> Battle<FishCatalog> {
        let catalog = FishCatalog::builtin().expect("builtin catalog");
        Battle::new(BattleConfig::default(), catalog, 42).expect("valid config")
    }

    fn wait_ms(battle: &mut Battle<FishCatalog>, ms: u64) {
        let until = battle.now_ms() + ms;
        while battle.now_ms() < until {
            battle.tick();
        }
    }

    #[test]
    fn test_deployment_phase_only_advances_clock() {
        let mut battle = battle();
        let id = battle
            .try_deploy(Side::Player, "fish_002", Vec2Fixed::from_ints(-100, 0))
            .expect("deploy");
        let before = battle.unit(id).cloned().expect("unit");

        for _ in 0..30 {
            let events = battle.tick();
            assert!(events.damage_events.is_empty());
        }
        assert_eq!(battle.now_ms(), 1_000);
        assert_eq!(battle.unit(id), Some(&before));
    }

    #[test]
    fn test_deploy_rejections_leave_state_untouched() {
        let mut battle = battle();
        battle
            .try_deploy(Side::Player, "fish_002", Vec2Fixed::ZERO)
            .expect("first deploy");
        let hash = battle.state_hash();

        assert_eq!(
            battle.try_deploy(Side::Player, "fish_006", Vec2Fixed::ZERO),
            Err(DeployError::CooldownActive { remaining_ms: 2_000 })
        );
        assert_eq!(
            battle.try_deploy(Side::Player, "fish_404", Vec2Fixed::ZERO),
            Err(DeployError::UnknownFishType("fish_404".to_string()))
        );
        assert_eq!(battle.state_hash(), hash);
        assert_eq!(battle.roster(Side::Player).deployed_count(), 1);
    }

    #[test]
    fn test_sides_have_independent_cooldowns() {
        let mut battle = battle();
        assert!(battle
            .try_deploy(Side::Player, "fish_002", Vec2Fixed::ZERO)
            .is_ok());
        assert!(battle
            .try_deploy(Side::Opponent, "fish_001", Vec2Fixed::ZERO)
            .is_ok());
        wait_ms(&mut battle, 2_000);
        assert!(battle
            .try_deploy(Side::Player, "fish_006", Vec2Fixed::ZERO)
            .is_ok());
    }

    #[test]
    fn test_deploy_position_is_clamped() {
        let mut battle = battle();
        let id = battle
            .try_deploy(Side::Player, "fish_002", Vec2Fixed::from_ints(5_000, -5_000))
            .expect("deploy");
        let unit = battle.unit(id).expect("unit");
        assert_eq!(unit.position, Vec2Fixed::from_ints(300, -200));
    }

    #[test]
    fn test_populate_opponent_validates_first() {
        let mut battle = battle();
        let snapshot = vec!["fish_001".to_string(), "bogus".to_string()];
        assert_eq!(
            battle.populate_opponent(&snapshot),
            Err(DeployError::UnknownFishType("bogus".to_string()))
        );
        assert_eq!(battle.roster(Side::Opponent).deployed_count(), 0);
    }

    #[test]
    fn test_populate_opponent_truncates_at_cap() {
        let mut battle = battle();
        let snapshot: Vec<String> = (0..20).map(|_| "fish_003".to_string()).collect();
        let placed = battle.populate_opponent(&snapshot).expect("populate");
        assert_eq!(placed.len(), 15);
        let bounds = battle.config().bounds();
        assert!(battle
            .roster(Side::Opponent)
            .units()
            .iter()
            .all(|u| bounds.contains(u.position)));
    }

    #[test]
    fn test_start_combat_twice_is_error() {
        let mut battle = battle();
        battle.start_combat().expect("start");
        assert!(matches!(
            battle.start_combat(),
            Err(BattleError::InvalidState(_))
        ));
    }

    #[test]
    fn test_forfeit_counts_every_deployed_unit() {
        let mut battle = battle();
        let a = battle
            .try_deploy(Side::Player, "fish_002", Vec2Fixed::from_ints(-250, 0))
            .expect("a");
        wait_ms(&mut battle, 2_000);
        let b = battle
            .try_deploy(Side::Player, "fish_006", Vec2Fixed::from_ints(-250, 50))
            .expect("b");
        wait_ms(&mut battle, 2_000);
        let c = battle
            .try_deploy(Side::Player, "fish_009", Vec2Fixed::from_ints(-250, -50))
            .expect("c");
        battle
            .try_deploy(Side::Opponent, "fish_001", Vec2Fixed::from_ints(250, 0))
            .expect("opponent");
        battle.start_combat().expect("start");

        let result = battle.forfeit(Side::Player).expect("forfeit").clone();
        assert_eq!(result.winner, Side::Opponent);
        assert_eq!(result.reason, VictoryReason::Forfeit);
        assert_eq!(result.player_units_lost, vec![a, b, c]);
        assert!(result.achievements.is_empty());
        assert_eq!(result.tickets_earned, 1);
        assert_eq!(battle.phase(), Phase::Finished);

        assert!(battle.forfeit(Side::Opponent).is_err());
        assert_eq!(
            battle.try_deploy(Side::Player, "fish_002", Vec2Fixed::ZERO),
            Err(DeployError::MatchFinished)
        );
        let events = battle.tick();
        assert!(events.verdict.is_none());
    }

    #[test]
    fn test_history_is_bounded() {
        let config = BattleConfig {
            max_combat_events: 3,
            deployment_cooldown_ms: 0,
            ..BattleConfig::default()
        };
        let catalog = FishCatalog::builtin().expect("builtin catalog");
        let mut battle = Battle::new(config, catalog, 1).expect("valid");
        for _ in 0..5 {
            battle
                .try_deploy(Side::Player, "fish_005", Vec2Fixed::ZERO)
                .expect("deploy");
        }
        assert_eq!(battle.history().len(), 3);
        assert!(matches!(
            battle.history().front(),
            Some(CombatEvent::Deployed { unit: UnitId(3), .. })
        ));
    }

    #[test]
    fn test_persist_requires_result_and_surfaces_failures() {
        struct Broken;
        impl MatchSink for Broken {
            fn persist(&mut self, _: &MatchResult) -> std::result::Result<(), crate::sinks::SinkError> {
                Err(crate::sinks::SinkError::Unavailable("offline".to_string()))
            }
        }

        let mut battle = battle();
        let mut stored: Vec<MatchResult> = Vec::new();
        assert!(matches!(
            battle.persist(&mut stored),
            Err(BattleError::InvalidState(_))
        ));

        battle.forfeit(Side::Opponent).expect("forfeit");
        battle.persist(&mut stored).expect("memory sink");
        assert_eq!(stored.len(), 1);
        assert!(matches!(
            battle.persist(&mut Broken),
            Err(BattleError::Sink(_))
        ));
        assert!(battle.result().is_some());
    }

    #[test]
    fn test_frame_sink_receives_snapshot() {
        let mut battle = battle();
        battle
            .try_deploy(Side::Player, "fish_002", Vec2Fixed::ZERO)
            .expect("deploy");
        let mut frames = Vec::new();
        let mut sink = |frame: &FrameSnapshot| frames.push(frame.tick);
        battle.tick_with(&mut sink);
        battle.tick_with(&mut sink);
        assert_eq!(frames, vec![1, 2]);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = BattleConfig {
            update_frequency_hz: 0,
            ..BattleConfig::default()
        };
        let catalog = FishCatalog::builtin().expect("builtin catalog");
        assert!(Battle::new(config, catalog, 0).is_err());
    }
}
