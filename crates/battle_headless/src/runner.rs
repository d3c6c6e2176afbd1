//! Headless match runner.
//!
//! Drives one [`Battle`] from a [`Scenario`] through deployment and combat
//! to a [`MatchReport`], without rendering.

use battle_core::battle::{Battle, Phase};
use battle_core::data::FishCatalog;
use battle_core::error::BattleError;
use battle_core::math::Vec2Fixed;
use battle_core::result::MatchResult;
use battle_core::reward::RewardBreakdown;
use battle_core::roster::DeployError;
use battle_core::sinks::{FrameSink, FrameSnapshot};
use battle_core::unit::Side;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::scenario::{Placement, Scenario};

/// Why a headless run failed.
#[derive(Error, Debug)]
pub enum RunError {
    /// The core refused the setup.
    #[error(transparent)]
    Battle(#[from] BattleError),
    /// A scripted deployment was rejected.
    #[error("deployment of {fish} rejected: {source}")]
    Deploy {
        /// Fish type that failed.
        fish: String,
        /// Gate error.
        source: DeployError,
    },
    /// The tick budget ran out before a verdict.
    #[error("match undecided after {0} ticks")]
    Unfinished(u64),
}

/// Everything a finished headless match produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchReport {
    /// Scenario name.
    pub scenario: String,
    /// Seed the match ran with.
    pub seed: u64,
    /// Ticks run, deployment included.
    pub ticks: u64,
    /// Final result.
    pub result: MatchResult,
    /// Itemised ticket payout.
    pub reward: RewardBreakdown,
}

/// Runner configuration.
#[derive(Debug, Clone, Default)]
pub struct HeadlessConfig {
    /// Overrides the scenario's seed.
    pub seed: Option<u64>,
    /// Emit a frame every N combat ticks (0 = never).
    pub frame_every: u64,
}

/// Runs scenarios to completion.
#[derive(Debug, Clone, Default)]
pub struct HeadlessRunner {
    config: HeadlessConfig,
}

impl HeadlessRunner {
    /// Create a runner with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a runner with a custom configuration.
    #[must_use]
    pub fn with_config(config: HeadlessConfig) -> Self {
        Self { config }
    }

    /// Run `scenario` without emitting frames.
    pub fn run(&self, scenario: &Scenario) -> Result<MatchReport, RunError> {
        self.run_with_frames(scenario, &mut |_: &FrameSnapshot| {})
    }

    /// Run `scenario`, handing every `frame_every`-th combat frame to `sink`.
    pub fn run_with_frames<F: FrameSink>(
        &self,
        scenario: &Scenario,
        sink: &mut F,
    ) -> Result<MatchReport, RunError> {
        let seed = self.config.seed.unwrap_or(scenario.seed);
        let mut battle = prepare(scenario, seed)?;
        battle.start_combat()?;
        info!(scenario = %scenario.name, seed, "Running match");

        while battle.phase() != Phase::Finished {
            if battle.tick_count() >= scenario.max_ticks {
                return Err(RunError::Unfinished(battle.tick_count()));
            }
            let every = self.config.frame_every;
            if every > 0 && battle.tick_count() % every == 0 {
                battle.tick_with(sink);
            } else {
                battle.tick();
            }
        }

        let result = battle
            .result()
            .cloned()
            .ok_or(RunError::Unfinished(battle.tick_count()))?;
        let reward = battle
            .reward_breakdown()
            .ok_or(RunError::Unfinished(battle.tick_count()))?;

        Ok(MatchReport {
            scenario: scenario.name.clone(),
            seed,
            ticks: battle.tick_count(),
            result,
            reward,
        })
    }
}

/// Build a battle and deploy both sides, still in the deployment phase.
///
/// Player placements wait out the deployment cooldown by ticking.
pub fn prepare(scenario: &Scenario, seed: u64) -> Result<Battle<FishCatalog>, RunError> {
    let catalog = FishCatalog::builtin()?;
    let mut battle = Battle::new(scenario.config.clone(), catalog, seed)?;

    battle
        .populate_opponent(&scenario.opponent)
        .map_err(|source| RunError::Deploy {
            fish: "opponent snapshot".to_string(),
            source,
        })?;

    for placement in &scenario.player {
        deploy_when_ready(&mut battle, placement, scenario.max_ticks)?;
    }
    Ok(battle)
}

fn deploy_when_ready(
    battle: &mut Battle<FishCatalog>,
    placement: &Placement,
    max_ticks: u64,
) -> Result<(), RunError> {
    let position = Vec2Fixed::from_ints(placement.x, placement.y);
    loop {
        match battle.try_deploy(Side::Player, &placement.fish, position) {
            Ok(id) => {
                debug!(unit = %id, fish = %placement.fish, "Scripted deployment placed");
                return Ok(());
            }
            Err(DeployError::CooldownActive { .. }) if battle.tick_count() < max_ticks => {
                battle.tick();
            }
            Err(source) => {
                return Err(RunError::Deploy {
                    fish: placement.fish.clone(),
                    source,
                })
            }
        }
    }
}
