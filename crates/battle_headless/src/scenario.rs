//! Scenario loading and configuration.
//!
//! A scenario fixes everything a headless match needs: the player's
//! deployments, the opponent's collection snapshot, the battle config and
//! a default seed.

use std::path::Path;

use battle_core::config::BattleConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for scenario operations.
#[derive(Error, Debug)]
pub enum ScenarioError {
    /// File not found.
    #[error("Scenario file not found: {0}")]
    FileNotFound(String),
    /// Failed to read file.
    #[error("Failed to read scenario file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse RON.
    #[error("Failed to parse scenario: {0}")]
    ParseError(#[from] ron::error::SpannedError),
    /// The embedded battle config is unusable.
    #[error("Invalid scenario config: {0}")]
    InvalidConfig(#[from] battle_core::error::BattleError),
    /// Nothing to fight with.
    #[error("Scenario {0} deploys no player units")]
    NoPlayerUnits(String),
}

/// One player deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    /// Fish type id from the catalog.
    pub fish: String,
    /// Tank x coordinate (origin at the centre).
    pub x: i32,
    /// Tank y coordinate.
    pub y: i32,
}

impl Placement {
    /// Create a placement.
    #[must_use]
    pub fn new(fish: &str, x: i32, y: i32) -> Self {
        Self {
            fish: fish.to_string(),
            x,
            y,
        }
    }
}

/// A complete scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    /// Scenario name.
    pub name: String,
    /// Human-readable description.
    #[serde(default)]
    pub description: String,
    /// Seed used when none is given on the command line.
    #[serde(default)]
    pub seed: u64,
    /// Player deployments, in order.
    pub player: Vec<Placement>,
    /// Opponent collection snapshot (fish type ids).
    pub opponent: Vec<String>,
    /// Battle rules; omitted fields take their defaults.
    #[serde(default)]
    pub config: BattleConfig,
    /// Tick budget before the run is abandoned.
    #[serde(default = "default_max_ticks")]
    pub max_ticks: u64,
}

fn default_max_ticks() -> u64 {
    100_000
}

impl Default for Scenario {
    fn default() -> Self {
        Self::skirmish()
    }
}

impl Scenario {
    /// Load a scenario from a RON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ScenarioError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ScenarioError::FileNotFound(path.display().to_string()));
        }
        let contents = std::fs::read_to_string(path)?;
        Self::from_ron_str(&contents)
    }

    /// Load from a RON string (useful for embedded scenarios).
    pub fn from_ron_str(ron: &str) -> Result<Self, ScenarioError> {
        let scenario: Scenario = ron::from_str(ron)?;
        scenario.validate()?;
        Ok(scenario)
    }

    /// Check the scenario can be run.
    pub fn validate(&self) -> Result<(), ScenarioError> {
        self.config.validate()?;
        if self.player.is_empty() {
            return Err(ScenarioError::NoPlayerUnits(self.name.clone()));
        }
        Ok(())
    }

    /// Build an ad-hoc scenario from two lineups.
    ///
    /// Player fish are spread down a column on the left of the tank.
    #[must_use]
    pub fn from_lineups(player: &[String], opponent: &[String], config: BattleConfig) -> Self {
        let half_width = i32::try_from(config.tank_width / 2).unwrap_or(i32::MAX);
        let height = i32::try_from(config.tank_height).unwrap_or(i32::MAX);
        let count = i32::try_from(player.len()).unwrap_or(i32::MAX);

        let player = (1..)
            .zip(player)
            .map(|(slot, fish)| Placement {
                fish: fish.clone(),
                x: -half_width * 2 / 3,
                y: height * slot / (count + 1) - height / 2,
            })
            .collect();

        Self {
            name: "Ad-hoc".to_string(),
            description: "Built from command-line lineups".to_string(),
            seed: 0,
            player,
            opponent: opponent.to_vec(),
            config,
            max_ticks: default_max_ticks(),
        }
    }

    /// A small mixed skirmish against the built-in catalog.
    #[must_use]
    pub fn skirmish() -> Self {
        Self {
            name: "Skirmish".to_string(),
            description: "Three attackers raid a mixed tank".to_string(),
            seed: 1,
            player: vec![
                Placement::new("fish_002", -200, -60),
                Placement::new("fish_006", -200, 0),
                Placement::new("fish_002", -200, 60),
            ],
            opponent: ["fish_001", "fish_003", "fish_004", "fish_005", "fish_007"]
                .into_iter()
                .map(String::from)
                .collect(),
            config: BattleConfig::default(),
            max_ticks: default_max_ticks(),
        }
    }
}
