//! Headless match runner for balance testing and CI verification.
//!
//! Runs tank battles without graphics. Scenarios are RON files naming the
//! player's deployments, the opponent's collection and the battle rules;
//! results come out as JSON.
//!
//! - **CI verification**: seeded matches replay exactly
//! - **Balance testing**: batches of seeds summarise win rates and payouts
//!
//! # Example
//!
//! ```bash
//! # Run a scenario file
//! cargo run -p battle_headless -- run --scenario scenarios/skirmish.ron
//!
//! # Ad-hoc lineups
//! cargo run -p battle_headless -- run --player fish_002,fish_006 --opponent fish_001,fish_005
//!
//! # Balance batch
//! cargo run -p battle_headless -- batch --count 500 --output results/batch.json
//! ```

pub mod batch;
pub mod runner;
pub mod scenario;

pub use batch::{run_batch, BatchConfig, BatchResults, BatchSummary};
pub use runner::{HeadlessConfig, HeadlessRunner, MatchReport, RunError};
pub use scenario::{Placement, Scenario, ScenarioError};
