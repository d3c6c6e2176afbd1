//! # Battle Core
//!
//! Deterministic combat simulation for tank battles.
//!
//! Each side deploys fish into a shared tank; the fish fight autonomously
//! until an elimination, total wipe or time limit decides a winner, and the
//! player is paid tickets for the outcome.
//!
//! This crate contains **only** deterministic logic:
//! - No rendering
//! - No IO beyond the compiled-in fish catalog
//! - No system randomness (every match owns a seeded RNG)
//! - No floating-point math (uses fixed-point)
//!
//! ## Crate Structure
//!
//! - [`unit`] - Deployed combatants
//! - [`roster`] - Per-side unit collections and the deployment gate
//! - [`ai`] - Role-based targeting decisions
//! - [`resolver`] - Per-tick combat state machine
//! - [`combat`] - Damage resolution and combat events
//! - [`victory`] - Victory conditions and HUD readouts
//! - [`reward`] - Ticket payouts and achievements
//! - [`battle`] - Match driver tying it all together
//! - [`config`] - Tunable rules, loadable from RON
//! - [`data`] - Fish profiles and the built-in catalog
//! - [`sinks`] - Persistence and rendering hooks
//! - [`math`] - Fixed-point math utilities

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod ai;
pub mod battle;
pub mod combat;
pub mod config;
pub mod data;
pub mod error;
pub mod math;
pub mod resolver;
pub mod result;
pub mod reward;
pub mod roster;
pub mod sinks;
pub mod unit;
pub mod victory;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::ai::Decision;
    pub use crate::battle::{Battle, Phase, TickEvents};
    pub use crate::combat::{CombatEvent, DamageEvent, DeathEvent};
    pub use crate::config::{AiConfig, BattleConfig, RewardConfig};
    pub use crate::data::{FishCatalog, FishProfile, ProfileSource};
    pub use crate::error::{BattleError, Result};
    pub use crate::math::{Fixed, Vec2Fixed};
    pub use crate::result::{MatchResult, PerSide};
    pub use crate::reward::{Achievement, RewardBreakdown};
    pub use crate::roster::{DeployError, Roster};
    pub use crate::sinks::{FrameSink, FrameSnapshot, MatchSink, SinkError};
    pub use crate::unit::{CombatState, Role, Side, Unit, UnitId};
    pub use crate::victory::{Verdict, VictoryReason};
}
