//! Outward interfaces: persistence and rendering.
//!
//! The core never performs IO itself. Hosts hand a [`MatchSink`] to
//! [`Battle::persist`](crate::battle::Battle::persist) and a [`FrameSink`] to
//! [`Battle::tick_with`](crate::battle::Battle::tick_with).

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::math::{fixed_serde, Fixed, Vec2Fixed};
use crate::result::MatchResult;
use crate::unit::{CombatState, Facing, Side, UnitId};

/// Failure reported by a persistence backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SinkError {
    /// The backend could not be reached.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    /// The backend refused the record.
    #[error("storage rejected the result: {0}")]
    Rejected(String),
}

/// Receives the final result of a match.
///
/// Called at most once per persist request; failures are not retried.
pub trait MatchSink {
    /// Store `result`.
    ///
    /// # Errors
    ///
    /// Returns a [`SinkError`] if the result could not be stored.
    fn persist(&mut self, result: &MatchResult) -> Result<(), SinkError>;
}

/// A sink that keeps results in memory.
impl MatchSink for Vec<MatchResult> {
    fn persist(&mut self, result: &MatchResult) -> Result<(), SinkError> {
        self.push(result.clone());
        Ok(())
    }
}

/// Render-side view of one unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitFrame {
    /// Unit id.
    pub id: UnitId,
    /// Owning side.
    pub side: Side,
    /// Fish type, for sprite lookup.
    pub source_type: String,
    /// Position.
    pub position: Vec2Fixed,
    /// Remaining hit points.
    pub current_hp: u32,
    /// Maximum hit points.
    pub max_hp: u32,
    /// Alive flag.
    pub alive: bool,
    /// Current behaviour.
    pub state: CombatState,
    /// Horizontal facing.
    pub facing: Facing,
}

/// Read-only projection of the tank after a tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameSnapshot {
    /// Tick number.
    pub tick: u64,
    /// Simulated time.
    pub now_ms: u64,
    /// Every unit still in a roster, player side first.
    pub units: Vec<UnitFrame>,
    /// Elapsed share of the time limit.
    #[serde(with = "fixed_serde")]
    pub time_progress: Fixed,
}

/// Receives a frame after each tick. Infallible from the core's view.
pub trait FrameSink {
    /// Consume a frame.
    fn frame(&mut self, snapshot: &FrameSnapshot);
}

impl<F: FnMut(&FrameSnapshot)> FrameSink for F {
    fn frame(&mut self, snapshot: &FrameSnapshot) {
        self(snapshot);
    }
}
