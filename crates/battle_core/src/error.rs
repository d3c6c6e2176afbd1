//! Error types for the battle simulation.

use thiserror::Error;

use crate::roster::DeployError;
use crate::sinks::SinkError;

/// Result type alias using [`BattleError`].
pub type Result<T> = std::result::Result<T, BattleError>;

/// Top-level error type for all battle simulation errors.
#[derive(Debug, Error)]
pub enum BattleError {
    /// A deployment was rejected by the deployment gate.
    #[error("Deployment rejected: {0}")]
    Deploy(#[from] DeployError),

    /// Configuration or catalog text failed to parse.
    #[error("Failed to parse {what}: {message}")]
    DataParseError {
        /// What was being parsed (e.g. "battle config").
        what: String,
        /// Error message.
        message: String,
    },

    /// Configuration values that cannot drive a simulation.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Binary encoding or decoding of a match artifact failed.
    #[error("Serialization failed: {0}")]
    Serialization(String),

    /// The persistence sink refused a match result.
    #[error("Persistence failed: {0}")]
    Sink(#[from] SinkError),

    /// Operation not valid in the current battle phase.
    #[error("Invalid battle state: {0}")]
    InvalidState(String),
}
