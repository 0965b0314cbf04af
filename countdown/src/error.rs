//! Error types for the countdown engine.

use countdown_runtime::StoreError;
use thiserror::Error;

/// Errors surfaced by countdown construction and updates.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CountdownError {
    /// The deadline could not be parsed into an instant.
    ///
    /// Never treated as "already expired" or "never expires".
    #[error("Invalid deadline: {input:?}")]
    InvalidDeadline {
        /// The rejected input
        input: String,
    },

    /// The tick interval must be greater than zero.
    #[error("Tick interval must be greater than zero")]
    InvalidTickInterval,

    /// The underlying store rejected the action (typically after disposal).
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result alias for countdown operations.
pub type Result<T> = std::result::Result<T, CountdownError>;
