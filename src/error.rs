//! Error types for KinCore.

use thiserror::Error;

use crate::scanner::pattern::PatternId;

/// Result type for KinCore operations.
pub type Result<T> = std::result::Result<T, KinError>;

/// Construction-time failures. Matching and resolution never fail: a span
/// that cannot be resolved simply produces no relationship.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum KinError {
    /// A pattern definition violates the constraint grammar.
    #[error("Invalid pattern {id}: {reason}")]
    InvalidPattern { id: PatternId, reason: String },

    /// Configuration values are inconsistent.
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// The trigger prefilter automaton could not be built.
    #[error("Failed to build automaton: {0}")]
    Automaton(String),

    /// Configuration JSON could not be parsed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl KinError {
    pub fn invalid_pattern(id: PatternId, reason: impl Into<String>) -> Self {
        KinError::InvalidPattern {
            id,
            reason: reason.into(),
        }
    }

    pub fn invalid_config(msg: impl Into<String>) -> Self {
        KinError::InvalidConfig(msg.into())
    }
}
