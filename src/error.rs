//! Error types
//!
//! The simulation itself never fails at runtime; errors surface when tuning is
//! loaded or when gate selection is asked to work over a degenerate gate set.

use thiserror::Error;

/// Problems loading or validating [`crate::Tuning`]
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse tuning: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid tuning field `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: String,
    },
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Problems picking a new target gate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GateError {
    /// A non-repeating pick needs at least two gates to choose from
    #[error("need at least 2 gates to pick a new one, got {0}")]
    TooFewGates(usize),

    /// Rejection sampling kept drawing the current gate
    #[error("no new gate after {0} draws")]
    Exhausted(u32),
}
