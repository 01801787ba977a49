//! Error taxonomy for the scoring engine

use thiserror::Error;

/// Errors surfaced by the engine and registry.
///
/// Criteria are total functions, so nothing a criterion does can produce one of
/// these. A misbehaving criterion panics instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScoringError {
    /// The caller sent something that cannot be evaluated (e.g. an empty transcript)
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
    /// The registry could not be built from the given criteria
    #[error("configuration error: {message}")]
    Configuration { message: String },
}

impl ScoringError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// The message without the error-kind prefix
    pub fn message(&self) -> &str {
        match self {
            Self::InvalidInput { message } | Self::Configuration { message } => message,
        }
    }

    /// True for errors the end user can fix by changing the request
    pub fn is_user_error(&self) -> bool {
        matches!(self, Self::InvalidInput { .. })
    }
}
