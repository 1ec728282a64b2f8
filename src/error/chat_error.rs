//! Unified error type for chatline.

use thiserror::Error;

use super::category::ErrorCategory;
use super::config::{ConfigError, SessionError};
use super::store::StoreError;
use super::transport::TransportError;

/// Every failure the library reports.
///
/// Malformed stream frames are not represented here: they are downgraded
/// to skipped deltas. Cancellation is not an error either.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChatError {
    /// Endpoint or model not selected.
    #[error(transparent)]
    Configuration(#[from] ConfigError),

    /// Network or HTTP failure.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Invalid session transition.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// Persistence failure.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The request itself is unusable (e.g. empty history).
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl ChatError {
    /// Get the category of this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            ChatError::Configuration(_) => ErrorCategory::Configuration,
            ChatError::Transport(TransportError::Status { .. }) => ErrorCategory::Server,
            ChatError::Transport(_) => ErrorCategory::Network,
            ChatError::Session(_) | ChatError::InvalidRequest(_) => ErrorCategory::Client,
            ChatError::Store(_) => ErrorCategory::System,
        }
    }

    /// Short, human-readable text suitable for showing next to a message.
    pub fn user_message(&self) -> String {
        match self {
            ChatError::Configuration(err) => match err {
                ConfigError::NoEndpointSelected => "No API configuration selected".to_string(),
                ConfigError::NoModelSelected => "No model selected".to_string(),
                other => other.to_string(),
            },
            ChatError::Transport(err) => err.user_message(),
            ChatError::Session(err) => err.to_string(),
            ChatError::Store(err) => err.to_string(),
            ChatError::InvalidRequest(msg) => msg.clone(),
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            ChatError::Configuration(err) => err.error_code(),
            ChatError::Transport(err) => err.error_code(),
            ChatError::Session(_) => "E_SESSION_BUSY",
            ChatError::Store(_) => "E_STORE",
            ChatError::InvalidRequest(_) => "E_REQUEST",
        }
    }

    /// Get the recovery hint for this error.
    pub fn recovery_hint(&self) -> &'static str {
        self.category().recovery_hint()
    }
}
