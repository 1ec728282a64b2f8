//! Configuration and session misuse errors.

use thiserror::Error;

/// The active endpoint or model could not be resolved.
///
/// Raised before any network I/O happens.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// No API config is selected
    #[error("no API configuration selected")]
    NoEndpointSelected,

    /// A config is selected but no model
    #[error("no model selected")]
    NoModelSelected,

    /// The selected config id does not exist
    #[error("unknown API configuration '{id}'")]
    UnknownConfig { id: String },

    /// The config has an empty base URL
    #[error("API configuration '{id}' has no base URL")]
    MissingBaseUrl { id: String },
}

impl ConfigError {
    /// Short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            ConfigError::NoEndpointSelected => "E_CFG_ENDPOINT",
            ConfigError::NoModelSelected => "E_CFG_MODEL",
            ConfigError::UnknownConfig { .. } => "E_CFG_UNKNOWN",
            ConfigError::MissingBaseUrl { .. } => "E_CFG_URL",
        }
    }
}

/// Invalid transitions of the session state machine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// A reply is still being generated for this session
    #[error("a reply is already being generated")]
    AlreadyGenerating,
}
