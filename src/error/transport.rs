//! Transport-level error types.
//!
//! Errors raised while talking to the completion endpoint: connecting,
//! waiting for headers, non-success statuses, and failures while reading a
//! streamed body.

use std::fmt;

/// Network and HTTP failures.
#[derive(Debug, Clone, PartialEq)]
pub enum TransportError {
    /// The endpoint answered with a non-2xx status.
    Status { status: u16, message: String },

    /// Connection to the endpoint could not be established.
    Connection(String),

    /// The request timed out.
    Timeout(String),

    /// Reading the response body failed after it started.
    Body(String),

    /// The URL could not be built or parsed.
    InvalidUrl(String),

    /// The response did not have the expected shape.
    InvalidResponse(String),

    /// Anything else reported by the HTTP layer.
    Other(String),
}

impl TransportError {
    /// HTTP status code, for status errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            TransportError::Status { status, .. } => match *status {
                401 => "The API key was rejected (HTTP 401).".to_string(),
                403 => "Access to this endpoint is denied (HTTP 403).".to_string(),
                404 => "The completion endpoint was not found (HTTP 404).".to_string(),
                429 => "Too many requests. Please wait a moment and try again.".to_string(),
                500..=599 => format!(
                    "The endpoint is experiencing issues (HTTP {}). Please try again later.",
                    status
                ),
                _ => format!("API request failed: {}", status),
            },
            TransportError::Connection(_) => {
                "Unable to connect to the endpoint. Please check the base URL.".to_string()
            }
            TransportError::Timeout(_) => "The request timed out.".to_string(),
            TransportError::Body(_) => {
                "The connection was interrupted while receiving the reply.".to_string()
            }
            TransportError::InvalidUrl(url) => format!("Invalid endpoint URL: {}", url),
            TransportError::InvalidResponse(_) => {
                "Received an invalid response from the endpoint.".to_string()
            }
            TransportError::Other(message) => format!("Network error: {}", message),
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            TransportError::Status { .. } => "E_NET_HTTP",
            TransportError::Connection(_) => "E_NET_CONN",
            TransportError::Timeout(_) => "E_NET_TIMEOUT",
            TransportError::Body(_) => "E_NET_BODY",
            TransportError::InvalidUrl(_) => "E_NET_URL",
            TransportError::InvalidResponse(_) => "E_NET_INVALID",
            TransportError::Other(_) => "E_NET_OTHER",
        }
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::Status { status, message } => {
                write!(f, "Server error ({}): {}", status, message)
            }
            TransportError::Connection(msg) => write!(f, "Connection failed: {}", msg),
            TransportError::Timeout(msg) => write!(f, "Request timeout: {}", msg),
            TransportError::Body(msg) => write!(f, "Response body error: {}", msg),
            TransportError::InvalidUrl(msg) => write!(f, "Invalid URL: {}", msg),
            TransportError::InvalidResponse(msg) => write!(f, "Invalid response: {}", msg),
            TransportError::Other(msg) => write!(f, "HTTP error: {}", msg),
        }
    }
}

impl std::error::Error for TransportError {}

/// Classify a reqwest error into a [`TransportError`].
///
/// `in_body` distinguishes failures while reading an already started
/// response from failures before the headers arrived.
pub fn classify_reqwest_error(err: &reqwest::Error, in_body: bool) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout(err.to_string())
    } else if in_body {
        TransportError::Body(err.to_string())
    } else if err.is_connect() {
        TransportError::Connection(err.to_string())
    } else if err.is_builder() {
        TransportError::InvalidUrl(err.to_string())
    } else if err.is_decode() {
        TransportError::InvalidResponse(err.to_string())
    } else {
        TransportError::Other(err.to_string())
    }
}
