//! Error category classification.
//!
//! A coarse classification of failures used for logging and for choosing
//! what to tell the user.

use std::fmt;

/// High-level categorization of errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Connection, DNS, timeout or a broken body stream.
    Network,

    /// The endpoint answered with a non-success status.
    Server,

    /// Invalid use of the library (e.g. a turn opened while one is running).
    Client,

    /// Local persistence failed.
    System,

    /// No endpoint or model selected, or an unknown config id.
    Configuration,
}

impl ErrorCategory {
    /// Returns true if errors in this category are generally transient.
    ///
    /// Nothing retries automatically; this only shapes the hint shown to
    /// the user.
    pub fn is_transient(&self) -> bool {
        matches!(self, ErrorCategory::Network | ErrorCategory::Server)
    }

    /// Returns a short label for the category suitable for logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Network => "network",
            ErrorCategory::Server => "server",
            ErrorCategory::Client => "client",
            ErrorCategory::System => "system",
            ErrorCategory::Configuration => "configuration",
        }
    }

    /// Returns suggested recovery actions for this category.
    pub fn recovery_hint(&self) -> &'static str {
        match self {
            ErrorCategory::Network => "Check the connection to the endpoint and try again",
            ErrorCategory::Server => {
                "The endpoint may be experiencing issues. Please try again later"
            }
            ErrorCategory::Client => "Wait for the current reply to finish first",
            ErrorCategory::System => "Check file permissions and available disk space",
            ErrorCategory::Configuration => "Select an API endpoint and a model",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_transient() {
        assert!(ErrorCategory::Network.is_transient());
        assert!(ErrorCategory::Server.is_transient());
        assert!(!ErrorCategory::Client.is_transient());
        assert!(!ErrorCategory::System.is_transient());
        assert!(!ErrorCategory::Configuration.is_transient());
    }

    #[test]
    fn test_category_display() {
        assert_eq!(format!("{}", ErrorCategory::Network), "network");
        assert_eq!(
            format!("{}", ErrorCategory::Configuration),
            "configuration"
        );
    }

    #[test]
    fn test_category_recovery_hint() {
        assert!(ErrorCategory::Configuration
            .recovery_hint()
            .contains("model"));
        assert!(ErrorCategory::Server.recovery_hint().contains("try again"));
    }
}
