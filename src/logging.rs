//! Log output setup for the binary.
//!
//! Logs go to stderr so they never mix with streamed replies on stdout.

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "CHATLINE_LOG";

/// Filter used when `CHATLINE_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "chatline=warn";

/// Install the global subscriber with the filter from `CHATLINE_LOG`.
///
/// Returns false if a subscriber was already installed, which is not an
/// error.
pub fn init() -> bool {
    let filter = std::env::var(LOG_ENV).unwrap_or_else(|_| DEFAULT_FILTER.to_string());
    init_with_filter(&filter)
}

/// Install the global subscriber with an explicit filter directive.
pub fn init_with_filter(filter: &str) -> bool {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init()
        .is_ok()
}
