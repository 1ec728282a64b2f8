//! Error handling for chatline.
//!
//! | Type | Raised when | Category |
//! |------|-------------|----------|
//! | [`ConfigError`] | no endpoint/model selected, before any I/O | Configuration |
//! | [`TransportError`] | connect failure, non-2xx status, broken body | Network / Server |
//! | [`SessionError`] | a turn is opened while one is running | Client |
//! | [`StoreError`] | persisted state cannot be read or written | System |
//!
//! All of them convert into [`ChatError`]. Malformed stream frames never
//! become errors, and a cancelled turn is a normal outcome.

mod category;
mod chat_error;
mod config;
mod result;
mod store;
mod transport;

pub use category::ErrorCategory;
pub use chat_error::ChatError;
pub use config::{ConfigError, SessionError};
pub use result::ChatResult;
pub use store::StoreError;
pub use transport::{classify_reqwest_error, TransportError};
