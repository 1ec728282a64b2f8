//! Trait abstractions for dependency injection and testability.
//!
//! # Traits
//!
//! - [`HttpClient`] - HTTP client operations (GET, POST, streaming POST)
//! - [`KeyValueStore`] - persistence of JSON values by key

pub mod http;
pub mod store;

pub use http::{ByteStream, Headers, HttpClient, Response};
pub use store::{KeyValueStore, StoreExt};
