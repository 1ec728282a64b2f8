//! Mock implementations for testing.
//!
//! Test doubles for the trait abstractions, so session and client logic can
//! be exercised without a network or a file system.
//!
//! # Available Mocks
//!
//! - [`MockHttpClient`] - HTTP client with scripted responses and streams
//! - [`InMemoryStore`] - In-memory key-value store

pub mod http;
pub mod store;

pub use http::{MockHttpClient, MockResponse, RecordedRequest};
pub use store::InMemoryStore;
