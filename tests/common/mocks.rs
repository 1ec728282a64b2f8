//! Mock configurations for test fixtures.
//!
//! Re-exports the doubles from `chatline::adapters::mock` and adds a builder
//! for scripting completion endpoints.

pub use chatline::adapters::mock::{InMemoryStore, MockHttpClient, MockResponse};
pub use chatline::traits::{Headers, HttpClient, Response};

use bytes::Bytes;
use chatline::error::TransportError;

/// Completion URL of the mock endpoint.
#[allow(dead_code)]
pub const MOCK_BASE_URL: &str = "http://mock.local";

#[allow(dead_code)]
pub fn mock_completions_url() -> String {
    format!("{}/v1/chat/completions", MOCK_BASE_URL)
}

/// Builder for a [`MockHttpClient`] serving completion responses.
#[allow(dead_code)]
pub struct MockHttpConfig {
    client: MockHttpClient,
}

#[allow(dead_code)]
impl MockHttpConfig {
    /// Creates a new mock HTTP configuration.
    pub fn new() -> Self {
        Self {
            client: MockHttpClient::new(),
        }
    }

    /// Queues a streamed reply made of the given chunks.
    pub fn with_stream(self, chunks: Vec<String>) -> Self {
        self.client.push_response(
            &mock_completions_url(),
            MockResponse::Stream(chunks.into_iter().map(Bytes::from).collect()),
        );
        self
    }

    /// Queues a streamed reply that breaks after the given chunks.
    pub fn with_broken_stream(self, chunks: Vec<String>, message: &str) -> Self {
        self.client.push_response(
            &mock_completions_url(),
            MockResponse::StreamThenError(
                chunks.into_iter().map(Bytes::from).collect(),
                TransportError::Body(message.to_string()),
            ),
        );
        self
    }

    /// Queues a streamed reply that stalls after the given chunks.
    pub fn with_stalled_stream(self, chunks: Vec<String>) -> Self {
        self.client.push_response(
            &mock_completions_url(),
            MockResponse::StreamThenPending(chunks.into_iter().map(Bytes::from).collect()),
        );
        self
    }

    /// Queues a non-2xx answer.
    pub fn with_status(self, status: u16, message: &str) -> Self {
        self.client.push_response(
            &mock_completions_url(),
            MockResponse::Success(Response::new(status, Bytes::from(message.to_string()))),
        );
        self
    }

    /// Queues a buffered JSON answer, as used by suggestion requests.
    pub fn with_json(self, json: serde_json::Value) -> Self {
        self.client.push_response(
            &mock_completions_url(),
            MockResponse::Success(Response::new(200, Bytes::from(json.to_string()))),
        );
        self
    }

    /// Builds the configured MockHttpClient.
    pub fn build(self) -> MockHttpClient {
        self.client
    }
}
