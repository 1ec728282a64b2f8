//! Common test utilities for integration tests.
//!
//! Builders for streamed completion bodies and clients pointed at a mock
//! or wiremock endpoint.

pub mod mocks;

#[allow(unused_imports)]
pub use mocks::*;

use chatline::config::{ClientSettings, Endpoint};

/// Model name used by every test endpoint.
pub const TEST_MODEL: &str = "test-model";

/// Creates an endpoint at `base_url` with the default settings.
#[allow(dead_code)]
pub fn test_endpoint(base_url: &str, api_key: Option<&str>) -> Endpoint {
    Endpoint {
        base_url: base_url.to_string(),
        api_key: api_key.map(str::to_string),
        model: TEST_MODEL.to_string(),
        settings: ClientSettings::default(),
    }
}

/// One SSE event carrying a content delta.
#[allow(dead_code)]
pub fn content_event(text: &str) -> String {
    let chunk = serde_json::json!({
        "id": "chatcmpl-test",
        "object": "chat.completion.chunk",
        "choices": [{"index": 0, "delta": {"content": text}, "finish_reason": null}]
    });
    format!("data: {}\n\n", chunk)
}

/// One SSE event carrying a reasoning delta.
#[allow(dead_code)]
pub fn reasoning_event(text: &str) -> String {
    let chunk = serde_json::json!({
        "choices": [{"index": 0, "delta": {"reasoning_content": text}}]
    });
    format!("data: {}\n\n", chunk)
}

/// The end-of-stream event.
#[allow(dead_code)]
pub fn done_event() -> String {
    "data: [DONE]\n\n".to_string()
}

/// Concatenate events into one body.
#[allow(dead_code)]
pub fn sse_body(events: &[String]) -> String {
    events.concat()
}
