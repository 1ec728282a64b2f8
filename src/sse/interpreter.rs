//! Maps decoded SSE payloads to [`Delta`]s.
//!
//! A payload is either the sentinel or a JSON object shaped like an
//! OpenAI `chat.completion.chunk`. Anything else is a protocol error, which
//! never leaves this module: it is logged and reported as [`Delta::Skip`] so
//! one bad frame cannot abort an otherwise healthy stream.

use thiserror::Error;

use super::events::{Delta, SENTINEL};
use super::payloads::StreamChunk;

/// Reasons a payload could not be decoded.
#[derive(Debug, Error)]
pub(crate) enum ProtocolError {
    #[error("payload is not valid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),

    #[error("payload is JSON but not an object")]
    NotAnObject,

    #[error("payload does not match the chunk schema: {0}")]
    Schema(#[source] serde_json::Error),
}

/// Interpret one event payload.
///
/// Returns `[StreamEnd]` for the sentinel, `[Skip]` for undecodable input,
/// and otherwise up to two deltas: content first, reasoning second.
pub fn interpret(payload: &str) -> Vec<Delta> {
    if payload == SENTINEL {
        return vec![Delta::StreamEnd];
    }

    let chunk = match decode_chunk(payload) {
        Ok(chunk) => chunk,
        Err(err) => {
            tracing::warn!(error = %err, payload = %truncate_for_log(payload), "skipping malformed SSE payload");
            return vec![Delta::Skip];
        }
    };

    if let Some(reason) = chunk.finish_reason() {
        tracing::debug!(finish_reason = reason, "completion choice finished");
    }

    let mut deltas = Vec::new();
    if let Some(delta) = chunk.first_delta() {
        if let Some(content) = delta.content.as_deref().filter(|c| !c.is_empty()) {
            deltas.push(Delta::Content(content.to_string()));
        }
        if let Some(reasoning) = delta.reasoning_text().filter(|r| !r.is_empty()) {
            deltas.push(Delta::Reasoning(reasoning.to_string()));
        }
    }
    deltas
}

fn decode_chunk(payload: &str) -> Result<StreamChunk, ProtocolError> {
    let value: serde_json::Value =
        serde_json::from_str(payload).map_err(ProtocolError::InvalidJson)?;
    if !value.is_object() {
        return Err(ProtocolError::NotAnObject);
    }
    serde_json::from_value(value).map_err(ProtocolError::Schema)
}

fn truncate_for_log(payload: &str) -> String {
    const MAX_LOGGED_CHARS: usize = 200;
    if payload.chars().count() <= MAX_LOGGED_CHARS {
        payload.to_string()
    } else {
        let head: String = payload.chars().take(MAX_LOGGED_CHARS).collect();
        format!("{}...", head)
    }
}
