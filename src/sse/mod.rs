//! SSE (Server-Sent Events) stream decoding
//!
//! Turns the body of a streaming completion response into typed deltas.
//! An OpenAI-compatible stream looks like:
//! - `data: <json chunk>` - one or more data lines per event
//! - Empty line - ends the event
//! - `data: [DONE]` - ends the stream
//! - Other fields and `:` comments - ignored
//!
//! # Module structure
//! - `events` - [`Delta`] and the sentinel constant
//! - `decoder` - [`FrameDecoder`], bytes to event payloads
//! - `interpreter` - [`interpret`], payloads to deltas
//! - `payloads` - serde structs for completion chunks

mod decoder;
mod events;
mod interpreter;
mod payloads;

pub use decoder::{parse_block, FrameDecoder};
pub use events::{Delta, SENTINEL};
pub use interpreter::interpret;

/// Decode a complete body in one go.
///
/// Convenience for callers that already hold the whole response; the
/// result is the same as feeding the body chunk by chunk.
pub fn decode_body(body: &[u8]) -> Vec<Delta> {
    let mut decoder = FrameDecoder::new();
    let mut payloads = decoder.push(body);
    payloads.extend(decoder.finish());
    payloads.iter().flat_map(|payload| interpret(payload)).collect()
}
