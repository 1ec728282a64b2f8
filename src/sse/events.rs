//! Delta types produced by the SSE pipeline.
//!
//! A completion stream is reduced to a flat sequence of [`Delta`] values:
//! text fragments for the answer and for the model's reasoning, plus two
//! control signals.

/// Reserved payload that marks the normal end of a completion stream.
///
/// Matched exactly and case-sensitively.
pub const SENTINEL: &str = "[DONE]";

/// One incremental unit of model output, or a control signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delta {
    /// Fragment of the assistant's answer
    Content(String),
    /// Fragment of the assistant's reasoning
    Reasoning(String),
    /// The server signalled the end of the stream
    StreamEnd,
    /// A payload that could not be decoded; dropped without aborting
    Skip,
}
