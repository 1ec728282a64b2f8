//! Wire payloads of an OpenAI-compatible streaming completion.
//!
//! Only the fields the interpreter reads are modelled; everything else in a
//! chunk is ignored by serde.

use serde::Deserialize;

/// One `data:` payload of a streaming completion
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct StreamChunk {
    #[serde(default)]
    pub choices: Vec<ChunkChoice>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ChunkChoice {
    #[serde(default)]
    pub delta: Option<ChunkDelta>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Incremental fields of the assistant message.
///
/// Reasoning models report their thinking either as `reasoning_content`
/// (DeepSeek and most compatible servers) or as `reasoning`.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ChunkDelta {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub reasoning_content: Option<String>,
    #[serde(default)]
    pub reasoning: Option<String>,
}

impl ChunkDelta {
    /// Reasoning text under whichever field name the server used
    pub fn reasoning_text(&self) -> Option<&str> {
        self.reasoning_content
            .as_deref()
            .filter(|r| !r.is_empty())
            .or_else(|| self.reasoning.as_deref().filter(|r| !r.is_empty()))
    }
}

impl StreamChunk {
    /// Delta of the first choice, if the chunk carries one
    pub fn first_delta(&self) -> Option<&ChunkDelta> {
        self.choices.first().and_then(|choice| choice.delta.as_ref())
    }

    /// Finish reason of the first choice
    pub fn finish_reason(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|choice| choice.finish_reason.as_deref())
    }
}
