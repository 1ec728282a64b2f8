use serde::{Deserialize, Serialize};

use super::message::ChatMessage;

/// Body of a chat completion request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatCompletionRequest {
    /// Model identifier
    pub model: String,
    /// Conversation so far
    pub messages: Vec<ChatMessage>,
    /// Whether the reply is streamed as server-sent events
    pub stream: bool,
    pub max_tokens: u32,
    pub temperature: f64,
}

impl ChatCompletionRequest {
    /// Create a non-streaming request with the default sampling settings
    pub fn new(model: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        Self {
            model: model.into(),
            messages,
            stream: false,
            max_tokens: 2000,
            temperature: 0.7,
        }
    }

    /// Request a streamed reply (builder pattern)
    pub fn streaming(mut self) -> Self {
        self.stream = true;
        self
    }

    /// Set the token limit (builder pattern)
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set the sampling temperature (builder pattern)
    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }
}
