use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role of a message in a conversation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
    System,
}

/// Lifecycle of a message's content
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageStatus {
    /// Final content
    #[default]
    Complete,
    /// Content still arriving from an in-flight generation
    Streaming,
    /// Generation was cancelled; content is partial
    Interrupted,
    /// Generation failed; content is partial
    Error,
}

/// One entry of the conversation log
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    /// Unique message id (uuid v4)
    pub id: String,
    /// Role of the message sender
    pub role: MessageRole,
    /// Text content
    pub content: String,
    /// Reasoning text streamed alongside the reply
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning_content: Option<String>,
    /// When the message was created
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub status: MessageStatus,
    /// User-facing error text when `status` is `Error`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Message {
    fn with_role(role: MessageRole, content: String, status: MessageStatus) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role,
            content,
            reasoning_content: None,
            timestamp: Utc::now(),
            status,
            error: None,
        }
    }

    /// Create a complete user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::with_role(MessageRole::User, content.into(), MessageStatus::Complete)
    }

    /// Create a complete system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::with_role(MessageRole::System, content.into(), MessageStatus::Complete)
    }

    /// Create an empty assistant message that is still streaming.
    pub fn streaming_assistant() -> Self {
        Self::with_role(MessageRole::Assistant, String::new(), MessageStatus::Streaming)
    }

    /// Create a complete assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::with_role(
            MessageRole::Assistant,
            content.into(),
            MessageStatus::Complete,
        )
    }

    pub fn is_assistant(&self) -> bool {
        self.role == MessageRole::Assistant
    }

    pub fn is_streaming(&self) -> bool {
        self.status == MessageStatus::Streaming
    }

    /// Freeze the content with the given final status.
    pub fn finalize(&mut self, status: MessageStatus) {
        self.status = status;
    }

    /// Mark the message as failed with a user-facing error.
    pub fn fail(&mut self, error: impl Into<String>) {
        self.status = MessageStatus::Error;
        self.error = Some(error.into());
    }

    /// Whether this message should be sent back to the model.
    ///
    /// Failed assistant placeholders without content are left out.
    pub fn is_sendable(&self) -> bool {
        !(self.is_assistant() && self.status == MessageStatus::Error && self.content.is_empty())
    }

    /// Wire form of this message.
    pub fn to_chat_message(&self) -> ChatMessage {
        ChatMessage {
            role: self.role,
            content: self.content.clone(),
        }
    }
}

/// Message as sent to the completion endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(MessageRole::System, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_role_serialization() {
        assert_eq!(
            serde_json::to_string(&MessageRole::Assistant).unwrap(),
            "\"assistant\""
        );
        let role: MessageRole = serde_json::from_str("\"system\"").unwrap();
        assert_eq!(role, MessageRole::System);
    }

    #[test]
    fn test_user_message() {
        let msg = Message::user("hi");
        assert_eq!(msg.role, MessageRole::User);
        assert_eq!(msg.content, "hi");
        assert_eq!(msg.status, MessageStatus::Complete);
        assert!(Uuid::parse_str(&msg.id).is_ok());
    }

    #[test]
    fn test_unique_ids() {
        assert_ne!(Message::user("a").id, Message::user("a").id);
    }

    #[test]
    fn test_streaming_assistant_then_finalize() {
        let mut msg = Message::streaming_assistant();
        assert!(msg.is_assistant());
        assert!(msg.is_streaming());

        msg.content = "partial".to_string();
        msg.finalize(MessageStatus::Interrupted);
        assert!(!msg.is_streaming());
        assert_eq!(msg.content, "partial");
    }

    #[test]
    fn test_fail_sets_error() {
        let mut msg = Message::streaming_assistant();
        msg.fail("boom");
        assert_eq!(msg.status, MessageStatus::Error);
        assert_eq!(msg.error.as_deref(), Some("boom"));
        assert!(!msg.is_sendable());

        msg.content = "partial".to_string();
        assert!(msg.is_sendable());
    }

    #[test]
    fn test_legacy_message_without_status_deserializes() {
        let json = r#"{
            "id": "abc",
            "role": "assistant",
            "content": "Hello",
            "timestamp": "2024-01-01T00:00:00Z"
        }"#;
        let msg: Message = serde_json::from_str(json).unwrap();
        assert_eq!(msg.status, MessageStatus::Complete);
        assert_eq!(msg.reasoning_content, None);
        assert_eq!(msg.error, None);
    }

    #[test]
    fn test_chat_message_wire_form() {
        let msg = Message::user("What is Rust?");
        let wire = serde_json::to_value(msg.to_chat_message()).unwrap();
        assert_eq!(
            wire,
            serde_json::json!({"role": "user", "content": "What is Rust?"})
        );
    }
}
