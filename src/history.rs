//! Saved conversations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::StoreError;
use crate::models::Message;
use crate::traits::{KeyValueStore, StoreExt};

/// Store key of the persisted [`ChatHistory`].
pub const CHAT_HISTORY_KEY: &str = "chat-history";

/// Title given to sessions until their first message names them.
pub const DEFAULT_SESSION_TITLE: &str = "New chat";

/// Characters of the first message kept in a derived title.
const TITLE_CHARS: usize = 30;

/// One saved conversation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub messages: Vec<Message>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// All saved conversations, newest first.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChatHistory {
    #[serde(default)]
    pub sessions: Vec<SessionRecord>,
    #[serde(default)]
    pub current_session_id: Option<String>,
}

impl ChatHistory {
    /// Load the saved conversations; unreadable saved data counts as none.
    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Result<Self, StoreError> {
        store.load_json_or_default(CHAT_HISTORY_KEY)
    }

    pub fn save<S: KeyValueStore + ?Sized>(&self, store: &S) -> Result<(), StoreError> {
        store.save_json(CHAT_HISTORY_KEY, self)
    }

    /// Start a new session at the front and make it current.
    pub fn create_session(&mut self, title: Option<&str>) -> String {
        let now = Utc::now();
        let id = Uuid::new_v4().to_string();
        self.sessions.insert(
            0,
            SessionRecord {
                id: id.clone(),
                title: title.unwrap_or(DEFAULT_SESSION_TITLE).to_string(),
                messages: Vec::new(),
                created_at: now,
                updated_at: now,
            },
        );
        self.current_session_id = Some(id.clone());
        id
    }

    /// Replace a session's messages.
    ///
    /// A session still carrying the default title is named after its first
    /// message. Returns false for an unknown id.
    pub fn update_session(&mut self, id: &str, messages: Vec<Message>) -> bool {
        let Some(session) = self.sessions.iter_mut().find(|s| s.id == id) else {
            return false;
        };
        if session.title == DEFAULT_SESSION_TITLE {
            if let Some(first) = messages.first() {
                session.title = derive_title(&first.content);
            }
        }
        session.messages = messages;
        session.updated_at = Utc::now();
        true
    }

    /// Remove a session. Clears the current id when it was current.
    pub fn delete_session(&mut self, id: &str) -> bool {
        let before = self.sessions.len();
        self.sessions.retain(|s| s.id != id);
        if self.current_session_id.as_deref() == Some(id) {
            self.current_session_id = None;
        }
        self.sessions.len() != before
    }

    /// Make a session current. Returns false for an unknown id.
    pub fn select_session(&mut self, id: &str) -> bool {
        if self.sessions.iter().any(|s| s.id == id) {
            self.current_session_id = Some(id.to_string());
            true
        } else {
            false
        }
    }

    pub fn current(&self) -> Option<&SessionRecord> {
        let id = self.current_session_id.as_deref()?;
        self.sessions.iter().find(|s| s.id == id)
    }
}

fn derive_title(content: &str) -> String {
    let mut chars = content.chars();
    let head: String = chars.by_ref().take(TITLE_CHARS).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}
