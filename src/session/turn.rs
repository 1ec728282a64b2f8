use tokio_util::sync::CancellationToken;

use crate::error::ChatError;
use crate::models::ChatMessage;

/// One generation request handed out by [`super::ChatSession::begin_turn`].
#[derive(Debug, Clone)]
pub struct Turn {
    pub(crate) history: Vec<ChatMessage>,
    pub(crate) cancel: CancellationToken,
}

impl Turn {
    /// Messages to send: everything so far including the new user message.
    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    /// Token that cancels this turn when fired.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }
}

/// How a turn ended.
#[derive(Debug, Clone, PartialEq)]
pub enum TurnOutcome {
    /// The stream ended normally
    Completed,
    /// The turn was cancelled; partial content is kept
    Cancelled,
    /// The stream failed; partial content is kept
    Failed(ChatError),
}

impl TurnOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, TurnOutcome::Completed)
    }
}
