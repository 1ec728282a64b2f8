//! Conversation state machine.
//!
//! A [`ChatSession`] is either idle or generating one reply. While
//! generating, deltas patch the trailing assistant message: its content is
//! always replaced by the whole accumulated buffer, never appended to, so
//! reapplying a patch is harmless. The assistant message is only created
//! once the first non-empty delta arrives; a turn that fails before that
//! leaves no placeholder behind and records the error in `last_error`.

mod turn;

pub use turn::{Turn, TurnOutcome};

use futures_util::StreamExt;
use tokio_util::sync::CancellationToken;

use crate::client::CompletionClient;
use crate::error::{ChatError, ChatResult, SessionError};
use crate::models::{Message, MessageStatus};
use crate::sse::Delta;
use crate::traits::HttpClient;

/// One conversation and its generation status.
#[derive(Debug, Default)]
pub struct ChatSession {
    messages: Vec<Message>,
    generating: bool,
    cancel: Option<CancellationToken>,
    /// Content received in the current turn
    content: String,
    /// Reasoning received in the current turn
    reasoning: String,
    /// Whether the current turn created the trailing assistant message
    assistant_created: bool,
    /// Whether the last finished turn left an assistant reply
    replied: bool,
    last_error: Option<ChatError>,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session whose log starts with a system message.
    pub fn with_system_prompt(prompt: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::system(prompt)],
            ..Self::default()
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn is_generating(&self) -> bool {
        self.generating
    }

    /// Token of the running turn, if any.
    pub fn cancel_token(&self) -> Option<CancellationToken> {
        self.cancel.clone()
    }

    /// Error of the last turn that failed before producing any output.
    pub fn last_error(&self) -> Option<&ChatError> {
        self.last_error.as_ref()
    }

    /// Content of the reply produced by the last finished turn.
    ///
    /// `None` while generating, and when that turn produced no output.
    pub fn last_reply(&self) -> Option<&str> {
        if self.generating || !self.replied {
            return None;
        }
        self.messages
            .last()
            .filter(|m| m.is_assistant())
            .map(|m| m.content.as_str())
    }

    /// Start a turn: append the user message and enter the generating state.
    ///
    /// Fails with [`SessionError::AlreadyGenerating`] while a turn is running.
    pub fn begin_turn(&mut self, text: &str) -> ChatResult<Turn> {
        if self.generating {
            return Err(SessionError::AlreadyGenerating.into());
        }
        if text.trim().is_empty() {
            return Err(ChatError::InvalidRequest("message is empty".to_string()));
        }

        self.last_error = None;
        self.replied = false;
        self.messages.push(Message::user(text));

        let cancel = CancellationToken::new();
        self.cancel = Some(cancel.clone());
        self.generating = true;
        self.content.clear();
        self.reasoning.clear();
        self.assistant_created = false;

        let history = self
            .messages
            .iter()
            .filter(|m| m.is_sendable())
            .map(Message::to_chat_message)
            .collect();

        Ok(Turn { history, cancel })
    }

    /// Apply one delta of the running turn.
    ///
    /// Returns true when the delta ends the stream.
    pub fn apply_delta(&mut self, delta: &Delta) -> bool {
        if !self.generating {
            return false;
        }

        match delta {
            Delta::Content(text) if !text.is_empty() => {
                self.content.push_str(text);
                self.patch_trailing_assistant();
                false
            }
            Delta::Reasoning(text) if !text.is_empty() => {
                self.reasoning.push_str(text);
                self.patch_trailing_assistant();
                false
            }
            Delta::StreamEnd => true,
            _ => false,
        }
    }

    /// Write the turn buffers into the trailing assistant message, creating
    /// it on first use.
    fn patch_trailing_assistant(&mut self) {
        if !self.assistant_created {
            self.messages.push(Message::streaming_assistant());
            self.assistant_created = true;
        }
        if let Some(message) = self.messages.last_mut() {
            message.content.clone_from(&self.content);
            message.reasoning_content = if self.reasoning.is_empty() {
                None
            } else {
                Some(self.reasoning.clone())
            };
        }
    }

    /// Leave the generating state.
    ///
    /// Partial content is always kept. A failure before any output is
    /// recorded in `last_error` instead of on a message.
    pub fn finish_turn(&mut self, outcome: TurnOutcome) {
        if !self.generating {
            return;
        }

        let trailing = if self.assistant_created {
            self.messages.last_mut()
        } else {
            None
        };

        match (trailing, outcome) {
            (Some(message), TurnOutcome::Completed) => message.finalize(MessageStatus::Complete),
            (Some(message), TurnOutcome::Cancelled) => {
                message.finalize(MessageStatus::Interrupted)
            }
            (Some(message), TurnOutcome::Failed(err)) => message.fail(err.user_message()),
            (None, TurnOutcome::Failed(err)) => self.last_error = Some(err),
            (None, _) => {}
        }

        self.replied = self.assistant_created;
        self.generating = false;
        self.cancel = None;
        self.content.clear();
        self.reasoning.clear();
        self.assistant_created = false;
    }

    /// Run a turn to its end.
    ///
    /// Opens the stream, applies every delta in arrival order (calling
    /// `on_delta` after each one) and finishes the turn. Open failures are
    /// recorded through [`ChatSession::finish_turn`] and returned as `Err`;
    /// failures after the stream started are reported as
    /// [`TurnOutcome::Failed`].
    pub async fn drive<H, F>(
        &mut self,
        client: &CompletionClient<H>,
        turn: Turn,
        mut on_delta: F,
    ) -> ChatResult<TurnOutcome>
    where
        H: HttpClient,
        F: FnMut(&Delta),
    {
        let cancel = turn.cancel.clone();

        let mut stream = match client.open(&turn.history, turn.cancel).await {
            Ok(stream) => stream,
            Err(err) => {
                tracing::debug!("Turn failed before streaming: {}", err);
                self.finish_turn(TurnOutcome::Failed(err.clone()));
                return Err(err);
            }
        };

        let outcome = loop {
            let next = tokio::select! {
                biased;
                _ = cancel.cancelled() => break TurnOutcome::Cancelled,
                next = stream.next() => next,
            };

            match next {
                Some(Ok(delta)) => {
                    let done = self.apply_delta(&delta);
                    on_delta(&delta);
                    if done {
                        break TurnOutcome::Completed;
                    }
                }
                Some(Err(err)) => break TurnOutcome::Failed(err),
                None if cancel.is_cancelled() => break TurnOutcome::Cancelled,
                None => break TurnOutcome::Completed,
            }
        };

        drop(stream);
        tracing::debug!("Turn finished: {:?}", outcome);
        self.finish_turn(outcome.clone());
        Ok(outcome)
    }

    /// Begin a turn for `text` and drive it to its end.
    pub async fn send<H, F>(
        &mut self,
        client: &CompletionClient<H>,
        text: &str,
        on_delta: F,
    ) -> ChatResult<TurnOutcome>
    where
        H: HttpClient,
        F: FnMut(&Delta),
    {
        let turn = self.begin_turn(text)?;
        self.drive(client, turn, on_delta).await
    }

    /// Fire the running turn's token. The turn finishes at its next
    /// suspension point.
    pub fn cancel(&self) {
        if let Some(token) = &self.cancel {
            token.cancel();
        }
    }

    /// Cancel any running turn, then clear the conversation.
    pub fn reset(&mut self) {
        self.cancel();
        self.finish_turn(TurnOutcome::Cancelled);
        self.messages.clear();
        self.last_error = None;
        self.replied = false;
    }

    /// Replace the log with saved messages.
    ///
    /// Messages saved mid-stream are marked interrupted.
    pub fn load_messages(&mut self, messages: Vec<Message>) -> ChatResult<()> {
        if self.generating {
            return Err(SessionError::AlreadyGenerating.into());
        }
        self.messages = messages;
        for message in &mut self.messages {
            if message.is_streaming() {
                message.finalize(MessageStatus::Interrupted);
            }
        }
        self.last_error = None;
        self.replied = false;
        Ok(())
    }
}
