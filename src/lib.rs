//! chatline - a terminal chat client for OpenAI-compatible endpoints
//!
//! The core is the streaming protocol engine in [`sse`] and [`client`],
//! which turns a fragmented server-sent-event body into typed deltas, and
//! the [`session`] state machine that applies those deltas to the
//! conversation log under cancellation.
//!
//! This library exposes modules for use in integration tests.

pub mod adapters;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod history;
pub mod logging;
pub mod models;
pub mod session;
pub mod sse;
pub mod suggestions;
pub mod traits;

pub use client::{CompletionClient, DeltaStream};
pub use error::{ChatError, ChatResult};
pub use session::{ChatSession, Turn, TurnOutcome};
pub use sse::Delta;
