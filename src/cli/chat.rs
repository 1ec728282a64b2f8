//! Interactive chat loop.

use std::io::Write;

use color_eyre::Result;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::adapters::{FileStore, ReqwestHttpClient};
use crate::client::CompletionClient;
use crate::config::{ApiConfigState, ClientSettings};
use crate::error::{ChatError, ChatResult};
use crate::history::ChatHistory;
use crate::session::{ChatSession, TurnOutcome};
use crate::sse::Delta;
use crate::suggestions::generate_suggestions;

/// Starter topics and the first message each one sends.
pub const STARTER_TOPICS: [(&str, &str); 8] = [
    ("Learning to code", "I want to learn programming. Where is a good place to start?"),
    ("Trip planning", "I'm planning a three-day beach trip. What itinerary would you recommend?"),
    ("Healthy eating", "Please recommend some healthy eating habits and recipes."),
    ("Career growth", "I want to improve my professional skills. Any advice?"),
    ("Tech news", "What recent tech news is worth following?"),
    ("Tell a joke", "Tell me a funny joke to cheer me up."),
    ("Brain teaser", "Challenge me with a brain teaser!"),
    ("Word chain", "Let's play a word chain game. I'll start with \"apple\"."),
];

/// One line typed at the prompt.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatInput {
    /// Start a new conversation
    Reset,
    /// Leave the loop
    Quit,
    /// List saved conversations
    History,
    /// Resume the saved conversation with this 1-based number
    Load(usize),
    /// Delete the saved conversation with this 1-based number
    Delete(usize),
    /// List the starter topics
    Topics,
    /// Send the first message of the starter topic with this 1-based number
    Topic(usize),
    /// A command with a missing or bad argument; carries the usage line
    Invalid(String),
    /// Anything else: a message for the model
    Message(String),
    /// Blank line
    Empty,
}

impl ChatInput {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        let (command, arg) = match line.split_once(char::is_whitespace) {
            Some((command, arg)) => (command, arg.trim()),
            None => (line, ""),
        };

        match (command, arg) {
            ("", _) => ChatInput::Empty,
            ("/reset", "") => ChatInput::Reset,
            ("/quit" | "/exit", "") => ChatInput::Quit,
            ("/history", "") => ChatInput::History,
            ("/topics", "") => ChatInput::Topics,
            ("/load", arg) => numbered(arg, ChatInput::Load, "/load <n>"),
            ("/delete", arg) => numbered(arg, ChatInput::Delete, "/delete <n>"),
            ("/topic", arg) => numbered(arg, ChatInput::Topic, "/topic <n>"),
            _ => ChatInput::Message(line.to_string()),
        }
    }
}

fn numbered(arg: &str, make: fn(usize) -> ChatInput, usage: &str) -> ChatInput {
    match arg.parse::<usize>() {
        Ok(n) if n > 0 => make(n),
        _ => ChatInput::Invalid(format!("usage: {}", usage)),
    }
}

/// Item `number` of a 1-based listing.
fn nth<T>(items: &[T], number: usize) -> Option<&T> {
    number.checked_sub(1).and_then(|i| items.get(i))
}

/// Resume saved conversation `number` as listed by `/history`.
///
/// An unused current session is dropped from the history. Returns the id of
/// the resumed session.
pub fn resume_saved(
    history: &mut ChatHistory,
    session: &mut ChatSession,
    current_id: &str,
    number: usize,
) -> ChatResult<String> {
    let record = nth(&history.sessions, number)
        .cloned()
        .ok_or_else(|| ChatError::InvalidRequest(format!("no saved conversation #{}", number)))?;

    let unused = session.messages().is_empty();
    session.load_messages(record.messages)?;
    if unused && record.id != current_id {
        history.delete_session(current_id);
    }
    history.select_session(&record.id);
    Ok(record.id)
}

/// Delete saved conversation `number` as listed by `/history`.
///
/// Returns whether it was the current one.
pub fn delete_saved(history: &mut ChatHistory, current_id: &str, number: usize) -> ChatResult<bool> {
    let id = nth(&history.sessions, number)
        .map(|record| record.id.clone())
        .ok_or_else(|| ChatError::InvalidRequest(format!("no saved conversation #{}", number)))?;
    history.delete_session(&id);
    Ok(id == current_id)
}

/// Render one delta to the terminal.
///
/// Content goes to stdout, reasoning dimmed to stderr.
fn print_delta(delta: &Delta) {
    match delta {
        Delta::Content(text) => {
            print!("{}", text);
            let _ = std::io::stdout().flush();
        }
        Delta::Reasoning(text) => {
            eprint!("\x1b[2m{}\x1b[0m", text);
        }
        Delta::StreamEnd | Delta::Skip => {}
    }
}

fn print_topics() {
    for (i, (title, _)) in STARTER_TOPICS.iter().enumerate() {
        println!("{:>3}. {}", i + 1, title);
    }
}

fn print_history(history: &ChatHistory) {
    if history.sessions.is_empty() {
        println!("No saved conversations.");
        return;
    }
    for (i, record) in history.sessions.iter().enumerate() {
        let marker = if history.current_session_id.as_deref() == Some(record.id.as_str()) {
            "*"
        } else {
            " "
        };
        println!(
            "{}{:>3}. {}  {} ({} messages)",
            marker,
            i + 1,
            record.updated_at.format("%Y-%m-%d %H:%M"),
            record.title,
            record.messages.len()
        );
    }
}

/// Persist the session into the history, logging failures.
fn save_session(
    store: &FileStore,
    history: &mut ChatHistory,
    session_id: &str,
    session: &ChatSession,
) {
    history.update_session(session_id, session.messages().to_vec());
    if let Err(e) = history.save(store) {
        tracing::warn!("Failed to save chat history: {}", e);
    }
}

/// Run the chat loop until `/quit`, end of input or Ctrl-C at the prompt.
pub async fn run_chat(suggestions: bool) -> Result<()> {
    let store = FileStore::from_env()?;
    let mut state = ApiConfigState::load(&store)?;
    state.apply_env_overrides();

    let client = CompletionClient::from_config(
        ReqwestHttpClient::new(),
        &state,
        &ClientSettings::default(),
    )?;
    state.save(&store)?;

    let mut history = ChatHistory::load(&store)?;
    let mut session_id = history.create_session(None);
    let mut session = ChatSession::new();

    println!(
        "chatline: {} at {} (type /quit to exit)",
        client.endpoint().model,
        client.endpoint().base_url
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("> ");
        let _ = std::io::stdout().flush();

        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => None,
        };
        let Some(line) = line else {
            println!();
            break;
        };

        let text = match ChatInput::parse(&line) {
            ChatInput::Empty => continue,
            ChatInput::Quit => break,
            ChatInput::History => {
                print_history(&history);
                continue;
            }
            ChatInput::Topics => {
                print_topics();
                continue;
            }
            ChatInput::Invalid(usage) => {
                eprintln!("{}", usage);
                continue;
            }
            ChatInput::Load(number) => {
                match resume_saved(&mut history, &mut session, &session_id, number) {
                    Ok(id) => {
                        session_id = id;
                        let title = history.current().map(|r| r.title.as_str()).unwrap_or("");
                        println!(
                            "Resumed \"{}\" ({} messages).",
                            title,
                            session.messages().len()
                        );
                    }
                    Err(e) => eprintln!("Error: {}", e.user_message()),
                }
                continue;
            }
            ChatInput::Delete(number) => {
                match delete_saved(&mut history, &session_id, number) {
                    Ok(was_current) => {
                        if was_current {
                            session.reset();
                            session_id = history.create_session(None);
                            println!("Deleted the current conversation; started a new one.");
                        } else {
                            println!("Deleted conversation #{}.", number);
                        }
                        if let Err(e) = history.save(&store) {
                            tracing::warn!("Failed to save chat history: {}", e);
                        }
                    }
                    Err(e) => eprintln!("Error: {}", e.user_message()),
                }
                continue;
            }
            ChatInput::Topic(number) => match nth(&STARTER_TOPICS, number) {
                Some((_, first_message)) => {
                    println!("> {}", first_message);
                    first_message.to_string()
                }
                None => {
                    eprintln!("Error: no topic #{}", number);
                    continue;
                }
            },
            ChatInput::Reset => {
                if session.messages().is_empty() {
                    history.delete_session(&session_id);
                }
                session.reset();
                session_id = history.create_session(None);
                println!("Started a new conversation.");
                continue;
            }
            ChatInput::Message(text) => text,
        };

        let turn = match session.begin_turn(&text) {
            Ok(turn) => turn,
            Err(e) => {
                eprintln!("Error: {}", e.user_message());
                continue;
            }
        };

        let token = turn.cancel_token();
        let watcher = tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                token.cancel();
            }
        });

        let result = session.drive(&client, turn, print_delta).await;
        watcher.abort();
        println!();

        match result {
            Ok(TurnOutcome::Completed) => {
                save_session(&store, &mut history, &session_id, &session);
                if suggestions {
                    if let Some(reply) = session.last_reply() {
                        for (i, suggestion) in generate_suggestions(&client, reply)
                            .await
                            .iter()
                            .enumerate()
                        {
                            println!("  {}. {}", i + 1, suggestion);
                        }
                    }
                }
            }
            Ok(TurnOutcome::Cancelled) => {
                println!("[interrupted]");
                save_session(&store, &mut history, &session_id, &session);
            }
            Ok(TurnOutcome::Failed(e)) | Err(e) => {
                eprintln!("Error: {} ({})", e.user_message(), e.recovery_hint());
                save_session(&store, &mut history, &session_id, &session);
            }
        }
    }

    save_session(&store, &mut history, &session_id, &session);
    Ok(())
}
