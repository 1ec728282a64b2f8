//! CLI module for chatline.
//!
//! This module provides:
//! - Argument parsing
//! - Version and usage display
//! - Model listing
//! - The interactive chat loop
//!
//! # Usage
//!
//! ```ignore
//! use chatline::cli::{parse_args, run_cli_command};
//!
//! let command = parse_args(std::env::args());
//! run_cli_command(command).await?;
//! ```

pub mod args;
pub mod chat;
pub mod models;
pub mod version;

pub use args::{parse_args, CliCommand};
pub use chat::{run_chat, ChatInput};
pub use models::handle_models_command;
pub use version::{handle_help_command, handle_version_command, VERSION};

use color_eyre::Result;

/// Run a parsed CLI command.
///
/// `Version` and `Help` print and exit the process.
pub async fn run_cli_command(command: CliCommand) -> Result<()> {
    match command {
        CliCommand::Version => handle_version_command(),
        CliCommand::Help => handle_help_command(),
        CliCommand::Models => handle_models_command().await,
        CliCommand::Chat { suggestions } => run_chat(suggestions).await,
    }
}
