//! Version and usage output.

/// The current version of chatline, read from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Usage text printed by `--help`.
pub const USAGE: &str = "\
Usage: chatline [OPTIONS]

Chat with an OpenAI-compatible endpoint from the terminal.

Options:
  --models          List the models of the active endpoint and exit
  --no-suggestions  Do not print follow-up suggestions after replies
  -V, --version     Print version and exit
  -h, --help        Print this help and exit

Chat commands:
  /reset       Start a new conversation
  /history     List saved conversations
  /load <n>    Resume saved conversation n
  /delete <n>  Delete saved conversation n
  /topics      List starter topics
  /topic <n>   Send the first message of topic n
  /quit        Exit (also Ctrl-D)

Ctrl-C while a reply is streaming stops it and keeps the partial text.

Environment:
  CHATLINE_BASE_URL  Base URL of the endpoint
  CHATLINE_API_KEY   Bearer token
  CHATLINE_MODEL     Model to use
  CHATLINE_DATA_DIR  Where configs and history are stored (default ~/.chatline)
  CHATLINE_LOG       Log filter (default chatline=warn)";

/// Handle the --version command.
pub fn handle_version_command() -> ! {
    println!("chatline {}", VERSION);
    std::process::exit(0)
}

/// Handle the --help command.
pub fn handle_help_command() -> ! {
    println!("{}", USAGE);
    std::process::exit(0)
}
