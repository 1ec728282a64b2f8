//! Command-line argument parsing for chatline.

/// Parsed CLI command to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    /// Show version information
    Version,
    /// Show usage
    Help,
    /// List the models of the active endpoint
    Models,
    /// Run the interactive chat loop (default)
    Chat {
        /// Print follow-up suggestions after each reply
        suggestions: bool,
    },
}

/// Parse command-line arguments and return the command to execute.
///
/// The first element is the program name. Unknown arguments are ignored.
///
/// # Examples
///
/// ```
/// use chatline::cli::args::{parse_args, CliCommand};
///
/// let args = vec!["chatline".to_string(), "--version".to_string()];
/// assert_eq!(parse_args(args.into_iter()), CliCommand::Version);
/// ```
pub fn parse_args<I>(args: I) -> CliCommand
where
    I: Iterator<Item = String>,
{
    let mut suggestions = true;
    let mut models = false;

    for arg in args.skip(1) {
        match arg.as_str() {
            "--version" | "-V" => return CliCommand::Version,
            "--help" | "-h" => return CliCommand::Help,
            "--models" => models = true,
            "--no-suggestions" => suggestions = false,
            _ => {}
        }
    }

    if models {
        CliCommand::Models
    } else {
        CliCommand::Chat { suggestions }
    }
}
