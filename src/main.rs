use chatline::cli::{parse_args, run_cli_command, CliCommand};
use chatline::logging;

use color_eyre::Result;

fn main() -> Result<()> {
    let command = parse_args(std::env::args());

    // Handle flags that only print before any initialization
    if matches!(command, CliCommand::Version | CliCommand::Help) {
        return tokio::runtime::Builder::new_current_thread()
            .build()?
            .block_on(run_cli_command(command));
    }

    color_eyre::install()?;
    logging::init();

    // One thread: deltas are applied in arrival order and the session is
    // never touched concurrently
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(run_cli_command(command))
}
