//! Crumbs: locate browser cookie stores and release the locks on them.
//!
//! This is the main entry point for the `crumbs` CLI. It parses arguments,
//! sets up logging, loads the configuration, dispatches to the appropriate
//! command handler, and handles errors with proper exit codes.

pub mod browser;
mod cli;
mod commands;
pub mod config;
pub mod error;
pub mod exit_codes;
pub mod logging;
pub mod restart;

#[cfg(test)]
pub(crate) mod test_support;

use cli::Cli;
use config::Config;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse_args();

    let result = logging::init(cli.log_format, cli.verbose)
        .and_then(|()| Config::resolve(cli.config.as_deref()))
        .and_then(|config| commands::dispatch(cli.command, &config));

    match result {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(err) => {
            // Print user-actionable error message to stderr
            eprintln!("Error: {}", err);

            // Return appropriate exit code
            ExitCode::from(err.exit_code() as u8)
        }
    }
}
