//! Arbor: inventory and clean up the git worktrees of a repository.
//!
//! This is the main entry point for the `arbor` CLI. It parses arguments,
//! sets up diagnostics, dispatches to the appropriate command handler, and
//! handles errors with proper exit codes.

mod cleanup;
mod cli;
mod commands;
pub mod config;
pub mod context;
pub mod error;
pub mod exit_codes;
pub mod fs;
pub mod git;
pub mod logging;
pub mod process;
pub mod remote;
pub mod status;
pub mod worktree;

#[cfg(test)]
mod test_support;

use cli::Cli;
use process::SystemRunner;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse_args();
    logging::init(cli.verbose);

    match commands::dispatch(&SystemRunner, cli.command, cli.directory.as_deref()) {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(err) => {
            // Print user-actionable error message to stderr
            eprintln!("Error: {}", err);

            // Return appropriate exit code
            ExitCode::from(err.exit_code() as u8)
        }
    }
}
