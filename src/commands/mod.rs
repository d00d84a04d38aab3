//! Command implementations for arbor.
//!
//! This module provides the dispatcher that routes CLI commands to their
//! implementations. Every command runs external programs through the same
//! [`CommandRunner`], so tests can substitute a scripted one.

mod clean;
mod list;
mod remove;

use crate::cli::Command;
use crate::error::Result;
use crate::process::CommandRunner;
use std::path::Path;

/// Dispatch a command to its implementation.
///
/// `dir` is the directory given with `-C`, if any; commands otherwise start
/// from the process working directory.
pub fn dispatch(runner: &dyn CommandRunner, command: Command, dir: Option<&Path>) -> Result<()> {
    match command {
        Command::List(args) => list::cmd_list(runner, args, dir),
        Command::Clean(args) => clean::cmd_clean(runner, args, dir),
        Command::Remove(args) => remove::cmd_remove(runner, args, dir),
    }
}
