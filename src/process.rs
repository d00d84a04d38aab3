//! External process execution.
//!
//! Every git and gh invocation goes through a [`CommandRunner`], so the
//! engine can be driven by a scripted runner in tests. [`SystemRunner`] is
//! the real implementation backed by `std::process::Command`.

use crate::error::{ArborError, Result};
use std::path::Path;
use std::process::{Command, Output};
use tracing::{debug, trace};

/// Captured output of a successful command.
#[derive(Debug, Clone, Default)]
pub struct CommandOutput {
    /// Standard output from the command (trimmed).
    pub stdout: String,
    /// Standard error from the command (trimmed).
    pub stderr: String,
}

impl CommandOutput {
    fn from_output(output: &Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).trim().to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        }
    }

    /// Build an output holding only stdout.
    pub fn stdout(stdout: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// Returns true if stdout is empty.
    pub fn is_empty(&self) -> bool {
        self.stdout.is_empty()
    }

    /// Returns stdout lines as a vector.
    pub fn lines(&self) -> Vec<&str> {
        if self.stdout.is_empty() {
            Vec::new()
        } else {
            self.stdout.lines().collect()
        }
    }
}

/// Runs an external program and captures its output.
///
/// Implementations must be shareable across threads: status gathering fans
/// out over a rayon pool with a single runner.
pub trait CommandRunner: Sync {
    /// Run `program` with `args` in `cwd`.
    ///
    /// Returns `Err(ArborError::CommandFailed)` if the program cannot be
    /// started or exits non-zero; the message carries the captured stderr
    /// (or stdout if stderr is empty).
    fn run(&self, program: &str, cwd: &Path, args: &[&str]) -> Result<CommandOutput>;
}

/// [`CommandRunner`] that spawns real processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, cwd: &Path, args: &[&str]) -> Result<CommandOutput> {
        trace!(program, cwd = %cwd.display(), ?args, "running command");

        let output = Command::new(program)
            .current_dir(cwd)
            .args(args)
            .output()
            .map_err(|e| {
                ArborError::CommandFailed(format!(
                    "failed to execute {} {}: {}",
                    program,
                    args.first().unwrap_or(&""),
                    e
                ))
            })?;

        let captured = CommandOutput::from_output(&output);

        if output.status.success() {
            Ok(captured)
        } else {
            let exit_code = output.status.code().unwrap_or(-1);
            let error_msg = if captured.stderr.is_empty() {
                captured.stdout.clone()
            } else {
                captured.stderr.clone()
            };
            debug!(program, ?args, exit_code, "command exited non-zero");

            Err(ArborError::CommandFailed(format!(
                "{} {} failed (exit code {}): {}",
                program,
                args.first().unwrap_or(&""),
                exit_code,
                error_msg
            )))
        }
    }
}
