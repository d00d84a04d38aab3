//! Error types for the arbor CLI.
//!
//! Only failures that stop a command are represented here. Degraded
//! information (remote lookups, unreadable scan entries) and per-item
//! failures during cleanup are absorbed where they happen and reported
//! as data instead.

use crate::exit_codes;
use thiserror::Error;

/// Main error type for arbor operations.
#[derive(Error, Debug)]
pub enum ArborError {
    /// User provided invalid arguments or the system is in an invalid state.
    #[error("{0}")]
    UserError(String),

    /// The worktree inventory could not be produced (not a repository, git missing,
    /// unparsable listing).
    #[error("Cannot list worktrees: {0}")]
    InventoryUnavailable(String),

    /// An external command (git or gh) failed.
    #[error("Command failed: {0}")]
    CommandFailed(String),

    /// A destructive operation on a single worktree or directory failed.
    #[error("Removal failed: {0}")]
    RemovalFailed(String),
}

impl ArborError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            ArborError::UserError(_) => exit_codes::USER_ERROR,
            ArborError::InventoryUnavailable(_) => exit_codes::GIT_FAILURE,
            ArborError::CommandFailed(_) => exit_codes::GIT_FAILURE,
            ArborError::RemovalFailed(_) => exit_codes::PARTIAL_FAILURE,
        }
    }

    /// The message without the variant prefix, for wrapping in another error.
    pub fn message(&self) -> &str {
        match self {
            ArborError::UserError(msg)
            | ArborError::InventoryUnavailable(msg)
            | ArborError::CommandFailed(msg)
            | ArborError::RemovalFailed(msg) => msg,
        }
    }
}

/// Result type alias for arbor operations.
pub type Result<T> = std::result::Result<T, ArborError>;
