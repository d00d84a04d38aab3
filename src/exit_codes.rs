//! Exit code constants for the arbor CLI.
//!
//! - 0: Success
//! - 1: User error (bad args, invalid state, bad config)
//! - 3: Git or external command failure (including an unavailable inventory)
//! - 4: One or more removals failed

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: bad arguments, invalid state, or invalid configuration.
pub const USER_ERROR: i32 = 1;

/// Git or external command failure, including "cannot list worktrees".
pub const GIT_FAILURE: i32 = 3;

/// At least one destructive operation failed.
pub const PARTIAL_FAILURE: i32 = 4;
