//! Cleanup reconciliation: classify candidates, then remove a selection.
//!
//! # Safety
//!
//! - Stale worktrees with local changes, or whose change state cannot be
//!   determined, are reported as skipped and never offered
//! - The primary worktree and the worktree the operator stands in are never candidates
//! - Untracked directories are only deleted inside the worktrees root
//! - Each item is removed independently; one failure never aborts the batch

mod execution;
mod planning;
mod types;

pub use execution::{execute_cleanup, remove_directory_safe};
pub use planning::{LiveInspector, WorktreeInspector, build_cleanup_set};
pub use types::{BranchDeletion, CleanableItem, CleanupReport, CleanupSet, ItemOutcome};
