//! Git worktree inventory, reference, scanning, and removal helpers.
//!
//! This module provides the local side of worktree reconciliation:
//!
//! - Listing worktrees from git and identifying the primary worktree
//! - Ahead/behind counts, change checks, and upstream checks
//! - Scanning the worktrees root for abandoned and orphaned directories
//! - Removing worktrees and deleting branches
//!
//! Git failures surface as `ArborError::CommandFailed` (exit code 3), except
//! listing failures, which are `ArborError::InventoryUnavailable`.

mod branch;
mod inventory;
mod refs;
mod removal;
mod scan;

// Re-export public API
pub use branch::delete_branch;
pub use inventory::{
    WorktreeRecord, find_worktree, list_worktrees, parse_porcelain, primary_worktree_path,
};
pub use refs::{
    AheadBehind, ChangeState, UnpushedState, ahead_behind, change_state, has_uncommitted_changes,
    unpushed_commits,
};
pub use removal::{
    RemovalMethod, prune_worktrees, remove_worktree, remove_worktree_with_fallback, unlock_worktree,
};
pub use scan::{
    AbandonedFolder, OrphanWorktree, ScanResults, build_ignore_set, read_linkage_target,
    scan_abandoned, scan_orphans, scan_worktrees_root,
};
