//! Cleanup execution: remove each selected item independently.

use super::types::{BranchDeletion, CleanableItem, CleanupReport, ItemOutcome};
use crate::context::RepoContext;
use crate::error::{ArborError, Result};
use crate::fs::{canonical_or_self, is_path_under, path_contains_traversal};
use crate::process::CommandRunner;
use crate::worktree::{delete_branch, remove_worktree_with_fallback};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Remove every selected item, in order.
///
/// A failure is recorded against its item and the loop moves on; the report
/// always has one outcome per selected item. `skipped_for_safety` is left
/// empty for the caller to fill in.
pub fn execute_cleanup(
    runner: &dyn CommandRunner,
    ctx: &RepoContext,
    selected: Vec<CleanableItem>,
) -> CleanupReport {
    let outcomes = selected
        .into_iter()
        .map(|item| execute_item(runner, ctx, item))
        .collect();

    CleanupReport {
        outcomes,
        skipped_for_safety: Vec::new(),
    }
}

fn execute_item(runner: &dyn CommandRunner, ctx: &RepoContext, item: CleanableItem) -> ItemOutcome {
    let result = match &item {
        CleanableItem::StaleWorktree { path, .. } => {
            remove_worktree_with_fallback(runner, &ctx.primary, path).map(|_| ())
        }
        CleanableItem::Abandoned { path, .. } | CleanableItem::Orphan { path, .. } => {
            remove_directory_safe(path, &ctx.worktrees_root, &ctx.primary)
        }
    };

    if let Err(e) = result {
        warn!(path = %item.path().display(), error = %e, "cleanup item failed");
        return ItemOutcome::failed(item, e);
    }

    let branch_deletion = match (&item, ctx.config.delete_branches) {
        (CleanableItem::StaleWorktree { branch, .. }, true) => {
            Some(delete_stale_branch(runner, &ctx.primary, branch))
        }
        _ => None,
    };

    ItemOutcome {
        branch_deletion,
        ..ItemOutcome::removed(item)
    }
}

fn delete_stale_branch(runner: &dyn CommandRunner, repo: &Path, branch: &str) -> BranchDeletion {
    // The pull request is merged or closed, so unmerged commits are expected.
    match delete_branch(runner, repo, branch, true) {
        Ok(()) => {
            info!(branch, "deleted branch");
            BranchDeletion {
                branch: branch.to_string(),
                deleted: true,
                error: None,
            }
        }
        Err(e) => {
            warn!(branch, error = %e, "branch deletion failed");
            BranchDeletion {
                branch: branch.to_string(),
                deleted: false,
                error: Some(e.to_string()),
            }
        }
    }
}

/// Delete a directory that git does not track, but only inside the worktrees
/// root and never the primary worktree or anything holding it.
pub fn remove_directory_safe(path: &Path, worktrees_root: &Path, primary: &Path) -> Result<()> {
    if path_contains_traversal(path) {
        return Err(ArborError::RemovalFailed(format!(
            "refusing to remove path with traversal: {}",
            path.display()
        )));
    }

    if !is_path_under(path, worktrees_root)
        || canonical_or_self(path) == canonical_or_self(worktrees_root)
    {
        return Err(ArborError::RemovalFailed(format!(
            "refusing to remove directory outside {}: {}",
            worktrees_root.display(),
            path.display()
        )));
    }

    if is_path_under(primary, path) {
        return Err(ArborError::RemovalFailed(format!(
            "refusing to remove {}: it holds the primary worktree {}",
            path.display(),
            primary.display()
        )));
    }

    fs::remove_dir_all(path).map_err(|e| {
        ArborError::RemovalFailed(format!(
            "failed to remove directory '{}': {}",
            path.display(),
            e
        ))
    })?;

    info!(path = %path.display(), "removed directory");
    Ok(())
}
