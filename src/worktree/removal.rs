//! Worktree removal with a filesystem fallback.

use super::inventory::{WorktreeRecord, list_worktrees};
use crate::error::{ArborError, Result};
use crate::fs::canonical_or_self;
use crate::git::run_git;
use crate::process::CommandRunner;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// How a worktree ended up removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalMethod {
    /// `git worktree remove` succeeded.
    Git,
    /// git refused; the directory was deleted and the registry pruned.
    Fallback,
}

/// Remove a worktree with `git worktree remove --force`.
pub fn remove_worktree<P: AsRef<Path>>(
    runner: &dyn CommandRunner,
    repo: P,
    worktree_path: &Path,
) -> Result<()> {
    let worktree_str = worktree_path.to_string_lossy();

    run_git(runner, repo, &["worktree", "remove", "--force", &worktree_str]).map_err(|e| {
        ArborError::CommandFailed(format!(
            "failed to remove worktree '{}': {}",
            worktree_str,
            e.message()
        ))
    })?;

    Ok(())
}

/// Drop registry entries for worktrees whose directories are gone.
pub fn prune_worktrees<P: AsRef<Path>>(runner: &dyn CommandRunner, repo: P) -> Result<()> {
    run_git(runner, repo, &["worktree", "prune"])
        .map_err(|e| {
            ArborError::CommandFailed(format!("failed to prune worktrees: {}", e.message()))
        })?;
    Ok(())
}

/// Release a worktree lock so git will remove or prune it.
pub fn unlock_worktree<P: AsRef<Path>>(
    runner: &dyn CommandRunner,
    repo: P,
    worktree_path: &Path,
) -> Result<()> {
    let worktree_str = worktree_path.to_string_lossy();
    run_git(runner, repo, &["worktree", "unlock", &worktree_str]).map_err(|e| {
        ArborError::CommandFailed(format!(
            "failed to unlock worktree '{}': {}",
            worktree_str,
            e.message()
        ))
    })?;
    Ok(())
}

/// The registry entry for `worktree_path`, if git lists one.
///
/// `Err` when the listing itself fails.
fn registered(
    runner: &dyn CommandRunner,
    repo: &Path,
    worktree_path: &Path,
) -> Result<Option<WorktreeRecord>> {
    let target = resolved(worktree_path);
    let records = list_worktrees(runner, repo)?;
    Ok(records
        .into_iter()
        .find(|record| resolved(&record.path) == target))
}

/// Canonical form of a path that may no longer exist, via its parent.
fn resolved(path: &Path) -> PathBuf {
    match (path.parent(), path.file_name()) {
        (Some(parent), Some(name)) if !path.exists() => canonical_or_self(parent).join(name),
        _ => canonical_or_self(path),
    }
}

/// Remove a worktree, falling back to deleting its directory.
///
/// git refuses to remove worktrees it cannot account for (submodules, files
/// it does not recognise). In that case the directory is deleted outright
/// and `git worktree prune` drops the stale registry entry so the worktree
/// does not linger in listings. A locked worktree is never deleted this way:
/// prune would keep its entry.
///
/// # Returns
///
/// * `Ok(RemovalMethod)` - The worktree directory and its registry entry are gone
/// * `Err(ArborError::RemovalFailed)` - The worktree is locked, both git and
///   the filesystem delete failed, or git still lists it after pruning
pub fn remove_worktree_with_fallback<P: AsRef<Path>>(
    runner: &dyn CommandRunner,
    repo: P,
    worktree_path: &Path,
) -> Result<RemovalMethod> {
    let repo = repo.as_ref();

    let git_error = match remove_worktree(runner, repo, worktree_path) {
        Ok(()) => {
            info!(path = %worktree_path.display(), "removed worktree");
            return Ok(RemovalMethod::Git);
        }
        Err(e) => e,
    };

    let locked = matches!(
        registered(runner, repo, worktree_path),
        Ok(Some(record)) if record.locked.is_some()
    );
    if locked {
        return Err(ArborError::RemovalFailed(format!(
            "'{}' is locked; unlock it with `git worktree unlock` first ({})",
            worktree_path.display(),
            git_error.message()
        )));
    }

    warn!(
        path = %worktree_path.display(),
        error = %git_error,
        "git worktree remove failed, deleting directory"
    );

    if worktree_path.exists() {
        fs::remove_dir_all(worktree_path).map_err(|e| {
            ArborError::RemovalFailed(format!(
                "{}; deleting '{}' also failed: {}",
                git_error.message(),
                worktree_path.display(),
                e
            ))
        })?;
    }

    // A failed prune surfaces below as a lingering registry entry.
    if let Err(e) = prune_worktrees(runner, repo) {
        warn!(error = %e, "worktree prune after fallback removal failed");
    }

    if matches!(registered(runner, repo, worktree_path), Ok(Some(_))) {
        return Err(ArborError::RemovalFailed(format!(
            "'{}' is still registered with git after pruning ({})",
            worktree_path.display(),
            git_error.message()
        )));
    }

    info!(path = %worktree_path.display(), "removed worktree directory");
    Ok(RemovalMethod::Fallback)
}
