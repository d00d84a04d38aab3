//! Branch deletion.

use crate::error::{ArborError, Result};
use crate::git::run_git;
use crate::process::CommandRunner;
use std::path::Path;

/// Delete a local branch.
///
/// Uses `git branch -d <branch>` (requires fully merged) unless `force`, in
/// which case `-D` is used. Squash-merged pull requests leave branches that
/// git does not consider merged, so cleanup of merged/closed work forces.
///
/// # Returns
///
/// * `Ok(())` - Branch deleted successfully
/// * `Err(ArborError::CommandFailed)` - Failed to delete branch
pub fn delete_branch<P: AsRef<Path>>(
    runner: &dyn CommandRunner,
    repo: P,
    branch: &str,
    force: bool,
) -> Result<()> {
    let delete_flag = if force { "-D" } else { "-d" };

    run_git(runner, repo, &["branch", delete_flag, branch]).map_err(|e| {
        let force_hint = if !force {
            "\n\nIf the branch is not fully merged and you want to delete it anyway,\n\
             re-run with --force."
        } else {
            ""
        };

        ArborError::CommandFailed(format!(
            "failed to delete branch '{}': {}{}",
            branch,
            e.message(),
            force_hint
        ))
    })?;

    Ok(())
}
