//! Git command helpers for arbor.
//!
//! Thin wrappers over [`CommandRunner`] for invoking the `git` executable.
//! All git operations should go through this module.

use crate::error::{ArborError, Result};
use crate::process::{CommandOutput, CommandRunner};
use std::path::{Path, PathBuf};

/// Run a git command with the specified working directory.
///
/// # Arguments
///
/// * `runner` - The process runner to execute git with
/// * `cwd` - The working directory to run the command in
/// * `args` - The git command arguments (without "git" prefix)
///
/// # Returns
///
/// * `Ok(CommandOutput)` - On successful execution (exit code 0)
/// * `Err(ArborError::CommandFailed)` - On non-zero exit code (mapped to exit code 3)
pub fn run_git<P: AsRef<Path>>(
    runner: &dyn CommandRunner,
    cwd: P,
    args: &[&str],
) -> Result<CommandOutput> {
    runner.run("git", cwd.as_ref(), args)
}

/// Get the top-level directory of the worktree containing `cwd`.
///
/// Inside a linked worktree this is the linked worktree's root, not the
/// primary worktree. Failure means `cwd` is not inside a repository at all,
/// which leaves nothing to inventory.
pub fn show_toplevel<P: AsRef<Path>>(runner: &dyn CommandRunner, cwd: P) -> Result<PathBuf> {
    let output = run_git(runner, cwd, &["rev-parse", "--show-toplevel"]).map_err(|e| {
        ArborError::InventoryUnavailable(format!(
            "not inside a git repository. Run this command from within a git repository. ({})",
            e
        ))
    })?;
    Ok(PathBuf::from(output.stdout))
}

/// Get the fetch URL of a remote, or `None` if the remote is not configured.
pub fn remote_url<P: AsRef<Path>>(
    runner: &dyn CommandRunner,
    cwd: P,
    remote: &str,
) -> Option<String> {
    run_git(runner, cwd, &["remote", "get-url", remote])
        .ok()
        .map(|output| output.stdout)
        .filter(|url| !url.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::SystemRunner;
    use crate::test_support::create_test_repo;
    use tempfile::TempDir;

    #[test]
    fn test_run_git_success() {
        let temp_dir = create_test_repo();
        let result = run_git(&SystemRunner, temp_dir.path(), &["status", "--porcelain"]);
        assert!(result.is_ok());
    }

    #[test]
    fn test_run_git_failure_returns_command_failed() {
        let temp_dir = create_test_repo();
        let result = run_git(
            &SystemRunner,
            temp_dir.path(),
            &["checkout", "nonexistent-branch"],
        );
        assert!(matches!(result, Err(ArborError::CommandFailed(_))));
    }

    #[test]
    fn test_show_toplevel_from_subdirectory() {
        let temp_dir = create_test_repo();
        let subdir = temp_dir.path().join("subdir").join("nested");
        std::fs::create_dir_all(&subdir).unwrap();

        let root = show_toplevel(&SystemRunner, &subdir).unwrap();
        let expected = temp_dir.path().canonicalize().unwrap();
        assert_eq!(root.canonicalize().unwrap(), expected);
    }

    #[test]
    fn test_show_toplevel_outside_repo_is_inventory_unavailable() {
        let temp_dir = TempDir::new().unwrap(); // Not a git repo
        let err = show_toplevel(&SystemRunner, temp_dir.path()).unwrap_err();
        assert!(matches!(err, ArborError::InventoryUnavailable(_)));
        assert!(err.to_string().contains("not inside a git repository"));
    }

    #[test]
    fn test_remote_url_missing_remote() {
        let temp_dir = create_test_repo();
        assert_eq!(remote_url(&SystemRunner, temp_dir.path(), "origin"), None);
    }

    #[test]
    fn test_remote_url_configured_remote() {
        let temp_dir = create_test_repo();
        run_git(
            &SystemRunner,
            temp_dir.path(),
            &["remote", "add", "origin", "git@github.com:acme/widgets.git"],
        )
        .unwrap();

        assert_eq!(
            remote_url(&SystemRunner, temp_dir.path(), "origin").as_deref(),
            Some("git@github.com:acme/widgets.git")
        );
    }
}
