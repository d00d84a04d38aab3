//! Repository context resolution for arbor.
//!
//! Every command starts here: find the enclosing worktree, identify the
//! primary worktree through git, load `.arbor.yaml` from it, and resolve
//! the worktrees root. Commands work the same from the primary worktree, a
//! secondary worktree, or any subdirectory of either.

use crate::config::Config;
use crate::error::{ArborError, Result};
use crate::fs::{canonical_or_self, is_path_under};
use crate::git;
use crate::process::CommandRunner;
use crate::worktree::{WorktreeRecord, list_worktrees};
use std::env;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Resolved paths and configuration for one invocation.
///
/// All paths are absolute.
#[derive(Debug, Clone)]
pub struct RepoContext {
    /// Top-level directory of the primary worktree.
    pub primary: PathBuf,

    /// Directory holding secondary worktrees (may not exist yet).
    pub worktrees_root: PathBuf,

    /// Top-level directory of the worktree the command was started in.
    pub current_worktree: PathBuf,

    /// Loaded configuration (defaults when no file exists).
    pub config: Config,
}

impl RepoContext {
    /// Resolve the context from `dir`, or from the process working directory.
    ///
    /// Also returns the worktree inventory the context was resolved from, so
    /// commands do not list worktrees twice.
    ///
    /// # Returns
    ///
    /// * `Ok((RepoContext, records))` - Successfully resolved context
    /// * `Err(ArborError::InventoryUnavailable)` - Not inside a git repository (exit code 3)
    /// * `Err(ArborError::UserError)` - Invalid directory or configuration, including a
    ///   worktrees root that holds the primary worktree (exit code 1)
    pub fn resolve(
        runner: &dyn CommandRunner,
        dir: Option<&Path>,
    ) -> Result<(Self, Vec<WorktreeRecord>)> {
        let cwd = match dir {
            Some(dir) => dir.to_path_buf(),
            None => env::current_dir().map_err(|e| {
                ArborError::UserError(format!("failed to get current working directory: {}", e))
            })?,
        };

        if !cwd.is_dir() {
            return Err(ArborError::UserError(format!(
                "'{}' is not a directory",
                cwd.display()
            )));
        }

        Self::resolve_with_records(runner, &cwd)
    }

    /// Resolve the context from a specific directory.
    pub fn resolve_from(runner: &dyn CommandRunner, cwd: &Path) -> Result<Self> {
        let (ctx, _) = Self::resolve_with_records(runner, cwd)?;
        Ok(ctx)
    }

    /// Resolve the context from `cwd`, returning the inventory alongside it.
    pub fn resolve_with_records(
        runner: &dyn CommandRunner,
        cwd: &Path,
    ) -> Result<(Self, Vec<WorktreeRecord>)> {
        let current_worktree = git::show_toplevel(runner, cwd)?;
        let records = list_worktrees(runner, cwd)?;

        // parse_porcelain never returns an empty inventory.
        let primary = records
            .first()
            .map(|record| record.path.clone())
            .ok_or_else(|| {
                ArborError::InventoryUnavailable("git reported no worktrees".to_string())
            })?;

        let config = Config::load_for_primary(&primary)?;
        let worktrees_root = config.checked_worktrees_root(&primary)?;

        debug!(
            primary = %primary.display(),
            current = %current_worktree.display(),
            worktrees_root = %worktrees_root.display(),
            "resolved repository context"
        );

        Ok((
            Self {
                primary,
                worktrees_root,
                current_worktree,
                config,
            },
            records,
        ))
    }

    /// Whether `path` is the worktree the command was started in.
    pub fn is_current(&self, path: &Path) -> bool {
        canonical_or_self(path) == canonical_or_self(&self.current_worktree)
    }

    /// Whether the command was started inside `path` (the worktree itself or a
    /// directory nested below it).
    pub fn is_inside(&self, path: &Path) -> bool {
        is_path_under(&self.current_worktree, path)
    }
}
