//! Worktree inventory: parsing `git worktree list --porcelain`.

use crate::error::{ArborError, Result};
use crate::git::run_git;
use crate::process::CommandRunner;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// One entry of the worktree listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorktreeRecord {
    /// Absolute path to the worktree.
    pub path: PathBuf,
    /// Short branch name (`refs/heads/` stripped); `None` when detached or bare.
    pub branch: Option<String>,
    /// Commit the worktree's HEAD resolves to (empty for bare entries).
    pub commit_id: String,
    /// True only for the first record in listing order.
    pub is_primary: bool,
    /// The entry is a bare repository.
    pub is_bare: bool,
    /// HEAD is detached.
    pub is_detached: bool,
    /// Lock reason if the worktree is locked (empty string when no reason given).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locked: Option<String>,
    /// Prunable reason if git considers the worktree prunable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prunable: Option<String>,
}

impl WorktreeRecord {
    fn at(path: &str) -> Self {
        Self {
            path: PathBuf::from(path),
            branch: None,
            commit_id: String::new(),
            is_primary: false,
            is_bare: false,
            is_detached: false,
            locked: None,
            prunable: None,
        }
    }

    /// Directory name of the worktree, for display and name lookups.
    pub fn dir_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// Parse the porcelain worktree listing.
///
/// Records are separated by blank lines. Lines before the first `worktree`
/// line, and records without one, are discarded. The first record is always
/// the primary worktree: git lists it first, whatever it contains.
///
/// # Returns
///
/// * `Ok(Vec<WorktreeRecord>)` - At least one record
/// * `Err(ArborError::InventoryUnavailable)` - No record could be parsed
pub fn parse_porcelain(text: &str) -> Result<Vec<WorktreeRecord>> {
    let mut records = Vec::new();
    let mut current: Option<WorktreeRecord> = None;

    for line in text.lines() {
        let line = line.trim_end_matches('\r');

        if line.trim().is_empty() {
            records.extend(current.take());
            continue;
        }

        if let Some(path) = line.strip_prefix("worktree ") {
            records.extend(current.take());
            current = Some(WorktreeRecord::at(path));
            continue;
        }

        // Attribute lines outside of a labeled record are ignored
        let Some(record) = current.as_mut() else {
            continue;
        };

        let (key, value) = match line.split_once(' ') {
            Some((key, value)) => (key, Some(value)),
            None => (line, None),
        };

        match (key, value) {
            ("HEAD", Some(sha)) => record.commit_id = sha.to_string(),
            ("branch", Some(branch_ref)) => {
                record.branch = Some(
                    branch_ref
                        .strip_prefix("refs/heads/")
                        .unwrap_or(branch_ref)
                        .to_string(),
                );
            }
            ("bare", _) => {
                record.is_bare = true;
                record.branch = None;
            }
            ("detached", _) => {
                record.is_detached = true;
                record.branch = None;
            }
            ("locked", reason) => record.locked = Some(reason.unwrap_or("").to_string()),
            ("prunable", reason) => record.prunable = Some(reason.unwrap_or("").to_string()),
            _ => {}
        }
    }

    records.extend(current);

    if records.is_empty() {
        return Err(ArborError::InventoryUnavailable(
            "git worktree list reported no worktrees".to_string(),
        ));
    }

    for (i, record) in records.iter_mut().enumerate() {
        record.is_primary = i == 0;
    }

    Ok(records)
}

/// List all worktrees of the repository containing `cwd`.
///
/// # Returns
///
/// * `Ok(Vec<WorktreeRecord>)` - Records in git's listing order, primary first
/// * `Err(ArborError::InventoryUnavailable)` - git failed or the output was unusable
pub fn list_worktrees<P: AsRef<Path>>(
    runner: &dyn CommandRunner,
    cwd: P,
) -> Result<Vec<WorktreeRecord>> {
    let output = run_git(runner, cwd, &["worktree", "list", "--porcelain"])
        .map_err(|e| ArborError::InventoryUnavailable(e.to_string()))?;

    parse_porcelain(&output.stdout)
}

/// Path of the primary worktree.
///
/// Correct from inside a linked worktree as well: the answer comes from
/// git's listing order, not from the current directory.
pub fn primary_worktree_path<P: AsRef<Path>>(
    runner: &dyn CommandRunner,
    cwd: P,
) -> Result<PathBuf> {
    let records = list_worktrees(runner, cwd)?;
    records
        .into_iter()
        .next()
        .map(|r| r.path)
        .ok_or_else(|| ArborError::InventoryUnavailable("no primary worktree".to_string()))
}

/// Find a worktree by branch name or by directory name.
///
/// A branch match wins over a directory-name match.
pub fn find_worktree<'a>(records: &'a [WorktreeRecord], name: &str) -> Option<&'a WorktreeRecord> {
    records
        .iter()
        .find(|r| r.branch.as_deref() == Some(name))
        .or_else(|| records.iter().find(|r| r.dir_name() == name))
}
