//! Filesystem reconciliation of the worktrees root.
//!
//! Finds directories directly under the worktrees root that git no longer
//! accounts for:
//!
//! - **Abandoned**: no `.git` entry at all (a plain leftover directory)
//! - **Orphan**: a `.git` *file* whose `gitdir:` target no longer exists
//!
//! A `.git` *directory* marks a full repository and is never a candidate.
//! Any entry that cannot be read or parsed is skipped, never reported.

use crate::error::{ArborError, Result};
use crate::fs::count_contents;
use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A directory under the worktrees root with no git linkage at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AbandonedFolder {
    pub path: PathBuf,
    pub name: String,
    /// Files contained, recursively.
    pub file_count: usize,
    /// Subdirectories contained, recursively.
    pub folder_count: usize,
}

impl AbandonedFolder {
    pub fn is_empty(&self) -> bool {
        self.file_count == 0 && self.folder_count == 0
    }
}

/// A directory whose linkage file points at metadata that no longer exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrphanWorktree {
    pub path: PathBuf,
    pub name: String,
    /// The `gitdir:` target as written in the linkage file.
    pub broken_target: PathBuf,
}

/// Everything the filesystem scan found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanResults {
    pub abandoned: Vec<AbandonedFolder>,
    pub orphans: Vec<OrphanWorktree>,
}

impl ScanResults {
    pub fn is_empty(&self) -> bool {
        self.abandoned.is_empty() && self.orphans.is_empty()
    }
}

/// Compile `scan_ignore` patterns into a matcher over directory names.
pub fn build_ignore_set(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|e| {
            ArborError::UserError(format!("invalid scan_ignore pattern '{}': {}", pattern, e))
        })?;
        builder.add(glob);
    }
    builder
        .build()
        .map_err(|e| ArborError::UserError(format!("failed to build scan_ignore set: {}", e)))
}

/// Immediate subdirectories of `root` that are candidates for scanning.
///
/// Hidden entries and names matching `ignore` are excluded. Results are
/// sorted by name so repeated scans report in the same order.
fn candidate_dirs(root: &Path, ignore: &GlobSet) -> Vec<(PathBuf, String)> {
    let entries = match fs::read_dir(root) {
        Ok(entries) => entries,
        Err(e) => {
            debug!(root = %root.display(), error = %e, "worktrees root not readable");
            return Vec::new();
        }
    };

    let mut dirs: Vec<(PathBuf, String)> = entries
        .flatten()
        .filter(|entry| entry.file_type().map(|ft| ft.is_dir()).unwrap_or(false))
        .map(|entry| (entry.path(), entry.file_name().to_string_lossy().to_string()))
        .filter(|(_, name)| !name.starts_with('.') && !ignore.is_match(name))
        .collect();

    dirs.sort_by(|a, b| a.1.cmp(&b.1));
    dirs
}

/// Find directories under `root` with no `.git` entry.
///
/// Returns an empty list if `root` does not exist.
pub fn scan_abandoned(root: &Path, ignore: &GlobSet) -> Vec<AbandonedFolder> {
    candidate_dirs(root, ignore)
        .into_iter()
        .filter(|(path, _)| fs::symlink_metadata(path.join(".git")).is_err())
        .map(|(path, name)| {
            let (file_count, folder_count) = count_contents(&path);
            AbandonedFolder {
                path,
                name,
                file_count,
                folder_count,
            }
        })
        .collect()
}

/// Read the `gitdir:` target from a linkage file.
///
/// Relative targets are resolved against the directory holding the file.
pub fn read_linkage_target(linkage_file: &Path) -> Option<PathBuf> {
    let content = fs::read_to_string(linkage_file).ok()?;
    let target = content
        .lines()
        .find_map(|line| line.trim().strip_prefix("gitdir:"))
        .map(str::trim)
        .filter(|target| !target.is_empty())?;

    let target = PathBuf::from(target);
    if target.is_absolute() {
        Some(target)
    } else {
        linkage_file.parent().map(|dir| dir.join(target))
    }
}

/// Find directories under `root` whose linkage file points nowhere.
///
/// Returns an empty list if `root` does not exist.
pub fn scan_orphans(root: &Path, ignore: &GlobSet) -> Vec<OrphanWorktree> {
    let mut orphans = Vec::new();

    for (path, name) in candidate_dirs(root, ignore) {
        let linkage = path.join(".git");
        match fs::symlink_metadata(&linkage) {
            Ok(meta) if meta.is_file() => {}
            _ => continue,
        }

        let Some(target) = read_linkage_target(&linkage) else {
            debug!(path = %linkage.display(), "skipping unreadable linkage file");
            continue;
        };

        if !target.exists() {
            orphans.push(OrphanWorktree {
                path,
                name,
                broken_target: target,
            });
        }
    }

    orphans
}

/// Run both scans against the same worktrees root.
pub fn scan_worktrees_root(root: &Path, ignore: &GlobSet) -> ScanResults {
    ScanResults {
        abandoned: scan_abandoned(root, ignore),
        orphans: scan_orphans(root, ignore),
    }
}
