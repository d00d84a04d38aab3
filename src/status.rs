//! Per-worktree status collection for `arbor list`.
//!
//! Each worktree is gathered independently on the rayon pool: ahead/behind
//! against the baseline, a display-only change check, and the remote status
//! of its branch. Results are ordered by creation time.

use crate::context::RepoContext;
use crate::process::CommandRunner;
use crate::remote::{RemoteLookup, RemoteStatus};
use crate::worktree::{AheadBehind, WorktreeRecord, ahead_behind, has_uncommitted_changes};
use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

/// One row of `arbor list`.
#[derive(Debug, Clone, Serialize)]
pub struct WorktreeStatus {
    pub path: PathBuf,
    pub branch: Option<String>,
    pub created_at: DateTime<Utc>,
    pub is_current: bool,
    pub is_primary: bool,
    pub has_uncommitted_changes: bool,
    pub ahead: u32,
    pub behind: u32,
    pub remote_status: RemoteStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locked: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prunable: Option<String>,
}

/// Directory creation time, falling back to modification time, then the epoch.
pub fn creation_time(path: &Path) -> DateTime<Utc> {
    std::fs::metadata(path)
        .and_then(|meta| meta.created().or_else(|_| meta.modified()))
        .map(DateTime::<Utc>::from)
        .unwrap_or_else(|_| DateTime::<Utc>::from(UNIX_EPOCH))
}

fn collect_one(
    runner: &dyn CommandRunner,
    ctx: &RepoContext,
    record: &WorktreeRecord,
    remote: &RemoteLookup<'_>,
) -> WorktreeStatus {
    let exists = record.path.is_dir();

    let AheadBehind { ahead, behind } = match &record.branch {
        Some(branch) => ahead_behind(runner, &ctx.primary, branch, &ctx.config.base_branch),
        None => AheadBehind::default(),
    };

    let has_uncommitted_changes =
        !record.is_bare && exists && has_uncommitted_changes(runner, &record.path);

    let remote_status = match &record.branch {
        Some(branch) => remote.status(branch),
        None => RemoteStatus::none(),
    };

    WorktreeStatus {
        path: record.path.clone(),
        branch: record.branch.clone(),
        created_at: creation_time(&record.path),
        is_current: ctx.is_current(&record.path),
        is_primary: record.is_primary,
        has_uncommitted_changes,
        ahead,
        behind,
        remote_status,
        locked: record.locked.clone(),
        prunable: record.prunable.clone(),
    }
}

/// Gather the status of every worktree, oldest first.
///
/// Ties keep inventory order.
pub fn collect_statuses(
    runner: &dyn CommandRunner,
    ctx: &RepoContext,
    records: &[WorktreeRecord],
    remote: &RemoteLookup<'_>,
) -> Vec<WorktreeStatus> {
    let mut statuses: Vec<WorktreeStatus> = records
        .par_iter()
        .map(|record| collect_one(runner, ctx, record, remote))
        .collect();

    statuses.sort_by_key(|status| status.created_at);
    statuses
}
