//! Reference resolution: ahead/behind counts, working-tree changes, and
//! unpushed commits.
//!
//! The display helpers here fail open (a failed query reads as "nothing to
//! report"). Anything that gates a destructive operation must use
//! [`change_state`] instead, which keeps "could not tell" distinct.

use crate::git::run_git;
use crate::process::CommandRunner;
use serde::Serialize;
use std::path::Path;
use tracing::debug;

/// Commit distance between a branch and a baseline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AheadBehind {
    /// Commits reachable from the branch but not the baseline.
    pub ahead: u32,
    /// Commits reachable from the baseline but not the branch.
    pub behind: u32,
}

/// Result of a working-tree change check used for safety gating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeState {
    /// No tracked modifications and no untracked files.
    Clean,
    /// The worktree has local changes.
    Dirty,
    /// The check failed; the state of the worktree is not known.
    Unknown,
}

impl ChangeState {
    /// Whether this state forbids offering the worktree for removal.
    ///
    /// Not knowing counts as having changes.
    pub fn blocks_removal(self) -> bool {
        !matches!(self, ChangeState::Clean)
    }
}

/// Upstream tracking state of a branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnpushedState {
    /// The branch has commits its upstream does not.
    pub has_unpushed: bool,
    /// The branch has no upstream tracking ref.
    pub no_remote: bool,
    /// An upstream exists but the branch could not be compared with it.
    pub unknown: bool,
}

impl UnpushedState {
    /// True when removing the branch could lose commits that exist nowhere else.
    pub fn is_hazard(self) -> bool {
        self.has_unpushed || self.no_remote || self.unknown
    }
}

fn count_commits(runner: &dyn CommandRunner, repo: &Path, range: &str) -> Option<u32> {
    let output = run_git(runner, repo, &["rev-list", "--count", range]).ok()?;
    output.stdout.trim().parse().ok()
}

/// Count commits `branch` has over `baseline` and vice versa.
///
/// Both counts fall back to zero if either query fails (for example when the
/// baseline does not exist locally).
pub fn ahead_behind(
    runner: &dyn CommandRunner,
    repo: &Path,
    branch: &str,
    baseline: &str,
) -> AheadBehind {
    let ahead = count_commits(runner, repo, &format!("{}..{}", baseline, branch));
    let behind = count_commits(runner, repo, &format!("{}..{}", branch, baseline));

    match (ahead, behind) {
        (Some(ahead), Some(behind)) => AheadBehind { ahead, behind },
        _ => {
            debug!(branch, baseline, "ahead/behind unavailable");
            AheadBehind::default()
        }
    }
}

/// Inspect a worktree for local changes, tracked or untracked.
pub fn change_state(runner: &dyn CommandRunner, path: &Path) -> ChangeState {
    match run_git(runner, path, &["status", "--porcelain"]) {
        Ok(output) if output.is_empty() => ChangeState::Clean,
        Ok(_) => ChangeState::Dirty,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "change check failed");
            ChangeState::Unknown
        }
    }
}

/// Whether a worktree has local changes, for display.
///
/// A failed check reads as `false`.
pub fn has_uncommitted_changes(runner: &dyn CommandRunner, path: &Path) -> bool {
    change_state(runner, path) == ChangeState::Dirty
}

/// Check whether `branch` has commits its upstream does not have.
///
/// A branch without an upstream reports `no_remote`. A failed comparison
/// reports `unknown`, which is as much a hazard as unpushed commits.
pub fn unpushed_commits(runner: &dyn CommandRunner, repo: &Path, branch: &str) -> UnpushedState {
    let upstream_spec = format!("{}@{{upstream}}", branch);
    let upstream = run_git(
        runner,
        repo,
        &["rev-parse", "--abbrev-ref", "--symbolic-full-name", &upstream_spec],
    )
    .ok()
    .map(|output| output.stdout)
    .filter(|upstream| !upstream.is_empty());

    let Some(upstream) = upstream else {
        return UnpushedState {
            has_unpushed: false,
            no_remote: true,
            unknown: false,
        };
    };

    match count_commits(runner, repo, &format!("{}..{}", upstream, branch)) {
        Some(count) => UnpushedState {
            has_unpushed: count > 0,
            no_remote: false,
            unknown: false,
        },
        None => {
            debug!(branch, %upstream, "unpushed commit count unavailable");
            UnpushedState {
                has_unpushed: false,
                no_remote: false,
                unknown: true,
            }
        }
    }
}
