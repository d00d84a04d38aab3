//! Pull request and check-run lookups through the GitHub CLI.

use super::types::{ChecksStatus, PrState, RemoteStatus};
use crate::error::{ArborError, Result};
use crate::process::CommandRunner;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A pull request as returned by the REST API (only the fields arbor reads).
#[derive(Debug, Clone, Deserialize)]
pub struct PullRequest {
    pub number: u64,
    pub html_url: String,
    /// `open` or `closed`; merged requests are `closed` with `merged_at` set.
    pub state: String,
    #[serde(default)]
    pub draft: bool,
    #[serde(default)]
    pub merged_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub head: PullRequestHead,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PullRequestHead {
    pub sha: String,
}

/// A single check run for a commit.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckRun {
    /// Unset while the run is queued or in progress.
    #[serde(default)]
    pub conclusion: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CheckRunsPage {
    #[serde(default)]
    check_runs: Vec<CheckRun>,
}

/// An authenticated handle to the code-review service.
pub trait ReviewClient: Sync {
    /// Pull requests (any state) whose source branch is `branch`.
    fn pull_requests_for_branch(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
    ) -> Result<Vec<PullRequest>>;

    /// Check runs reported for commit `sha`.
    fn check_runs(&self, owner: &str, repo: &str, sha: &str) -> Result<Vec<CheckRun>>;
}

/// [`ReviewClient`] backed by `gh api`.
pub struct GhClient<'a> {
    runner: &'a dyn CommandRunner,
    cwd: PathBuf,
}

impl<'a> GhClient<'a> {
    pub fn new(runner: &'a dyn CommandRunner, cwd: &Path) -> Self {
        Self {
            runner,
            cwd: cwd.to_path_buf(),
        }
    }

    fn api_get(&self, endpoint: &str, fields: &[String]) -> Result<String> {
        let mut args: Vec<&str> = vec!["api", "-X", "GET", endpoint];
        for field in fields {
            args.push("-f");
            args.push(field);
        }
        Ok(self.runner.run("gh", &self.cwd, &args)?.stdout)
    }
}

impl ReviewClient for GhClient<'_> {
    fn pull_requests_for_branch(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
    ) -> Result<Vec<PullRequest>> {
        let endpoint = format!("repos/{}/{}/pulls", owner, repo);
        let fields = [
            format!("head={}:{}", owner, branch),
            "state=all".to_string(),
            "sort=created".to_string(),
            "direction=desc".to_string(),
            "per_page=20".to_string(),
        ];
        let body = self.api_get(&endpoint, &fields)?;
        serde_json::from_str(&body).map_err(|e| {
            ArborError::CommandFailed(format!("unexpected pull request response: {}", e))
        })
    }

    fn check_runs(&self, owner: &str, repo: &str, sha: &str) -> Result<Vec<CheckRun>> {
        let endpoint = format!("repos/{}/{}/commits/{}/check-runs", owner, repo, sha);
        let body = self.api_get(&endpoint, &["per_page=100".to_string()])?;
        let page: CheckRunsPage = serde_json::from_str(&body).map_err(|e| {
            ArborError::CommandFailed(format!("unexpected check-runs response: {}", e))
        })?;
        Ok(page.check_runs)
    }
}

/// Classify a pull request.
///
/// A merge timestamp wins over everything; otherwise `closed` is closed and
/// anything else is open, with drafts reported as draft.
pub fn classify_pull_request(pr: &PullRequest) -> PrState {
    if pr.merged_at.is_some() {
        PrState::Merged
    } else if pr.state.eq_ignore_ascii_case("closed") {
        PrState::Closed
    } else if pr.draft {
        PrState::Draft
    } else {
        PrState::Open
    }
}

fn concluded(run: &CheckRun, expected: &str) -> bool {
    run.conclusion.as_deref() == Some(expected)
}

/// Aggregate check runs: any failure fails; all successes succeed; an empty
/// list is `None`; anything else is still pending.
pub fn aggregate_checks(runs: &[CheckRun]) -> ChecksStatus {
    if runs.is_empty() {
        return ChecksStatus::None;
    }

    if runs.iter().any(|run| concluded(run, "failure")) {
        ChecksStatus::Failure
    } else if runs.iter().all(|run| concluded(run, "success")) {
        ChecksStatus::Success
    } else {
        ChecksStatus::Pending
    }
}

/// Resolve the pull request status of `branch`.
///
/// The most recently created request wins when several exist. Any failure in
/// the pull request lookup, and the absence of a request, both produce
/// [`RemoteStatus::none`]. A failed check-run lookup only blanks the checks.
pub fn resolve(client: &dyn ReviewClient, owner: &str, repo: &str, branch: &str) -> RemoteStatus {
    let pulls = match client.pull_requests_for_branch(owner, repo, branch) {
        Ok(pulls) => pulls,
        Err(e) => {
            debug!(branch, error = %e, "pull request lookup failed");
            return RemoteStatus::none();
        }
    };

    let Some(pr) = pulls.iter().max_by_key(|pr| pr.created_at) else {
        return RemoteStatus::none();
    };

    let checks = match client.check_runs(owner, repo, &pr.head.sha) {
        Ok(runs) => aggregate_checks(&runs),
        Err(e) => {
            debug!(branch, sha = %pr.head.sha, error = %e, "check-run lookup failed");
            ChecksStatus::None
        }
    };

    RemoteStatus {
        state: classify_pull_request(pr),
        checks,
        url: Some(pr.html_url.clone()),
        number: Some(pr.number),
    }
}
