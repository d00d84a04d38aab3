//! Per-invocation handle for remote status lookups.

use super::github::{GhClient, ReviewClient, resolve};
use super::provider::{RemoteAvailability, RepoSlug, detect_remote};
use super::types::RemoteStatus;
use crate::process::CommandRunner;
use std::path::Path;
use tracing::{debug, info};

/// Answers "what is the pull request status of this branch?".
///
/// Built once per command. When the review service cannot be reached, or
/// lookups are disabled, every answer is [`RemoteStatus::none`].
pub struct RemoteLookup<'a> {
    target: Option<(Box<dyn ReviewClient + 'a>, RepoSlug)>,
    unavailable: Option<String>,
}

impl<'a> RemoteLookup<'a> {
    /// Check the configured remote and `gh` availability.
    ///
    /// With `enabled == false` no external command is run.
    pub fn detect(runner: &'a dyn CommandRunner, repo: &Path, remote: &str, enabled: bool) -> Self {
        if !enabled {
            debug!("remote status lookups disabled");
            return Self::disabled();
        }

        match detect_remote(runner, repo, remote) {
            RemoteAvailability::Available(slug) => {
                info!(repository = %slug, "remote status lookups enabled");
                Self::with_client(Box::new(GhClient::new(runner, repo)), slug)
            }
            RemoteAvailability::Unavailable(reason) => {
                debug!(%reason, "remote status unavailable");
                Self::unavailable(reason)
            }
        }
    }

    /// Lookups through an explicit client.
    pub fn with_client(client: Box<dyn ReviewClient + 'a>, slug: RepoSlug) -> Self {
        Self {
            target: Some((client, slug)),
            unavailable: None,
        }
    }

    /// No lookups, silently.
    pub fn disabled() -> Self {
        Self {
            target: None,
            unavailable: None,
        }
    }

    /// No lookups, with a reason worth telling the operator once.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            target: None,
            unavailable: Some(reason.into()),
        }
    }

    /// Why lookups are not being made, if that is news to the operator.
    pub fn unavailable_reason(&self) -> Option<&str> {
        self.unavailable.as_deref()
    }

    pub fn is_available(&self) -> bool {
        self.target.is_some()
    }

    /// Pull request status of `branch`. Never fails.
    pub fn status(&self, branch: &str) -> RemoteStatus {
        match &self.target {
            Some((client, slug)) => resolve(client.as_ref(), &slug.owner, &slug.repo, branch),
            None => RemoteStatus::none(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::PrState;
    use crate::test_support::FakeRunner;

    const MERGED_PULLS: &str = r#"[{
        "number": 12,
        "html_url": "https://github.com/acme/widgets/pull/12",
        "state": "closed",
        "draft": false,
        "merged_at": "2026-03-01T10:00:00Z",
        "created_at": "2026-02-27T10:00:00Z",
        "head": {"sha": "abc123"}
    }]"#;

    #[test]
    fn test_disabled_runs_nothing() {
        let runner = FakeRunner::new();
        let lookup = RemoteLookup::detect(&runner, Path::new("/repo"), "origin", false);

        assert!(!lookup.is_available());
        assert_eq!(lookup.unavailable_reason(), None);
        assert_eq!(lookup.status("feature"), RemoteStatus::none());
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn test_unavailable_reports_reason_and_none() {
        let runner = FakeRunner::new().fail("git", &["remote"], "error: No such remote");
        let lookup = RemoteLookup::detect(&runner, Path::new("/repo"), "origin", true);

        assert!(lookup.unavailable_reason().is_some());
        assert_eq!(lookup.status("feature"), RemoteStatus::none());
    }

    #[test]
    fn test_available_resolves_through_gh() {
        let runner = FakeRunner::new()
            .ok("git", &["remote", "get-url"], "git@github.com:acme/widgets.git")
            .ok("gh", &["auth", "status"], "")
            .ok("gh", &["api", "-X", "GET", "repos/acme/widgets/pulls"], MERGED_PULLS)
            .ok(
                "gh",
                &["api", "-X", "GET", "repos/acme/widgets/commits/abc123/check-runs"],
                r#"{"check_runs": []}"#,
            );
        let lookup = RemoteLookup::detect(&runner, Path::new("/repo"), "origin", true);

        assert!(lookup.is_available());
        let status = lookup.status("feature");
        assert_eq!(status.state, PrState::Merged);
        assert_eq!(status.number, Some(12));
    }
}
