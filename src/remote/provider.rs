//! Provider detection: is there a supported review service to ask at all?
//!
//! Checked once per invocation. When it fails, no lookups are made and every
//! branch reports [`RemoteStatus::none`](super::RemoteStatus::none).

use crate::git::remote_url;
use crate::process::CommandRunner;
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;
use tracing::debug;

static GITHUB_REMOTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:https?://(?:[^@/]+@)?github\.com/|ssh://git@github\.com(?::\d+)?/|git@github\.com:)([^/\s]+)/([^/\s]+?)(?:\.git)?/?$",
    )
    .expect("github remote pattern is valid")
});

/// `owner/repo` on the hosting service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoSlug {
    pub owner: String,
    pub repo: String,
}

impl std::fmt::Display for RepoSlug {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

/// Outcome of the provider precondition check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteAvailability {
    Available(RepoSlug),
    /// Lookups are skipped; the reason is shown to the operator once.
    Unavailable(String),
}

/// Parse a GitHub remote URL (https, ssh, or scp-like) into `owner/repo`.
pub fn parse_github_remote(url: &str) -> Option<RepoSlug> {
    let captures = GITHUB_REMOTE.captures(url.trim())?;
    Some(RepoSlug {
        owner: captures[1].to_string(),
        repo: captures[2].to_string(),
    })
}

/// Whether `gh` is installed and authenticated.
pub fn gh_authenticated(runner: &dyn CommandRunner, cwd: &Path) -> bool {
    match runner.run("gh", cwd, &["auth", "status"]) {
        Ok(_) => true,
        Err(e) => {
            debug!(error = %e, "gh auth status failed");
            false
        }
    }
}

/// Decide whether pull request lookups can be made for this repository.
pub fn detect_remote(runner: &dyn CommandRunner, repo: &Path, remote: &str) -> RemoteAvailability {
    let Some(url) = remote_url(runner, repo, remote) else {
        return RemoteAvailability::Unavailable(format!("remote '{}' is not configured", remote));
    };

    let Some(slug) = parse_github_remote(&url) else {
        return RemoteAvailability::Unavailable(format!(
            "remote '{}' ({}) is not a GitHub repository",
            remote, url
        ));
    };

    if !gh_authenticated(runner, repo) {
        return RemoteAvailability::Unavailable(
            "GitHub CLI (gh) is not installed or not authenticated".to_string(),
        );
    }

    RemoteAvailability::Available(slug)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::FakeRunner;

    fn slug(owner: &str, repo: &str) -> Option<RepoSlug> {
        Some(RepoSlug {
            owner: owner.to_string(),
            repo: repo.to_string(),
        })
    }

    #[test]
    fn test_parse_github_remote_forms() {
        assert_eq!(
            parse_github_remote("https://github.com/acme/widgets.git"),
            slug("acme", "widgets")
        );
        assert_eq!(
            parse_github_remote("https://github.com/acme/widgets"),
            slug("acme", "widgets")
        );
        assert_eq!(
            parse_github_remote("git@github.com:acme/widgets.git"),
            slug("acme", "widgets")
        );
        assert_eq!(
            parse_github_remote("ssh://git@github.com/acme/widgets.git"),
            slug("acme", "widgets")
        );
        assert_eq!(
            parse_github_remote("https://token@github.com/acme/my.repo.git"),
            slug("acme", "my.repo")
        );
    }

    #[test]
    fn test_parse_rejects_other_hosts() {
        assert_eq!(parse_github_remote("https://gitlab.com/acme/widgets.git"), None);
        assert_eq!(parse_github_remote("/srv/git/widgets.git"), None);
        assert_eq!(parse_github_remote("https://github.com/acme"), None);
    }

    #[test]
    fn test_detect_remote_available() {
        let runner = FakeRunner::new()
            .ok("git", &["remote", "get-url", "origin"], "git@github.com:acme/widgets.git")
            .ok("gh", &["auth", "status"], "Logged in to github.com");
        assert_eq!(
            detect_remote(&runner, Path::new("/repo"), "origin"),
            RemoteAvailability::Available(RepoSlug {
                owner: "acme".to_string(),
                repo: "widgets".to_string()
            })
        );
    }

    #[test]
    fn test_detect_remote_unauthenticated() {
        let runner = FakeRunner::new()
            .ok("git", &["remote", "get-url", "origin"], "https://github.com/acme/widgets")
            .fail("gh", &["auth", "status"], "You are not logged into any GitHub hosts");
        assert!(matches!(
            detect_remote(&runner, Path::new("/repo"), "origin"),
            RemoteAvailability::Unavailable(reason) if reason.contains("not authenticated")
        ));
    }

    #[test]
    fn test_detect_remote_unsupported_host_skips_gh() {
        let runner = FakeRunner::new().ok(
            "git",
            &["remote", "get-url", "origin"],
            "https://gitlab.com/acme/widgets.git",
        );
        assert!(matches!(
            detect_remote(&runner, Path::new("/repo"), "origin"),
            RemoteAvailability::Unavailable(_)
        ));
        assert!(runner.calls().iter().all(|call| !call.starts_with("gh")));
    }

    #[test]
    fn test_detect_remote_missing_remote() {
        let runner = FakeRunner::new().fail("git", &["remote"], "error: No such remote 'origin'");
        assert!(matches!(
            detect_remote(&runner, Path::new("/repo"), "origin"),
            RemoteAvailability::Unavailable(reason) if reason.contains("not configured")
        ));
    }
}
