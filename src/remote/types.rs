//! Remote (pull request) status types.

use serde::Serialize;
use std::fmt;

/// Lifecycle state of the pull request associated with a branch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PrState {
    Open,
    Draft,
    Merged,
    Closed,
    /// No pull request found, or the lookup failed.
    #[default]
    None,
}

impl PrState {
    /// Merged and closed requests mark their worktree as stale.
    pub fn is_finished(self) -> bool {
        matches!(self, PrState::Merged | PrState::Closed)
    }
}

impl fmt::Display for PrState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrState::Open => write!(f, "open"),
            PrState::Draft => write!(f, "draft"),
            PrState::Merged => write!(f, "merged"),
            PrState::Closed => write!(f, "closed"),
            PrState::None => write!(f, "none"),
        }
    }
}

/// Aggregated check-run status for a pull request's head commit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChecksStatus {
    Success,
    Failure,
    Pending,
    #[default]
    None,
}

impl fmt::Display for ChecksStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChecksStatus::Success => write!(f, "success"),
            ChecksStatus::Failure => write!(f, "failure"),
            ChecksStatus::Pending => write!(f, "pending"),
            ChecksStatus::None => write!(f, "none"),
        }
    }
}

/// Pull request state and checks for one branch.
///
/// `url` and `number` are only set when `state` is not [`PrState::None`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RemoteStatus {
    pub state: PrState,
    pub checks: ChecksStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<u64>,
}

impl RemoteStatus {
    /// The status used when nothing is known about a branch.
    pub fn none() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finished_states() {
        assert!(PrState::Merged.is_finished());
        assert!(PrState::Closed.is_finished());
        assert!(!PrState::Open.is_finished());
        assert!(!PrState::Draft.is_finished());
        assert!(!PrState::None.is_finished());
    }

    #[test]
    fn test_none_status_has_no_link() {
        let status = RemoteStatus::none();
        assert_eq!(status.state, PrState::None);
        assert_eq!(status.checks, ChecksStatus::None);
        assert!(status.url.is_none() && status.number.is_none());
    }

    #[test]
    fn test_serializes_snake_case() {
        let status = RemoteStatus {
            state: PrState::Merged,
            checks: ChecksStatus::Success,
            url: Some("https://github.com/acme/widgets/pull/7".to_string()),
            number: Some(7),
        };
        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(json["state"], "merged");
        assert_eq!(json["checks"], "success");
        assert_eq!(json["number"], 7);

        let json = serde_json::to_value(RemoteStatus::none()).unwrap();
        assert!(json.get("url").is_none());
    }
}
