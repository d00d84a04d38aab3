//! Remote status: pull request state and checks per branch.
//!
//! Remote information is best-effort. Nothing in this module returns an
//! error to its caller; authentication, transport, and parse failures all
//! degrade to [`RemoteStatus::none`].

mod github;
mod lookup;
mod provider;
mod types;

pub use github::{
    CheckRun, GhClient, PullRequest, PullRequestHead, ReviewClient, aggregate_checks,
    classify_pull_request, resolve,
};
pub use lookup::RemoteLookup;
pub use provider::{RemoteAvailability, RepoSlug, detect_remote, gh_authenticated, parse_github_remote};
pub use types::{ChecksStatus, PrState, RemoteStatus};
