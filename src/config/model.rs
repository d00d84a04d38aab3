//! Config struct definition and default implementation.

use super::types::*;
use serde::{Deserialize, Serialize};

/// Configuration for arbor.
///
/// This struct represents the contents of `.arbor.yaml` in the primary
/// worktree. Every field is optional; unknown fields in the YAML are ignored
/// for forward compatibility.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding secondary worktrees, relative to the primary
    /// worktree unless absolute. `{repo}` expands to the primary worktree's
    /// directory name (default: `../{repo}-worktrees`).
    #[serde(default = "default_worktrees_dir")]
    pub worktrees_dir: String,

    /// Baseline branch for ahead/behind counts (default: "main").
    #[serde(default = "default_base_branch")]
    pub base_branch: String,

    /// Remote used to locate the repository on the review service (default: "origin").
    #[serde(default = "default_remote")]
    pub remote: String,

    /// Whether to query pull request status at all.
    #[serde(default = "default_true")]
    pub remote_status: bool,

    /// Glob patterns of directory names under the worktrees root that are
    /// never reported as abandoned or orphaned.
    #[serde(default)]
    pub scan_ignore: Vec<String>,

    /// Whether `clean` deletes the branch of each stale worktree it removes.
    #[serde(default = "default_true")]
    pub delete_branches: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            worktrees_dir: default_worktrees_dir(),
            base_branch: default_base_branch(),
            remote: default_remote(),
            remote_status: default_true(),
            scan_ignore: Vec::new(),
            delete_branches: default_true(),
        }
    }
}
