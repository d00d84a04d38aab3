//! Configuration constants and default value functions.

/// Config file name, looked up in the primary worktree.
pub const CONFIG_FILE_NAME: &str = ".arbor.yaml";

/// Placeholder in `worktrees_dir` replaced by the primary worktree's directory name.
pub const REPO_PLACEHOLDER: &str = "{repo}";

// Default value functions for serde
pub(crate) fn default_worktrees_dir() -> String {
    format!("../{}-worktrees", REPO_PLACEHOLDER)
}
pub(crate) fn default_base_branch() -> String {
    "main".to_string()
}
pub(crate) fn default_remote() -> String {
    "origin".to_string()
}
pub(crate) fn default_true() -> bool {
    true
}
