//! Config loading, validation, and path resolution.

use super::model::Config;
use super::types::{CONFIG_FILE_NAME, REPO_PLACEHOLDER};
use crate::error::{ArborError, Result};
use crate::fs::{is_path_under, normalize_lexically};
use crate::worktree::build_ignore_set;
use globset::GlobSet;
use std::path::{Path, PathBuf};
use tracing::debug;

impl Config {
    /// Load config from a YAML file.
    ///
    /// # Returns
    ///
    /// * `Ok(Config)` - Successfully loaded and validated config
    /// * `Err(ArborError::UserError)` - Read error, parse error, or validation failure
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            ArborError::UserError(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content)
    }

    /// Load `.arbor.yaml` from the primary worktree, or defaults if absent.
    ///
    /// A file that exists but does not parse is still an error.
    pub fn load_for_primary(primary: &Path) -> Result<Self> {
        let path = primary.join(CONFIG_FILE_NAME);
        if path.is_file() {
            debug!(path = %path.display(), "loading config");
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse config from a YAML string.
    ///
    /// Unknown fields in the YAML are silently ignored for forward compatibility.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        // An empty document deserializes as unit, not as an empty mapping.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config = serde_yaml::from_str(yaml)
            .map_err(|e| ArborError::UserError(format!("failed to parse config YAML: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Serialize config to YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| {
            ArborError::UserError(format!("failed to serialize config to YAML: {}", e))
        })
    }

    /// Validate config values and return error on invalid values.
    ///
    /// Validation rules:
    /// - `worktrees_dir`, `base_branch`, and `remote` must be non-empty
    /// - `scan_ignore` entries must be valid globs
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("worktrees_dir", &self.worktrees_dir),
            ("base_branch", &self.base_branch),
            ("remote", &self.remote),
        ] {
            if value.trim().is_empty() {
                return Err(ArborError::UserError(format!(
                    "config validation failed: {} must not be empty",
                    field
                )));
            }
        }

        self.ignore_set().map_err(|e| {
            ArborError::UserError(format!("config validation failed: {}", e))
        })?;

        Ok(())
    }

    /// Compiled `scan_ignore` patterns.
    pub fn ignore_set(&self) -> Result<GlobSet> {
        build_ignore_set(&self.scan_ignore)
    }

    /// Absolute worktrees root for the given primary worktree.
    pub fn worktrees_root(&self, primary: &Path) -> PathBuf {
        let repo_name = primary
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let expanded = self.worktrees_dir.replace(REPO_PLACEHOLDER, &repo_name);
        let dir = PathBuf::from(expanded);

        if dir.is_absolute() {
            normalize_lexically(&dir)
        } else {
            normalize_lexically(&primary.join(dir))
        }
    }

    /// Worktrees root for `primary`, refused when it is the primary worktree
    /// or a directory containing it.
    ///
    /// Every directory under the root without git metadata is a removal
    /// candidate, so such a root would offer the primary's own contents.
    pub fn checked_worktrees_root(&self, primary: &Path) -> Result<PathBuf> {
        let root = self.worktrees_root(primary);
        if is_path_under(primary, &root) {
            return Err(ArborError::UserError(format!(
                "config validation failed: worktrees_dir '{}' resolves to {}, \
                 which holds the primary worktree {}",
                self.worktrees_dir,
                root.display(),
                primary.display()
            )));
        }
        Ok(root)
    }
}
