//! Data types for cleanup classification and execution.

use crate::remote::PrState;
use std::fmt;
use std::path::{Path, PathBuf};

/// Something `clean` can remove.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CleanableItem {
    /// A registered worktree whose pull request was merged or closed.
    StaleWorktree {
        path: PathBuf,
        branch: String,
        remote_state: PrState,
        /// True when local changes were found, or could not be ruled out.
        has_uncommitted_changes: bool,
        /// git holds a lock on the worktree.
        locked: bool,
    },
    /// A directory under the worktrees root with no git linkage.
    Abandoned {
        path: PathBuf,
        file_count: usize,
        folder_count: usize,
    },
    /// A directory whose linkage points at metadata that no longer exists.
    Orphan { path: PathBuf, broken_target: PathBuf },
}

impl CleanableItem {
    pub fn path(&self) -> &Path {
        match self {
            CleanableItem::StaleWorktree { path, .. }
            | CleanableItem::Abandoned { path, .. }
            | CleanableItem::Orphan { path, .. } => path,
        }
    }

    /// Directory name of the item.
    pub fn name(&self) -> String {
        let path = self.path();
        path.file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string())
    }

    pub fn branch(&self) -> Option<&str> {
        match self {
            CleanableItem::StaleWorktree { branch, .. } => Some(branch),
            _ => None,
        }
    }

    /// Whether a selector given on the command line picks this item.
    ///
    /// Matches the directory name, or the branch of a stale worktree.
    pub fn matches(&self, selector: &str) -> bool {
        self.name() == selector || self.branch() == Some(selector)
    }

    /// Why the item is held back from removal, if it is.
    pub fn hold_reason(&self) -> Option<&'static str> {
        match self {
            CleanableItem::StaleWorktree { locked: true, .. } => Some("locked"),
            CleanableItem::StaleWorktree {
                has_uncommitted_changes: true,
                ..
            } => Some("uncommitted changes"),
            _ => None,
        }
    }

    /// Short label of the item's kind.
    pub fn kind(&self) -> &'static str {
        match self {
            CleanableItem::StaleWorktree { .. } => "stale",
            CleanableItem::Abandoned { .. } => "abandoned",
            CleanableItem::Orphan { .. } => "orphan",
        }
    }
}

impl fmt::Display for CleanableItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CleanableItem::StaleWorktree {
                branch,
                remote_state,
                has_uncommitted_changes,
                locked,
                ..
            } => {
                write!(f, "{} [{}] (pull request {})", self.name(), branch, remote_state)?;
                if *has_uncommitted_changes {
                    write!(f, ", uncommitted changes")?;
                }
                if *locked {
                    write!(f, ", locked")?;
                }
                Ok(())
            }
            CleanableItem::Abandoned {
                file_count,
                folder_count,
                ..
            } => write!(
                f,
                "{} (no git metadata, {} file(s), {} folder(s))",
                self.name(),
                file_count,
                folder_count
            ),
            CleanableItem::Orphan { broken_target, .. } => write!(
                f,
                "{} (missing git metadata at {})",
                self.name(),
                broken_target.display()
            ),
        }
    }
}

/// Classifier output: what may be offered, and what was held back.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanupSet {
    pub to_offer: Vec<CleanableItem>,
    /// Stale worktrees held back because of local changes or a lock.
    pub skipped: Vec<CleanableItem>,
}

impl CleanupSet {
    pub fn is_empty(&self) -> bool {
        self.to_offer.is_empty() && self.skipped.is_empty()
    }
}

/// Result of deleting a stale worktree's branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchDeletion {
    pub branch: String,
    pub deleted: bool,
    pub error: Option<String>,
}

/// Result of one removal attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemOutcome {
    pub item: CleanableItem,
    pub removed: bool,
    pub error: Option<String>,
    /// Only present for stale worktrees that were removed.
    pub branch_deletion: Option<BranchDeletion>,
}

impl ItemOutcome {
    pub(crate) fn removed(item: CleanableItem) -> Self {
        Self {
            item,
            removed: true,
            error: None,
            branch_deletion: None,
        }
    }

    pub(crate) fn failed(item: CleanableItem, error: impl fmt::Display) -> Self {
        Self {
            item,
            removed: false,
            error: Some(error.to_string()),
            branch_deletion: None,
        }
    }
}

/// Everything `execute_cleanup` did, in selection order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanupReport {
    pub outcomes: Vec<ItemOutcome>,
    /// Items the classifier held back; reported alongside the outcomes.
    pub skipped_for_safety: Vec<CleanableItem>,
}

impl CleanupReport {
    pub fn removed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.removed).count()
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.removed).count()
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped_for_safety.len()
    }

    pub fn has_failures(&self) -> bool {
        self.failed_count() > 0
    }
}
