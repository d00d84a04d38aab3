//! Display and formatting utilities for clean command output.

use crate::cleanup::{CleanableItem, CleanupReport, CleanupSet};
use std::path::Path;

/// Make a path relative to `root` for display.
pub fn make_relative(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .map(|p| p.display().to_string())
        .unwrap_or_else(|_| path.display().to_string())
}

fn item_line(item: &CleanableItem, worktrees_root: &Path) -> String {
    let mut line = format!("  - {}", item);
    if !item.path().starts_with(worktrees_root) {
        line.push_str(&format!("\n      at {}", item.path().display()));
    }
    line
}

/// Render the candidates found by the classifier.
pub fn format_cleanup_set(set: &CleanupSet, worktrees_root: &Path) -> String {
    let mut out = String::new();

    let sections = [
        ("stale", "Stale worktrees (pull request merged or closed)"),
        ("abandoned", "Abandoned directories (no git metadata)"),
        ("orphan", "Orphaned worktrees (git metadata missing)"),
    ];

    for (kind, title) in sections {
        let items: Vec<&CleanableItem> =
            set.to_offer.iter().filter(|i| i.kind() == kind).collect();
        if items.is_empty() {
            continue;
        }
        out.push_str(&format!("{} ({}):\n", title, items.len()));
        for item in items {
            out.push_str(&item_line(item, worktrees_root));
            out.push('\n');
        }
        out.push('\n');
    }

    if !set.skipped.is_empty() {
        out.push_str(&format!(
            "Skipped for safety ({}):\n",
            set.skipped.len()
        ));
        for item in &set.skipped {
            out.push_str(&item_line(item, worktrees_root));
            out.push('\n');
        }
        out.push('\n');
    }

    out
}

/// Render per-item results and the summary counts.
pub fn format_report(report: &CleanupReport, worktrees_root: &Path) -> String {
    let mut out = String::new();

    for outcome in &report.outcomes {
        let name = make_relative(outcome.item.path(), worktrees_root);
        match &outcome.error {
            None => out.push_str(&format!("Removed: {}\n", name)),
            Some(error) => out.push_str(&format!("Failed:  {}: {}\n", name, error)),
        }
        if let Some(deletion) = &outcome.branch_deletion {
            match &deletion.error {
                None => out.push_str(&format!("  deleted branch {}\n", deletion.branch)),
                Some(error) => out.push_str(&format!(
                    "  kept branch {}: {}\n",
                    deletion.branch, error
                )),
            }
        }
    }

    out.push('\n');
    out.push_str("Cleanup complete:\n");
    out.push_str(&format!(
        "  Skipped for safety: {}\n",
        report.skipped_count()
    ));
    out.push_str(&format!("  Removed: {}\n", report.removed_count()));
    out.push_str(&format!("  Failed: {}\n", report.failed_count()));
    out
}
