//! Implementation of the `arbor clean` command.
//!
//! Finds cleanup candidates and removes a selection of them:
//! - Stale worktrees (pull request merged or closed)
//! - Abandoned directories under the worktrees root (no git metadata)
//! - Orphaned worktrees (linkage points at metadata that no longer exists)
//!
//! # Safety
//!
//! - Default behavior is dry-run (prints what would be removed)
//! - Requires `--force` (everything offered) or `--select` (named items) to delete
//! - Stale worktrees with uncommitted changes are reported, never removed
//! - Untracked directories are only deleted under the worktrees root
//!
//! Exits with the partial-failure code when any selected item could not be removed.

mod display;
mod selection;


use crate::cleanup::{LiveInspector, build_cleanup_set, execute_cleanup};
use crate::cli::CleanArgs;
use crate::context::RepoContext;
use crate::error::{ArborError, Result};
use crate::process::CommandRunner;
use crate::remote::RemoteLookup;
use crate::worktree::scan_worktrees_root;
use std::path::Path;
use tracing::info;

use display::{format_cleanup_set, format_report};
use selection::select_items;

/// Execute the `arbor clean` command.
///
/// # Behavior
///
/// - Without `--force` or `--select`: dry-run mode, prints what would be removed
/// - `--select NAME`: removes only the named candidates
/// - `--force`: removes every candidate offered
pub fn cmd_clean(runner: &dyn CommandRunner, args: CleanArgs, dir: Option<&Path>) -> Result<()> {
    let (ctx, records) = RepoContext::resolve(runner, dir)?;
    let ignore = ctx.config.ignore_set()?;

    let scan = scan_worktrees_root(&ctx.worktrees_root, &ignore);
    let remote = RemoteLookup::detect(
        runner,
        &ctx.primary,
        &ctx.config.remote,
        ctx.config.remote_status && !args.no_remote,
    );
    let inspector = LiveInspector::new(runner, &remote);
    let set = build_cleanup_set(&records, &scan, &inspector, &ctx.current_worktree);

    if let Some(reason) = remote.unavailable_reason() {
        println!("Note: pull request status unavailable ({}).", reason);
        println!("Stale worktrees cannot be detected; only directories are checked.");
        println!();
    }

    if set.is_empty() {
        println!("No cleanup candidates found.");
        return Ok(());
    }

    print!("{}", format_cleanup_set(&set, &ctx.worktrees_root));

    if !args.force && args.select.is_empty() {
        println!("Dry-run mode: no changes made.");
        if !set.to_offer.is_empty() {
            println!("Run with --force to remove everything listed, or --select NAME to pick items.");
        }
        return Ok(());
    }

    let selected = select_items(&set, &args.select)?;
    if selected.is_empty() {
        println!("Nothing to remove.");
        return Ok(());
    }

    info!(count = selected.len(), "removing cleanup candidates");
    let mut report = execute_cleanup(runner, &ctx, selected);
    report.skipped_for_safety = set.skipped;

    print!("{}", format_report(&report, &ctx.worktrees_root));

    if report.has_failures() {
        return Err(ArborError::RemovalFailed(format!(
            "{} of {} selected item(s) could not be removed",
            report.failed_count(),
            report.outcomes.len()
        )));
    }

    Ok(())
}
