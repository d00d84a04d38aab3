//! CLI argument parsing for arbor.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module defines the command structure; actual implementations
//! are in the `commands` module.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// Arbor: inventory and clean up the git worktrees of a repository.
///
/// Reconciles three sources of truth:
/// - git's worktree registry
/// - the directories on disk under the worktrees root
/// - pull request state on GitHub (through the `gh` CLI)
#[derive(Parser, Debug)]
#[command(name = "arbor")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Run as if arbor was started in this directory.
    #[arg(short = 'C', global = true, value_name = "DIR")]
    pub directory: Option<PathBuf>,

    /// Increase diagnostic output on stderr (-v, -vv, -vvv).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands for arbor.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List worktrees with their local and pull request status.
    ///
    /// Shows branch, ahead/behind counts against the base branch,
    /// uncommitted changes, and pull request state and checks.
    #[command(alias = "ls")]
    List(ListArgs),

    /// Find and remove stale, abandoned, and orphaned worktrees.
    ///
    /// Stale worktrees have a merged or closed pull request. Abandoned
    /// directories have no git metadata; orphans point at metadata that no
    /// longer exists. Without --force or --select, only reports.
    Clean(CleanArgs),

    /// Remove a single worktree and its branch.
    ///
    /// Refuses worktrees with uncommitted changes or unpushed commits
    /// unless --force is given.
    #[command(alias = "rm")]
    Remove(RemoveArgs),
}

/// Arguments for the `list` command.
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Print JSON instead of a table.
    #[arg(long)]
    pub json: bool,

    /// Skip pull request lookups.
    #[arg(long)]
    pub no_remote: bool,
}

/// Arguments for the `clean` command.
#[derive(Parser, Debug)]
pub struct CleanArgs {
    /// Remove everything offered.
    #[arg(long)]
    pub force: bool,

    /// Remove only the named items (directory or branch name). Repeatable.
    #[arg(long, value_name = "NAME")]
    pub select: Vec<String>,

    /// Skip pull request lookups (only abandoned and orphaned directories are found).
    #[arg(long)]
    pub no_remote: bool,
}

/// Arguments for the `remove` command.
#[derive(Parser, Debug)]
pub struct RemoveArgs {
    /// Branch or directory name of the worktree.
    pub name: String,

    /// Remove even with uncommitted changes or unpushed commits.
    #[arg(long)]
    pub force: bool,

    /// Keep the branch after removing the worktree.
    #[arg(long)]
    pub keep_branch: bool,
}

impl Cli {
    /// Parse command line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
