//! Implementation of the `arbor remove` command.

use crate::cli::RemoveArgs;
use crate::context::RepoContext;
use crate::error::{ArborError, Result};
use crate::process::CommandRunner;
use crate::worktree::{
    ChangeState, RemovalMethod, change_state, delete_branch, find_worktree,
    remove_worktree_with_fallback, unlock_worktree, unpushed_commits,
};
use std::path::Path;

/// Execute the `arbor remove` command.
///
/// # Behavior
///
/// - Refuses the primary worktree and the worktree the command runs in
/// - Without `--force`, refuses locked worktrees, worktrees with local changes
///   (or whose state cannot be read), and branches with unpushed commits or
///   no upstream; with `--force` a lock is released first
/// - Deletes the branch afterwards unless `--keep-branch`
pub fn cmd_remove(runner: &dyn CommandRunner, args: RemoveArgs, dir: Option<&Path>) -> Result<()> {
    let (ctx, records) = RepoContext::resolve(runner, dir)?;

    let record = find_worktree(&records, &args.name).ok_or_else(|| {
        ArborError::UserError(format!(
            "no worktree named '{}'.\n\nRun `arbor list` to see worktrees.",
            args.name
        ))
    })?;

    if record.is_primary {
        return Err(ArborError::UserError(format!(
            "refusing to remove the primary worktree: {}",
            record.path.display()
        )));
    }

    if ctx.is_inside(&record.path) {
        return Err(ArborError::UserError(format!(
            "refusing to remove the worktree you are in: {}\n\n\
             Change to another directory first.",
            record.path.display()
        )));
    }

    if let Some(reason) = &record.locked {
        if !args.force {
            let reason = if reason.is_empty() {
                String::new()
            } else {
                format!(" ({})", reason)
            };
            return Err(ArborError::UserError(format!(
                "worktree is locked{}: {}\n\n\
                 To unlock and remove it anyway:\n  arbor remove {} --force",
                reason,
                record.path.display(),
                args.name
            )));
        }
        unlock_worktree(runner, &ctx.primary, &record.path)?;
    }

    if !args.force {
        // A directory that is already gone has nothing left to lose.
        if record.path.exists() {
            match change_state(runner, &record.path) {
                ChangeState::Clean => {}
                ChangeState::Dirty => {
                    return Err(ArborError::UserError(format!(
                        "worktree has uncommitted changes: {}\n\n\
                         Review with:\n  git -C {} status\n\n\
                         To discard the changes and remove it anyway:\n  arbor remove {} --force",
                        record.path.display(),
                        record.path.display(),
                        args.name
                    )));
                }
                ChangeState::Unknown => {
                    return Err(ArborError::UserError(format!(
                        "could not determine whether {} has uncommitted changes.\n\n\
                         To remove it anyway:\n  arbor remove {} --force",
                        record.path.display(),
                        args.name
                    )));
                }
            }
        }

        if let Some(branch) = &record.branch {
            let unpushed = unpushed_commits(runner, &ctx.primary, branch);
            if unpushed.is_hazard() {
                let problem = if unpushed.no_remote {
                    "has no upstream branch"
                } else if unpushed.unknown {
                    "could not be compared with its upstream"
                } else {
                    "has commits that are not pushed to its upstream"
                };
                return Err(ArborError::UserError(format!(
                    "branch '{}' {}; removing it could lose work.\n\n\
                     To remove it anyway:\n  arbor remove {} --force",
                    branch, problem, args.name
                )));
            }
        }
    }

    let method = remove_worktree_with_fallback(runner, &ctx.primary, &record.path)?;
    match method {
        RemovalMethod::Git => println!("Removed worktree: {}", record.path.display()),
        RemovalMethod::Fallback => println!(
            "Removed worktree: {} (deleted directory and pruned git's registry)",
            record.path.display()
        ),
    }

    if args.keep_branch {
        return Ok(());
    }

    if let Some(branch) = &record.branch {
        match delete_branch(runner, &ctx.primary, branch, args.force) {
            Ok(()) => println!("Deleted branch: {}", branch),
            Err(e) => eprintln!("Warning: kept branch '{}': {}", branch, e),
        }
    }

    Ok(())
}
