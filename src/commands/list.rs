//! Implementation of the `arbor list` command.

use crate::cli::ListArgs;
use crate::context::RepoContext;
use crate::error::{ArborError, Result};
use crate::process::CommandRunner;
use crate::remote::{PrState, RemoteLookup};
use crate::status::{WorktreeStatus, collect_statuses};
use std::path::Path;

/// Execute the `arbor list` command.
pub fn cmd_list(runner: &dyn CommandRunner, args: ListArgs, dir: Option<&Path>) -> Result<()> {
    let (ctx, records) = RepoContext::resolve(runner, dir)?;

    let remote = RemoteLookup::detect(
        runner,
        &ctx.primary,
        &ctx.config.remote,
        ctx.config.remote_status && !args.no_remote,
    );
    let statuses = collect_statuses(runner, &ctx, &records, &remote);

    if args.json {
        let json = serde_json::to_string_pretty(&statuses).map_err(|e| {
            ArborError::UserError(format!("failed to serialize worktree list: {}", e))
        })?;
        println!("{}", json);
        return Ok(());
    }

    if let Some(reason) = remote.unavailable_reason() {
        println!("Note: pull request status unavailable: {}", reason);
        println!();
    }
    print!("{}", render_table(&statuses));

    Ok(())
}

fn branch_label(status: &WorktreeStatus) -> String {
    let marker = if status.is_current { "* " } else { "  " };
    let name = status.branch.as_deref().unwrap_or("(detached)");
    format!("{}{}", marker, name)
}

fn pull_request_label(status: &WorktreeStatus) -> String {
    let remote = &status.remote_status;
    match (remote.state, remote.number) {
        (PrState::None, _) => "-".to_string(),
        (state, Some(number)) => format!("#{} {} ({})", number, state, remote.checks),
        (state, None) => state.to_string(),
    }
}

fn notes(status: &WorktreeStatus) -> String {
    let mut notes = Vec::new();
    if status.is_primary {
        notes.push("primary".to_string());
    }
    if let Some(reason) = &status.locked {
        notes.push(if reason.is_empty() {
            "locked".to_string()
        } else {
            format!("locked: {}", reason)
        });
    }
    if status.prunable.is_some() {
        notes.push("prunable".to_string());
    }
    notes.join(", ")
}

/// Render statuses as an aligned plain-text table.
pub fn render_table(statuses: &[WorktreeStatus]) -> String {
    let header = ["BRANCH", "+/-", "CHANGES", "PULL REQUEST", "PATH", ""];
    let rows: Vec<[String; 6]> = statuses
        .iter()
        .map(|status| {
            [
                branch_label(status),
                format!("+{} -{}", status.ahead, status.behind),
                if status.has_uncommitted_changes {
                    "dirty".to_string()
                } else {
                    String::new()
                },
                pull_request_label(status),
                status.path.display().to_string(),
                notes(status),
            ]
        })
        .collect();

    let mut widths = header.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let mut push_row = |cells: Vec<&str>| {
        let line = cells
            .iter()
            .zip(widths.iter())
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .collect::<Vec<_>>()
            .join("  ");
        out.push_str(line.trim_end());
        out.push('\n');
    };

    push_row(header.to_vec());
    for row in &rows {
        push_row(row.iter().map(String::as_str).collect());
    }
    out
}
