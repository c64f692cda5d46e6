//! `crisscross sync` command - merge two branches into each other.

use std::thread;

use anyhow::{Context, Result};
use crisscross_core::{BranchName, CancellationToken, MergeCheck, SyncOrchestrator, SyncReport};
use crisscross_git::{Repository, VcsBackend};
use tracing::{debug, info};

use super::utils::open_repo_and_config;
use crate::output;

/// Run the sync command.
pub fn run(target: &str, message: Option<&str>, dry_run: bool) -> Result<()> {
    let target = BranchName::new(target)?;
    let (repo, config) = open_repo_and_config()?;

    if dry_run {
        let current = repo.current_branch().context("Cannot sync from here")?;
        print_plan(&repo, &current, &target, message.is_some());
        return Ok(());
    }

    let cancel = CancellationToken::new();
    watch_ctrl_c(cancel.clone());

    output::info(&format!("Syncing with {target}..."));
    let orchestrator = SyncOrchestrator::new(&repo).with_options(config.sync_options());

    match orchestrator.synchronize(&target, message, &cancel) {
        Ok(report) => {
            print_report(&report);
            Ok(())
        }
        Err(err) => {
            let files = err.conflict_files();
            if !files.is_empty() {
                output::warn("Conflicting files:");
                for file in files {
                    eprintln!("  → {file}");
                }
                output::warn(&format!(
                    "Resolve and commit, then run: crisscross sync {target}"
                ));
            }
            Err(err.into())
        }
    }
}

fn print_plan(repo: &Repository, current: &str, target: &BranchName, with_commit: bool) {
    output::info(&format!("Dry run - would sync {current} with {target}:"));
    let plan = SyncOrchestrator::<Repository>::plan(with_commit);
    for (n, step) in plan.iter().enumerate() {
        output::detail(&format!("  {}. {}", n + 1, step.describe(current, target)));
    }
    if current == target.as_str() {
        output::warn(&format!("{target} is the current branch; sync would refuse"));
    } else if !repo.branch_exists(target) {
        output::warn(&format!("No local branch named {target}"));
    }
}

fn print_report(report: &SyncReport) {
    if report.committed {
        output::success(&format!("Committed changes on {}", report.current));
    }
    for (branch, check) in [
        (&report.current, &report.current_check),
        (&report.target, &report.target_check),
    ] {
        output::detail(&format!("  {branch}: {}", remote_state(check)));
    }
    output::success(&format!(
        "Synced {} and {} (both pushed)",
        report.current, report.target
    ));
}

fn remote_state(check: &MergeCheck) -> &'static str {
    if check.is_conflict() {
        "conflicts"
    } else if *check == MergeCheck::UpToDate {
        "already up to date with remote"
    } else {
        "merged remote changes"
    }
}

/// Cancel `token` on Ctrl-C. The running git call finishes; the sync then
/// stops before its next step.
fn watch_ctrl_c(token: CancellationToken) {
    let spawned = thread::Builder::new()
        .name("ctrl-c".into())
        .spawn(move || {
            let Ok(rt) = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            else {
                return;
            };
            rt.block_on(cancel_on_interrupt(token));
        });

    if let Err(e) = spawned {
        debug!(error = %e, "Ctrl-C watcher not started");
    }
}

/// Wait for SIGINT and cancel `token`. Returns early once the token is
/// cancelled by anyone else.
async fn cancel_on_interrupt(token: CancellationToken) {
    tokio::select! {
        signal = tokio::signal::ctrl_c() => {
            if signal.is_ok() {
                info!(signal = "SIGINT", "interrupt received");
                output::warn("Interrupted - stopping after the current step");
                token.cancel();
            }
        }
        () = token.cancelled() => {}
    }
}
