//! Criss-cross synchronization of two long-lived branches.
//!
//! `crisscross sync <target>` brings the current branch and `target` up to
//! date with the remote, merges each into the other with `--no-ff`, and
//! pushes both. Afterwards each branch contains the other's history with a
//! visible merge point on both sides.
//!
//! The run is strictly sequential. Every step mutates the shared working
//! directory, so a failure stops the run where it is: conflicts are left in
//! place for manual resolution and nothing is rolled back.

use std::fmt;

use crisscross_git::{CommitOutcome, VcsBackend};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::branch_name::BranchName;
use crate::cancel::CancellationToken;
use crate::error::SyncError;
use crate::merge_check::{MergeCheck, try_merge_remote};
use crate::status::{DEFAULT_UP_TO_DATE_MARKER, UpToDateCheck};

/// Tunables for the remote checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncOptions {
    /// How "already up to date" is decided.
    #[serde(default)]
    pub up_to_date_check: UpToDateCheck,

    /// Status-text marker for the text fallback.
    #[serde(default = "default_marker")]
    pub up_to_date_marker: String,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            up_to_date_check: UpToDateCheck::default(),
            up_to_date_marker: default_marker(),
        }
    }
}

fn default_marker() -> String {
    DEFAULT_UP_TO_DATE_MARKER.into()
}

/// One step of the sync protocol, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStep {
    /// Stage everything and commit on the current branch.
    Commit,
    /// Merge the remote into the current branch.
    CheckCurrent,
    /// Switch to the target branch.
    CheckoutTarget,
    /// Merge the remote into the target branch.
    CheckTarget,
    /// Merge the current branch into the target.
    MergeIntoTarget,
    /// Push the target branch.
    PushTarget,
    /// Switch back to the current branch.
    CheckoutCurrent,
    /// Merge the target branch into the current one.
    MergeIntoCurrent,
    /// Push the current branch.
    PushCurrent,
}

impl SyncStep {
    const AFTER_COMMIT: [Self; 8] = [
        Self::CheckCurrent,
        Self::CheckoutTarget,
        Self::CheckTarget,
        Self::MergeIntoTarget,
        Self::PushTarget,
        Self::CheckoutCurrent,
        Self::MergeIntoCurrent,
        Self::PushCurrent,
    ];

    /// Human description with concrete branch names.
    #[must_use]
    pub fn describe(self, current: &str, target: &str) -> String {
        match self {
            Self::Commit => format!("stage all changes and commit on {current}"),
            Self::CheckCurrent => format!("merge remote changes into {current}"),
            Self::CheckoutTarget => format!("checkout {target}"),
            Self::CheckTarget => format!("merge remote changes into {target}"),
            Self::MergeIntoTarget => format!("merge {current} into {target} (--no-ff)"),
            Self::PushTarget => format!("push {target}"),
            Self::CheckoutCurrent => format!("checkout {current}"),
            Self::MergeIntoCurrent => format!("merge {target} into {current} (--no-ff)"),
            Self::PushCurrent => format!("push {current}"),
        }
    }
}

impl fmt::Display for SyncStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe("current branch", "target branch"))
    }
}

/// What a completed sync did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    /// Branch checked out when the sync started (and again at the end).
    pub current: String,
    /// Branch synced with.
    pub target: String,
    /// Whether a commit was created before syncing.
    pub committed: bool,
    /// Remote check of the current branch.
    pub current_check: MergeCheck,
    /// Remote check of the target branch.
    pub target_check: MergeCheck,
}

/// Which branch a conflict belongs to.
#[derive(Debug, Clone, Copy)]
enum Side {
    Current,
    Target,
}

impl Side {
    fn conflict(self, branch: &str, files: Vec<String>) -> SyncError {
        let branch = branch.to_string();
        match self {
            Self::Current => SyncError::ConflictOnCurrentBranch { branch, files },
            Self::Target => SyncError::ConflictOnTargetBranch { branch, files },
        }
    }
}

/// Runs the sync protocol against a backend.
pub struct SyncOrchestrator<'a, B: VcsBackend> {
    backend: &'a B,
    options: SyncOptions,
}

impl<'a, B: VcsBackend> SyncOrchestrator<'a, B> {
    /// Create an orchestrator with default options.
    #[must_use]
    pub fn new(backend: &'a B) -> Self {
        Self {
            backend,
            options: SyncOptions::default(),
        }
    }

    /// Replace the options.
    #[must_use]
    pub fn with_options(mut self, options: SyncOptions) -> Self {
        self.options = options;
        self
    }

    /// Steps a sync would run, without touching the repository.
    #[must_use]
    pub fn plan(with_commit: bool) -> Vec<SyncStep> {
        let commit = with_commit.then_some(SyncStep::Commit);
        commit.into_iter().chain(SyncStep::AFTER_COMMIT).collect()
    }

    /// Synchronize the current branch with `target`.
    ///
    /// With `commit_message`, working-tree changes are committed first;
    /// an empty index is not an error. `cancel` is checked before every
    /// step after the current branch has been resolved.
    ///
    /// # Errors
    /// - [`SyncError::ConflictOnCurrentBranch`] / [`SyncError::ConflictOnTargetBranch`]
    ///   when a pull or merge leaves unmerged paths (repository left as is)
    /// - [`SyncError::SameBranch`] when `target` is already checked out
    /// - [`SyncError::Cancelled`] when `cancel` fired between steps
    /// - [`SyncError::Backend`] for any other failed git call, pushes included
    pub fn synchronize(
        &self,
        target: &BranchName,
        commit_message: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<SyncReport, SyncError> {
        let current = self.backend.current_branch()?;
        let target = target.as_str();
        if current == target {
            return Err(SyncError::SameBranch(current));
        }
        info!(current, target, "starting sync");

        let committed = match commit_message {
            Some(message) => {
                begin(SyncStep::Commit, cancel)?;
                self.backend.stage_all()?;
                match self.backend.commit(message)? {
                    CommitOutcome::Created => true,
                    CommitOutcome::NothingToCommit => {
                        info!(branch = current, "nothing to commit");
                        false
                    }
                }
            }
            None => false,
        };

        begin(SyncStep::CheckCurrent, cancel)?;
        let current_check = self.check_remote(&current, Side::Current)?;

        begin(SyncStep::CheckoutTarget, cancel)?;
        self.backend.checkout(target)?;

        begin(SyncStep::CheckTarget, cancel)?;
        let target_check = self.check_remote(target, Side::Target)?;

        begin(SyncStep::MergeIntoTarget, cancel)?;
        self.merge_into(&current, target, Side::Target)?;

        begin(SyncStep::PushTarget, cancel)?;
        self.backend.push(Some(target))?;

        begin(SyncStep::CheckoutCurrent, cancel)?;
        self.backend.checkout(&current)?;

        begin(SyncStep::MergeIntoCurrent, cancel)?;
        self.merge_into(target, &current, Side::Current)?;

        begin(SyncStep::PushCurrent, cancel)?;
        self.backend.push(Some(&current))?;

        info!(current, target, "sync complete");
        Ok(SyncReport {
            current,
            target: target.to_string(),
            committed,
            current_check,
            target_check,
        })
    }

    fn check_remote(&self, branch: &str, side: Side) -> Result<MergeCheck, SyncError> {
        match try_merge_remote(self.backend, branch, &self.options)? {
            MergeCheck::ConflictDetected { files } => Err(side.conflict(branch, files)),
            check => Ok(check),
        }
    }

    /// Non-fast-forward merge of `from` into the checked-out `into`.
    fn merge_into(&self, from: &str, into: &str, side: Side) -> Result<(), SyncError> {
        let Err(err) = self.backend.merge(from, true) else {
            return Ok(());
        };

        let files = self.backend.conflicting_files()?;
        if files.is_empty() {
            return Err(err.into());
        }
        error!(from, into, ?files, "conflicts detected");
        Err(side.conflict(into, files))
    }
}

/// Gate before a step: stop if cancelled, otherwise log it.
fn begin(step: SyncStep, cancel: &CancellationToken) -> Result<(), SyncError> {
    if cancel.is_cancelled() {
        warn!(%step, "sync cancelled");
        return Err(SyncError::Cancelled { step });
    }
    info!(%step, "sync step");
    Ok(())
}
