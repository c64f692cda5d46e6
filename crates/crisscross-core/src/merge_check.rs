//! Bring one branch up to date with its remote counterpart.
//!
//! Used by the sync engine before any cross-branch merge happens, so that
//! both sides start from what the remote already has.

use crisscross_git::{Result, VcsBackend};
use tracing::{debug, error, warn};

use crate::status::is_branch_up_to_date;
use crate::sync::SyncOptions;

/// Outcome of one merge-with-remote attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeCheck {
    /// Nothing to pull.
    UpToDate,
    /// Pulled and merged without conflicts.
    MergedCleanly,
    /// The pull left unmerged paths behind.
    ConflictDetected {
        /// Unmerged paths.
        files: Vec<String>,
    },
}

impl MergeCheck {
    /// Whether the attempt ended in conflicts.
    #[must_use]
    pub const fn is_conflict(&self) -> bool {
        matches!(self, Self::ConflictDetected { .. })
    }
}

/// Merge the remote counterpart of the checked-out `branch` into it.
///
/// Fetches, checks whether a pull is needed, pulls if so, then inspects the
/// index for unmerged paths. A conflicted pull is reported as
/// [`MergeCheck::ConflictDetected`] and the repository is left as the pull
/// left it; a pull that failed for any other reason is returned as an error.
///
/// # Errors
/// Returns error if a backend call fails for a reason other than conflicts.
pub fn try_merge_remote<B: VcsBackend>(
    backend: &B,
    branch: &str,
    options: &SyncOptions,
) -> Result<MergeCheck> {
    backend.fetch()?;

    if is_branch_up_to_date(
        backend,
        branch,
        options.up_to_date_check,
        &options.up_to_date_marker,
    )? {
        debug!(branch, "already up to date with remote");
        return Ok(MergeCheck::UpToDate);
    }

    warn!(branch, "pending merge detected");
    let pulled = backend.pull();

    let files = backend.conflicting_files()?;
    if !files.is_empty() {
        error!(branch, ?files, "conflicts detected");
        return Ok(MergeCheck::ConflictDetected { files });
    }

    pulled?;
    Ok(MergeCheck::MergedCleanly)
}
