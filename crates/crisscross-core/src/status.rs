//! Up-to-date detection against the remote.
//!
//! The structural ahead/behind query is preferred. Matching git's
//! human-readable status text is kept as a compatibility shim for backends
//! that cannot report an upstream, and lives only in this module.

use crisscross_git::{RemoteDivergence, Result, VcsBackend};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Marker git prints on the second line of `git status -uno` when the
/// branch matches its upstream.
pub const DEFAULT_UP_TO_DATE_MARKER: &str = "Your branch is up to date with";

/// How [`is_branch_up_to_date`] decides.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpToDateCheck {
    /// Ahead/behind counts, falling back to status text without an upstream.
    #[default]
    Auto,
    /// Ahead/behind counts only; no upstream means not up to date.
    Structural,
    /// Status text only.
    Text,
}

/// Whether the status text reports the branch as up to date.
///
/// Only line index 1 is inspected; whatever else the text contains is
/// irrelevant.
#[must_use]
pub fn is_up_to_date(status_text: &str, marker: &str) -> bool {
    status_text
        .lines()
        .nth(1)
        .is_some_and(|line| line.contains(marker))
}

/// Decide whether `branch` needs a pull, using the given strategy.
///
/// Expects remote-tracking refs to be fresh (fetch first).
///
/// # Errors
/// Returns error if the backend query fails.
pub fn is_branch_up_to_date<B: VcsBackend>(
    backend: &B,
    branch: &str,
    check: UpToDateCheck,
    marker: &str,
) -> Result<bool> {
    let structural = match check {
        UpToDateCheck::Text => None,
        UpToDateCheck::Auto | UpToDateCheck::Structural => backend.remote_divergence(branch)?,
    };

    match (structural, check) {
        (Some(divergence), _) => {
            debug!(branch, divergence = %describe(divergence), "structural up-to-date check");
            Ok(divergence.is_up_to_date())
        }
        (None, UpToDateCheck::Structural) => {
            debug!(branch, "no upstream; treating as not up to date");
            Ok(false)
        }
        (None, _) => {
            let text = backend.status_short()?;
            Ok(is_up_to_date(&text, marker))
        }
    }
}

/// Short label for a divergence, used in logs and output.
#[must_use]
pub fn describe(divergence: RemoteDivergence) -> String {
    match divergence {
        RemoteDivergence::InSync => "in sync".to_string(),
        RemoteDivergence::Ahead { ahead } => format!("{ahead} ahead"),
        RemoteDivergence::Behind { behind } => format!("{behind} behind"),
        RemoteDivergence::Diverged { ahead, behind } => {
            format!("{ahead} ahead, {behind} behind")
        }
    }
}
