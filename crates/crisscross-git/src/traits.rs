//! Trait abstraction for the version-control backend.
//!
//! This module defines the `VcsBackend` trait which abstracts the git
//! operations the sync and stats engines need, enabling dependency
//! injection and testability.

use crate::{CommitOutcome, RemoteDivergence, Result};

/// Trait for version-control backend operations.
///
/// This trait abstracts git operations, allowing for:
/// - Dependency injection in the sync orchestrator and stats aggregator
/// - Recording mock implementations for testing
/// - Alternative implementations (e.g., a dry-run backend)
///
/// Every call is a blocking, opaque unit: callers sequence them and never
/// issue two at once against the same working directory.
#[allow(clippy::missing_errors_doc)]
pub trait VcsBackend {
    // === Repository Info ===

    /// Get the current branch name.
    ///
    /// Returns an error if HEAD is detached or not on a branch.
    fn current_branch(&self) -> Result<String>;

    // === Working Directory ===

    /// Stage all working-tree changes, including deletions and new files.
    fn stage_all(&self) -> Result<()>;

    /// Commit the staged changes.
    ///
    /// An empty index is reported as [`CommitOutcome::NothingToCommit`],
    /// never as an error.
    fn commit(&self, message: &str) -> Result<CommitOutcome>;

    /// Human-readable status without file details (`git status -uno`).
    fn status_short(&self) -> Result<String>;

    /// Files currently in an unresolved-conflict state.
    fn conflicting_files(&self) -> Result<Vec<String>>;

    // === Branch Operations ===

    /// Switch the working tree to a branch.
    fn checkout(&self, branch: &str) -> Result<()>;

    /// Merge a branch into the current one.
    fn merge(&self, branch: &str, no_fast_forward: bool) -> Result<()>;

    // === Remote Operations ===

    /// Refresh remote-tracking information without merging.
    fn fetch(&self) -> Result<()>;

    /// Ahead/behind counts of a branch against its upstream.
    ///
    /// Returns `None` when the branch has no upstream configured.
    fn remote_divergence(&self, branch: &str) -> Result<Option<RemoteDivergence>>;

    /// Fetch and merge the upstream of the current branch.
    fn pull(&self) -> Result<()>;

    /// Push a branch (or the current branch when `None`) to the remote.
    fn push(&self, branch: Option<&str>) -> Result<()>;

    // === History ===

    /// Distinct author names appearing in history, as recorded.
    ///
    /// Walks the current branch, or every ref with `all_branches`.
    fn log_authors(&self, all_branches: bool) -> Result<Vec<String>>;

    /// Raw `--numstat` listing for one author's commits.
    fn log_numstat_by_author(&self, author: &str, all_branches: bool) -> Result<String>;
}
