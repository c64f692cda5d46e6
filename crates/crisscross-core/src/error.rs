//! Error types for crisscross-core.

use crate::sync::SyncStep;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur outside the sync protocol itself.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid branch name.
    #[error("invalid branch name '{name}': {reason}")]
    InvalidBranchName {
        /// The invalid name.
        name: String,
        /// Why the name is invalid.
        reason: String,
    },

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error.
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),

    /// TOML serialization error.
    #[error("toml error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    /// Version-control backend error.
    #[error("git error: {0}")]
    Git(#[from] crisscross_git::Error),
}

/// Reasons a branch synchronization stopped early.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// The current branch could not be merged cleanly.
    #[error("conflicts on current branch '{branch}' - resolve them and rerun the sync")]
    ConflictOnCurrentBranch {
        /// Branch left in the conflicted state.
        branch: String,
        /// Unmerged paths.
        files: Vec<String>,
    },

    /// The target branch could not be merged cleanly.
    #[error("conflicts on target branch '{branch}' - resolve them and rerun the sync")]
    ConflictOnTargetBranch {
        /// Branch left in the conflicted state.
        branch: String,
        /// Unmerged paths.
        files: Vec<String>,
    },

    /// Target and current branch are the same.
    #[error("cannot sync branch '{0}' with itself")]
    SameBranch(String),

    /// The caller cancelled the run between steps.
    #[error("sync cancelled before: {step}")]
    Cancelled {
        /// The step that was not started.
        step: SyncStep,
    },

    /// Any other backend failure; the run stopped at that point.
    #[error(transparent)]
    Backend(#[from] crisscross_git::Error),
}

impl SyncError {
    /// Unmerged paths for a conflict abort, empty otherwise.
    #[must_use]
    pub fn conflict_files(&self) -> &[String] {
        match self {
            Self::ConflictOnCurrentBranch { files, .. } | Self::ConflictOnTargetBranch { files, .. } => {
                files
            }
            _ => &[],
        }
    }
}
