//! Error types for crisscross-git.

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while talking to the version-control backend.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Not inside a git repository.
    #[error("not a git repository")]
    NotARepository,

    /// HEAD is detached (not on a branch).
    #[error("HEAD is detached - checkout a branch first")]
    DetachedHead,

    /// Branch not found.
    #[error("branch not found: {0}")]
    BranchNotFound(String),

    /// The git executable could not be started at all.
    #[error("git is unavailable: {0}")]
    Unavailable(String),

    /// A git subcommand ran but exited unsuccessfully.
    #[error("`git {command}` failed: {stderr}")]
    CommandFailed {
        /// The subcommand line, without the program name.
        command: String,
        /// Trimmed stderr (or stdout when stderr was empty).
        stderr: String,
    },

    /// IO error while running git.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Underlying git2 error.
    #[error("git error: {0}")]
    Git2(#[from] git2::Error),
}

impl Error {
    /// Whether this error came from a failed git subcommand.
    #[must_use]
    pub const fn is_command_failure(&self) -> bool {
        matches!(self, Self::CommandFailed { .. })
    }
}
