//! Repository wrapper implementing [`VcsBackend`] for a real git checkout.
//!
//! Read-only structure (current branch, upstream ahead/behind) comes from
//! git2. Anything that mutates the working tree or talks to a remote runs
//! the `git` executable, so hooks, credential helpers and merge drivers
//! behave exactly as they do for the user.

use std::collections::BTreeSet;
use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use git2::{BranchType, ErrorCode};
use tracing::debug;

use crate::error::{Error, Result};
use crate::traits::VcsBackend;

/// Remote used when none is configured.
pub const DEFAULT_REMOTE: &str = "origin";

/// Environment variable overriding the git executable.
pub const GIT_PROGRAM_ENV: &str = "CRISSCROSS_GIT";

/// What a commit request actually did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    /// A new commit was created.
    Created,
    /// The index had no changes; nothing was committed.
    NothingToCommit,
}

/// Position of a local branch relative to its upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteDivergence {
    /// Local and upstream point at the same commit.
    InSync,
    /// Local has commits the upstream lacks.
    Ahead { ahead: usize },
    /// Upstream has commits the local branch lacks.
    Behind { behind: usize },
    /// Both sides have unique commits.
    Diverged { ahead: usize, behind: usize },
}

impl RemoteDivergence {
    /// Build from raw ahead/behind counts.
    #[must_use]
    pub const fn from_counts(ahead: usize, behind: usize) -> Self {
        match (ahead, behind) {
            (0, 0) => Self::InSync,
            (ahead, 0) => Self::Ahead { ahead },
            (0, behind) => Self::Behind { behind },
            (ahead, behind) => Self::Diverged { ahead, behind },
        }
    }

    /// Number of upstream commits missing locally.
    #[must_use]
    pub const fn behind(&self) -> usize {
        match self {
            Self::InSync | Self::Ahead { .. } => 0,
            Self::Behind { behind } | Self::Diverged { behind, .. } => *behind,
        }
    }

    /// Nothing on the upstream needs merging.
    #[must_use]
    pub const fn is_up_to_date(&self) -> bool {
        self.behind() == 0
    }
}

/// High-level wrapper around a git working directory.
pub struct Repository {
    inner: git2::Repository,
    workdir: PathBuf,
    remote: String,
    program: OsString,
}

impl Repository {
    /// Open a repository at the given path.
    ///
    /// # Errors
    /// Returns error if no repository found at path or any parent, or if the
    /// repository is bare.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let inner = git2::Repository::discover(path).map_err(|e| {
            if e.code() == ErrorCode::NotFound {
                Error::NotARepository
            } else {
                Error::Git2(e)
            }
        })?;
        let workdir = inner
            .workdir()
            .ok_or(Error::NotARepository)?
            .to_path_buf();
        let program = std::env::var_os(GIT_PROGRAM_ENV).unwrap_or_else(|| "git".into());

        Ok(Self {
            inner,
            workdir,
            remote: DEFAULT_REMOTE.to_string(),
            program,
        })
    }

    /// Open the repository containing the current directory.
    ///
    /// # Errors
    /// Returns error if not inside a git repository.
    pub fn open_current() -> Result<Self> {
        Self::open(".")
    }

    /// Use a different remote for fetch and push.
    #[must_use]
    pub fn with_remote(mut self, remote: impl Into<String>) -> Self {
        self.remote = remote.into();
        self
    }

    /// Use a different git executable.
    #[must_use]
    pub fn with_program(mut self, program: impl Into<OsString>) -> Self {
        self.program = program.into();
        self
    }

    /// Get the path to the repository root (workdir).
    #[must_use]
    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    /// Get the path to the .git directory.
    #[must_use]
    pub fn git_dir(&self) -> &Path {
        self.inner.path()
    }

    /// Remote used for fetch and push.
    #[must_use]
    pub fn remote(&self) -> &str {
        &self.remote
    }

    /// Check if a local branch exists.
    #[must_use]
    pub fn branch_exists(&self, name: &str) -> bool {
        self.inner.find_branch(name, BranchType::Local).is_ok()
    }

    /// Whether HEAD points at a commit yet.
    fn has_commits(&self) -> bool {
        !matches!(self.inner.head(), Err(e) if e.code() == ErrorCode::UnbornBranch)
    }

    // === git executable ===

    fn output(&self, args: &[&str]) -> Result<Output> {
        debug!(?args, "running git");
        Command::new(&self.program)
            .args(args)
            .current_dir(&self.workdir)
            // Untranslated messages keep the status text shim stable.
            .env("LC_ALL", "C")
            .output()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound | ErrorKind::PermissionDenied => {
                    Error::Unavailable(format!("{}: {e}", self.program.to_string_lossy()))
                }
                _ => Error::Io(e),
            })
    }

    fn run(&self, args: &[&str]) -> Result<String> {
        let output = self.output(args)?;
        if !output.status.success() {
            return Err(command_failed(args, &output));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Build a [`Error::CommandFailed`] from a finished process.
fn command_failed(args: &[&str], output: &Output) -> Error {
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    // merge and pull report conflicts on stdout
    let stderr = if stderr.is_empty() {
        String::from_utf8_lossy(&output.stdout).trim().to_string()
    } else {
        stderr
    };

    Error::CommandFailed {
        command: args.join(" "),
        stderr,
    }
}

/// `--author` pattern matching exactly one recorded name.
///
/// git matches the pattern against `Name <email>`, so the escaped name is
/// anchored at the start and must be followed by the email bracket.
fn author_pattern(author: &str) -> String {
    format!("--author=^{} <", regex::escape(author))
}

impl VcsBackend for Repository {
    fn current_branch(&self) -> Result<String> {
        let head = match self.inner.head() {
            Ok(head) => head,
            // Fresh repository: HEAD names a branch with no commits yet.
            Err(e) if e.code() == ErrorCode::UnbornBranch => {
                let head = self.inner.find_reference("HEAD")?;
                return head
                    .symbolic_target()
                    .and_then(|target| target.strip_prefix("refs/heads/"))
                    .map(String::from)
                    .ok_or(Error::DetachedHead);
            }
            Err(e) => return Err(e.into()),
        };
        if !head.is_branch() {
            return Err(Error::DetachedHead);
        }

        head.shorthand()
            .map(String::from)
            .ok_or(Error::DetachedHead)
    }

    fn stage_all(&self) -> Result<()> {
        self.run(&["add", "-A"])?;
        Ok(())
    }

    fn commit(&self, message: &str) -> Result<CommitOutcome> {
        let args = ["diff", "--cached", "--quiet"];
        let staged = self.output(&args)?;
        match staged.status.code() {
            Some(0) => return Ok(CommitOutcome::NothingToCommit),
            Some(1) => {}
            _ => return Err(command_failed(&args, &staged)),
        }

        self.run(&["commit", "-m", message])?;
        Ok(CommitOutcome::Created)
    }

    fn status_short(&self) -> Result<String> {
        self.run(&["status", "-uno"])
    }

    fn conflicting_files(&self) -> Result<Vec<String>> {
        let stdout = self.run(&["diff", "--name-only", "--diff-filter=U"])?;
        Ok(stdout
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect())
    }

    fn checkout(&self, branch: &str) -> Result<()> {
        self.run(&["checkout", branch, "--"])?;
        Ok(())
    }

    fn merge(&self, branch: &str, no_fast_forward: bool) -> Result<()> {
        let mut args = vec!["merge", "--no-edit"];
        if no_fast_forward {
            args.push("--no-ff");
        }
        args.push(branch);
        self.run(&args)?;
        Ok(())
    }

    fn fetch(&self) -> Result<()> {
        self.run(&["fetch", &self.remote])?;
        Ok(())
    }

    fn remote_divergence(&self, branch: &str) -> Result<Option<RemoteDivergence>> {
        let local = self
            .inner
            .find_branch(branch, BranchType::Local)
            .map_err(|_| Error::BranchNotFound(branch.into()))?;

        let upstream = match local.upstream() {
            Ok(upstream) => upstream,
            Err(e) if e.code() == ErrorCode::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let local_oid = local
            .get()
            .target()
            .ok_or_else(|| Error::BranchNotFound(branch.into()))?;
        let Some(upstream_oid) = upstream.get().target() else {
            return Ok(None);
        };

        let (ahead, behind) = self.inner.graph_ahead_behind(local_oid, upstream_oid)?;
        Ok(Some(RemoteDivergence::from_counts(ahead, behind)))
    }

    fn pull(&self) -> Result<()> {
        self.run(&["pull", "--no-rebase", "--no-edit"])?;
        Ok(())
    }

    fn push(&self, branch: Option<&str>) -> Result<()> {
        match branch {
            Some(branch) => self.run(&["push", &self.remote, branch])?,
            None => self.run(&["push"])?,
        };
        Ok(())
    }

    fn log_authors(&self, all_branches: bool) -> Result<Vec<String>> {
        if !self.has_commits() {
            return Ok(vec![]);
        }

        let mut args = vec!["log", "--format=%an"];
        if all_branches {
            args.push("--all");
        }
        let stdout = self.run(&args)?;
        let authors: BTreeSet<&str> = stdout
            .lines()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .collect();

        Ok(authors.into_iter().map(String::from).collect())
    }

    fn log_numstat_by_author(&self, author: &str, all_branches: bool) -> Result<String> {
        if !self.has_commits() {
            return Ok(String::new());
        }

        let pattern = author_pattern(author);
        let mut args = vec![
            "log",
            "--extended-regexp",
            pattern.as_str(),
            "--pretty=tformat:",
            "--numstat",
        ];
        if all_branches {
            args.push("--all");
        }
        self.run(&args)
    }
}

impl std::fmt::Debug for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository")
            .field("path", &self.git_dir())
            .field("remote", &self.remote)
            .finish_non_exhaustive()
    }
}
