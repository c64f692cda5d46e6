//! Mock implementation for testing the engines.
//!
//! `MockVcs` implements `VcsBackend` from crisscross-git, records every call
//! in order, and lets tests script remote state, conflicts and failures
//! without a real repository.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use crisscross_git::{CommitOutcome, Error as GitError, RemoteDivergence, Result as GitResult, VcsBackend};

use crate::cancel::CancellationToken;

/// One backend call, as seen by the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    CurrentBranch,
    StageAll,
    Commit(String),
    StatusShort,
    ConflictingFiles,
    Checkout(String),
    Merge { branch: String, no_ff: bool },
    Fetch,
    RemoteDivergence(String),
    Pull,
    Push(Option<String>),
    LogAuthors { all_branches: bool },
    LogNumstat { author: String, all_branches: bool },
}

impl Call {
    /// Calls that change branches, history or the remote.
    pub const fn is_mutation(&self) -> bool {
        matches!(
            self,
            Self::Checkout(_) | Self::Merge { .. } | Self::Push(_) | Self::Commit(_) | Self::Pull
        )
    }
}

/// Recording mock of `VcsBackend`.
pub struct MockVcs {
    pub calls: RefCell<Vec<Call>>,
    pub current_branch: RefCell<String>,
    pub default_status: String,
    pub statuses: HashMap<String, String>,
    pub divergence: HashMap<String, RemoteDivergence>,
    pub pull_conflicts: HashMap<String, Vec<String>>,
    pub merge_conflicts: HashMap<String, Vec<String>>,
    pub conflicts: RefCell<Vec<String>>,
    pub failing_pushes: HashSet<String>,
    pub has_staged_changes: bool,
    pub unavailable: bool,
    pub cancel_on_checkout: Option<(String, CancellationToken)>,
    pub authors: Vec<String>,
    pub numstat: HashMap<String, String>,
}

impl Default for MockVcs {
    fn default() -> Self {
        Self::new()
    }
}

#[allow(dead_code)]
impl MockVcs {
    pub fn new() -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            current_branch: RefCell::new("feature".to_string()),
            default_status: String::new(),
            statuses: HashMap::new(),
            divergence: HashMap::new(),
            pull_conflicts: HashMap::new(),
            merge_conflicts: HashMap::new(),
            conflicts: RefCell::new(Vec::new()),
            failing_pushes: HashSet::new(),
            has_staged_changes: true,
            unavailable: false,
            cancel_on_checkout: None,
            authors: Vec::new(),
            numstat: HashMap::new(),
        }
    }

    pub fn with_current_branch(self, name: &str) -> Self {
        *self.current_branch.borrow_mut() = name.to_string();
        self
    }

    /// Status text returned for every branch without its own entry.
    pub fn with_status(mut self, text: &str) -> Self {
        self.default_status = text.to_string();
        self
    }

    pub fn with_branch_status(mut self, branch: &str, text: &str) -> Self {
        self.statuses.insert(branch.to_string(), text.to_string());
        self
    }

    pub fn with_divergence(mut self, branch: &str, divergence: RemoteDivergence) -> Self {
        self.divergence.insert(branch.to_string(), divergence);
        self
    }

    /// A pull while on `branch` fails and leaves `files` unmerged.
    pub fn with_pull_conflict(mut self, branch: &str, files: &[&str]) -> Self {
        self.pull_conflicts.insert(
            branch.to_string(),
            files.iter().map(ToString::to_string).collect(),
        );
        self
    }

    /// A merge into `branch` fails and leaves `files` unmerged.
    pub fn with_merge_conflict(mut self, branch: &str, files: &[&str]) -> Self {
        self.merge_conflicts.insert(
            branch.to_string(),
            files.iter().map(ToString::to_string).collect(),
        );
        self
    }

    pub fn with_push_failure(mut self, branch: &str) -> Self {
        self.failing_pushes.insert(branch.to_string());
        self
    }

    pub fn with_staged_changes(mut self, staged: bool) -> Self {
        self.has_staged_changes = staged;
        self
    }

    /// Every call fails as if git could not be started.
    pub fn with_unavailable(mut self) -> Self {
        self.unavailable = true;
        self
    }

    /// Trigger `token` while checking out `branch`.
    pub fn with_cancel_on_checkout(mut self, branch: &str, token: &CancellationToken) -> Self {
        self.cancel_on_checkout = Some((branch.to_string(), token.clone()));
        self
    }

    pub fn with_author(mut self, author: &str, numstat: &str) -> Self {
        self.authors.push(author.to_string());
        self.numstat.insert(author.to_string(), numstat.to_string());
        self
    }

    /// Recorded calls, in order.
    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    /// Recorded calls that mutate state, in order.
    pub fn mutations(&self) -> Vec<Call> {
        self.calls
            .borrow()
            .iter()
            .filter(|call| call.is_mutation())
            .cloned()
            .collect()
    }

    fn record(&self, call: Call) -> GitResult<()> {
        self.calls.borrow_mut().push(call);
        if self.unavailable {
            return Err(GitError::Unavailable("mock git missing".to_string()));
        }
        Ok(())
    }

    fn failed(command: &str, stderr: &str) -> GitError {
        GitError::CommandFailed {
            command: command.to_string(),
            stderr: stderr.to_string(),
        }
    }
}

impl VcsBackend for MockVcs {
    fn current_branch(&self) -> GitResult<String> {
        self.record(Call::CurrentBranch)?;
        Ok(self.current_branch.borrow().clone())
    }

    fn stage_all(&self) -> GitResult<()> {
        self.record(Call::StageAll)
    }

    fn commit(&self, message: &str) -> GitResult<CommitOutcome> {
        self.record(Call::Commit(message.to_string()))?;
        if self.has_staged_changes {
            Ok(CommitOutcome::Created)
        } else {
            Ok(CommitOutcome::NothingToCommit)
        }
    }

    fn status_short(&self) -> GitResult<String> {
        self.record(Call::StatusShort)?;
        let branch = self.current_branch.borrow();
        Ok(self
            .statuses
            .get(branch.as_str())
            .unwrap_or(&self.default_status)
            .clone())
    }

    fn conflicting_files(&self) -> GitResult<Vec<String>> {
        self.record(Call::ConflictingFiles)?;
        Ok(self.conflicts.borrow().clone())
    }

    fn checkout(&self, branch: &str) -> GitResult<()> {
        self.record(Call::Checkout(branch.to_string()))?;
        *self.current_branch.borrow_mut() = branch.to_string();
        if let Some((on, token)) = &self.cancel_on_checkout {
            if on == branch {
                token.cancel();
            }
        }
        Ok(())
    }

    fn merge(&self, branch: &str, no_fast_forward: bool) -> GitResult<()> {
        self.record(Call::Merge {
            branch: branch.to_string(),
            no_ff: no_fast_forward,
        })?;
        let into = self.current_branch.borrow().clone();
        if let Some(files) = self.merge_conflicts.get(&into) {
            self.conflicts.borrow_mut().clone_from(files);
            return Err(Self::failed("merge", "Automatic merge failed"));
        }
        Ok(())
    }

    fn fetch(&self) -> GitResult<()> {
        self.record(Call::Fetch)
    }

    fn remote_divergence(&self, branch: &str) -> GitResult<Option<RemoteDivergence>> {
        self.record(Call::RemoteDivergence(branch.to_string()))?;
        Ok(self.divergence.get(branch).copied())
    }

    fn pull(&self) -> GitResult<()> {
        self.record(Call::Pull)?;
        let branch = self.current_branch.borrow().clone();
        if let Some(files) = self.pull_conflicts.get(&branch) {
            self.conflicts.borrow_mut().clone_from(files);
            return Err(Self::failed("pull", "Automatic merge failed"));
        }
        Ok(())
    }

    fn push(&self, branch: Option<&str>) -> GitResult<()> {
        self.record(Call::Push(branch.map(String::from)))?;
        let pushed = branch.map_or_else(|| self.current_branch.borrow().clone(), String::from);
        if self.failing_pushes.contains(&pushed) {
            return Err(Self::failed("push", "rejected (non-fast-forward)"));
        }
        Ok(())
    }

    fn log_authors(&self, all_branches: bool) -> GitResult<Vec<String>> {
        self.record(Call::LogAuthors { all_branches })?;
        Ok(self.authors.clone())
    }

    fn log_numstat_by_author(&self, author: &str, all_branches: bool) -> GitResult<String> {
        self.record(Call::LogNumstat {
            author: author.to_string(),
            all_branches,
        })?;
        Ok(self.numstat.get(author).cloned().unwrap_or_default())
    }
}
