//! Per-author line statistics from `git log --numstat`.

use std::collections::BTreeSet;

use crisscross_git::{Result, VcsBackend};
use serde::ser::{Serialize, SerializeStruct, Serializer};
use tracing::debug;

/// Lines added and deleted by one author.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorStats {
    /// Author name as recorded in commits.
    pub author: String,
    /// Lines added across all matched commits.
    pub lines_added: u64,
    /// Lines deleted across all matched commits.
    pub lines_deleted: u64,
}

impl AuthorStats {
    /// An empty record for `author`.
    #[must_use]
    pub fn new(author: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            ..Self::default()
        }
    }

    /// Sum `numstat` output into a record for `author`.
    #[must_use]
    pub fn from_numstat(author: impl Into<String>, numstat: &str) -> Self {
        let (lines_added, lines_deleted) = parse_numstat(numstat);
        Self {
            author: author.into(),
            lines_added,
            lines_deleted,
        }
    }

    /// Added plus deleted.
    #[must_use]
    pub const fn lines_total(&self) -> u64 {
        self.lines_added + self.lines_deleted
    }
}

impl Serialize for AuthorStats {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut record = serializer.serialize_struct("AuthorStats", 4)?;
        record.serialize_field("author", &self.author)?;
        record.serialize_field("lines_added", &self.lines_added)?;
        record.serialize_field("lines_deleted", &self.lines_deleted)?;
        record.serialize_field("lines_total", &self.lines_total())?;
        record.end()
    }
}

/// Sum the added/deleted columns of `git log --numstat` output.
///
/// Lines whose first two fields are not both integers are skipped: blank
/// separators, and binary files which git reports as `-\t-\tpath`.
#[must_use]
pub fn parse_numstat(text: &str) -> (u64, u64) {
    text.lines()
        .filter_map(|line| {
            let mut fields = line.split_whitespace();
            let added = fields.next()?.parse::<u64>().ok()?;
            let deleted = fields.next()?.parse::<u64>().ok()?;
            Some((added, deleted))
        })
        .fold((0, 0), |(added, deleted), (a, d)| {
            (added.saturating_add(a), deleted.saturating_add(d))
        })
}

/// Collect line statistics for one author or for everyone in the log.
///
/// An author with no matching commits gets a zero record. The result is
/// ranked by [`rank`].
///
/// # Errors
/// Returns error if a backend query fails.
pub fn changes_by_author<B: VcsBackend>(
    backend: &B,
    author: Option<&str>,
    all_branches: bool,
) -> Result<Vec<AuthorStats>> {
    let authors: BTreeSet<String> = match author {
        Some(name) => BTreeSet::from([name.to_string()]),
        None => backend.log_authors(all_branches)?.into_iter().collect(),
    };
    debug!(count = authors.len(), all_branches, "collecting author stats");

    let mut records = authors
        .into_iter()
        .map(|name| {
            let numstat = backend.log_numstat_by_author(&name, all_branches)?;
            Ok(AuthorStats::from_numstat(name, &numstat))
        })
        .collect::<Result<Vec<_>>>()?;

    rank(&mut records);
    Ok(records)
}

/// Sort descending by total; ties keep their order.
pub fn rank(records: &mut [AuthorStats]) {
    records.sort_by(|a, b| b.lines_total().cmp(&a.lines_total()));
}

/// Summary row over all records.
#[must_use]
pub fn totals(records: &[AuthorStats]) -> AuthorStats {
    records
        .iter()
        .fold(AuthorStats::new("total"), |mut sum, record| {
            sum.lines_added = sum.lines_added.saturating_add(record.lines_added);
            sum.lines_deleted = sum.lines_deleted.saturating_add(record.lines_deleted);
            sum
        })
}
