//! `crisscross stats` command - lines added and deleted per author.

use anyhow::{Context, Result};
use colored::Colorize;
use crisscross_core::AuthorStats;
use crisscross_core::stats::{changes_by_author, totals};
use serde::Serialize;

use super::utils::open_repo_and_config;
use crate::output;

/// JSON output structure.
#[derive(Serialize)]
struct JsonOutput<'a> {
    all_branches: bool,
    authors: &'a [AuthorStats],
    total: AuthorStats,
}

/// Run the stats command.
pub fn run(author: Option<&str>, all_branches: bool, json: bool) -> Result<()> {
    let (repo, config) = open_repo_and_config()?;
    let all_branches = all_branches || config.stats.all_branches;

    let records =
        changes_by_author(&repo, author, all_branches).context("Failed to read history")?;

    if json {
        let output = JsonOutput {
            all_branches,
            authors: &records,
            total: totals(&records),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if records.is_empty() {
        output::info("No commits yet - nothing to count");
        return Ok(());
    }

    print_table(&records);
    Ok(())
}

fn print_table(records: &[AuthorStats]) {
    let total = totals(records);
    let width = records
        .iter()
        .map(|r| r.author.chars().count())
        .chain([total.author.len(), "AUTHOR".len()])
        .max()
        .unwrap_or_default();

    output::essential(&format!(
        "{:<width$}  {:>8}  {:>8}  {:>8}",
        "AUTHOR", "ADDED", "DELETED", "TOTAL"
    ));
    for record in records {
        output::essential(&row(record, width));
    }
    output::hr();
    output::essential(&row(&total, width).bold().to_string());
}

fn row(record: &AuthorStats, width: usize) -> String {
    format!(
        "{:<width$}  {}  {}  {:>8}",
        record.author,
        format!("{:>8}", record.lines_added).green(),
        format!("{:>8}", record.lines_deleted).red(),
        record.lines_total()
    )
}
