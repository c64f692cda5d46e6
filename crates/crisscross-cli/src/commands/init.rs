//! `crisscross init` command - write a default config for this repository.

use anyhow::{Context, Result};
use crisscross_core::{CONFIG_FILE, Config};
use crisscross_git::Repository;

use crate::output;

/// Run the init command.
pub fn run() -> Result<()> {
    let repo = Repository::open_current().context("Not inside a git repository")?;
    let path = repo.git_dir().join(CONFIG_FILE);

    if path.exists() {
        output::warn("crisscross is already configured in this repository");
        output::info(&format!("Config: {}", path.display()));
        return Ok(());
    }

    Config::default()
        .save(&path)
        .with_context(|| format!("Failed to write config to {}", path.display()))?;

    output::success("Wrote default crisscross config");
    output::info(&format!("Config: {}", path.display()));
    Ok(())
}
