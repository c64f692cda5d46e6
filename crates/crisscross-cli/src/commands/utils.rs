use anyhow::{Context, Result};
use crisscross_core::{CONFIG_FILE, Config};
use crisscross_git::Repository;
use tracing::debug;

/// Open the repository around the current directory with its config applied.
pub fn open_repo_and_config() -> Result<(Repository, Config)> {
    let repo = Repository::open_current().context("Not inside a git repository")?;

    let path = repo.git_dir().join(CONFIG_FILE);
    let config = Config::load(&path)
        .with_context(|| format!("Failed to read config from {}", path.display()))?;
    debug!(path = %path.display(), remote = config.general.remote.as_str(), "loaded config");

    let repo = repo.with_remote(config.general.remote.clone());
    Ok((repo, config))
}
