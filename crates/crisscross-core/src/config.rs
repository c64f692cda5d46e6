//! Configuration loaded from `<git dir>/crisscross.toml`.

use std::fs;
use std::path::Path;

use crisscross_git::DEFAULT_REMOTE;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::sync::SyncOptions;

/// File name inside the git directory.
pub const CONFIG_FILE: &str = "crisscross.toml";

/// Crisscross configuration. Every section and key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Remote-check settings for `sync`.
    #[serde(default)]
    pub sync: SyncOptions,

    /// Defaults for `stats`.
    #[serde(default)]
    pub stats: StatsConfig,
}

impl Config {
    /// Load config from a TOML file; a missing file yields defaults.
    ///
    /// # Errors
    /// Returns error if file can't be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Save config to a TOML file.
    ///
    /// # Errors
    /// Returns error if serialization or write fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Options for the sync orchestrator.
    #[must_use]
    pub fn sync_options(&self) -> SyncOptions {
        self.sync.clone()
    }
}

/// General settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Remote to fetch from and push to.
    #[serde(default = "default_remote")]
    pub remote: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            remote: default_remote(),
        }
    }
}

fn default_remote() -> String {
    DEFAULT_REMOTE.into()
}

/// Defaults for `crisscross stats`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsConfig {
    /// Count commits on every branch, not just the checked-out one.
    #[serde(default)]
    pub all_branches: bool,
}
