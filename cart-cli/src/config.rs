//! Configuration loading and parsing

use anyhow::{Context, Result};
use cart_ledger::counter::DEFAULT_STEPS;
use cart_ledger::LedgerConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main application configuration (loaded from storefront.toml)
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub store: LedgerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub contact: ContactConfig,
    #[serde(default)]
    pub stats: StatsConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Directory holding one JSON file per storage key
    #[serde(default = "default_storage_dir")]
    pub dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: default_storage_dir(),
        }
    }
}

fn default_storage_dir() -> PathBuf {
    PathBuf::from(".storefront")
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ContactConfig {
    /// Address shown when the relay cannot deliver a message
    #[serde(default = "default_fallback_email")]
    pub fallback_email: String,
    /// File the outbox relay appends delivered messages to
    pub outbox: Option<PathBuf>,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            fallback_email: default_fallback_email(),
            outbox: None,
        }
    }
}

fn default_fallback_email() -> String {
    "sarah@example.com".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StatsConfig {
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
    #[serde(default = "default_steps")]
    pub steps: u32,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            tick_ms: default_tick_ms(),
            steps: default_steps(),
        }
    }
}

fn default_tick_ms() -> u64 {
    30
}

fn default_steps() -> u32 {
    DEFAULT_STEPS
}

impl AppConfig {
    /// Outbox file, defaulting to `outbox.txt` inside the storage directory
    pub fn outbox_path(&self) -> PathBuf {
        self.contact
            .outbox
            .clone()
            .unwrap_or_else(|| self.storage.dir.join("outbox.txt"))
    }
}

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: AppConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    if config.stats.steps == 0 {
        anyhow::bail!("stats.steps must be at least 1 in {:?}", path);
    }

    Ok(config)
}
