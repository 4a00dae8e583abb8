//! Configuration file support for the log analyzer.
//!
//! Loads settings from `~/.config/beemo-log-analyzer/config.toml` on Linux
//! (or platform-appropriate location on other OSes).

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

use crate::fetch::DEFAULT_ALLOWED_DOMAINS;

/// Application configuration loaded from TOML file.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Log-hosting domains URLs are validated against before fetching.
    pub allowed_domains: Vec<String>,

    /// Fetch timeout in seconds.
    pub fetch_timeout: u64,

    /// Default log level when RUST_LOG is unset.
    pub log_level: String,

    /// Show a progress counter while analyzing.
    pub progress: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            allowed_domains: DEFAULT_ALLOWED_DOMAINS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            fetch_timeout: 30,
            log_level: "info".to_string(),
            progress: true,
        }
    }
}

impl Config {
    /// Load configuration from the default config file location.
    ///
    /// Returns default config if the file doesn't exist.
    /// Returns an error if the file exists but is malformed.
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) if path.exists() => {
                let content = fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read config file: {}", path.display()))?;
                toml::from_str(&content)
                    .with_context(|| format!("Invalid TOML in config file: {}", path.display()))
            }
            _ => Ok(Config::default()),
        }
    }

    /// Returns the path to the config file.
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("beemo-log-analyzer/config.toml"))
    }

    /// Validate all configuration settings.
    pub fn validate(&self) -> Result<()> {
        if self.allowed_domains.is_empty() {
            anyhow::bail!("allowed_domains must not be empty");
        }
        if self.fetch_timeout == 0 {
            anyhow::bail!("fetch_timeout must be at least 1 second");
        }
        Ok(())
    }
}
