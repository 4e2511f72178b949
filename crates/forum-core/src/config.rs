//! Client configuration management.
//!
//! This module handles loading and saving the client configuration, which
//! holds the API base address, the request timeout, the application title
//! shown in navigation titles, and an optional override for the data
//! directory.
//!
//! Configuration is stored at `~/.config/forum-client/config.json`.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Application name used for config/data directory paths
const APP_NAME: &str = "forum-client";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Durable storage file name inside the data directory
const STORAGE_FILE: &str = "storage.json";

/// Environment variable that overrides the API base address at runtime
pub const BASE_URL_ENV: &str = "FORUM_API_BASE_URL";

/// Base address baked in at build time, falling back to the local dev server.
pub const DEFAULT_BASE_URL: &str = match option_env!("FORUM_API_BASE_URL") {
    Some(url) => url,
    None => "http://localhost:7777/api",
};

/// Request timeout applied uniformly to every call.
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Title used when a route has none, and as the suffix of every page title.
pub const DEFAULT_APP_TITLE: &str = "Network Demo";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_base_url: String,
    pub request_timeout_ms: u64,
    pub app_title: String,
    pub data_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_ms: DEFAULT_TIMEOUT_MS,
            app_title: DEFAULT_APP_TITLE.to_string(),
            data_dir: None,
        }
    }
}

impl Config {
    /// Load the config file (or defaults) and apply environment overrides.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            serde_json::from_str(&contents).context("Failed to parse config file")?
        } else {
            Self::default()
        };
        config.apply_env();
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Override the base address from `FORUM_API_BASE_URL` when set.
    pub fn apply_env(&mut self) {
        if let Ok(url) = std::env::var(BASE_URL_ENV) {
            if !url.trim().is_empty() {
                self.api_base_url = url;
            }
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    pub fn data_dir(&self) -> Result<PathBuf> {
        if let Some(ref dir) = self.data_dir {
            return Ok(dir.clone());
        }
        let data_dir = dirs::data_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find data directory"))?;
        Ok(data_dir.join(APP_NAME))
    }

    /// Location of the durable local storage file.
    pub fn storage_path(&self) -> Result<PathBuf> {
        Ok(self.data_dir()?.join(STORAGE_FILE))
    }
}
