//! Application configuration.
//!
//! Loaded from `<config_dir>/quicknotes/config.json`, then overridden by
//! environment variables:
//! - `QUICKNOTES_URL` - Base URL of the note table service
//! - `QUICKNOTES_DB` - SQLite database path for `serve` and `--local`
//! - `QUICKNOTES_PORT` - Listen port for `serve`
//! - `QUICKNOTES_SUMMARY_FAILURE_RATE` - Probability (0.0 to 1.0) that a summary fails

use anyhow::{Context, Result};
use dirs::config_dir;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

const APP_NAME: &str = "quicknotes";
const CONFIG_FILE: &str = "config.json";

pub const DEFAULT_URL: &str = "http://localhost:17020/api/v1";
pub const DEFAULT_PORT: u16 = 17020;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Base URL of the note table service.
    pub server_url: String,
    /// Port `serve` listens on.
    pub port: u16,
    /// SQLite path. Falls back to the platform data directory.
    pub database_path: Option<PathBuf>,
    pub summary: SummaryConfig,
}

/// Latency and failure behavior of the keyword summarizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryConfig {
    pub min_delay_ms: u64,
    pub max_delay_ms: u64,
    pub failure_rate: f64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_URL.to_string(),
            port: DEFAULT_PORT,
            database_path: None,
            summary: SummaryConfig::default(),
        }
    }
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            min_delay_ms: 1000,
            max_delay_ms: 2000,
            failure_rate: 0.0,
        }
    }
}

impl SummaryConfig {
    /// Delay bounds, with `max` raised to `min` if configured below it.
    pub fn delay_range(&self) -> (Duration, Duration) {
        let min = Duration::from_millis(self.min_delay_ms);
        let max = Duration::from_millis(self.max_delay_ms.max(self.min_delay_ms));
        (min, max)
    }
}

impl AppConfig {
    /// Load configuration from the user's config directory and the environment.
    /// Falls back to defaults if the file doesn't exist or fails to parse.
    pub fn load() -> Self {
        let config = match Self::try_load() {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Failed to load config, using defaults: {:#}", e);
                Self::default()
            }
        };
        config.with_env_overrides(|key| std::env::var(key).ok())
    }

    fn try_load() -> Result<Self> {
        let config_path = get_config_path()?;
        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).context("Failed to read config file")?;

        let config = serde_json::from_str(&content).context("Failed to parse config file")?;

        Ok(config)
    }

    /// Apply `QUICKNOTES_*` overrides looked up through `var`.
    pub fn with_env_overrides(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = var("QUICKNOTES_URL") {
            self.server_url = url;
        }
        if let Some(path) = var("QUICKNOTES_DB") {
            self.database_path = Some(PathBuf::from(path));
        }
        if let Some(port) = var("QUICKNOTES_PORT").and_then(|s| s.parse().ok()) {
            self.port = port;
        }
        if let Some(rate) = var("QUICKNOTES_SUMMARY_FAILURE_RATE")
            .and_then(|s| s.parse::<f64>().ok())
            .filter(|r| r.is_finite())
        {
            self.summary.failure_rate = rate.clamp(0.0, 1.0);
        }
        self
    }

    /// Database path, resolving the platform default when unset.
    pub fn database_path(&self) -> Result<PathBuf> {
        match &self.database_path {
            Some(path) => Ok(path.clone()),
            None => crate::db::default_path(),
        }
    }
}

fn get_config_path() -> Result<PathBuf> {
    let mut path =
        config_dir().ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
    path.push(APP_NAME);
    path.push(CONFIG_FILE);
    Ok(path)
}
