//! Configuration file support for jyotish
//!
//! Loads config from ~/.jyotish/config.toml

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{ClientError, Result};

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Configuration file contents
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Backend base URL
    pub api_url: Option<String>,

    /// Request timeout in seconds
    pub timeout_secs: Option<u64>,
}

impl Config {
    /// Load config from ~/.jyotish/config.toml, falling back to defaults
    pub fn load() -> Self {
        let path = config_path();

        if !path.exists() {
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Warning: {}", e);
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| ClientError::Config(format!("failed to parse {}: {}", path.display(), e)))
    }
}

/// Values the client runs with
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub api_url: String,
    pub timeout: Duration,
}

impl Settings {
    /// CLI/env values (already merged by clap) win over the file, then defaults
    pub fn resolve(api_url: Option<String>, timeout_secs: Option<u64>, config: Config) -> Self {
        let api_url = api_url
            .or(config.api_url)
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let timeout_secs = timeout_secs
            .or(config.timeout_secs)
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Self {
            api_url: api_url.trim().trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(timeout_secs),
        }
    }
}

/// Directory holding config, .env and line history
pub fn home_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_default().join(".jyotish")
}

/// Get the config file path
pub fn config_path() -> PathBuf {
    home_dir().join("config.toml")
}
