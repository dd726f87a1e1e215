//! Runtime configuration.
//!
//! Values come from `<config_dir>/aquascape/config.json` when it exists and
//! parses, otherwise from defaults. `AQUASCAPE_*` environment variables win
//! over both.

use anyhow::{Context, Result};
use dirs::config_dir;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::models::DEFAULT_AUTHOR;

const APP_NAME: &str = "aquascape";
const CONFIG_FILE: &str = "config.json";

pub const DEFAULT_PORT: u16 = 17020;
pub const DEFAULT_SHARE_BASE_URL: &str = "https://aquarium-builder.com/build";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// SQLite file; `None` means the platform data directory.
    pub db_path: Option<PathBuf>,
    /// Port for the HTTP API
    pub port: u16,
    /// Author stamped on a fresh build
    pub author: String,
    /// Prefix of the share link; the build id is appended
    pub share_base_url: String,
    /// Allowed CORS origins. Empty allows any origin.
    pub cors_origins: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: None,
            port: DEFAULT_PORT,
            author: DEFAULT_AUTHOR.to_string(),
            share_base_url: DEFAULT_SHARE_BASE_URL.to_string(),
            cors_origins: Vec::new(),
        }
    }
}

impl Config {
    /// Load the config file, then apply environment overrides.
    /// Falls back to defaults if the file doesn't exist or fails to parse.
    pub fn load() -> Self {
        let config = match get_config_path().and_then(|path| Self::load_from(&path)) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Failed to load config, using defaults: {:#}", e);
                Self::default()
            }
        };
        config.with_env_overrides(|key| std::env::var(key).ok())
    }

    /// Read a config file. A missing file yields the defaults.
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).context("Failed to read config file")?;
        let config = serde_json::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }

    /// Apply `AQUASCAPE_*` overrides looked up through `var`.
    /// Unparseable values are ignored with a warning.
    pub fn with_env_overrides(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(db) = var("AQUASCAPE_DB") {
            self.db_path = Some(PathBuf::from(db));
        }

        if let Some(port) = var("AQUASCAPE_PORT") {
            match port.parse::<u16>() {
                Ok(port) => self.port = port,
                Err(_) => tracing::warn!(value = %port, "Ignoring invalid AQUASCAPE_PORT"),
            }
        }

        if let Some(author) = var("AQUASCAPE_AUTHOR") {
            self.author = author;
        }

        if let Some(url) = var("AQUASCAPE_SHARE_URL") {
            self.share_base_url = url;
        }

        if let Some(origins) = var("AQUASCAPE_CORS_ORIGINS") {
            self.cors_origins = origins
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        self
    }

    /// Save the configuration to the user's config directory.
    pub fn save(&self) -> Result<PathBuf> {
        let config_path = get_config_path()?;
        self.save_to(&config_path)?;
        Ok(config_path)
    }

    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, content).context("Failed to write config file")?;
        Ok(())
    }
}

pub fn get_config_path() -> Result<PathBuf> {
    let mut path =
        config_dir().ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
    path.push(APP_NAME);
    path.push(CONFIG_FILE);
    Ok(path)
}
