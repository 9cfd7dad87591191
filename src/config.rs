//! Persistent configuration
//!
//! Stores the OpenWeatherMap API key and lookup defaults as a JSON file in
//! an XDG-compliant config directory (`~/.config/tenki/config.json` on
//! Linux). The `TENKI_API_KEY` environment variable overrides the stored
//! key without touching the file, and `tenki set-key` writes it.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::data::Unit;

use directories::ProjectDirs;

/// Environment variable that overrides the stored API key
pub const API_KEY_ENV: &str = "TENKI_API_KEY";

/// Errors that can occur when loading or saving configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Could not determine the config directory (e.g., no home directory)
    #[error("could not determine a config directory")]
    NoConfigDir,

    /// Reading or writing the config file failed
    #[error("config file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The config file exists but is not valid JSON
    #[error("config file is not valid: {0}")]
    Parse(#[from] serde_json::Error),
}

/// User configuration for the tenki CLI
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// OpenWeatherMap API key; empty means not configured
    pub api_key: String,
    /// City looked up when none is given on the command line
    pub default_location: String,
    /// Temperature unit used when none is given on the command line
    pub default_unit: Unit,
    /// Language requested for condition descriptions
    pub language: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            default_location: "Tokyo".to_string(),
            default_unit: Unit::Metric,
            language: "ja".to_string(),
        }
    }
}

impl Config {
    /// Returns the default config file path
    ///
    /// `~/.config/tenki/config.json` on Linux, or the equivalent XDG path
    /// on other platforms.
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let project_dirs = ProjectDirs::from("", "", "tenki").ok_or(ConfigError::NoConfigDir)?;
        Ok(project_dirs.config_dir().join("config.json"))
    }

    /// Loads configuration from the default path with the env override applied
    ///
    /// A missing file yields the defaults; a present but unreadable file is
    /// an error so a typo never silently discards the stored key.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::load_from(&Self::default_path()?)?;
        config.apply_env_override(std::env::var(API_KEY_ENV).ok());
        Ok(config)
    }

    /// Loads configuration from a specific path, without the env override
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Saves configuration to the default path
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::default_path()?)
    }

    /// Saves configuration to a specific path, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Replaces the API key when the environment provides a non-empty one
    pub fn apply_env_override(&mut self, env_key: Option<String>) {
        if let Some(key) = env_key {
            if !key.trim().is_empty() {
                self.api_key = key;
            }
        }
    }
}
