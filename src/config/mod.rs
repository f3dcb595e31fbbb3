use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::format::DEFAULT_TIME_FORMAT;
use crate::theme::ThemeMode;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Panel theme when none is given on the command line
    #[serde(default)]
    pub theme: ThemeMode,

    /// Signal file to watch when none is given on the command line
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signal_path: Option<PathBuf>,

    /// Seconds between background re-reads of the signal file (0 = never)
    #[serde(default = "default_refresh_secs")]
    pub refresh_secs: u64,

    /// strftime pattern for the "Generated" row
    #[serde(default = "default_time_format")]
    pub time_format: String,
}

fn default_refresh_secs() -> u64 {
    5
}

fn default_time_format() -> String {
    DEFAULT_TIME_FORMAT.to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            theme: ThemeMode::default(),
            signal_path: None,
            refresh_secs: default_refresh_secs(),
            time_format: default_time_format(),
        }
    }
}

impl AppConfig {
    /// Get the config file path
    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?
            .join("signal-panel");

        Ok(config_dir.join("config.toml"))
    }

    /// Load config from file, falling back to defaults
    pub fn load() -> Self {
        let path = match Self::config_path() {
            Ok(p) => p,
            Err(e) => {
                tracing::debug!("{}", e);
                return AppConfig::default();
            }
        };

        if !path.exists() {
            return AppConfig::default();
        }

        match Self::load_from(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Using default config: {:#}", e);
                AppConfig::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}
