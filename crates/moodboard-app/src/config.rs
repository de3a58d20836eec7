//! Application configuration: optional `moodboard.json` plus environment overrides.

use moodboard_core::BoardConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Overrides the storage directory.
pub const ENV_DATA_DIR: &str = "MOODBOARD_DATA_DIR";
/// Overrides the display name linked to the local federated profiles.
pub const ENV_USER: &str = "MOODBOARD_USER";

const CONFIG_FILE: &str = "moodboard.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub title: String,
    pub width: f32,
    pub height: f32,
    /// Where boards are stored; platform data directory when unset.
    pub data_dir: Option<PathBuf>,
    /// Display name for the pre-linked Google and GitHub profiles.
    pub local_profile: String,
    pub board: BoardConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Moodboard".to_string(),
            width: 1000.0,
            height: 980.0,
            data_dir: None,
            local_profile: "Local User".to_string(),
            board: BoardConfig::default(),
        }
    }
}

impl AppConfig {
    /// `<config dir>/moodboard/moodboard.json`, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("moodboard").join(CONFIG_FILE))
    }

    /// Read a config file. A missing file yields the defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&json).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Apply `MOODBOARD_*` overrides looked up through `var`.
    pub fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(dir) = var(ENV_DATA_DIR).filter(|v| !v.trim().is_empty()) {
            self.data_dir = Some(PathBuf::from(dir));
        }
        if let Some(user) = var(ENV_USER).filter(|v| !v.trim().is_empty()) {
            self.local_profile = user.trim().to_string();
        }
    }

    /// Load from the default location and the process environment.
    ///
    /// A broken config file is logged and replaced by the defaults.
    pub fn load() -> Self {
        let mut config = match Self::default_path() {
            Some(path) => Self::from_file(&path).unwrap_or_else(|e| {
                log::warn!("Ignoring config: {}", e);
                Self::default()
            }),
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        log::debug!("Using config: {:?}", config);
        config
    }
}
