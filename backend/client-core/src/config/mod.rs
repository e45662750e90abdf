use crate::connection::Endpoint;
use crate::error::config::ConfigError;
use crate::{CONNECT_PATH, DEFAULT_SERVER_HOST};

use common::ErrorLocation;

use std::panic::Location;
use std::path::{Path, PathBuf};

use log::{info, warn};
use serde::{Deserialize, Serialize};

pub const CONFIG_FILE_NAME: &str = "chatterm.toml";
pub const CONFIG_DIR_NAME: &str = "chatterm";
const CONFIG_VERSION: u32 = 1;

// ============================================
// CONFIG STRUCTS
// ============================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// `host[:port]` of the chat server, without scheme.
    #[serde(default = "default_host")]
    pub host: String,
    /// Connect with `wss://` instead of `ws://`.
    #[serde(default)]
    pub secure: bool,
    #[serde(default = "default_path")]
    pub path: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            secure: false,
            path: default_path(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientSection {
    /// Log every frame received from the server at debug level.
    #[serde(default)]
    pub debug_frames: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_version")]
    pub version: u32,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub client: ClientSection,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            server: ServerConfig::default(),
            client: ClientSection::default(),
        }
    }
}

// ============================================
// DEFAULT FUNCTIONS
// ============================================

fn default_version() -> u32 {
    CONFIG_VERSION
}
fn default_host() -> String {
    DEFAULT_SERVER_HOST.to_string()
}
fn default_path() -> String {
    CONNECT_PATH.to_string()
}

// ============================================
// IMPLEMENTATION
// ============================================

impl ClientConfig {
    /// Platform config directory for this client, e.g. `~/.config/chatterm`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::DirectoryNotFound`] if the platform has no config directory.
    pub fn default_dir() -> Result<PathBuf, ConfigError> {
        dirs::config_dir()
            .map(|dir| dir.join(CONFIG_DIR_NAME))
            .ok_or_else(|| ConfigError::DirectoryNotFound {
                location: ErrorLocation::from(Location::caller()),
            })
    }

    /// Load config from {config_dir}/chatterm.toml.
    ///
    /// # Returns
    ///
    /// Returns defaults if the file is missing.
    /// Returns `Err(ConfigError)` if the file exists but is unreadable, corrupted or invalid.
    pub fn load(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE_NAME);

        if !config_path.exists() {
            info!(
                "Config file not found at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path).map_err(|e| {
            warn!("Failed to read config file: {}", e);
            ConfigError::ReadError {
                location: ErrorLocation::from(Location::caller()),
                path: config_path.clone(),
                source: e,
            }
        })?;

        let config: ClientConfig = toml::from_str(&contents).map_err(|e| {
            warn!("Failed to parse config TOML: {}", e);
            ConfigError::ParseError {
                location: ErrorLocation::from(Location::caller()),
                path: config_path.clone(),
                reason: e.to_string(),
            }
        })?;

        config.validate()?;

        info!("Config loaded from {}", config_path.display());
        Ok(config)
    }

    /// Save config to {config_dir}/chatterm.toml using atomic write.
    ///
    /// Uses temp file + rename so a crash never leaves a half-written file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if validation, directory creation,
    /// serialization, write or rename fails.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        self.validate()?;

        std::fs::create_dir_all(config_dir).map_err(|e| ConfigError::WriteError {
            location: ErrorLocation::from(Location::caller()),
            path: config_dir.to_path_buf(),
            source: e,
        })?;

        let config_path = config_dir.join(CONFIG_FILE_NAME);
        let temp_path = config_dir.join(format!("{}.tmp", CONFIG_FILE_NAME));

        let contents = toml::to_string_pretty(self).map_err(|e| ConfigError::SerializeError {
            location: ErrorLocation::from(Location::caller()),
            reason: e.to_string(),
        })?;

        std::fs::write(&temp_path, contents).map_err(|e| ConfigError::WriteError {
            location: ErrorLocation::from(Location::caller()),
            path: temp_path.clone(),
            source: e,
        })?;

        std::fs::rename(&temp_path, &config_path).map_err(|e| ConfigError::WriteError {
            location: ErrorLocation::from(Location::caller()),
            path: config_path.clone(),
            source: e,
        })?;

        info!("Config saved to {}", config_path.display());
        Ok(())
    }

    /// Validate config values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version == 0 || self.version > CONFIG_VERSION {
            return Err(ConfigError::validation(format!(
                "Invalid version: {} (expected 1-{})",
                self.version, CONFIG_VERSION
            )));
        }

        let host = &self.server.host;
        if host.trim().is_empty() {
            return Err(ConfigError::validation("server.host cannot be empty"));
        }

        if host.contains("://") || host.contains('/') {
            return Err(ConfigError::validation(format!(
                "server.host must be host[:port] without scheme or path: {}",
                host
            )));
        }

        if !self.server.path.starts_with('/') {
            return Err(ConfigError::validation(format!(
                "server.path must start with '/': {}",
                self.server.path
            )));
        }

        Ok(())
    }

    /// Server endpoint described by this config.
    pub fn endpoint(&self) -> Endpoint {
        Endpoint::new(self.server.host.clone(), self.server.secure).with_path(self.server.path.clone())
    }
}
