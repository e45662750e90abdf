//! Command line arguments.

use crate::error::ChattermError;

use client_core::config::{CONFIG_DIR_NAME, ClientConfig};

use common::ErrorLocation;

use std::panic::Location;
use std::path::PathBuf;

use clap::Parser;

/// Terminal client for the chat server
#[derive(Parser, Debug, Clone, Default, PartialEq, Eq)]
#[command(name = "chatterm")]
#[command(about = "Join a chat room from the terminal")]
#[command(version)]
pub struct Args {
    /// Server `host[:port]`, without scheme
    #[arg(long)]
    pub host: Option<String>,

    /// Connect with wss:// instead of ws://
    #[arg(long)]
    pub secure: bool,

    /// WebSocket path on the server
    #[arg(long)]
    pub path: Option<String>,

    /// Directory holding chatterm.toml
    #[arg(long)]
    pub config_dir: Option<PathBuf>,

    /// Directory for chatterm.log
    #[arg(long)]
    pub log_dir: Option<PathBuf>,

    /// Enter with this name right away
    #[arg(short, long)]
    pub name: Option<String>,

    /// Log every frame received from the server
    #[arg(long)]
    pub debug_frames: bool,
}

impl Args {
    /// Config directory to use: the flag, or the platform default.
    pub fn config_dir(&self) -> Result<PathBuf, ChattermError> {
        match &self.config_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(ClientConfig::default_dir()?),
        }
    }

    /// Log directory to use: the flag, or the platform's local data dir.
    pub fn log_dir(&self) -> Result<PathBuf, ChattermError> {
        if let Some(dir) = &self.log_dir {
            return Ok(dir.clone());
        }

        dirs::data_local_dir()
            .map(|dir| dir.join(CONFIG_DIR_NAME))
            .ok_or_else(|| ChattermError::Chatterm {
                message: "No local data directory on this platform; pass --log-dir".to_string(),
                location: ErrorLocation::from(Location::caller()),
            })
    }

    /// Overlay the flags that were given on top of `config`.
    ///
    /// Boolean flags can only switch an option on.
    pub fn apply(&self, mut config: ClientConfig) -> ClientConfig {
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(path) = &self.path {
            config.server.path = path.clone();
        }
        if self.secure {
            config.server.secure = true;
        }
        if self.debug_frames {
            config.client.debug_frames = true;
        }
        config
    }
}
