use client_core::error::config::ConfigError;

use common::ErrorLocation;

use std::panic::Location;

use thiserror::Error;

/// Errors that stop the terminal client before or while it starts up.
///
/// Everything after startup is reported to the user as a notice instead.
#[derive(Debug, Error)]
pub enum ChattermError {
    /// Error from this App
    #[error("Chatterm Error: {message} {location}")]
    Chatterm {
        message: String,
        location: ErrorLocation,
    },

    /// Config file could not be loaded or is invalid
    #[error("Config Error: {message} {location}")]
    Config {
        message: String,
        location: ErrorLocation,
    },

    /// Terminal or filesystem IO failed
    #[error("IO Error: {message} {location}")]
    Io {
        message: String,
        location: ErrorLocation,
        #[source]
        source: std::io::Error,
    },
}

impl ChattermError {
    #[track_caller]
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        ChattermError::Io {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
            source,
        }
    }
}

impl From<ConfigError> for ChattermError {
    #[track_caller]
    fn from(error: ConfigError) -> Self {
        ChattermError::Config {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}
