use common::ErrorLocation;

use std::panic::Location;

use thiserror::Error as ThisError;
use tokio_tungstenite::tungstenite::Error as WsError;

#[derive(Debug, ThisError)]
pub enum ConnectionError {
    #[error("Transport Error: {message} {location}")]
    Transport {
        message: String,
        location: ErrorLocation,
    },

    #[error("Handshake Error: {message} {location}")]
    Handshake {
        message: String,
        location: ErrorLocation,
    },

    #[error("Send Error: {message} {location}")]
    Send {
        message: String,
        location: ErrorLocation,
    },

    #[error("Endpoint Error: {message} {location}")]
    Endpoint {
        message: String,
        location: ErrorLocation,
    },

    #[error("Already Connected Error: {message} {location}")]
    AlreadyConnected {
        message: String,
        location: ErrorLocation,
    },
}

impl From<WsError> for ConnectionError {
    #[track_caller]
    fn from(error: WsError) -> Self {
        ConnectionError::Transport {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<url::ParseError> for ConnectionError {
    #[track_caller]
    fn from(error: url::ParseError) -> Self {
        ConnectionError::Endpoint {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}
