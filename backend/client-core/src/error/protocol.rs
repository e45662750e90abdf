//! Errors raised while encoding or decoding wire frames.
//!
//! Decode failures are recoverable: the runtime logs them and keeps the
//! connection open. Nothing here should ever end a session.

use common::ErrorLocation;

use std::panic::Location;

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum ProtocolError {
    #[error("Malformed Frame Error: {message} {location}")]
    MalformedFrame {
        message: String,
        location: ErrorLocation,
    },

    #[error("Unknown Message Kind Error: code {code} {location}")]
    UnknownMessageKind { code: i64, location: ErrorLocation },

    #[error("Encode Error: {message} {location}")]
    Encode {
        message: String,
        location: ErrorLocation,
    },
}

impl ProtocolError {
    #[track_caller]
    pub fn malformed(message: impl Into<String>) -> Self {
        ProtocolError::MalformedFrame {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn unknown_kind(code: i64) -> Self {
        ProtocolError::UnknownMessageKind {
            code,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Short category name for log lines.
    pub fn error_category(&self) -> &'static str {
        match self {
            ProtocolError::MalformedFrame { .. } => "malformed_frame",
            ProtocolError::UnknownMessageKind { .. } => "unknown_message_kind",
            ProtocolError::Encode { .. } => "encode",
        }
    }
}

impl From<serde_json::Error> for ProtocolError {
    #[track_caller]
    fn from(error: serde_json::Error) -> Self {
        ProtocolError::MalformedFrame {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}
