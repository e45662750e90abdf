use crate::error::ProtocolError;
use crate::protocol::frame::{IncomingFrame, OutgoingFrame};
use crate::protocol::kind::MessageKind;

use common::ErrorLocation;

use std::panic::Location;

/// Something the user wants sent to the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Hello { name: String },
    Text { text: String },
}

impl Intent {
    pub fn kind(&self) -> MessageKind {
        match self {
            Intent::Hello { .. } => MessageKind::Hello,
            Intent::Text { .. } => MessageKind::Text,
        }
    }

    fn into_payload(self) -> String {
        match self {
            Intent::Hello { name } => name,
            Intent::Text { text } => text,
        }
    }
}

/// A validated frame from the server. One variant per message kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WireEvent {
    Hello,
    Text { sender: String, text: String },
    Auth,
    AuthAck,
    AuthRst,
    MayNotEnter,
}

impl WireEvent {
    pub fn kind(&self) -> MessageKind {
        match self {
            WireEvent::Hello => MessageKind::Hello,
            WireEvent::Text { .. } => MessageKind::Text,
            WireEvent::Auth => MessageKind::Auth,
            WireEvent::AuthAck => MessageKind::AuthAck,
            WireEvent::AuthRst => MessageKind::AuthRst,
            WireEvent::MayNotEnter => MessageKind::MayNotEnter,
        }
    }
}

/// Encode an intent as a JSON text frame.
pub fn encode(intent: Intent) -> Result<String, ProtocolError> {
    let frame = OutgoingFrame {
        kind: intent.kind().code(),
        text: intent.into_payload(),
    };

    serde_json::to_string(&frame).map_err(|e| ProtocolError::Encode {
        message: format!("Failed to encode frame: {e}"),
        location: ErrorLocation::from(Location::caller()),
    })
}

/// Decode and validate a JSON frame from the server.
///
/// # Errors
///
/// - [`ProtocolError::MalformedFrame`] if the payload is not a JSON object with an
///   integer `Type`, or a Text frame lacks `User.Name`
/// - [`ProtocolError::UnknownMessageKind`] if `Type` is outside the six known codes
pub fn decode(raw: &str) -> Result<WireEvent, ProtocolError> {
    let frame: IncomingFrame = serde_json::from_str(raw)?;

    let event = match MessageKind::try_from(frame.kind)? {
        MessageKind::Hello => WireEvent::Hello,
        MessageKind::Text => {
            let sender = frame
                .user
                .map(|user| user.name)
                .ok_or_else(|| ProtocolError::malformed("Text frame has no User.Name"))?;
            WireEvent::Text {
                sender,
                text: frame.text.unwrap_or_default(),
            }
        }
        MessageKind::Auth => WireEvent::Auth,
        MessageKind::AuthAck => WireEvent::AuthAck,
        MessageKind::AuthRst => WireEvent::AuthRst,
        MessageKind::MayNotEnter => WireEvent::MayNotEnter,
    };

    Ok(event)
}

/// Decode a binary frame carrying UTF-8 JSON.
pub fn decode_bytes(raw: &[u8]) -> Result<WireEvent, ProtocolError> {
    let text = std::str::from_utf8(raw)
        .map_err(|e| ProtocolError::malformed(format!("Binary frame is not UTF-8: {e}")))?;
    decode(text)
}
