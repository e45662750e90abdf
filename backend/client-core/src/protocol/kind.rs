use crate::error::ProtocolError;

use std::fmt;

/// The six message kinds. Codes are a fixed contract with the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    /// Client asks to enter with a display name.
    Hello,
    /// Chat text, in either direction.
    Text,
    /// Token authentication attempt. Unused by this client.
    Auth,
    /// Server accepted the requested name.
    AuthAck,
    /// Server reset an authentication attempt.
    AuthRst,
    /// Server refused the requested name.
    MayNotEnter,
}

impl MessageKind {
    pub const ALL: [MessageKind; 6] = [
        MessageKind::Hello,
        MessageKind::Text,
        MessageKind::Auth,
        MessageKind::AuthAck,
        MessageKind::AuthRst,
        MessageKind::MayNotEnter,
    ];

    pub const fn code(self) -> u8 {
        match self {
            MessageKind::Hello => 0,
            MessageKind::Text => 1,
            MessageKind::Auth => 2,
            MessageKind::AuthAck => 3,
            MessageKind::AuthRst => 4,
            MessageKind::MayNotEnter => 5,
        }
    }
}

impl TryFrom<i64> for MessageKind {
    type Error = ProtocolError;

    #[track_caller]
    fn try_from(code: i64) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(MessageKind::Hello),
            1 => Ok(MessageKind::Text),
            2 => Ok(MessageKind::Auth),
            3 => Ok(MessageKind::AuthAck),
            4 => Ok(MessageKind::AuthRst),
            5 => Ok(MessageKind::MayNotEnter),
            other => Err(ProtocolError::unknown_kind(other)),
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MessageKind::Hello => "Hello",
            MessageKind::Text => "Text",
            MessageKind::Auth => "Auth",
            MessageKind::AuthAck => "AuthAck",
            MessageKind::AuthRst => "AuthRst",
            MessageKind::MayNotEnter => "MayNotEnter",
        };
        write!(f, "{name}")
    }
}
