//! Wire protocol spoken with the chat server.
//!
//! Frames are JSON objects. The two directions use different field casing:
//!
//! - client → server: `{"type": <code>, "text": <string>}`
//! - server → client: `{"Type": <code>, "Text": <string>, "User": {"Name": <string>}}`
//!
//! The asymmetry is what the deployed server speaks, so both shapes are kept.

mod codec;
mod frame;
mod kind;

pub use codec::{Intent, WireEvent, decode, decode_bytes, encode};
pub use frame::{IncomingFrame, IncomingUser, OutgoingFrame};
pub use kind::MessageKind;
