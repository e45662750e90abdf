use serde::{Deserialize, Serialize};

/// Frame sent from client to server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutgoingFrame {
    #[serde(rename = "type")]
    pub kind: u8,
    pub text: String,
}

/// Frame received from the server.
///
/// Only `Type` is required. The server fills `Text` and `User` on every
/// frame, but only Text frames need them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomingFrame {
    #[serde(rename = "Type")]
    pub kind: i64,
    #[serde(rename = "Text", default)]
    pub text: Option<String>,
    #[serde(rename = "User", default)]
    pub user: Option<IncomingUser>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomingUser {
    #[serde(rename = "Name")]
    pub name: String,
}
