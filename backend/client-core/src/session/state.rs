use std::fmt;

/// Where the session is in the handshake.
///
/// The name lives inside the variants that need it, so a session holds a
/// name exactly when it has left [`Session::Entering`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Session {
    /// Waiting for the user to pick a name.
    #[default]
    Entering,
    /// Hello sent (or about to be); waiting for the server's verdict.
    AwaitingAuth { name: String },
    /// Name accepted; chat is live.
    Chatting { name: String },
}

impl Session {
    pub fn name(&self) -> Option<&str> {
        match self {
            Session::Entering => None,
            Session::AwaitingAuth { name } | Session::Chatting { name } => Some(name),
        }
    }

    pub fn phase(&self) -> Phase {
        match self {
            Session::Entering => Phase::Entering,
            Session::AwaitingAuth { .. } => Phase::AwaitingAuth,
            Session::Chatting { .. } => Phase::Chatting,
        }
    }

    pub fn is_chatting(&self) -> bool {
        matches!(self, Session::Chatting { .. })
    }
}

/// Name-free view of [`Session`], handy for logging and assertions.
///
/// `Rejected` never rests in a [`Session`]: a refused name passes through
/// it straight back to `Entering`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Entering,
    AwaitingAuth,
    Chatting,
    Rejected,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Phase::Entering => "entering",
            Phase::AwaitingAuth => "awaiting_auth",
            Phase::Chatting => "chatting",
            Phase::Rejected => "rejected",
        };
        write!(f, "{label}")
    }
}
