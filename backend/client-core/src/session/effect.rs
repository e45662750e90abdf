use crate::message_log::LogEntry;

/// Work the state machine asks the runtime to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Open a connection; Hello(name) goes out as soon as it is up.
    OpenConnection { name: String },

    /// Send chat text over the open connection.
    SendText { text: String },

    /// Drop the current connection.
    CloseConnection,

    /// Hide name entry, show and focus chat input.
    ShowChat,

    /// Ask before leaving, since leaving ends the session.
    GuardNavigation,

    /// Clear and refocus name entry.
    EnteringReset,

    /// Tell the user their name was refused, after the reset has rendered.
    ShowRejection { notice: String },

    /// Record a chat line.
    AppendEntry(LogEntry),
}
