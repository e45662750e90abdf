use common::ErrorLocation;

use std::panic::Location;

use thiserror::Error as ThisError;

/// User-facing text shown when the server declines a name.
pub const REJECTED_NAME_NOTICE: &str =
    "User name is too long or another user is already using that username. Try a different one.";

#[derive(Debug, ThisError)]
pub enum SessionError {
    /// The server declined the requested name (taken, or too long).
    #[error("{}", REJECTED_NAME_NOTICE)]
    RejectedName { name: String, location: ErrorLocation },
}

impl SessionError {
    #[track_caller]
    pub fn rejected_name(name: impl Into<String>) -> Self {
        SessionError::RejectedName {
            name: name.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Text to put in front of the user.
    pub fn notice(&self) -> String {
        self.to_string()
    }
}
