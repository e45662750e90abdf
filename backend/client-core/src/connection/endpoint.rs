use crate::error::ConnectionError;
use crate::{CONNECT_PATH, DEFAULT_SERVER_HOST};

use common::ErrorLocation;

use std::fmt;
use std::panic::Location;

use url::Url;

/// Where the chat server lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub host: String,
    /// Use `wss://` instead of `ws://`.
    pub secure: bool,
    pub path: String,
}

impl Endpoint {
    pub fn new(host: impl Into<String>, secure: bool) -> Self {
        Self {
            host: host.into(),
            secure,
            path: CONNECT_PATH.to_string(),
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    pub fn scheme(&self) -> &'static str {
        if self.secure { "wss" } else { "ws" }
    }

    /// Full WebSocket URL for this endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectionError::Endpoint`] if the host or path do not form a valid URL.
    pub fn url(&self) -> Result<Url, ConnectionError> {
        if self.host.is_empty() {
            return Err(ConnectionError::Endpoint {
                message: "Server host is empty".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let url = Url::parse(&format!("{}://{}{}", self.scheme(), self.host, self.path))?;
        Ok(url)
    }
}

impl Default for Endpoint {
    fn default() -> Self {
        Self::new(DEFAULT_SERVER_HOST, false)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}{}", self.scheme(), self.host, self.path)
    }
}
