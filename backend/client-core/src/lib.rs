pub mod color;
pub mod config;
pub mod connection;
pub mod error;
pub mod message_log;
pub mod presenter;
pub mod protocol;
pub mod runtime;
pub mod session;

#[cfg(test)]
mod tests;

pub const DEFAULT_SERVER_HOST: &str = "127.0.0.1:9990";
pub const CONNECT_PATH: &str = "/connect";
pub const DEFAULT_SERVER_URL: &str =
    const_format::concatcp!("ws://", DEFAULT_SERVER_HOST, CONNECT_PATH);

/// Number of entries the message log keeps before evicting the oldest.
pub const MESSAGE_LOG_CAPACITY: usize = 500;
