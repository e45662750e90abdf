pub mod config;
pub mod connection;
pub mod protocol;
pub mod session;

pub use connection::ConnectionError;
pub use protocol::ProtocolError;
pub use session::SessionError;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Protocol(#[from] protocol::ProtocolError),

    #[error(transparent)]
    Connection(#[from] connection::ConnectionError),

    #[error(transparent)]
    Session(#[from] session::SessionError),

    #[error(transparent)]
    Config(#[from] config::ConfigError),
}
