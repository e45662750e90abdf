//! Ownership of the single live server connection.
//!
//! [`ConnectionManager`] holds at most one connection. The socket itself is
//! driven by a background task; the manager only keeps the sending half of
//! its command channel. Everything the task observes comes back as a
//! [`TransportNotice`] on the channel handed to the manager at construction.

mod endpoint;
mod manager;
mod transport;

pub use endpoint::Endpoint;
pub use manager::ConnectionManager;
pub use transport::{ConnectionId, FramePayload, TransportEvent, TransportNotice};
