use crate::connection::endpoint::Endpoint;
use crate::connection::transport::{ConnectionId, Outbound, TransportNotice, run_connection};
use crate::error::{ConnectionError, ProtocolError};
use crate::protocol::{Intent, encode};

use common::ErrorLocation;

use std::panic::Location;

use log::{debug, info, warn};
use tokio::sync::mpsc::{UnboundedSender, unbounded_channel};

/// Handle to the connection task currently owned by the manager.
struct LiveConnection {
    id: ConnectionId,
    outbound: UnboundedSender<Outbound>,
}

/// Owns the one live connection to the chat server.
///
/// `send` and `close` never wait on the network. Their results, like
/// everything else the socket does, arrive later as [`TransportNotice`]s.
///
/// # Examples
///
/// ```no_run
/// use client_core::connection::{ConnectionManager, Endpoint};
/// use tokio::sync::mpsc::unbounded_channel;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let (events_tx, mut events_rx) = unbounded_channel();
///     let mut manager = ConnectionManager::new(Endpoint::default(), events_tx);
///     manager.connect("alice")?;
///     while let Some(notice) = events_rx.recv().await {
///         println!("{}: {:?}", notice.connection, notice.event);
///     }
///     Ok(())
/// }
/// ```
pub struct ConnectionManager {
    endpoint: Endpoint,
    events: UnboundedSender<TransportNotice>,
    live: Option<LiveConnection>,
    next_id: u64,
}

impl ConnectionManager {
    pub fn new(endpoint: Endpoint, events: UnboundedSender<TransportNotice>) -> Self {
        Self {
            endpoint,
            events,
            live: None,
            next_id: 1,
        }
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn is_open(&self) -> bool {
        self.live.is_some()
    }

    /// Id of the connection currently held, if any.
    pub fn current(&self) -> Option<ConnectionId> {
        self.live.as_ref().map(|live| live.id)
    }

    /// Open a connection and send Hello(`name`) as soon as it is up.
    ///
    /// Must be called from within a Tokio runtime.
    ///
    /// # Errors
    ///
    /// - [`ConnectionError::AlreadyConnected`] if a connection is already held
    /// - [`ConnectionError::Endpoint`] if the endpoint does not form a valid URL
    /// - [`ConnectionError::Send`] if the Hello frame cannot be encoded
    pub fn connect(&mut self, name: &str) -> Result<ConnectionId, ConnectionError> {
        if let Some(live) = &self.live {
            warn!("connect({name}) refused: {} is still open", live.id);
            return Err(ConnectionError::AlreadyConnected {
                message: format!("{} is still open", live.id),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let url = self.endpoint.url()?;
        let hello = encode(Intent::Hello {
            name: name.to_string(),
        })
        .map_err(|e| encode_failure(&e))?;

        let id = ConnectionId(self.next_id);
        self.next_id += 1;

        let (outbound_tx, outbound_rx) = unbounded_channel();
        info!("{id}: connecting to {url}");
        tokio::spawn(run_connection(
            id,
            url,
            hello,
            outbound_rx,
            self.events.clone(),
        ));

        self.live = Some(LiveConnection {
            id,
            outbound: outbound_tx,
        });

        Ok(id)
    }

    /// Queue chat text for the server. Does nothing without a connection.
    pub fn send(&mut self, text: &str) {
        let Some(live) = &self.live else {
            debug!("send dropped: no connection");
            return;
        };

        let frame = match encode(Intent::Text {
            text: text.to_string(),
        }) {
            Ok(frame) => frame,
            Err(e) => {
                warn!("{}: {}", live.id, encode_failure(&e));
                return;
            }
        };

        if live.outbound.send(Outbound::Frame(frame)).is_err() {
            warn!("{}: connection task has already stopped", live.id);
        }
    }

    /// Terminate the connection and drop our handle to it.
    pub fn close(&mut self) {
        let Some(live) = self.live.take() else {
            return;
        };

        info!("{}: closing", live.id);
        // The task also stops when the sender is dropped; Close just says so explicitly.
        let _ = live.outbound.send(Outbound::Close);
    }

    /// The transport reported `id` closed on its own. Returns true if that
    /// was the connection we held.
    pub fn handle_closed(&mut self, id: ConnectionId) -> bool {
        match &self.live {
            Some(live) if live.id == id => {
                self.live = None;
                true
            }
            _ => false,
        }
    }

    /// Whether `id` names the connection currently held.
    pub fn is_current(&self, id: ConnectionId) -> bool {
        self.current() == Some(id)
    }
}

#[track_caller]
fn encode_failure(error: &ProtocolError) -> ConnectionError {
    ConnectionError::Send {
        message: format!("Failed to encode frame: {error}"),
        location: ErrorLocation::from(Location::caller()),
    }
}
