//! Background task driving one WebSocket connection.

use crate::error::{ConnectionError, ProtocolError};
use crate::protocol::{WireEvent, decode, decode_bytes};

use common::ErrorLocation;

use std::fmt;
use std::panic::Location;
use std::sync::Once;

use futures_util::{SinkExt, StreamExt};
use log::{debug, error, info, warn};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use url::Url;

/// Identifies one connection attempt, so events from an old connection can
/// be told apart from the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(pub(crate) u64);

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// Raw data frame as received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FramePayload {
    Text(String),
    Binary(Vec<u8>),
}

impl FramePayload {
    pub fn decode(&self) -> Result<WireEvent, ProtocolError> {
        match self {
            FramePayload::Text(text) => decode(text),
            FramePayload::Binary(bytes) => decode_bytes(bytes),
        }
    }
}

impl fmt::Display for FramePayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FramePayload::Text(text) => write!(f, "{text}"),
            FramePayload::Binary(bytes) => write!(f, "<{} binary bytes>", bytes.len()),
        }
    }
}

/// What happened on a connection.
#[derive(Debug)]
pub enum TransportEvent {
    /// Socket is up and Hello has been written.
    Opened,
    Frame(FramePayload),
    Error(ConnectionError),
    /// Socket is gone. Always the last event for a connection.
    Closed,
}

#[derive(Debug)]
pub struct TransportNotice {
    pub connection: ConnectionId,
    pub event: TransportEvent,
}

/// Commands from the manager to the task.
#[derive(Debug)]
pub(crate) enum Outbound {
    Frame(String),
    Close,
}

struct Notifier {
    connection: ConnectionId,
    events: UnboundedSender<TransportNotice>,
}

impl Notifier {
    fn notify(&self, event: TransportEvent) {
        let notice = TransportNotice {
            connection: self.connection,
            event,
        };
        if self.events.send(notice).is_err() {
            debug!("{}: event receiver dropped", self.connection);
        }
    }
}

static INSTALL_CRYPTO_PROVIDER: Once = Once::new();

/// rustls needs a process-wide crypto provider before the first `wss://` handshake.
fn install_crypto_provider() {
    INSTALL_CRYPTO_PROVIDER.call_once(|| {
        if rustls::crypto::ring::default_provider()
            .install_default()
            .is_err()
        {
            debug!("TLS crypto provider was already installed");
        }
    });
}

/// Connect, write Hello, then pump frames both ways until either side closes.
pub(crate) async fn run_connection(
    connection: ConnectionId,
    url: Url,
    hello: String,
    mut outbound: UnboundedReceiver<Outbound>,
    events: UnboundedSender<TransportNotice>,
) {
    let notifier = Notifier { connection, events };

    if url.scheme() == "wss" {
        install_crypto_provider();
    }

    // Frames queued while the handshake is in flight go out right after Hello.
    let mut queued = Vec::new();
    let handshake = connect_async(url.as_str());
    tokio::pin!(handshake);

    let ws_stream = loop {
        tokio::select! {
            result = &mut handshake => match result {
                Ok((ws_stream, _response)) => break ws_stream,
                Err(e) => {
                    error!("{connection}: WebSocket handshake with {url} failed: {e}");
                    notifier.notify(TransportEvent::Error(ConnectionError::Handshake {
                        message: format!("WebSocket handshake failed: {e}"),
                        location: ErrorLocation::from(Location::caller()),
                    }));
                    notifier.notify(TransportEvent::Closed);
                    return;
                }
            },
            command = outbound.recv() => match command {
                Some(Outbound::Frame(text)) => queued.push(text),
                Some(Outbound::Close) | None => {
                    info!("{connection}: closed before the handshake finished");
                    notifier.notify(TransportEvent::Closed);
                    return;
                }
            },
        }
    };

    info!("{connection}: connected to {url}");
    let (mut write, mut read) = ws_stream.split();

    if let Err(e) = write.send(Message::Text(hello.into())).await {
        error!("{connection}: failed to send Hello: {e}");
        notifier.notify(TransportEvent::Error(ConnectionError::Send {
            message: format!("Failed to send Hello: {e}"),
            location: ErrorLocation::from(Location::caller()),
        }));
        notifier.notify(TransportEvent::Closed);
        return;
    }
    notifier.notify(TransportEvent::Opened);

    for text in queued {
        if let Err(e) = write.send(Message::Text(text.into())).await {
            error!("{connection}: send failed: {e}");
            notifier.notify(TransportEvent::Error(ConnectionError::Send {
                message: format!("Failed to send frame: {e}"),
                location: ErrorLocation::from(Location::caller()),
            }));
            notifier.notify(TransportEvent::Closed);
            return;
        }
    }

    loop {
        tokio::select! {
            command = outbound.recv() => match command {
                Some(Outbound::Frame(text)) => {
                    if let Err(e) = write.send(Message::Text(text.into())).await {
                        error!("{connection}: send failed: {e}");
                        notifier.notify(TransportEvent::Error(ConnectionError::Send {
                            message: format!("Failed to send frame: {e}"),
                            location: ErrorLocation::from(Location::caller()),
                        }));
                        break;
                    }
                }
                Some(Outbound::Close) | None => {
                    debug!("{connection}: closing on request");
                    if let Err(e) = write.close().await {
                        debug!("{connection}: close handshake failed: {e}");
                    }
                    break;
                }
            },
            incoming = read.next() => match incoming {
                Some(Ok(Message::Text(text))) => {
                    notifier.notify(TransportEvent::Frame(FramePayload::Text(text.as_str().to_owned())));
                }
                Some(Ok(Message::Binary(data))) => {
                    notifier.notify(TransportEvent::Frame(FramePayload::Binary(data.to_vec())));
                }
                Some(Ok(Message::Close(frame))) => {
                    info!("{connection}: server closed the connection ({frame:?})");
                    break;
                }
                // Ping/pong are answered by tungstenite.
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    warn!("{connection}: read failed: {e}");
                    notifier.notify(TransportEvent::Error(ConnectionError::from(e)));
                    break;
                }
                None => {
                    info!("{connection}: stream ended");
                    break;
                }
            },
        }
    }

    notifier.notify(TransportEvent::Closed);
}
