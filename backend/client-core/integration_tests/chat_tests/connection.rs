use crate::chat_tests::helpers::{
    Received, ServerScript, TEST_TIMEOUT, next_notice, start_test_server, wait_for_notice,
};

use client_core::connection::{ConnectionManager, Endpoint, FramePayload, TransportEvent};
use client_core::error::ConnectionError;
use client_core::protocol::WireEvent;

use serde_json::json;
use tokio::io::AsyncReadExt;
use tokio::net::TcpListener;
use tokio::sync::mpsc::unbounded_channel;

// ============================================================================
// Public API tests for ConnectionManager
// These run against a real local WebSocket server
// ============================================================================

/// **VALUE**: Verifies Hello(name) is the first frame on a new connection.
///
/// **WHY THIS MATTERS**: The server treats the first frame as the entry request. Anything
/// sent before Hello is dropped, and the client would never be admitted.
///
/// **BUG THIS CATCHES**: Would catch:
/// - Reporting Opened before Hello is written
/// - Encoding Hello with the wrong code or field names
#[tokio::test]
async fn given_server_when_connect_called_then_hello_is_first_frame() {
    // GIVEN: A running chat server
    let mut server = start_test_server(ServerScript::default()).await;
    let (events_tx, mut events_rx) = unbounded_channel();
    let mut manager = ConnectionManager::new(server.endpoint(), events_tx);

    // WHEN: Connecting as alice
    let id = manager.connect("alice").expect("connect should succeed");

    // THEN: Opened is reported for this connection
    let opened = wait_for_notice(&mut events_rx, |e| matches!(e, TransportEvent::Opened)).await;
    assert_eq!(opened.connection, id);
    assert!(manager.is_open());

    // AND: The server's first frame is exactly Hello(alice)
    assert_eq!(
        server.next_received().await,
        Received::Frame(json!({"type": 0, "text": "alice"}))
    );
}

/// **VALUE**: Verifies chat text travels to the server and broadcasts come back.
///
/// **BUG THIS CATCHES**: Would catch a writer loop that stops after Hello, or a reader
/// that drops frames.
#[tokio::test]
async fn given_open_connection_when_send_called_then_server_receives_text_and_echo_returns() {
    // GIVEN: An open, accepted connection
    let mut server = start_test_server(ServerScript::default()).await;
    let (events_tx, mut events_rx) = unbounded_channel();
    let mut manager = ConnectionManager::new(server.endpoint(), events_tx);
    manager.connect("alice").unwrap();
    wait_for_notice(&mut events_rx, |e| matches!(e, TransportEvent::Opened)).await;
    server.next_received().await;

    // WHEN: Sending text
    manager.send("hello room");

    // THEN: Server receives it as a Text frame
    assert_eq!(
        server.next_received().await,
        Received::Frame(json!({"type": 1, "text": "hello room"}))
    );

    // AND: The broadcast comes back from alice
    let echoed = wait_for_notice(&mut events_rx, |e| match e {
        TransportEvent::Frame(payload) => matches!(
            payload.decode(),
            Ok(WireEvent::Text { ref sender, .. }) if sender == "alice"
        ),
        _ => false,
    })
    .await;
    match echoed.event {
        TransportEvent::Frame(FramePayload::Text(raw)) => assert!(raw.contains("hello room")),
        other => panic!("Expected text frame, got {other:?}"),
    }
}

/// **VALUE**: Verifies `close()` followed by `send()` has no transport effect.
///
/// **WHY THIS MATTERS**: After close nobody holds the connection. A late send must not
/// resurrect it or leak a frame onto a dying socket.
///
/// **BUG THIS CATCHES**: Would catch a close that forgets to clear the slot.
#[tokio::test]
async fn given_closed_connection_when_send_called_then_server_sees_nothing() {
    // GIVEN: An open connection
    let mut server = start_test_server(ServerScript::default()).await;
    let (events_tx, mut events_rx) = unbounded_channel();
    let mut manager = ConnectionManager::new(server.endpoint(), events_tx);
    manager.connect("alice").unwrap();
    wait_for_notice(&mut events_rx, |e| matches!(e, TransportEvent::Opened)).await;

    // WHEN: Closing then sending
    manager.close();
    manager.send("x");

    // THEN: The manager holds nothing
    assert!(!manager.is_open());
    assert_eq!(manager.current(), None);

    // AND: The server saw only Hello before the close
    let frames = server.frames_until_closed().await;
    assert_eq!(frames, vec![json!({"type": 0, "text": "alice"})]);
}

#[tokio::test]
async fn given_no_connection_when_send_or_close_called_then_no_op() {
    let (events_tx, mut events_rx) = unbounded_channel();
    let mut manager = ConnectionManager::new(Endpoint::default(), events_tx);

    manager.send("nobody hears this");
    manager.close();

    assert!(!manager.is_open());
    assert!(events_rx.try_recv().is_err(), "No transport activity expected");
}

/// **VALUE**: Only one connection can be held at a time.
///
/// **BUG THIS CATCHES**: Would catch a second connect silently replacing the first and
/// leaking its socket.
#[tokio::test]
async fn given_open_connection_when_connect_called_again_then_refused() {
    let server = start_test_server(ServerScript::default()).await;
    let (events_tx, _events_rx) = unbounded_channel();
    let mut manager = ConnectionManager::new(server.endpoint(), events_tx);
    let first = manager.connect("alice").unwrap();

    let second = manager.connect("bob");

    assert!(matches!(second, Err(ConnectionError::AlreadyConnected { .. })));
    assert_eq!(manager.current(), Some(first));
}

/// **VALUE**: A failed connect is reported as events, not a panic or a retry.
///
/// **WHY THIS MATTERS**: Transport faults are logged and surfaced; reconnecting is left to
/// the user.
///
/// **BUG THIS CATCHES**: Would catch a missing Closed after a handshake error, which would
/// leave the slot held forever.
#[tokio::test]
async fn given_unreachable_server_when_connect_called_then_error_then_closed() {
    // GIVEN: A port with nothing listening
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let (events_tx, mut events_rx) = unbounded_channel();
    let mut manager = ConnectionManager::new(Endpoint::new(addr.to_string(), false), events_tx);

    // WHEN: Connecting
    let id = manager.connect("alice").unwrap();

    // THEN: Error, then Closed, for that connection
    let first = next_notice(&mut events_rx).await;
    assert_eq!(first.connection, id);
    assert!(matches!(
        first.event,
        TransportEvent::Error(ConnectionError::Handshake { .. })
    ));
    let second = next_notice(&mut events_rx).await;
    assert!(matches!(second.event, TransportEvent::Closed));

    // AND: Acknowledging the close frees the slot for a new connect
    assert!(manager.handle_closed(id));
    assert!(!manager.is_open());
    assert!(!manager.handle_closed(id), "Second acknowledgement is stale");
}

/// **VALUE**: Verifies `close()` stops a connection whose handshake is still in flight.
///
/// **WHY THIS MATTERS**: Closing is immediate. A user who gives up on a slow server must
/// not be entered with the abandoned name once the server finally answers.
///
/// **BUG THIS CATCHES**: Would catch a transport task that only looks at its command
/// queue after the handshake, finishing it and writing Hello anyway.
#[tokio::test]
async fn given_handshake_pending_when_close_called_then_no_hello_written() {
    // GIVEN: A server that accepts TCP but never answers the upgrade request
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (events_tx, mut events_rx) = unbounded_channel();
    let mut manager = ConnectionManager::new(Endpoint::new(addr.to_string(), false), events_tx);
    let id = manager.connect("alice").unwrap();

    let (mut socket, _) = tokio::time::timeout(TEST_TIMEOUT, listener.accept())
        .await
        .expect("Client never connected")
        .unwrap();
    let mut request = Vec::new();
    let mut chunk = [0u8; 1024];
    while !request.windows(4).any(|w| w == b"\r\n\r\n") {
        let read = tokio::time::timeout(TEST_TIMEOUT, socket.read(&mut chunk))
            .await
            .expect("Upgrade request never arrived")
            .unwrap();
        assert!(read > 0, "Client hung up before finishing the upgrade request");
        request.extend_from_slice(&chunk[..read]);
    }
    assert!(request.starts_with(b"GET /connect"));

    // WHEN: Closing while the handshake waits on the server
    manager.close();

    // THEN: The only notice is Closed; Opened (sent after Hello) never comes
    let notice = next_notice(&mut events_rx).await;
    assert_eq!(notice.connection, id);
    assert!(matches!(notice.event, TransportEvent::Closed));

    // AND: The client hung up without writing anything after the upgrade request
    let mut rest = Vec::new();
    tokio::time::timeout(TEST_TIMEOUT, socket.read_to_end(&mut rest))
        .await
        .expect("Client kept the socket open")
        .unwrap();
    assert!(rest.is_empty());
    assert!(events_rx.try_recv().is_err());
}

/// **VALUE**: Verifies `wss://` endpoints actually attempt TLS.
///
/// **WHY THIS MATTERS**: Deployed servers only accept secure origins. Without a TLS
/// backend compiled in, every secure connect fails before reaching the network.
///
/// **BUG THIS CATCHES**: Would catch the TLS feature being dropped from tokio-tungstenite.
#[tokio::test]
async fn given_secure_endpoint_when_connect_called_then_tls_handshake_attempted() {
    // GIVEN: A TCP server that hangs up on every connection (no TLS on offer)
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        while let Ok((socket, _)) = listener.accept().await {
            drop(socket);
        }
    });
    let (events_tx, mut events_rx) = unbounded_channel();
    let mut manager = ConnectionManager::new(Endpoint::new(addr.to_string(), true), events_tx);

    // WHEN: Connecting securely
    manager.connect("alice").unwrap();

    // THEN: The handshake fails on the wire, not for lack of TLS support
    let notice = next_notice(&mut events_rx).await;
    match notice.event {
        TransportEvent::Error(ConnectionError::Handshake { message, .. }) => {
            assert!(
                !message.contains("TLS support not compiled in"),
                "TLS backend missing: {message}"
            );
        }
        other => panic!("Expected a handshake error, got {other:?}"),
    }
    assert!(matches!(
        next_notice(&mut events_rx).await.event,
        TransportEvent::Closed
    ));
}

#[test]
fn given_empty_host_when_url_built_then_endpoint_error() {
    let endpoint = Endpoint::new("", false);

    assert!(matches!(
        endpoint.url(),
        Err(ConnectionError::Endpoint { .. })
    ));
}

#[test]
fn given_secure_endpoint_when_url_built_then_uses_wss() {
    let endpoint = Endpoint::new("chat.example.org", true).with_path("/ws");

    assert_eq!(endpoint.url().unwrap().as_str(), "wss://chat.example.org/ws");
    assert_eq!(endpoint.to_string(), "wss://chat.example.org/ws");
}
