//! Test helpers for chat integration tests.
//!
//! This module provides:
//! - A scripted WebSocket chat server speaking the server's wire shape
//! - A recording presenter that logs every call the runtime makes
//! - Timeouts around channel reads so a broken test fails instead of hanging

use client_core::connection::{Endpoint, TransportEvent, TransportNotice};
use client_core::message_log::LogEntry;
use client_core::presenter::{Deferred, Presenter, RepaintQueue};

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tokio_tungstenite::accept_async;
use tokio_tungstenite::tungstenite::Message;

pub const TEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Name the test server always refuses.
pub const TAKEN_NAME: &str = "taken";

/// Sender of the welcome line sent after every accepted Hello.
pub const BOT_NAME: &str = "bot";

// ============================================================================
// Scripted server
// ============================================================================

/// What the test server saw from a client.
#[derive(Debug, Clone, PartialEq)]
pub enum Received {
    Frame(Value),
    Closed,
}

/// Extra behavior for the test server.
#[derive(Debug, Clone, Default)]
pub struct ServerScript {
    /// Raw frames sent right after AuthAck and the welcome line.
    pub after_ack: Vec<String>,
}

pub struct TestServer {
    pub addr: SocketAddr,
    pub received: UnboundedReceiver<Received>,
}

impl TestServer {
    pub fn endpoint(&self) -> Endpoint {
        Endpoint::new(self.addr.to_string(), false)
    }

    /// Next thing the server saw, or panic after [`TEST_TIMEOUT`].
    pub async fn next_received(&mut self) -> Received {
        tokio::time::timeout(TEST_TIMEOUT, self.received.recv())
            .await
            .expect("Timed out waiting for server to receive")
            .expect("Server log channel closed")
    }

    /// Everything the server saw until the client went away.
    pub async fn frames_until_closed(&mut self) -> Vec<Value> {
        let mut frames = Vec::new();
        loop {
            match self.next_received().await {
                Received::Frame(value) => frames.push(value),
                Received::Closed => return frames,
            }
        }
    }
}

/// Test helper: Start a chat server on an ephemeral localhost port.
///
/// - Hello with [`TAKEN_NAME`] gets MayNotEnter
/// - any other Hello gets AuthAck, a welcome line from [`BOT_NAME`], then `script.after_ack`
/// - Text is broadcast back to the sender under its name
pub async fn start_test_server(script: ServerScript) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test server");
    let addr = listener.local_addr().expect("No local address");
    let (received_tx, received_rx) = unbounded_channel();

    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            tokio::spawn(serve_client(stream, script.clone(), received_tx.clone()));
        }
    });

    TestServer {
        addr,
        received: received_rx,
    }
}

fn server_frame(kind: i64, name: &str, text: &str) -> String {
    json!({"Type": kind, "User": {"Name": name}, "Text": text}).to_string()
}

async fn serve_client(stream: TcpStream, script: ServerScript, received: UnboundedSender<Received>) {
    let Ok(ws_stream) = accept_async(stream).await else {
        return;
    };
    let (mut write, mut read) = ws_stream.split();
    let mut entered: Option<String> = None;

    while let Some(Ok(message)) = read.next().await {
        let text = match message {
            Message::Text(text) => text,
            Message::Close(_) => break,
            _ => continue,
        };

        let value: Value = serde_json::from_str(text.as_str()).expect("Client sent invalid JSON");
        let _ = received.send(Received::Frame(value.clone()));

        let payload = value["text"].as_str().unwrap_or_default().to_string();
        let mut replies = Vec::new();

        match value["type"].as_i64() {
            Some(0) if payload == TAKEN_NAME => {
                replies.push(server_frame(5, &payload, ""));
            }
            Some(0) => {
                replies.push(server_frame(3, &payload, ""));
                replies.push(server_frame(1, BOT_NAME, &format!("Hi @{payload}!")));
                replies.extend(script.after_ack.iter().cloned());
                entered = Some(payload);
            }
            Some(1) => {
                if let Some(name) = &entered {
                    replies.push(server_frame(1, name, &payload));
                }
            }
            _ => {}
        }

        for reply in replies {
            if write.send(Message::Text(reply.into())).await.is_err() {
                break;
            }
        }
    }

    let _ = received.send(Received::Closed);
}

/// Test helper: Receive the next transport notice or panic after [`TEST_TIMEOUT`].
pub async fn next_notice(events: &mut UnboundedReceiver<TransportNotice>) -> TransportNotice {
    tokio::time::timeout(TEST_TIMEOUT, events.recv())
        .await
        .expect("Timed out waiting for transport notice")
        .expect("Transport channel closed")
}

/// Test helper: Skip notices until one matches.
pub async fn wait_for_notice(
    events: &mut UnboundedReceiver<TransportNotice>,
    matches: impl Fn(&TransportEvent) -> bool,
) -> TransportNotice {
    loop {
        let notice = next_notice(events).await;
        if matches(&notice.event) {
            return notice;
        }
    }
}

// ============================================================================
// Recording presenter
// ============================================================================

/// One call made on the presenter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ShowChat,
    GuardNavigation,
    ResetEntry,
    RenderEntry(LogEntry),
    ScrollToLatest,
    Notice(String),
    Repaint,
}

/// Presenter that records calls in order. Clones share the same record.
#[derive(Clone, Default)]
pub struct RecordingPresenter {
    calls: Arc<Mutex<Vec<Call>>>,
    deferred: Arc<Mutex<RepaintQueue>>,
}

impl RecordingPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, call: &Call) -> usize {
        self.calls().iter().filter(|c| *c == call).count()
    }

    pub fn notices(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Notice(text) => Some(text),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    /// Poll until `predicate` holds on the recorded calls, or panic after [`TEST_TIMEOUT`].
    pub async fn wait_until(&self, predicate: impl Fn(&[Call]) -> bool) {
        tokio::time::timeout(TEST_TIMEOUT, async {
            while !predicate(&self.calls()) {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .expect("Timed out waiting for presenter calls");
    }
}

impl Presenter for RecordingPresenter {
    fn show_chat(&mut self) {
        self.record(Call::ShowChat);
    }

    fn guard_navigation(&mut self) {
        self.record(Call::GuardNavigation);
    }

    fn reset_entry(&mut self) {
        self.record(Call::ResetEntry);
    }

    fn render_entry(&mut self, entry: &LogEntry) {
        self.record(Call::RenderEntry(entry.clone()));
    }

    fn scroll_to_latest(&mut self) {
        self.record(Call::ScrollToLatest);
    }

    fn show_notice(&mut self, notice: &str) {
        self.record(Call::Notice(notice.to_string()));
    }

    fn after_repaint(&mut self, deferred: Deferred) {
        self.deferred.lock().unwrap().push(deferred);
    }

    fn repaint(&mut self) {
        self.record(Call::Repaint);
        let pending = self.deferred.lock().unwrap().drain();
        for Deferred::Notice(text) in pending {
            self.record(Call::Notice(text));
        }
    }
}
