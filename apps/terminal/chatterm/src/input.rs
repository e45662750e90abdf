//! Line input from the terminal.
//!
//! Stdin is read on a plain thread. Tokio's stdin would keep the runtime
//! alive on shutdown until the user pressed Enter once more.

use client_core::runtime::ClientEvent;

use std::io::BufRead;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};

use log::{debug, warn};
use tokio::sync::mpsc::UnboundedSender;

pub const QUIT_COMMAND: &str = "/quit";

/// Whether typed lines are chat text or a name. Shared between the presenter,
/// which flips it, and the input reader, which reads it.
#[derive(Debug, Clone, Default)]
pub struct InputMode {
    chatting: Arc<AtomicBool>,
}

impl InputMode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_chatting(&self) -> bool {
        self.chatting.load(Ordering::SeqCst)
    }

    pub fn set_chatting(&self, chatting: bool) {
        self.chatting.store(chatting, Ordering::SeqCst);
    }
}

/// Turn one typed line into a client event.
pub fn parse_line(line: &str, mode: &InputMode) -> ClientEvent {
    let line = line.trim_end_matches(['\r', '\n']);

    if line.trim() == QUIT_COMMAND {
        return ClientEvent::Quit;
    }

    if mode.is_chatting() {
        ClientEvent::SubmitText(line.to_string())
    } else {
        ClientEvent::SubmitName(line.to_string())
    }
}

/// Queue a name given up front (`--name`). Returns false if the runtime has
/// already stopped listening.
pub fn submit_startup_name(events: &UnboundedSender<ClientEvent>, name: &str) -> bool {
    if events.send(ClientEvent::SubmitName(name.to_string())).is_err() {
        warn!("Could not submit --name {name}: runtime is not listening");
        return false;
    }
    true
}

/// Forward every line of `reader` as a [`ClientEvent`] until EOF.
///
/// Returning drops `events`, which the runtime treats as the user leaving.
pub fn forward_lines<R: BufRead>(reader: R, mode: &InputMode, events: &UnboundedSender<ClientEvent>) {
    for line in reader.lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                warn!("Failed to read input: {e}");
                break;
            }
        };

        if events.send(parse_line(&line, mode)).is_err() {
            debug!("Runtime stopped; input reader exiting");
            return;
        }
    }

    debug!("Input reached EOF");
}

pub fn spawn_stdin_reader(mode: InputMode, events: UnboundedSender<ClientEvent>) -> JoinHandle<()> {
    thread::spawn(move || {
        let stdin = std::io::stdin();
        forward_lines(stdin.lock(), &mode, &events);
    })
}
