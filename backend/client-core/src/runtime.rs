//! The chat event loop.
//!
//! [`ChatRuntime`] is the single owner of all mutable client state: the
//! session, the message log and the connection slot. User input and
//! transport notices are handled one at a time, each to completion, and the
//! presenter is repainted after every event. Nothing else mutates this
//! state, so no locking is needed.

use crate::connection::{ConnectionManager, Endpoint, TransportEvent, TransportNotice};
use crate::message_log::MessageLog;
use crate::presenter::{Deferred, Presenter};
use crate::session::{Effect, Phase, Session, SessionStateMachine, Transition};

use log::{debug, error, info, warn};
use tokio::sync::mpsc::{UnboundedReceiver, unbounded_channel};

/// Shown when quitting would end a live chat session.
pub const LEAVE_CONFIRM_NOTICE: &str =
    "Leaving ends your chat session. Quit again to leave.";

/// Shown when the server connection goes away.
pub const DISCONNECTED_NOTICE: &str =
    "Disconnected from the server. Restart to enter again.";

/// Shown when a name was submitted but the server could not be reached.
pub const UNREACHABLE_NOTICE: &str =
    "Could not reach the server. Enter a name to try again.";

/// Input from the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    SubmitName(String),
    SubmitText(String),
    Quit,
}

/// Whether the loop keeps going after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

pub struct ChatRuntime<P: Presenter> {
    machine: SessionStateMachine,
    log: MessageLog,
    connection: ConnectionManager,
    transport_rx: UnboundedReceiver<TransportNotice>,
    presenter: P,
    navigation_guarded: bool,
    quit_pending: bool,
    debug_frames: bool,
}

impl<P: Presenter> ChatRuntime<P> {
    pub fn new(endpoint: Endpoint, presenter: P) -> Self {
        let (transport_tx, transport_rx) = unbounded_channel();
        Self {
            machine: SessionStateMachine::new(),
            log: MessageLog::new(),
            connection: ConnectionManager::new(endpoint, transport_tx),
            transport_rx,
            presenter,
            navigation_guarded: false,
            quit_pending: false,
            debug_frames: false,
        }
    }

    /// Log every incoming frame at debug level.
    pub fn with_debug_frames(mut self, enabled: bool) -> Self {
        self.debug_frames = enabled;
        self
    }

    pub fn session(&self) -> &Session {
        self.machine.session()
    }

    pub fn log(&self) -> &MessageLog {
        &self.log
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn connection(&self) -> &ConnectionManager {
        &self.connection
    }

    pub fn is_navigation_guarded(&self) -> bool {
        self.navigation_guarded
    }

    /// Drive the loop until the user quits or input ends.
    ///
    /// The connection, if any, is closed before returning.
    pub async fn run(&mut self, mut input: UnboundedReceiver<ClientEvent>) {
        info!("Chat runtime started against {}", self.connection.endpoint());

        loop {
            let flow = tokio::select! {
                event = input.recv() => match event {
                    Some(event) => self.handle_client_event(event),
                    None => {
                        info!("Input closed");
                        Flow::Exit
                    }
                },
                Some(notice) = self.transport_rx.recv() => self.handle_transport(notice),
            };

            self.presenter.repaint();

            if flow == Flow::Exit {
                break;
            }
        }

        self.connection.close();
        self.presenter.repaint();
        info!("Chat runtime stopped");
    }

    /// Wait for the next transport notice. Used when driving the runtime by hand.
    pub async fn next_transport(&mut self) -> Option<TransportNotice> {
        self.transport_rx.recv().await
    }

    pub fn handle_client_event(&mut self, event: ClientEvent) -> Flow {
        match event {
            ClientEvent::SubmitName(name) => {
                self.quit_pending = false;
                let transition = self.machine.submit_name(&name);
                self.apply(transition);
                Flow::Continue
            }
            ClientEvent::SubmitText(text) => {
                self.quit_pending = false;
                let transition = self.machine.submit_text(&text);
                self.apply(transition);
                Flow::Continue
            }
            ClientEvent::Quit => {
                if self.navigation_guarded && !self.quit_pending {
                    self.quit_pending = true;
                    self.presenter.show_notice(LEAVE_CONFIRM_NOTICE);
                    Flow::Continue
                } else {
                    Flow::Exit
                }
            }
        }
    }

    pub fn handle_transport(&mut self, notice: TransportNotice) -> Flow {
        let TransportNotice { connection, event } = notice;

        if !self.connection.is_current(connection) {
            debug!("Dropping {event:?} from stale {connection}");
            return Flow::Continue;
        }

        match event {
            TransportEvent::Opened => {
                info!("{connection}: open, Hello sent");
            }
            TransportEvent::Frame(payload) => {
                if self.debug_frames {
                    debug!("{connection}: frame {payload}");
                }
                match payload.decode() {
                    Ok(wire_event) => {
                        let transition = self.machine.handle(wire_event);
                        self.apply(transition);
                    }
                    Err(e) => {
                        warn!("{connection}: ignoring frame ({}): {e}", e.error_category());
                    }
                }
            }
            TransportEvent::Error(e) => {
                error!("{connection}: transport error: {e}");
            }
            TransportEvent::Closed => {
                self.connection.handle_closed(connection);
                info!("{connection}: closed while {}", self.machine.phase());

                if self.machine.phase() == Phase::AwaitingAuth {
                    self.abandon_entry(UNREACHABLE_NOTICE.to_string());
                } else {
                    self.presenter.show_notice(DISCONNECTED_NOTICE);
                }
            }
        }

        Flow::Continue
    }

    /// Give up on a pending entry and let the user try again.
    fn abandon_entry(&mut self, notice: String) {
        let transition = self.machine.connection_lost();
        self.apply(transition);
        self.presenter.after_repaint(Deferred::Notice(notice));
    }

    fn apply(&mut self, transition: Transition) {
        if transition.changed() {
            info!("Session {} -> {}", transition.from, transition.to);
        }

        for effect in transition.effects {
            match effect {
                Effect::OpenConnection { name } => {
                    if let Err(e) = self.connection.connect(&name) {
                        error!("Could not open connection: {e}");
                        self.abandon_entry(format!("Could not connect to the server: {e}"));
                    }
                }
                Effect::SendText { text } => self.connection.send(&text),
                Effect::CloseConnection => self.connection.close(),
                Effect::ShowChat => self.presenter.show_chat(),
                Effect::GuardNavigation => {
                    self.navigation_guarded = true;
                    self.presenter.guard_navigation();
                }
                Effect::EnteringReset => {
                    self.navigation_guarded = false;
                    self.presenter.reset_entry();
                }
                Effect::ShowRejection { notice } => {
                    self.presenter.after_repaint(Deferred::Notice(notice));
                }
                Effect::AppendEntry(entry) => {
                    self.presenter.render_entry(&entry);
                    self.log.append(entry);
                    self.presenter.scroll_to_latest();
                }
            }
        }
    }
}
