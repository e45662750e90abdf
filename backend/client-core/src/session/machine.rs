use crate::error::SessionError;
use crate::message_log::LogEntry;
use crate::protocol::WireEvent;
use crate::session::effect::Effect;
use crate::session::state::{Phase, Session};

use log::{debug, info, warn};

/// Outcome of feeding one input to the state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub from: Phase,
    pub to: Phase,
    pub effects: Vec<Effect>,
}

impl Transition {
    fn stay(phase: Phase) -> Self {
        Self {
            from: phase,
            to: phase,
            effects: Vec::new(),
        }
    }

    fn stay_with(phase: Phase, effects: Vec<Effect>) -> Self {
        Self {
            from: phase,
            to: phase,
            effects,
        }
    }

    pub fn changed(&self) -> bool {
        self.from != self.to
    }
}

/// Handshake and chat state machine.
#[derive(Debug, Clone, Default)]
pub struct SessionStateMachine {
    session: Session,
}

impl SessionStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn phase(&self) -> Phase {
        self.session.phase()
    }

    /// User submitted a display name.
    ///
    /// Blank names are dropped here, before any network activity. Names are
    /// only accepted while `Entering`; otherwise a connection already exists.
    pub fn submit_name(&mut self, raw: &str) -> Transition {
        let from = self.phase();

        if raw.trim().is_empty() {
            debug!("Ignoring blank name submission");
            return Transition::stay(from);
        }

        if from != Phase::Entering {
            warn!("Name submitted while {from}; ignoring");
            return Transition::stay(from);
        }

        let name = raw.to_string();
        info!("Requesting entry as @{name}");
        self.session = Session::AwaitingAuth { name: name.clone() };

        Transition {
            from,
            to: Phase::AwaitingAuth,
            effects: vec![Effect::OpenConnection { name }],
        }
    }

    /// User submitted chat text. Only sent while chatting; blank text is dropped.
    pub fn submit_text(&self, text: &str) -> Transition {
        let phase = self.phase();

        if text.trim().is_empty() || phase != Phase::Chatting {
            return Transition::stay(phase);
        }

        Transition::stay_with(
            phase,
            vec![Effect::SendText {
                text: text.to_string(),
            }],
        )
    }

    /// Server sent a decoded frame.
    pub fn handle(&mut self, event: WireEvent) -> Transition {
        let from = self.phase();

        match event {
            WireEvent::Text { sender, text } => Transition::stay_with(
                from,
                vec![Effect::AppendEntry(LogEntry::new(sender, text))],
            ),

            WireEvent::AuthAck => match std::mem::take(&mut self.session) {
                Session::AwaitingAuth { name } => {
                    info!("Entered chat as @{name}");
                    self.session = Session::Chatting { name };
                    Transition {
                        from,
                        to: Phase::Chatting,
                        effects: vec![Effect::ShowChat, Effect::GuardNavigation],
                    }
                }
                other => {
                    debug!("AuthAck while {from}; nothing to do");
                    self.session = other;
                    Transition::stay(from)
                }
            },

            WireEvent::MayNotEnter => match std::mem::take(&mut self.session) {
                Session::AwaitingAuth { name } => {
                    let rejection = SessionError::rejected_name(&name);
                    warn!("Server refused name @{name}: {rejection:?}");
                    // Leaves the session in Entering with the name cleared.
                    Transition {
                        from,
                        to: Phase::Rejected,
                        effects: vec![
                            Effect::CloseConnection,
                            Effect::EnteringReset,
                            Effect::ShowRejection {
                                notice: rejection.notice(),
                            },
                        ],
                    }
                }
                other => {
                    debug!("MayNotEnter while {from}; nothing to do");
                    self.session = other;
                    Transition::stay(from)
                }
            },

            // Reserved: the server may reset an auth attempt in future.
            WireEvent::AuthRst => Transition::stay(from),

            // Client-originated or informational.
            WireEvent::Hello | WireEvent::Auth => Transition::stay(from),
        }
    }

    /// The connection went away, or never came up.
    ///
    /// Before the server has answered, the attempt is abandoned and the user
    /// may enter again. Once chatting, the session is left as it is.
    pub fn connection_lost(&mut self) -> Transition {
        let from = self.phase();

        match std::mem::take(&mut self.session) {
            Session::AwaitingAuth { name } => {
                info!("Entry as @{name} abandoned: no connection");
                Transition {
                    from,
                    to: Phase::Entering,
                    effects: vec![Effect::EnteringReset],
                }
            }
            other => {
                self.session = other;
                Transition::stay(from)
            }
        }
    }

    /// Return to `Entering`, forgetting the name.
    pub fn reset(&mut self) {
        self.session = Session::Entering;
    }
}
