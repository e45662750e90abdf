//! Handshake and chat state.
//!
//! [`SessionStateMachine`] is a pure state machine: it consumes user
//! submissions and decoded [`WireEvent`](crate::protocol::WireEvent)s and
//! returns [`Effect`]s for the runtime to carry out. It never touches the
//! transport or the terminal, so it can be driven directly in tests.

mod effect;
mod machine;
mod state;

pub use effect::Effect;
pub use machine::{SessionStateMachine, Transition};
pub use state::{Phase, Session};
