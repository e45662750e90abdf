// Unit tests for the session state machine
// End-to-end behavior with a live server is in integration_tests/runtime.rs

use crate::color::hue_of;
use crate::error::session::REJECTED_NAME_NOTICE;
use crate::message_log::LogEntry;
use crate::protocol::WireEvent;
use crate::session::{Effect, Phase, Session, SessionStateMachine};

fn awaiting(name: &str) -> SessionStateMachine {
    let mut machine = SessionStateMachine::new();
    machine.submit_name(name);
    machine
}

fn chatting(name: &str) -> SessionStateMachine {
    let mut machine = awaiting(name);
    machine.handle(WireEvent::AuthAck);
    machine
}

/// **VALUE**: Blank names never leave `Entering`.
///
/// **WHY THIS MATTERS**: A blank submission must not open a connection or send anything.
///
/// **BUG THIS CATCHES**: Would catch checking `is_empty()` without trimming.
#[test]
fn given_blank_names_when_submitted_then_no_transition_and_no_effects() {
    for raw in ["", " ", "\t", "  \n  "] {
        // GIVEN: A fresh machine
        let mut machine = SessionStateMachine::new();

        // WHEN: Submitting a blank name
        let transition = machine.submit_name(raw);

        // THEN: Still entering, nothing to do
        assert_eq!(machine.phase(), Phase::Entering, "{raw:?}");
        assert!(transition.effects.is_empty(), "{raw:?}");
        assert!(!transition.changed());
        assert_eq!(machine.session().name(), None);
    }
}

/// **VALUE**: A real name moves to `AwaitingAuth` and asks for a connection.
///
/// **BUG THIS CATCHES**: Would catch sending Hello directly from the machine, or losing the name.
#[test]
fn given_entering_when_name_submitted_then_awaiting_auth_with_open_connection() {
    let mut machine = SessionStateMachine::new();

    let transition = machine.submit_name("alice");

    assert_eq!(transition.from, Phase::Entering);
    assert_eq!(transition.to, Phase::AwaitingAuth);
    assert_eq!(
        transition.effects,
        vec![Effect::OpenConnection {
            name: String::from("alice")
        }]
    );
    assert_eq!(
        machine.session(),
        &Session::AwaitingAuth {
            name: String::from("alice")
        }
    );
}

#[test]
fn given_awaiting_auth_when_name_submitted_again_then_ignored() {
    let mut machine = awaiting("alice");

    let transition = machine.submit_name("mallory");

    assert!(transition.effects.is_empty());
    assert_eq!(machine.session().name(), Some("alice"));
}

/// **VALUE**: AuthAck completes the handshake exactly once.
///
/// **WHY THIS MATTERS**: The chat input must be revealed once; a repeated AuthAck must
/// not re-run the reveal or re-arm the guard.
///
/// **BUG THIS CATCHES**: Would catch handling AuthAck in every state.
#[test]
fn given_awaiting_auth_when_auth_ack_repeated_then_show_chat_emitted_once() {
    // GIVEN: A machine waiting for the verdict
    let mut machine = awaiting("alice");

    // WHEN: Two AuthAcks arrive
    let first = machine.handle(WireEvent::AuthAck);
    let second = machine.handle(WireEvent::AuthAck);

    // THEN: Only the first does anything
    assert_eq!(first.to, Phase::Chatting);
    assert_eq!(first.effects, vec![Effect::ShowChat, Effect::GuardNavigation]);
    assert!(second.effects.is_empty());
    assert!(!second.changed());
    assert_eq!(
        machine.session(),
        &Session::Chatting {
            name: String::from("alice")
        }
    );
}

#[test]
fn given_entering_when_auth_ack_received_then_stays_entering() {
    let mut machine = SessionStateMachine::new();

    let transition = machine.handle(WireEvent::AuthAck);

    assert!(transition.effects.is_empty());
    assert_eq!(machine.phase(), Phase::Entering);
}

/// **VALUE**: MayNotEnter sends the user back to name entry with one notice.
///
/// **WHY THIS MATTERS**: The user must be able to try another name, on a fresh connection,
/// and must be told why exactly once.
///
/// **BUG THIS CATCHES**: Would catch keeping the old name, forgetting to close the refused
/// connection, or emitting the notice immediately instead of deferring it.
#[test]
fn given_awaiting_auth_when_may_not_enter_then_back_to_entering_with_one_notice() {
    // GIVEN: A machine waiting for the verdict
    let mut machine = awaiting("alice");

    // WHEN: The server refuses
    let transition = machine.handle(WireEvent::MayNotEnter);

    // THEN: Passed through Rejected into Entering, name cleared
    assert_eq!(transition.from, Phase::AwaitingAuth);
    assert_eq!(transition.to, Phase::Rejected);
    assert_eq!(machine.phase(), Phase::Entering);
    assert_eq!(machine.session().name(), None);

    // AND: Close, reset, and exactly one rejection notice
    assert_eq!(
        transition.effects,
        vec![
            Effect::CloseConnection,
            Effect::EnteringReset,
            Effect::ShowRejection {
                notice: String::from(REJECTED_NAME_NOTICE)
            },
        ]
    );
}

#[test]
fn given_rejected_when_new_name_submitted_then_awaiting_auth_again() {
    let mut machine = awaiting("alice");
    machine.handle(WireEvent::MayNotEnter);

    let transition = machine.submit_name("alice2");

    assert_eq!(transition.to, Phase::AwaitingAuth);
    assert_eq!(machine.session().name(), Some("alice2"));
}

#[test]
fn given_chatting_when_may_not_enter_received_then_ignored() {
    let mut machine = chatting("alice");

    let transition = machine.handle(WireEvent::MayNotEnter);

    assert!(transition.effects.is_empty());
    assert!(machine.session().is_chatting());
}

#[test]
fn given_awaiting_auth_when_auth_rst_received_then_no_op() {
    let mut machine = awaiting("alice");

    let transition = machine.handle(WireEvent::AuthRst);

    assert!(transition.effects.is_empty());
    assert_eq!(machine.phase(), Phase::AwaitingAuth);
}

#[test]
fn given_any_state_when_hello_or_auth_received_then_no_op() {
    for mut machine in [SessionStateMachine::new(), awaiting("a"), chatting("b")] {
        let before = machine.session().clone();

        assert!(machine.handle(WireEvent::Hello).effects.is_empty());
        assert!(machine.handle(WireEvent::Auth).effects.is_empty());
        assert_eq!(machine.session(), &before);
    }
}

/// **VALUE**: Text frames become log entries colored by sender, in any state.
///
/// **BUG THIS CATCHES**: Would catch dropping text outside Chatting or using the wrong hue.
#[test]
fn given_any_state_when_text_received_then_append_entry_with_sender_hue() {
    for mut machine in [SessionStateMachine::new(), awaiting("a"), chatting("b")] {
        let phase = machine.phase();

        let transition = machine.handle(WireEvent::Text {
            sender: String::from("bob"),
            text: String::from("hi"),
        });

        assert_eq!(machine.phase(), phase);
        assert_eq!(transition.effects, vec![Effect::AppendEntry(LogEntry::new("bob", "hi"))]);
        match &transition.effects[0] {
            Effect::AppendEntry(entry) => assert_eq!(entry.hue(), hue_of("bob")),
            other => panic!("Expected AppendEntry, got {other:?}"),
        }
    }
}

#[test]
fn given_chatting_when_text_submitted_then_send_text_untrimmed() {
    let machine = chatting("alice");

    let transition = machine.submit_text(" hello ");

    assert_eq!(
        transition.effects,
        vec![Effect::SendText {
            text: String::from(" hello ")
        }]
    );
}

#[test]
fn given_blank_text_or_not_chatting_when_text_submitted_then_nothing_sent() {
    assert!(chatting("alice").submit_text("   ").effects.is_empty());
    assert!(awaiting("alice").submit_text("hi").effects.is_empty());
    assert!(SessionStateMachine::new().submit_text("hi").effects.is_empty());
}

#[test]
fn given_chatting_when_reset_then_entering_without_name() {
    let mut machine = chatting("alice");

    machine.reset();

    assert_eq!(machine.session(), &Session::Entering);
}

/// **VALUE**: A lost connection before the server's verdict returns to `Entering`.
///
/// **WHY THIS MATTERS**: With the server down, the user must be able to try again (or
/// try another name) without restarting the client.
///
/// **BUG THIS CATCHES**: Would catch the session staying in `AwaitingAuth` with no
/// connection, after which every new name is ignored.
#[test]
fn given_awaiting_auth_when_connection_lost_then_entering_and_new_name_accepted() {
    // GIVEN: A name sent to a server that never answers
    let mut machine = awaiting("alice");

    // WHEN: The connection goes away
    let transition = machine.connection_lost();

    // THEN: Back to entering, entry field reset
    assert_eq!(transition.from, Phase::AwaitingAuth);
    assert_eq!(transition.to, Phase::Entering);
    assert_eq!(transition.effects, vec![Effect::EnteringReset]);
    assert_eq!(machine.session(), &Session::Entering);

    // AND: The next name starts a fresh attempt
    let retry = machine.submit_name("bob");
    assert_eq!(
        retry.effects,
        vec![Effect::OpenConnection {
            name: String::from("bob")
        }]
    );
}

#[test]
fn given_entering_or_chatting_when_connection_lost_then_unchanged() {
    let mut entering = SessionStateMachine::new();
    assert!(entering.connection_lost().effects.is_empty());
    assert_eq!(entering.session(), &Session::Entering);

    let mut live = chatting("alice");
    let transition = live.connection_lost();
    assert!(!transition.changed());
    assert!(transition.effects.is_empty());
    assert!(live.session().is_chatting());
}
