use crate::chat_tests::helpers::{
    BOT_NAME, Call, RecordingPresenter, Received, ServerScript, TAKEN_NAME, TEST_TIMEOUT,
    start_test_server,
};
use crate::chat_tests::log_capture;

use client_core::color::hue_of;
use client_core::connection::{Endpoint, TransportEvent};
use client_core::error::session::REJECTED_NAME_NOTICE;
use client_core::message_log::LogEntry;
use client_core::presenter::Presenter;
use client_core::runtime::{
    ChatRuntime, ClientEvent, DISCONNECTED_NOTICE, Flow, LEAVE_CONFIRM_NOTICE, UNREACHABLE_NOTICE,
};
use client_core::session::{Phase, Session};

use log::Level;
use serde_json::json;
use tokio::net::TcpListener;
use tokio::sync::mpsc::unbounded_channel;

/// Test helper: Feed transport notices into the runtime until `done` holds.
async fn pump_until(
    runtime: &mut ChatRuntime<RecordingPresenter>,
    presenter: &mut RecordingPresenter,
    done: impl Fn(&ChatRuntime<RecordingPresenter>) -> bool,
) {
    tokio::time::timeout(TEST_TIMEOUT, async {
        while !done(&*runtime) {
            let notice = runtime
                .next_transport()
                .await
                .expect("Transport channel closed");
            runtime.handle_transport(notice);
            presenter.repaint();
        }
    })
    .await
    .expect("Timed out pumping runtime");
}

/// **VALUE**: Verifies the full accept path: name → Hello → AuthAck → chat.
///
/// **WHY THIS MATTERS**: This is the one path every user takes. It exercises the state
/// machine, the codec and the connection manager together against a real socket.
///
/// **BUG THIS CATCHES**: Would catch:
/// - The chat view being shown before the server accepts
/// - The welcome line not reaching the log
/// - Log entries colored by something other than the sender
#[tokio::test]
async fn given_free_name_when_submitted_then_chatting_and_broadcast_rendered() {
    // GIVEN: A server and a runtime pointed at it
    let mut server = start_test_server(ServerScript::default()).await;
    let mut presenter = RecordingPresenter::new();
    let mut runtime = ChatRuntime::new(server.endpoint(), presenter.clone());

    // WHEN: Submitting a free name
    let flow = runtime.handle_client_event(ClientEvent::SubmitName(String::from("alice")));
    assert_eq!(flow, Flow::Continue);
    assert_eq!(runtime.session().phase(), Phase::AwaitingAuth);
    assert!(presenter.calls().is_empty(), "Nothing shown before the verdict");

    // THEN: The server gets Hello(alice)
    assert_eq!(
        server.next_received().await,
        Received::Frame(json!({"type": 0, "text": "alice"}))
    );

    // AND: The runtime reaches Chatting and logs the welcome line
    pump_until(&mut runtime, &mut presenter, |rt| rt.log().len() == 1).await;
    assert_eq!(
        runtime.session(),
        &Session::Chatting {
            name: String::from("alice")
        }
    );
    assert!(runtime.is_navigation_guarded());

    let welcome = runtime.log().latest().unwrap().clone();
    assert_eq!(welcome.sender(), BOT_NAME);
    assert_eq!(welcome.hue(), hue_of(BOT_NAME));

    assert_eq!(presenter.count(&Call::ShowChat), 1);
    assert_eq!(presenter.count(&Call::GuardNavigation), 1);
    assert!(presenter.calls().contains(&Call::RenderEntry(welcome)));
}

/// **VALUE**: Verifies a chat line sent by the user comes back into the log.
#[tokio::test]
async fn given_chatting_when_text_submitted_then_round_trips_into_log() {
    // GIVEN: An accepted session
    let mut server = start_test_server(ServerScript::default()).await;
    let mut presenter = RecordingPresenter::new();
    let mut runtime = ChatRuntime::new(server.endpoint(), presenter.clone());
    runtime.handle_client_event(ClientEvent::SubmitName(String::from("alice")));
    pump_until(&mut runtime, &mut presenter, |rt| rt.log().len() == 1).await;

    // WHEN: Sending text, plus a blank line that must be dropped
    runtime.handle_client_event(ClientEvent::SubmitText(String::from("   ")));
    runtime.handle_client_event(ClientEvent::SubmitText(String::from("hi all")));

    // THEN: Exactly one text frame reached the server after Hello
    assert_eq!(
        server.next_received().await,
        Received::Frame(json!({"type": 0, "text": "alice"}))
    );
    assert_eq!(
        server.next_received().await,
        Received::Frame(json!({"type": 1, "text": "hi all"}))
    );

    // AND: The broadcast lands in the log under alice
    pump_until(&mut runtime, &mut presenter, |rt| rt.log().len() == 2).await;
    assert_eq!(runtime.log().latest(), Some(&LogEntry::new("alice", "hi all")));
}

/// **VALUE**: Verifies the refusal path and the deferred notice.
///
/// **WHY THIS MATTERS**: After a refusal the name field must be reset *before* the user is
/// told, and told exactly once.
///
/// **BUG THIS CATCHES**: Would catch:
/// - The notice being shown before the reset is painted
/// - The notice being shown twice
/// - The refused connection being kept, blocking the next attempt
#[tokio::test]
async fn given_taken_name_when_submitted_then_reset_and_one_notice_after_repaint() {
    // GIVEN: A server that refuses TAKEN_NAME
    let mut server = start_test_server(ServerScript::default()).await;
    let mut presenter = RecordingPresenter::new();
    let mut runtime = ChatRuntime::new(server.endpoint(), presenter.clone());

    // WHEN: Submitting the taken name
    runtime.handle_client_event(ClientEvent::SubmitName(String::from(TAKEN_NAME)));
    pump_until(&mut runtime, &mut presenter, |rt| {
        rt.session() == &Session::Entering
    })
    .await;

    // THEN: Back to entering, connection dropped
    assert_eq!(runtime.session().name(), None);
    assert!(!runtime.connection().is_open());
    assert!(!runtime.is_navigation_guarded());

    // AND: Reset, then a repaint, then exactly one rejection notice
    let calls = presenter.calls();
    let reset_at = calls.iter().position(|c| *c == Call::ResetEntry).unwrap();
    let notice = Call::Notice(String::from(REJECTED_NAME_NOTICE));
    let notice_at = calls.iter().position(|c| *c == notice).unwrap();
    assert!(reset_at < notice_at);
    assert!(calls[reset_at..notice_at].contains(&Call::Repaint));
    assert_eq!(presenter.count(&notice), 1);
    assert_eq!(presenter.count(&Call::ShowChat), 0);

    // AND: The server saw the refused connection close
    let frames = server.frames_until_closed().await;
    assert_eq!(frames, vec![json!({"type": 0, "text": TAKEN_NAME})]);

    // AND: A new name can be tried on a fresh connection
    runtime.handle_client_event(ClientEvent::SubmitName(String::from("alice")));
    pump_until(&mut runtime, &mut presenter, |rt| rt.session().is_chatting()).await;
    assert_eq!(
        server.next_received().await,
        Received::Frame(json!({"type": 0, "text": "alice"}))
    );
}

/// **VALUE**: Verifies unknown and malformed frames are ignored.
///
/// **WHY THIS MATTERS**: A newer server may send kinds this client doesn't know. They must
/// not disturb the session or the log, and the connection must stay up.
///
/// **BUG THIS CATCHES**: Would catch a decode error that closes the connection or appends
/// a bogus entry.
#[tokio::test]
async fn given_chatting_when_unknown_and_malformed_frames_arrive_then_state_and_log_unchanged() {
    // GIVEN: A server that sends junk right after the welcome line, then a real line
    let script = ServerScript {
        after_ack: vec![
            String::from(r#"{"Type":99}"#),
            String::from("not json at all"),
            String::from(r#"{"Type":1,"Text":"no sender"}"#),
            json!({"Type": 1, "User": {"Name": "carol"}, "Text": "still here"}).to_string(),
        ],
    };
    let server = start_test_server(script).await;
    let mut presenter = RecordingPresenter::new();
    let mut runtime = ChatRuntime::new(server.endpoint(), presenter.clone());

    // WHEN: Entering and draining everything up to carol's line
    runtime.handle_client_event(ClientEvent::SubmitName(String::from("alice")));
    pump_until(&mut runtime, &mut presenter, |rt| rt.log().len() == 2).await;

    // THEN: Only the two valid text lines were logged, and we are still chatting
    let senders: Vec<&str> = runtime.log().iter().map(LogEntry::sender).collect();
    assert_eq!(senders, vec![BOT_NAME, "carol"]);
    assert!(runtime.session().is_chatting());
    assert!(runtime.connection().is_open());
    assert!(presenter.notices().is_empty());
}

const RUNTIME_TARGET: &str = "client_core::runtime";

/// **VALUE**: Verifies an unknown frame kind produces exactly one warning line.
///
/// **WHY THIS MATTERS**: Dropped frames are otherwise invisible. One line per frame is
/// enough to diagnose a protocol mismatch without flooding the log.
///
/// **BUG THIS CATCHES**: Would catch:
/// - Silently swallowing unknown kinds
/// - Logging the same failure at several layers
/// - Warning about frames that decoded fine
#[tokio::test]
async fn given_unknown_kind_frame_when_received_then_exactly_one_warning() {
    // GIVEN: A capturing logger and a server that sends Type 99 between valid lines
    log_capture::install();
    let script = ServerScript {
        after_ack: vec![
            String::from(r#"{"Type":99}"#),
            json!({"Type": 1, "User": {"Name": "carol"}, "Text": "after"}).to_string(),
        ],
    };
    let server = start_test_server(script).await;
    let mut presenter = RecordingPresenter::new();
    let mut runtime = ChatRuntime::new(server.endpoint(), presenter.clone());

    // WHEN: Entering and draining everything up to carol's line
    runtime.handle_client_event(ClientEvent::SubmitName(String::from("alice")));
    pump_until(&mut runtime, &mut presenter, |rt| rt.log().len() == 2).await;

    // THEN: One warning, naming the error category
    let warnings = log_capture::records_here(Level::Warn, RUNTIME_TARGET);
    assert_eq!(warnings.len(), 1, "{warnings:?}");
    assert!(warnings[0].message.contains("unknown_message_kind"));
}

#[tokio::test]
async fn given_only_valid_frames_when_received_then_no_warnings() {
    log_capture::install();
    let server = start_test_server(ServerScript::default()).await;
    let mut presenter = RecordingPresenter::new();
    let mut runtime = ChatRuntime::new(server.endpoint(), presenter.clone());

    runtime.handle_client_event(ClientEvent::SubmitName(String::from("alice")));
    pump_until(&mut runtime, &mut presenter, |rt| rt.log().len() == 1).await;

    assert!(log_capture::records_here(Level::Warn, RUNTIME_TARGET).is_empty());
}

#[tokio::test]
async fn given_chatting_when_quit_then_confirmation_required() {
    let server = start_test_server(ServerScript::default()).await;
    let mut presenter = RecordingPresenter::new();
    let mut runtime = ChatRuntime::new(server.endpoint(), presenter.clone());
    runtime.handle_client_event(ClientEvent::SubmitName(String::from("alice")));
    pump_until(&mut runtime, &mut presenter, |rt| rt.session().is_chatting()).await;

    assert_eq!(runtime.handle_client_event(ClientEvent::Quit), Flow::Continue);
    assert_eq!(presenter.notices(), vec![String::from(LEAVE_CONFIRM_NOTICE)]);

    assert_eq!(runtime.handle_client_event(ClientEvent::Quit), Flow::Exit);
}

#[test]
fn given_entering_when_quit_then_exits_immediately() {
    let presenter = RecordingPresenter::new();
    let mut runtime = ChatRuntime::new(Endpoint::default(), presenter.clone());

    assert_eq!(runtime.handle_client_event(ClientEvent::Quit), Flow::Exit);
    assert!(presenter.notices().is_empty());
}

#[test]
fn given_blank_name_when_submitted_then_no_connection_opened() {
    let presenter = RecordingPresenter::new();
    let mut runtime = ChatRuntime::new(Endpoint::default(), presenter.clone());

    runtime.handle_client_event(ClientEvent::SubmitName(String::from("  ")));

    assert_eq!(runtime.session(), &Session::Entering);
    assert!(!runtime.connection().is_open());
    assert!(presenter.calls().is_empty());
}

/// **VALUE**: Verifies an unreachable server sends the user back to name entry.
///
/// **WHY THIS MATTERS**: There is no auto-reconnect, so the only way to try again is to
/// submit a name again. That has to work without restarting the client.
///
/// **BUG THIS CATCHES**: Would catch the session staying in `AwaitingAuth` with no
/// connection, after which every new name is ignored.
#[tokio::test]
async fn given_awaiting_auth_when_server_unreachable_then_entering_and_retry_allowed() {
    // GIVEN: An address with nothing listening
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let mut presenter = RecordingPresenter::new();
    let mut runtime = ChatRuntime::new(Endpoint::new(addr.to_string(), false), presenter.clone());

    // WHEN: Submitting a name
    runtime.handle_client_event(ClientEvent::SubmitName(String::from("alice")));
    pump_until(&mut runtime, &mut presenter, |rt| !rt.connection().is_open()).await;

    // THEN: Back to entering, with one notice shown after the reset
    assert_eq!(runtime.session(), &Session::Entering);
    assert_eq!(presenter.notices(), vec![String::from(UNREACHABLE_NOTICE)]);
    let calls = presenter.calls();
    let reset_at = calls.iter().position(|c| *c == Call::ResetEntry).unwrap();
    let notice_at = calls
        .iter()
        .position(|c| *c == Call::Notice(String::from(UNREACHABLE_NOTICE)))
        .unwrap();
    assert!(reset_at < notice_at);

    // AND: A second name opens a fresh connection
    runtime.handle_client_event(ClientEvent::SubmitName(String::from("bob")));
    assert_eq!(
        runtime.session(),
        &Session::AwaitingAuth {
            name: String::from("bob")
        }
    );
    assert!(runtime.connection().is_open());
}

#[tokio::test]
async fn given_invalid_endpoint_when_name_submitted_then_entering_with_notice() {
    let mut presenter = RecordingPresenter::new();
    let mut runtime = ChatRuntime::new(Endpoint::new("", false), presenter.clone());

    runtime.handle_client_event(ClientEvent::SubmitName(String::from("alice")));
    presenter.repaint();

    assert_eq!(runtime.session(), &Session::Entering);
    assert!(!runtime.connection().is_open());
    assert_eq!(presenter.count(&Call::ResetEntry), 1);
    let notices = presenter.notices();
    assert_eq!(notices.len(), 1);
    assert!(notices[0].starts_with("Could not connect to the server: Endpoint Error"));

    // A retry against the same endpoint fails the same way instead of being ignored
    runtime.handle_client_event(ClientEvent::SubmitName(String::from("bob")));
    presenter.repaint();
    assert_eq!(presenter.notices().len(), 2);
}

/// **VALUE**: Verifies `run` drives a whole session from queued user input.
///
/// **BUG THIS CATCHES**: Would catch a loop that stops servicing transport events while
/// waiting on input, or that leaves the socket open on exit.
#[tokio::test]
async fn given_running_loop_when_user_enters_chats_and_quits_then_socket_closed() {
    // GIVEN: A runtime running on its own task
    let mut server = start_test_server(ServerScript::default()).await;
    let presenter = RecordingPresenter::new();
    let mut runtime = ChatRuntime::new(server.endpoint(), presenter.clone()).with_debug_frames(true);
    let (input_tx, input_rx) = unbounded_channel();
    let task = tokio::spawn(async move {
        runtime.run(input_rx).await;
        runtime
    });

    // WHEN: Entering and waiting for the chat view
    input_tx.send(ClientEvent::SubmitName(String::from("alice"))).unwrap();
    presenter
        .wait_until(|calls| calls.contains(&Call::ShowChat))
        .await;

    // AND: Chatting, then quitting twice (first quit asks for confirmation)
    input_tx.send(ClientEvent::SubmitText(String::from("bye"))).unwrap();
    input_tx.send(ClientEvent::Quit).unwrap();
    input_tx.send(ClientEvent::Quit).unwrap();

    let runtime = tokio::time::timeout(TEST_TIMEOUT, task)
        .await
        .expect("run did not return")
        .expect("runtime task panicked");

    // THEN: Hello then text reached the server, then the socket closed
    let frames = server.frames_until_closed().await;
    assert_eq!(
        frames,
        vec![
            json!({"type": 0, "text": "alice"}),
            json!({"type": 1, "text": "bye"}),
        ]
    );
    assert!(!runtime.connection().is_open());
    assert!(presenter.notices().contains(&String::from(LEAVE_CONFIRM_NOTICE)));
}

#[tokio::test]
async fn given_connection_events_when_stale_then_ignored() {
    let server = start_test_server(ServerScript::default()).await;
    let mut presenter = RecordingPresenter::new();
    let mut runtime = ChatRuntime::new(server.endpoint(), presenter.clone());

    // First attempt is refused; its late Closed notice belongs to a dead connection.
    runtime.handle_client_event(ClientEvent::SubmitName(String::from(TAKEN_NAME)));
    pump_until(&mut runtime, &mut presenter, |rt| {
        rt.session() == &Session::Entering
    })
    .await;

    let late = tokio::time::timeout(TEST_TIMEOUT, async {
        loop {
            let notice = runtime.next_transport().await.unwrap();
            if matches!(notice.event, TransportEvent::Closed) {
                return notice;
            }
        }
    })
    .await
    .expect("Refused connection never reported Closed");

    runtime.handle_transport(late);

    assert!(
        !presenter.notices().contains(&String::from(DISCONNECTED_NOTICE)),
        "Closing a refused connection is not a disconnect"
    );
}
