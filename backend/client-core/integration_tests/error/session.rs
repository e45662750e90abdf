use client_core::error::{CoreError, SessionError};
use client_core::error::session::REJECTED_NAME_NOTICE;

/// **VALUE**: Verifies the rejection error renders as the exact user-facing notice.
///
/// **WHY THIS MATTERS**: Unlike the other errors this one is shown to the user verbatim, so
/// its Display must not carry a source location or a type prefix.
///
/// **BUG THIS CATCHES**: Would catch someone "fixing" the format string to match the other
/// variants and leaking `[session.rs:..]` into the UI.
#[test]
fn given_rejected_name_when_formatted_then_plain_notice() {
    // GIVEN: A rejection for a taken name
    let err = SessionError::rejected_name("bob");

    // WHEN/THEN: Display and notice are the fixed text
    assert_eq!(err.to_string(), REJECTED_NAME_NOTICE);
    assert_eq!(err.notice(), REJECTED_NAME_NOTICE);
}

#[test]
fn given_rejected_name_when_built_then_remembers_name_and_caller() {
    let err = SessionError::rejected_name("bob");

    let SessionError::RejectedName { name, location } = err;
    assert_eq!(name, "bob");
    assert!(location.file.ends_with("session.rs"));
}

#[test]
fn given_session_error_when_wrapped_in_core_error_then_display_is_transparent() {
    let core = CoreError::from(SessionError::rejected_name("bob"));

    assert_eq!(core.to_string(), REJECTED_NAME_NOTICE);
}
