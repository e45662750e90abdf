use client_core::connection::{ConnectionManager, Endpoint};
use client_core::error::{ConnectionError, CoreError};

use common::ErrorLocation;

use std::panic::Location;

use tokio::sync::mpsc::unbounded_channel;

/// **VALUE**: Verifies that `ConnectionError::Handshake` includes file/line/column location tracking.
///
/// **WHY THIS MATTERS**: A failed handshake is the first thing a user with a wrong host sees.
/// The log line must say where in the client it was raised, not just that it happened.
///
/// **BUG THIS CATCHES**: Would catch if someone:
/// - Removes the `location` field from ConnectionError
/// - Breaks the Display implementation to not include location
#[test]
#[track_caller]
fn given_handshake_error_when_formatted_then_includes_location() {
    // GIVEN: A Handshake error with location
    let err = ConnectionError::Handshake {
        message: "connection refused".to_string(),
        location: ErrorLocation::from(Location::caller()),
    };

    // WHEN: Formatting the error as string
    let error_string = format!("{}", err);

    // THEN: Should include error type, message, and file location
    assert!(error_string.contains("Handshake Error"));
    assert!(error_string.contains("connection refused"));
    assert!(error_string.contains("connection.rs"));
}

/// **VALUE**: Verifies URL parse failures convert into `ConnectionError::Endpoint`.
///
/// **BUG THIS CATCHES**: Would catch a `From<url::ParseError>` impl that maps to the wrong
/// variant, which would make bad config look like a network failure.
#[test]
fn given_url_parse_error_when_converted_then_endpoint_variant() {
    // GIVEN: A URL that fails to parse
    let parse_err = url::Url::parse("ws://").unwrap_err();

    // WHEN: Converting into ConnectionError
    let err = ConnectionError::from(parse_err);

    // THEN: Endpoint variant with the parser's message
    assert!(matches!(err, ConnectionError::Endpoint { .. }));
    assert!(err.to_string().starts_with("Endpoint Error:"));
}

/// **VALUE**: Verifies connection errors pass through `CoreError` unchanged.
///
/// **WHY THIS MATTERS**: Callers that bubble a `CoreError` up to the log must see the same
/// text, location included, as the original error.
#[tokio::test]
async fn given_connection_error_when_wrapped_in_core_error_then_display_is_transparent() {
    // GIVEN: A real AlreadyConnected error from the manager
    let (events_tx, _events_rx) = unbounded_channel();
    let mut manager = ConnectionManager::new(Endpoint::default(), events_tx);
    manager.connect("alice").unwrap();
    let err = manager.connect("alice").unwrap_err();
    let original = err.to_string();

    // WHEN: Wrapping it
    let core: CoreError = err.into();

    // THEN: Same text, and the location points into the manager
    assert_eq!(core.to_string(), original);
    assert!(original.contains("Already Connected Error"));
    assert!(original.contains("manager.rs"));
}
