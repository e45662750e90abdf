// Unit tests for error module

use crate::error::ChattermError;

use client_core::config::ClientConfig;
use client_core::error::config::ConfigError;

use std::error::Error;
use std::io::{Error as IoError, ErrorKind};

/// **VALUE**: Verifies config errors keep their detail when converted for startup reporting.
///
/// **WHY THIS MATTERS**: A broken `chatterm.toml` stops the client before the chat view
/// exists. The message printed on exit is all the user gets.
///
/// **BUG THIS CATCHES**: Would catch a `From<ConfigError>` that drops the original reason.
#[test]
fn given_config_error_when_converted_then_reason_kept() {
    // GIVEN: An invalid config
    let mut config = ClientConfig::default();
    config.server.host = String::from("ws://example.com");
    let config_err: ConfigError = config.validate().unwrap_err();

    // WHEN: Converting into ChattermError
    let err = ChattermError::from(config_err);

    // THEN: Config variant carrying the validation text
    assert!(matches!(err, ChattermError::Config { .. }));
    let error_string = err.to_string();
    assert!(error_string.starts_with("Config Error:"));
    assert!(error_string.contains("without scheme or path"));
}

#[test]
fn given_io_error_when_wrapped_then_source_and_location_kept() {
    let err = ChattermError::io(
        "Failed to create log directory",
        IoError::new(ErrorKind::PermissionDenied, "denied"),
    );

    let error_string = err.to_string();
    assert!(error_string.contains("IO Error: Failed to create log directory"));
    assert!(error_string.contains("error.rs"));
    assert_eq!(err.source().unwrap().to_string(), "denied");
}
