// Unit tests for logger module initialization logic
// Tests focus on idempotence and error handling

use crate::error::ChattermError;
use crate::logger::{LOG_FILE_NAME, initialize, initialize_internal};

use std::path::PathBuf;

/// **VALUE**: Verifies that calling initialize() multiple times doesn't panic or fail.
///
/// **WHY THIS MATTERS**: fern panics if a global logger is set twice. A second call
/// from another startup path must be a harmless no-op.
///
/// **BUG THIS CATCHES**: Would catch if the Once or AtomicBool guards are removed.
#[test]
fn given_logger_initialized_when_called_again_then_returns_ok() {
    // GIVEN: A valid temporary directory
    let temp_dir = tempfile::tempdir().unwrap();

    // WHEN: Calling initialize twice
    let result1 = initialize(temp_dir.path());
    let result2 = initialize(temp_dir.path());

    // THEN: Both should return Ok (second one logs warning but doesn't error)
    assert!(result1.is_ok(), "First initialization should succeed");
    assert!(
        result2.is_ok(),
        "Second initialization should succeed (idempotent)"
    );

    // AND: Records land in the file with timestamp, level and target
    log::warn!(target: "chatterm::startup", "config dir missing");
    let contents = std::fs::read_to_string(temp_dir.path().join(LOG_FILE_NAME)).unwrap();
    assert!(contents.contains("WARN  chatterm::startup: config dir missing"));
}

/// **VALUE**: Verifies that an unusable log directory is an error, not a panic.
///
/// **WHY THIS MATTERS**: `--log-dir` is user input. A typo must produce a clear startup
/// error.
///
/// **BUG THIS CATCHES**: Would catch if `fern::log_file()` is unwrapped instead of mapped.
#[test]
fn given_invalid_log_dir_when_initialized_then_returns_error() {
    // GIVEN: A path that can never hold a file
    let invalid_dir = PathBuf::from("/dev/null/invalid-path");

    // WHEN: Building the dispatch (fails before touching the global logger)
    let result = initialize_internal(&invalid_dir);

    // THEN: Chatterm variant mentioning the log file
    let err = result.unwrap_err();
    assert!(matches!(err, ChattermError::Chatterm { .. }));
    assert!(err.to_string().contains("Failed to create log file"));
}

#[test]
fn log_file_is_named_after_the_client() {
    assert_eq!(LOG_FILE_NAME, "chatterm.log");
}
