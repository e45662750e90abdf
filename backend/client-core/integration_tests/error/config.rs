use client_core::config::ClientConfig;
use client_core::error::CoreError;
use client_core::error::config::ConfigError;

use std::error::Error;

/// **VALUE**: Verifies parse failures name the offending file.
///
/// **WHY THIS MATTERS**: A user who hand-edits `chatterm.toml` and breaks it needs to be told
/// which file to fix, not just that "something failed to parse".
///
/// **BUG THIS CATCHES**: Would catch a ParseError that drops the path or the location.
#[test]
fn given_broken_config_file_when_loaded_then_error_names_file() {
    // GIVEN: A config directory with an unparsable file
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("chatterm.toml");
    std::fs::write(&path, "[server\nhost = ").unwrap();

    // WHEN: Loading
    let err = ClientConfig::load(temp_dir.path()).unwrap_err();

    // THEN: ParseError pointing at the file
    assert!(matches!(err, ConfigError::ParseError { .. }));
    let error_string = err.to_string();
    assert!(error_string.contains("Config Parse Error"));
    assert!(error_string.contains("chatterm.toml"));
}

/// **VALUE**: Verifies that IO failures keep their source chain.
///
/// **BUG THIS CATCHES**: Would catch removal of `#[source]` on ReadError, which would hide
/// the OS reason ("Is a directory", "Permission denied") from the log.
#[test]
fn given_unreadable_config_when_loaded_then_source_preserved() {
    // GIVEN: The config path is a directory, so reading it fails
    let temp_dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(temp_dir.path().join("chatterm.toml")).unwrap();

    // WHEN: Loading
    let err = ClientConfig::load(temp_dir.path()).unwrap_err();

    // THEN: ReadError with the io::Error as source
    assert!(matches!(err, ConfigError::ReadError { .. }));
    assert!(err.source().is_some());
}

#[test]
fn given_config_error_when_wrapped_in_core_error_then_display_is_transparent() {
    let err = ConfigError::validation("server.host must not be empty");
    let original = err.to_string();

    let core = CoreError::from(err);

    assert_eq!(core.to_string(), original);
    assert!(original.contains("server.host must not be empty"));
}
