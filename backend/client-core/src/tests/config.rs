// Unit tests for the TOML client config

use crate::config::{CONFIG_FILE_NAME, ClientConfig};
use crate::error::config::ConfigError;
use crate::{CONNECT_PATH, DEFAULT_SERVER_HOST, DEFAULT_SERVER_URL};

use tempfile::TempDir;

/// **VALUE**: A missing file yields defaults instead of an error.
///
/// **WHY THIS MATTERS**: First run has no config file. The client must still start.
///
/// **BUG THIS CATCHES**: Would catch treating a missing file as a read error.
#[test]
fn given_missing_file_when_loaded_then_returns_defaults() {
    // GIVEN: An empty config directory
    let dir = TempDir::new().unwrap();

    // WHEN: Loading
    let config = ClientConfig::load(dir.path()).unwrap();

    // THEN: Defaults
    assert_eq!(config, ClientConfig::default());
    assert_eq!(config.server.host, DEFAULT_SERVER_HOST);
    assert_eq!(config.server.path, CONNECT_PATH);
    assert!(!config.server.secure);
    assert!(!config.client.debug_frames);
}

/// **VALUE**: Save then load gives back the same config.
///
/// **BUG THIS CATCHES**: Would catch a field that serializes under a different name than
/// it deserializes from, or a temp file left behind by the atomic write.
#[test]
fn given_saved_config_when_loaded_then_round_trips() {
    let dir = TempDir::new().unwrap();
    let mut config = ClientConfig::default();
    config.server.host = String::from("chat.example.org");
    config.server.secure = true;
    config.client.debug_frames = true;

    config.save(dir.path()).unwrap();
    let loaded = ClientConfig::load(dir.path()).unwrap();

    assert_eq!(loaded, config);
    assert!(!dir.path().join(format!("{CONFIG_FILE_NAME}.tmp")).exists());
}

#[test]
fn given_partial_file_when_loaded_then_missing_fields_use_defaults() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join(CONFIG_FILE_NAME),
        "[server]\nsecure = true\n",
    )
    .unwrap();

    let config = ClientConfig::load(dir.path()).unwrap();

    assert!(config.server.secure);
    assert_eq!(config.server.host, DEFAULT_SERVER_HOST);
    assert_eq!(config.version, 1);
}

#[test]
fn given_corrupt_file_when_loaded_then_parse_error() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join(CONFIG_FILE_NAME), "[server\nhost = ").unwrap();

    let result = ClientConfig::load(dir.path());

    assert!(matches!(result, Err(ConfigError::ParseError { .. })));
}

#[test]
fn given_invalid_values_when_validated_then_validation_error() {
    let mut bad_hosts = Vec::new();
    for host in ["", "   ", "ws://example.org", "example.org/connect"] {
        let mut config = ClientConfig::default();
        config.server.host = host.to_string();
        bad_hosts.push(config);
    }

    let mut bad_path = ClientConfig::default();
    bad_path.server.path = String::from("connect");

    let mut bad_version = ClientConfig::default();
    bad_version.version = 0;

    for config in bad_hosts.into_iter().chain([bad_path, bad_version]) {
        let result = config.validate();
        assert!(
            matches!(result, Err(ConfigError::ValidationError { .. })),
            "{config:?} should be invalid"
        );
    }
}

#[test]
fn given_invalid_config_when_saved_then_nothing_written() {
    let dir = TempDir::new().unwrap();
    let mut config = ClientConfig::default();
    config.server.host = String::new();

    assert!(config.save(dir.path()).is_err());
    assert!(!dir.path().join(CONFIG_FILE_NAME).exists());
}

/// **VALUE**: The `secure` flag picks the WebSocket scheme.
///
/// **WHY THIS MATTERS**: A server behind TLS only answers on `wss://`; a plaintext one only
/// on `ws://`.
///
/// **BUG THIS CATCHES**: Would catch an inverted flag or a dropped path.
#[test]
fn given_secure_flag_when_endpoint_built_then_scheme_matches() {
    let mut config = ClientConfig::default();

    assert_eq!(config.endpoint().url().unwrap().as_str(), DEFAULT_SERVER_URL);

    config.server.secure = true;
    config.server.host = String::from("chat.example.org");
    assert_eq!(
        config.endpoint().url().unwrap().as_str(),
        "wss://chat.example.org/connect"
    );
}
