//! Tests for configuration error types.

use super::*;
use std::error::Error as _;

#[test]
fn test_invalid_port_display() {
    let error = ConfigError::InvalidPort {
        key: "REMOTE_PORT".to_string(),
        value: "abc".to_string(),
    };
    assert_eq!(
        error.to_string(),
        "Invalid port for REMOTE_PORT: 'abc' is not an integer in 1..=65535"
    );
}

#[test]
fn test_in_environment_wraps_source() {
    let error = ConfigError::InvalidVersion {
        version: "1.0 beta".to_string(),
    }
    .in_environment("canary");

    match &error {
        ConfigError::Environment { env, source } => {
            assert_eq!(env, "canary");
            assert!(matches!(**source, ConfigError::InvalidVersion { .. }));
        }
        _ => panic!("Expected Environment"),
    }
    assert!(error.to_string().starts_with("Environment 'canary': "));
    assert!(error.source().is_some());
}

#[test]
fn test_io_error_names_path() {
    let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "No such file");
    let error = ConfigError::io("/tmp/project/.deploy.env.test", &io_error);
    assert!(error.to_string().contains("/tmp/project/.deploy.env.test"));
    assert!(error.to_string().contains("No such file"));
}

#[test]
fn test_error_is_send_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ConfigError>();
}
