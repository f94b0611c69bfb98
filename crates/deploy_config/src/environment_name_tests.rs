//! Tests for environment name validation.

use super::*;

/// Verify valid names are normalized and accepted.
#[test]
fn test_valid_environment_names() {
    assert_eq!(EnvironmentName::parse("test").unwrap().as_str(), "test");
    assert_eq!(EnvironmentName::parse("  Prod\n").unwrap().as_str(), "prod");
    assert_eq!(EnvironmentName::parse("eu-west_2").unwrap().as_str(), "eu-west_2");
    assert_eq!(EnvironmentName::parse("CANARY").unwrap().as_str(), "canary");
}

#[test]
fn test_empty_name_rejected() {
    let err = EnvironmentName::parse("   ").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnvironmentName { .. }));
}

#[test]
fn test_invalid_characters_rejected() {
    for name in ["eu west", "prod!", "stage/1", "ünïcode", "a.b"] {
        let err = EnvironmentName::parse(name).unwrap_err();
        assert!(
            matches!(err, ConfigError::InvalidEnvironmentName { .. }),
            "expected '{name}' to be rejected"
        );
    }
}

#[test]
fn test_shared_file_name_is_reserved() {
    let err = EnvironmentName::parse("Common").unwrap_err();
    assert_eq!(
        err,
        ConfigError::ReservedEnvironmentName {
            name: "common".to_string()
        }
    );
}

#[test]
fn test_classification() {
    assert_eq!(EnvironmentName::local().class(), EnvironmentClass::Local);
    assert_eq!(EnvironmentName::test().class(), EnvironmentClass::Test);
    assert_eq!(EnvironmentName::prod().class(), EnvironmentClass::Prod);

    let canary = EnvironmentName::parse("canary").unwrap();
    assert_eq!(canary.class(), EnvironmentClass::Custom);
    assert!(canary.is_custom());
    assert!(!canary.is_standard());
    assert!(EnvironmentName::prod().is_prod());
}

#[test]
fn test_generated_file_names() {
    assert_eq!(
        EnvironmentName::local().default_compose_file(),
        "docker-compose.local.yaml"
    );
    assert_eq!(
        EnvironmentName::test().default_compose_file(),
        "docker-compose.test.yaml"
    );
    assert_eq!(
        EnvironmentName::prod().default_compose_file(),
        "docker-compose.yaml"
    );

    let canary = EnvironmentName::parse("canary").unwrap();
    assert_eq!(canary.default_compose_file(), "docker-compose.canary.yaml");
    assert_eq!(canary.env_file_name(), ".deploy.env.canary");
    assert_eq!(shared_env_file_name(), ".deploy.env.common");
}

#[test]
fn test_deserialize_validates() {
    let ok: EnvironmentName = serde_json::from_str("\"Staging\"").unwrap();
    assert_eq!(ok.as_str(), "staging");

    let bad: Result<EnvironmentName, _> = serde_json::from_str("\"no spaces\"");
    assert!(bad.is_err());
}
