use super::*;
use crate::{ConfigResolver, Overrides, Profile};

fn resolved(env: EnvironmentName, overrides: Overrides) -> ResolvedConfig {
    ConfigResolver::new()
        .resolve(&Profile::empty(), &env, &overrides)
        .unwrap()
}

#[test]
fn test_typed_accessors() {
    let config = resolved(
        EnvironmentName::test(),
        Overrides::new()
            .with(ConfigKey::AppPort, "9000")
            .with(ConfigKey::UseSudo, "no"),
    );

    assert_eq!(config.app_port(), 9000);
    assert_eq!(config.remote_port(), 22);
    assert!(!config.use_sudo());
    assert_eq!(config.app_name(), "service-app");
    assert_eq!(config.version(), "latest");
    assert_eq!(config.compose_file(), "docker-compose.test.yaml");
}

#[test]
fn test_pairs_follow_requested_order() {
    let config = resolved(EnvironmentName::prod(), Overrides::new());
    let pairs = config.pairs(&[ConfigKey::RemoteHost, ConfigKey::RegistryHost]);
    assert_eq!(
        pairs,
        vec![
            ("REMOTE_HOST", "prod.example.com"),
            ("REGISTRY_HOST", "registry.prod.example.com"),
        ]
    );
}

#[test]
fn test_to_env_vars_contains_every_key() {
    let config = resolved(EnvironmentName::local(), Overrides::new());
    let vars = config.to_env_vars();
    assert_eq!(vars.len(), ConfigKey::ALL.len());
    assert_eq!(vars.get("ENV_MODE"), Some("local"));
}

#[test]
fn test_serializes_values_and_sources_by_canonical_name() {
    let config = resolved(
        EnvironmentName::test(),
        Overrides::new().with(ConfigKey::RemoteHost, "10.0.0.5"),
    );
    let json = serde_json::to_value(&config).unwrap();

    assert_eq!(json["env"], "test");
    assert_eq!(json["values"]["REMOTE_HOST"], "10.0.0.5");
    assert_eq!(json["source_trace"]["REMOTE_HOST"], "override");
    assert_eq!(json["source_trace"]["APP_NAME"], "builtin_default");
}

#[test]
fn test_source_display() {
    assert_eq!(ResolutionSource::EnvironmentProfile.to_string(), "EnvironmentProfile");
}
