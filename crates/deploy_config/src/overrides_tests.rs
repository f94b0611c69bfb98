use super::*;

#[test]
fn test_environment_override_beats_global() {
    let overrides = Overrides::new()
        .with(ConfigKey::RemoteHost, "global.example.com")
        .with_env(EnvironmentName::prod(), ConfigKey::RemoteHost, "prod.example.com");

    assert_eq!(
        overrides.lookup(&EnvironmentName::prod(), ConfigKey::RemoteHost),
        Some("prod.example.com")
    );
    assert_eq!(
        overrides.lookup(&EnvironmentName::test(), ConfigKey::RemoteHost),
        Some("global.example.com")
    );
}

#[test]
fn test_empty_environment_override_falls_back_to_global() {
    let overrides = Overrides::new()
        .with(ConfigKey::RemoteUser, "deploy-ci")
        .with_env(EnvironmentName::test(), ConfigKey::RemoteUser, "");

    assert_eq!(
        overrides.lookup(&EnvironmentName::test(), ConfigKey::RemoteUser),
        Some("deploy-ci")
    );
}

#[test]
fn test_empty_global_override_is_unset() {
    let overrides = Overrides::new().with(ConfigKey::Version, "");

    assert_eq!(overrides.lookup(&EnvironmentName::test(), ConfigKey::Version), None);
}

#[test]
fn test_descriptor_file_is_never_taken_from_global_override() {
    let overrides = Overrides::new().with(ConfigKey::LocalComposeFile, "shared.yaml");

    assert_eq!(
        overrides.lookup(&EnvironmentName::test(), ConfigKey::LocalComposeFile),
        None
    );
}
