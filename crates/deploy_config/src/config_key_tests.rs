use super::*;

#[test]
fn test_target_and_shared_keys_are_disjoint() {
    for key in ConfigKey::TARGET {
        assert!(!ConfigKey::SHARED.contains(&key), "{key} is in both sets");
    }
    assert!(!ConfigKey::TARGET.contains(&ConfigKey::EnvMode));
    assert!(!ConfigKey::SHARED.contains(&ConfigKey::EnvMode));
}

#[test]
fn test_from_canonical_round_trips_every_key() {
    for key in ConfigKey::ALL {
        assert_eq!(ConfigKey::from_canonical(key.canonical_name()), Some(key));
    }
    assert_eq!(ConfigKey::from_canonical("remote_port"), None);
}

#[test]
fn test_descriptor_key_uses_compose_file_spelling() {
    assert_eq!(
        ConfigKey::LocalComposeFile.profile_names(),
        ["compose_file", "LOCAL_COMPOSE_FILE"]
    );
}

#[test]
fn test_parse_bool() {
    for truthy in ["1", "true", "YES", " on "] {
        assert!(parse_bool(truthy), "{truthy}");
    }
    for falsy in ["0", "false", "no", "", "enabled"] {
        assert!(!parse_bool(falsy), "{falsy}");
    }
}

#[test]
fn test_parse_port_boundaries() {
    assert_eq!(parse_port("1"), Some(1));
    assert_eq!(parse_port("65535"), Some(65535));
    assert_eq!(parse_port(" 2222 "), Some(2222));
    assert_eq!(parse_port("0"), None);
    assert_eq!(parse_port("65536"), None);
    assert_eq!(parse_port("22x"), None);
}

#[test]
fn test_serializes_as_canonical_name() {
    let json = serde_json::to_string(&ConfigKey::RemoteComposePath).unwrap();
    assert_eq!(json, "\"REMOTE_COMPOSE_PATH\"");
}
