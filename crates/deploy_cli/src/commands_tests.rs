use super::*;

#[test]
fn test_parse_env_name_normalizes() {
    assert_eq!(parse_env_name(" Prod ").unwrap(), EnvironmentName::prod());
}

#[test]
fn test_parse_env_name_rejects_reserved_and_invalid() {
    assert!(parse_env_name("common").unwrap_err().contains("reserved"));
    assert!(parse_env_name("eu west").is_err());
}

#[test]
fn test_env_or_default_is_test() {
    assert_eq!(env_or_default(None), EnvironmentName::test());
    assert_eq!(
        env_or_default(Some(&EnvironmentName::local())),
        EnvironmentName::local()
    );
}
