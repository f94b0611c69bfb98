use super::*;
use std::fs;
use tempfile::TempDir;

fn args(version: Option<&str>, env: &str, strict: bool) -> VersionArgs {
    VersionArgs {
        version: version.map(str::to_string),
        env_mode: Some(EnvironmentName::parse(env).unwrap()),
        strict,
        root: PathBuf::from("."),
    }
}

#[test]
fn test_latest_in_prod_warns_unless_strict() {
    let lenient = execute(&args(Some("latest"), "prod", false)).unwrap();
    assert_eq!(lenient.status, Status::Ok);
    assert_eq!(lenient.get("warnings").unwrap().as_array().unwrap().len(), 1);

    let strict = execute(&args(Some("latest"), "prod", true)).unwrap();
    assert_eq!(strict.status, Status::Error);
}

#[test]
fn test_invalid_version_is_error_status() {
    let report = execute(&args(Some("1.0 beta"), "test", false)).unwrap();
    assert_eq!(report.status, Status::Error);
}

#[test]
fn test_version_is_read_from_project_when_not_given() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    fs::write(temp_dir.path().join(".deploy.env.common"), "VERSION=2.3.4\n").unwrap();
    let mut version_args = args(None, "prod", true);
    version_args.root = temp_dir.path().to_path_buf();

    let report = execute(&version_args).unwrap();

    assert_eq!(report.status, Status::Ok);
    assert_eq!(report.get("version"), Some(&serde_json::json!("2.3.4")));
}

#[test]
fn test_missing_version_is_invalid_arguments() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let mut version_args = args(None, "test", false);
    version_args.root = temp_dir.path().to_path_buf();

    let err = execute(&version_args).unwrap_err();
    assert!(matches!(err, Error::InvalidArguments(_)));
}
