use super::*;
use std::fs;
use tempfile::TempDir;

fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

fn args(smoke_file: PathBuf, metrics_file: Option<PathBuf>) -> PostCheckArgs {
    PostCheckArgs {
        smoke_file,
        metrics_file,
        min_success_rate: 99.0,
        max_p95_latency: 500.0,
    }
}

#[test]
fn test_healthy_deployment_is_ok() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let smoke = write(&temp_dir, "smoke.json", r#"{"critical_path_ok": true}"#);
    let metrics = write(
        &temp_dir,
        "metrics.json",
        r#"{"success_rate": 99.5, "p95_latency_ms": 120}"#,
    );

    let report = execute(&args(smoke, Some(metrics))).unwrap();

    assert_eq!(report.status, Status::Ok);
    assert_eq!(report.exit_code(), 0);
}

#[test]
fn test_slow_deployment_requires_rollback_with_exit_code_two() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let smoke = write(&temp_dir, "smoke.json", r#"{"critical_path_ok": true}"#);
    let metrics = write(
        &temp_dir,
        "metrics.json",
        r#"{"success_rate": 99.9, "p95_latency_ms": 900}"#,
    );

    let report = execute(&args(smoke, Some(metrics))).unwrap();

    assert_eq!(report.status, Status::RollbackRequired);
    assert_eq!(report.exit_code(), 2);
    assert_eq!(report.to_value()["status"], "rollback_required");
}

#[test]
fn test_dry_run_smoke_is_skipped() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let smoke = write(&temp_dir, "smoke.json", r#"{"dry_run": true}"#);

    let report = execute(&args(smoke, None)).unwrap();

    assert_eq!(report.status, Status::Skipped);
    assert_eq!(report.exit_code(), 0);
}

#[test]
fn test_unreadable_smoke_file_is_error() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let smoke = write(&temp_dir, "smoke.json", "not json");

    let err = execute(&args(smoke, None)).unwrap_err();

    assert!(matches!(err, Error::Release(release_gate::Error::Json { .. })));
}
