//! End-to-end scenarios: generate a project, then gate its release.

use clap::Parser;
use deploy_cli::commands::execute;
use deploy_cli::report::{CommandReport, Status};
use deploy_cli::Cli;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const SVC_PROFILE: &str = r#"{
    "app_name": "svc",
    "version": "1.4.2",
    "registry_host": "registry.example.com",
    "environments": {
        "prod": { "registry_host": "r.example.com", "remote_port": 2222 }
    }
}"#;

fn run(args: &[&str]) -> CommandReport {
    let mut argv = vec!["deploy-config"];
    argv.extend_from_slice(args);
    let cli = Cli::try_parse_from(argv).expect("arguments should parse");
    execute(cli.command).expect("command should produce a report")
}

fn root_arg(dir: &TempDir) -> String {
    dir.path().to_string_lossy().into_owned()
}

fn create_svc(dir: &TempDir) -> CommandReport {
    let profile = dir.path().join("deploy-profile.json");
    fs::write(&profile, SVC_PROFILE).unwrap();
    run(&[
        "create",
        "--root",
        &root_arg(dir),
        "--env-mode",
        "prod",
        "--profile",
        &profile.to_string_lossy(),
    ])
}

fn outcome(report: &CommandReport, path: &str) -> Option<String> {
    report
        .get("artifacts")?
        .as_array()?
        .iter()
        .find(|a| a["path"] == path)
        .and_then(|a| a["outcome"].as_str())
        .map(str::to_string)
}

fn read(dir: &Path, name: &str) -> String {
    fs::read_to_string(dir.join(name)).unwrap()
}

#[test]
fn test_svc_prod_push_scenario() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");

    let created = create_svc(&temp_dir);
    assert_eq!(created.status, Status::Ok);
    assert_eq!(outcome(&created, "Makefile").as_deref(), Some("created"));

    let prod_env = read(temp_dir.path(), ".deploy.env.prod");
    assert!(prod_env.contains("REGISTRY_HOST=r.example.com\n"));
    assert!(prod_env.contains("REMOTE_PORT=2222\n"));
    assert!(prod_env.contains("REMOTE_USER=deploy-prod\n"));

    let validated = run(&[
        "validate",
        "--stage",
        "push",
        "--env-mode",
        "prod",
        "--root",
        &root_arg(&temp_dir),
    ]);
    assert_eq!(validated.status, Status::Ok, "{}", validated.to_json());
    assert_eq!(
        validated.get("compose_file"),
        Some(&Value::from("docker-compose.yaml"))
    );

    let lint = run(&["lint-makefile", "--root", &root_arg(&temp_dir)]);
    assert_eq!(lint.status, Status::Ok, "{}", lint.to_json());

    let compose = run(&["lint-compose", "--all", "--root", &root_arg(&temp_dir)]);
    assert_eq!(compose.status, Status::Ok, "{}", compose.to_json());

    let isolation = run(&["check-isolation", "--root", &root_arg(&temp_dir)]);
    assert_eq!(isolation.status, Status::Ok, "{}", isolation.to_json());
}

#[test]
fn test_rerun_keeps_makefile_unchanged_and_user_content() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    create_svc(&temp_dir);

    let makefile = temp_dir.path().join("Makefile");
    let with_user_rule = format!("{}\nrelease: remote-deploy\n", read(temp_dir.path(), "Makefile"));
    fs::write(&makefile, &with_user_rule).unwrap();

    let rerun = create_svc(&temp_dir);

    assert_eq!(outcome(&rerun, "Makefile").as_deref(), Some("unchanged"));
    assert_eq!(outcome(&rerun, "Dockerfile").as_deref(), Some("skipped"));
    assert_eq!(read(temp_dir.path(), "Makefile"), with_user_rule);
}

#[test]
fn test_canary_custom_environment() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let root = root_arg(&temp_dir);

    let created = run(&[
        "create",
        "--root",
        &root,
        "--env-mode",
        "canary",
        "--app-name",
        "svc",
        "--remote-host",
        "canary.example.com",
    ]);
    assert_eq!(created.status, Status::Ok);
    assert_eq!(
        created.get("custom_envs"),
        Some(&serde_json::json!(["canary"]))
    );
    assert!(temp_dir.path().join("docker-compose.canary.yaml").exists());

    let validated = run(&[
        "validate",
        "--stage",
        "remote-deploy",
        "--env-mode",
        "canary",
        "--root",
        &root,
    ]);
    assert_eq!(validated.status, Status::Ok, "{}", validated.to_json());

    let compose = run(&["lint-compose", "--env-mode", "canary", "--root", &root]);
    assert_eq!(compose.status, Status::Ok, "{}", compose.to_json());
}

#[test]
fn test_isolation_collision_and_fix() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let root = root_arg(&temp_dir);
    create_svc(&temp_dir);

    let prod_env = read(temp_dir.path(), ".deploy.env.prod");
    let staging = prod_env.replace("DEPLOYMENT-ENV:prod", "DEPLOYMENT-ENV:staging");
    fs::write(temp_dir.path().join(".deploy.env.staging"), &staging).unwrap();

    let collision = run(&["check-isolation", "--root", &root]);
    assert_eq!(collision.status, Status::Error);
    assert_eq!(collision.exit_code(), 1);
    let violations = collision.get("violations").unwrap().as_array().unwrap();
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0]["kind"], "isolation_collision");

    let fixed = staging.replace("REMOTE_PORT=2222", "REMOTE_PORT=2223");
    fs::write(temp_dir.path().join(".deploy.env.staging"), fixed).unwrap();

    let isolated = run(&["check-isolation", "--root", &root]);
    assert_eq!(isolated.status, Status::Ok, "{}", isolated.to_json());
}

#[test]
fn test_unknown_stage_is_skipped() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");

    let report = run(&[
        "validate",
        "--stage",
        "build",
        "--root",
        &temp_dir.path().join("missing").to_string_lossy(),
    ]);

    assert_eq!(report.status, Status::Skipped);
    assert_eq!(report.exit_code(), 0);
}

#[test]
fn test_archive_record_uses_project_version() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let root = root_arg(&temp_dir);
    create_svc(&temp_dir);

    let report = run(&[
        "archive-record",
        "--env-mode",
        "prod",
        "--result",
        "success",
        "--actor",
        "ci",
        "--root",
        &root,
    ]);
    assert_eq!(report.status, Status::Ok);

    let archive = read(temp_dir.path(), "deployment-records.jsonl");
    let record: Value = serde_json::from_str(archive.trim()).unwrap();
    assert_eq!(record["record_id"], report.get("record_id").cloned().unwrap());
    assert_eq!(record["app_name"], "svc");
    assert_eq!(record["version"], "1.4.2");
    assert_eq!(record["env_values"]["REMOTE_PORT"], "2222");
}
