//! Tests for the automation entrypoint contract.

use super::*;
use artifact_engine::{ArtifactSynthesizer, ForceOptions, SynthesisPlan};
use deploy_config::{EnvironmentName, Overrides, Profile};
use std::fs;
use tempfile::TempDir;

fn generated_makefile(root: &Path) -> String {
    let plan = SynthesisPlan::resolve(
        &Profile::empty().with_global_entry("app_name", "svc"),
        &EnvironmentName::prod(),
        &Overrides::new(),
        ForceOptions::default(),
    )
    .unwrap();
    ArtifactSynthesizer::new()
        .unwrap()
        .synthesize(root, &plan)
        .unwrap();
    fs::read_to_string(root.join(MAKEFILE)).unwrap()
}

#[test]
fn test_generated_makefile_passes_full_lint() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    generated_makefile(temp_dir.path());

    let report = lint_entrypoint(temp_dir.path()).unwrap();

    assert!(report.is_ok(), "{:?}", report.findings.messages());
    assert_eq!(report.file, "Makefile");
}

#[test]
fn test_has_target_does_not_match_prefixed_names() {
    let content = "build-arm: ## arm\n\tdocker build\n";
    assert!(has_target(content, "build-arm"));
    assert!(!has_target(content, "build"));
}

#[test]
fn test_structure_reports_missing_sentinel_and_targets() {
    let content = "# DEPLOYMENT-CONFIG:START\ntest:\n\techo\nbuild:\n\techo\n";
    let findings = check_structure(content);

    let subjects: Vec<&str> = findings
        .violations()
        .iter()
        .map(|v| v.subject.as_str())
        .collect();
    assert_eq!(
        subjects,
        vec![
            "# DEPLOYMENT-CONFIG:END",
            "tag",
            "push",
            "push-compose-file",
            "remote-deploy",
            "help"
        ]
    );
}

#[test]
fn test_wrong_image_composition_is_invalid() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let makefile = generated_makefile(temp_dir.path()).replace(
        "FULL_REGISTRY_IMAGE = $(REGISTRY_HOST)/$(APP_NAME):$(VERSION)",
        "FULL_REGISTRY_IMAGE = $(APP_NAME):$(VERSION)",
    );

    let findings = check_entrypoint(&makefile);

    assert_eq!(findings.violations().len(), 1);
    assert_eq!(findings.violations()[0].kind, ViolationKind::InvalidValue);
}

#[test]
fn test_ssh_without_port_is_reported() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let makefile = generated_makefile(temp_dir.path()).replace("ssh -p $(REMOTE_PORT) ", "ssh ");

    let findings = check_entrypoint(&makefile);

    assert_eq!(findings.violations().len(), 1);
    assert_eq!(findings.violations()[0].subject, "ssh -p $(REMOTE_PORT)");
}

#[test]
fn test_missing_makefile_is_single_violation() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let report = lint_entrypoint(temp_dir.path()).unwrap();

    assert_eq!(report.findings.violations().len(), 1);
    assert_eq!(
        report.findings.violations()[0].kind,
        ViolationKind::MissingArtifact
    );
}
