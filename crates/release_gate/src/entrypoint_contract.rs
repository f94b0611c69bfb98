//! Automation entrypoint (Makefile) contract.
//!
//! Two levels are checked. The structural contract is what every release
//! stage relies on: the generated block and the targets the stages invoke.
//! The full lint additionally requires every variable definition, target and
//! remote command form the generator emits.

use crate::merged_vars::read_optional;
use crate::Result;
use artifact_engine::{MAKEFILE, MAKEFILE_END, MAKEFILE_START};
use deploy_config::{Violation, ViolationKind, ViolationSet};
use regex::Regex;
use serde::Serialize;
use std::path::Path;
use std::sync::OnceLock;
use tracing::info;

#[cfg(test)]
#[path = "entrypoint_contract_tests.rs"]
mod tests;

/// Definitions the generated block provides.
pub const REQUIRED_DEFINITIONS: [&str; 12] = [
    "APP_NAME ?=",
    "VERSION ?=",
    "ENV_MODE ?=",
    "USE_SUDO ?=",
    "SUDO_CMD =",
    "MONOREPO_ROOT ?=",
    "DEPLOY_COMMON_FILE ?=",
    "DEPLOY_ENV_FILE ?=",
    "-include $(DEPLOY_COMMON_FILE)",
    "-include $(DEPLOY_ENV_FILE)",
    "FULL_REGISTRY_IMAGE =",
    "REMOTE_PORT ?=",
];

/// Every target the generated block defines.
pub const REQUIRED_TARGETS: [&str; 15] = [
    "check-config",
    "test",
    "build-arm",
    "build",
    "save",
    "tag",
    "push",
    "remote-pull",
    "remote-clean",
    "local-clean",
    "push-compose-file",
    "remote-deploy",
    "remote-status",
    "remote-logs",
    "help",
];

/// Targets release stages invoke directly.
pub const STAGE_TARGETS: [&str; 7] = [
    "test",
    "build",
    "tag",
    "push",
    "push-compose-file",
    "remote-deploy",
    "help",
];

/// Remote command forms that must carry the configured port.
pub const REMOTE_PORT_FORMS: [&str; 2] = ["ssh -p $(REMOTE_PORT)", "scp -P $(REMOTE_PORT)"];

fn image_composition() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"FULL_REGISTRY_IMAGE\s*=\s*\$\(REGISTRY_HOST\)/\$\(APP_NAME\):\$\(VERSION\)")
            .expect("static pattern")
    })
}

/// Whether a rule line for `target` exists.
pub fn has_target(content: &str, target: &str) -> bool {
    let prefix = format!("{target}:");
    content.lines().any(|line| line.starts_with(&prefix))
}

fn check_sentinels(content: &str, findings: &mut ViolationSet) {
    for sentinel in [MAKEFILE_START, MAKEFILE_END] {
        if !content.contains(sentinel) {
            findings.add(Violation::new(
                ViolationKind::MissingContract,
                sentinel,
                format!("Makefile is missing marker '{sentinel}'"),
            ));
        }
    }
}

fn check_targets(content: &str, targets: &[&str], findings: &mut ViolationSet) {
    for target in targets {
        if !has_target(content, target) {
            findings.add(Violation::new(
                ViolationKind::MissingContract,
                *target,
                format!("Makefile is missing target '{target}'"),
            ));
        }
    }
}

/// Structural contract required by every release stage.
pub fn check_structure(content: &str) -> ViolationSet {
    let mut findings = ViolationSet::new();
    check_sentinels(content, &mut findings);
    check_targets(content, &STAGE_TARGETS, &mut findings);
    findings
}

/// Full entrypoint lint.
pub fn check_entrypoint(content: &str) -> ViolationSet {
    let mut findings = ViolationSet::new();
    check_sentinels(content, &mut findings);

    for definition in REQUIRED_DEFINITIONS {
        if !content.contains(definition) {
            findings.add(Violation::new(
                ViolationKind::MissingContract,
                definition,
                format!("Makefile is missing definition '{definition}'"),
            ));
        }
    }

    check_targets(content, &REQUIRED_TARGETS, &mut findings);

    if content.contains("FULL_REGISTRY_IMAGE =") && !image_composition().is_match(content) {
        findings.add(Violation::new(
            ViolationKind::InvalidValue,
            "FULL_REGISTRY_IMAGE",
            "FULL_REGISTRY_IMAGE must be $(REGISTRY_HOST)/$(APP_NAME):$(VERSION)",
        ));
    }

    for form in REMOTE_PORT_FORMS {
        if !content.contains(form) {
            findings.add(Violation::new(
                ViolationKind::MissingContract,
                form,
                format!("Makefile remote commands must use '{form}'"),
            ));
        }
    }

    findings
}

/// Result of linting the entrypoint of a project root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntrypointLintReport {
    pub file: String,
    #[serde(flatten)]
    pub findings: ViolationSet,
}

impl EntrypointLintReport {
    pub fn is_ok(&self) -> bool {
        self.findings.is_ok()
    }
}

/// Lints `<root>/Makefile`. A missing file is a single `MissingArtifact`
/// violation.
pub fn lint_entrypoint(root: &Path) -> Result<EntrypointLintReport> {
    let findings = match read_optional(&root.join(MAKEFILE))? {
        Some(content) => check_entrypoint(&content),
        None => {
            let mut findings = ViolationSet::new();
            findings.add(missing_entrypoint());
            findings
        }
    };

    info!(
        violations = findings.violations().len(),
        "Linted automation entrypoint"
    );
    Ok(EntrypointLintReport {
        file: MAKEFILE.to_string(),
        findings,
    })
}

pub(crate) fn missing_entrypoint() -> Violation {
    Violation::new(
        ViolationKind::MissingArtifact,
        MAKEFILE,
        format!("Missing {MAKEFILE}"),
    )
}
