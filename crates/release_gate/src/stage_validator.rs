//! Per-stage release contract validation.
//!
//! Each release stage has an ordered list of required variables. Validation
//! runs every check for the stage and collects all violations rather than
//! stopping at the first one:
//!
//! 1. the entrypoint's structural contract,
//! 2. the environment's variable file and the stage's required variables,
//! 3. for stages that ship the compose descriptor, the descriptor file and
//!    its token contract.

use crate::descriptor_contract::{check_descriptor, descriptor_file};
use crate::entrypoint_contract::{check_structure, missing_entrypoint};
use crate::merged_vars::{read_optional, MergedVars};
use crate::{Error, Result};
use artifact_engine::MAKEFILE;
use deploy_config::{
    is_reserved_file_name, is_valid_file_name, parse_port, ConfigKey, EnvironmentClass,
    EnvironmentName, Violation, ViolationKind, ViolationSet,
};
use serde::Serialize;
use std::fmt;
use std::path::Path;
use tracing::{debug, info, instrument};

#[cfg(test)]
#[path = "stage_validator_tests.rs"]
mod tests;

/// Required variables of one release stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageRequirement {
    pub stage: &'static str,
    pub keys: &'static [ConfigKey],
}

impl StageRequirement {
    /// Whether the stage ships the compose descriptor.
    pub fn touches_descriptor(&self) -> bool {
        self.keys.contains(&ConfigKey::LocalComposeFile)
    }
}

const REMOTE_OPERATION: &[ConfigKey] = &[
    ConfigKey::AppName,
    ConfigKey::RemoteUser,
    ConfigKey::RemoteHost,
    ConfigKey::RemotePort,
    ConfigKey::RemoteComposePath,
    ConfigKey::LocalComposeFile,
];

/// Requirement table of the known stages.
pub const STAGE_REQUIREMENTS: &[StageRequirement] = &[
    StageRequirement {
        stage: "tag",
        keys: &[ConfigKey::AppName, ConfigKey::Version, ConfigKey::RegistryHost],
    },
    StageRequirement {
        stage: "push",
        keys: &[
            ConfigKey::AppName,
            ConfigKey::Version,
            ConfigKey::RegistryHost,
            ConfigKey::LocalComposeFile,
        ],
    },
    StageRequirement {
        stage: "remote-pull",
        keys: &[
            ConfigKey::AppName,
            ConfigKey::Version,
            ConfigKey::RegistryHost,
            ConfigKey::RemoteUser,
            ConfigKey::RemoteHost,
            ConfigKey::RemotePort,
        ],
    },
    StageRequirement {
        stage: "remote-clean",
        keys: &[
            ConfigKey::RemoteUser,
            ConfigKey::RemoteHost,
            ConfigKey::RemotePort,
        ],
    },
    StageRequirement {
        stage: "push-compose-file",
        keys: REMOTE_OPERATION,
    },
    StageRequirement {
        stage: "remote-deploy",
        keys: &[
            ConfigKey::AppName,
            ConfigKey::Version,
            ConfigKey::RegistryHost,
            ConfigKey::RemoteUser,
            ConfigKey::RemoteHost,
            ConfigKey::RemotePort,
            ConfigKey::RemoteComposePath,
            ConfigKey::LocalComposeFile,
        ],
    },
    StageRequirement {
        stage: "remote-status",
        keys: REMOTE_OPERATION,
    },
    StageRequirement {
        stage: "remote-logs",
        keys: REMOTE_OPERATION,
    },
];

/// Looks up the requirement of `stage`.
pub fn stage_requirement(stage: &str) -> Option<&'static StageRequirement> {
    STAGE_REQUIREMENTS.iter().find(|r| r.stage == stage)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StageStatus {
    Ok,
    Skipped,
    Failed,
}

impl fmt::Display for StageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StageStatus::Ok => write!(f, "ok"),
            StageStatus::Skipped => write!(f, "skipped"),
            StageStatus::Failed => write!(f, "failed"),
        }
    }
}

/// Outcome of validating one stage for one environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageReport {
    pub status: StageStatus,
    pub stage: String,
    pub env: EnvironmentName,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub env_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compose_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(flatten)]
    pub findings: ViolationSet,
}

impl StageReport {
    pub fn is_ok(&self) -> bool {
        self.status != StageStatus::Failed
    }
}

/// Validates `stage` for `env` against the project at `root`.
///
/// Loads the merged variables of `env` and delegates to
/// [`validate_merged`]. An unknown stage is reported as skipped without
/// touching the filesystem.
///
/// # Errors
///
/// Returns `Error::RootNotFound` when `root` is not a directory and
/// `Error::Io` when an existing file cannot be read. Contract problems are
/// violations in the report, not errors.
#[instrument(skip_all, fields(stage = %stage, env = %env))]
pub fn validate(stage: &str, env: &EnvironmentName, root: &Path) -> Result<StageReport> {
    if stage_requirement(stage).is_none() {
        return Ok(skipped(stage, env));
    }
    ensure_root(root)?;

    let merged = MergedVars::load(root, env)?;
    validate_merged(stage, env, &merged, root)
}

/// Validates `stage` for `env` using an already merged variable set.
///
/// The entrypoint structure and the descriptor file are still read from
/// `root`; variable requirements are checked against `merged` only.
pub fn validate_merged(
    stage: &str,
    env: &EnvironmentName,
    merged: &MergedVars,
    root: &Path,
) -> Result<StageReport> {
    let Some(requirement) = stage_requirement(stage) else {
        return Ok(skipped(stage, env));
    };
    ensure_root(root)?;

    let mut findings = ViolationSet::new();

    match read_optional(&root.join(MAKEFILE))? {
        Some(content) => findings.extend(check_structure(&content)),
        None => findings.add(missing_entrypoint()),
    }

    let env_file = env.env_file_name();
    if env.class() != EnvironmentClass::Local && !merged.env_file_found {
        findings.add(Violation::new(
            ViolationKind::MissingArtifact,
            env_file.as_str(),
            format!("Missing environment file: {env_file}"),
        ));
    }

    findings.extend(check_required_keys(requirement, merged));
    findings.extend(check_ports(merged));

    let compose_file = if requirement.touches_descriptor() {
        let file = descriptor_file(&merged.vars, env);
        findings.extend(check_stage_descriptor(root, env, &file)?);
        Some(file)
    } else {
        None
    };

    let status = if findings.is_ok() {
        StageStatus::Ok
    } else {
        StageStatus::Failed
    };
    debug!(
        status = %status,
        violations = findings.violations().len(),
        "Validated stage"
    );

    Ok(StageReport {
        status,
        stage: stage.to_string(),
        env: env.clone(),
        env_file: Some(env_file),
        compose_file,
        reason: None,
        findings,
    })
}

fn skipped(stage: &str, env: &EnvironmentName) -> StageReport {
    info!("Stage has no release contract; skipping");
    StageReport {
        status: StageStatus::Skipped,
        stage: stage.to_string(),
        env: env.clone(),
        env_file: None,
        compose_file: None,
        reason: Some(format!("no release contract for stage '{stage}'")),
        findings: ViolationSet::new(),
    }
}

fn ensure_root(root: &Path) -> Result<()> {
    if root.is_dir() {
        Ok(())
    } else {
        Err(Error::RootNotFound {
            path: root.display().to_string(),
        })
    }
}

fn check_required_keys(requirement: &StageRequirement, merged: &MergedVars) -> ViolationSet {
    let mut findings = ViolationSet::new();
    for key in requirement.keys {
        let name = key.canonical_name();
        if merged.vars.get_non_empty(name).is_none() {
            findings.add(Violation::new(
                ViolationKind::MissingVariable,
                name,
                format!("{name} is required for stage '{}'", requirement.stage),
            ));
        }
    }
    findings
}

/// Range-checks every port present in the merged set, required or not.
fn check_ports(merged: &MergedVars) -> ViolationSet {
    let mut findings = ViolationSet::new();
    for key in ConfigKey::ALL.into_iter().filter(|key| key.is_port()) {
        let name = key.canonical_name();
        if let Some(value) = merged.vars.get_non_empty(name) {
            if parse_port(value).is_none() {
                findings.add(Violation::new(
                    ViolationKind::InvalidValue,
                    name,
                    format!("{name} must be an integer between 1 and 65535, got '{value}'"),
                ));
            }
        }
    }
    findings
}

fn check_stage_descriptor(root: &Path, env: &EnvironmentName, file: &str) -> Result<ViolationSet> {
    let mut findings = ViolationSet::new();

    if !is_valid_file_name(file) || is_reserved_file_name(file) {
        findings.add(Violation::new(
            ViolationKind::InvalidValue,
            ConfigKey::LocalComposeFile.canonical_name(),
            format!("LOCAL_COMPOSE_FILE must be a plain file name, got '{file}'"),
        ));
        return Ok(findings);
    }

    match read_optional(&root.join(file))? {
        Some(content) => findings.extend(check_descriptor(&content, env.class(), file)),
        None => findings.add(Violation::new(
            ViolationKind::MissingArtifact,
            file,
            format!("Missing compose file: {file}"),
        )),
    }
    Ok(findings)
}
