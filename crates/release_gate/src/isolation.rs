//! Cross-environment isolation check.
//!
//! No non-production environment may deploy to exactly the same target as
//! `prod`. A target is identified by registry, remote user, remote host and
//! remote port; sharing only some of these is allowed.

use crate::merged_vars::MergedVars;
use crate::{Error, Result};
use deploy_config::{EnvironmentName, Violation, ViolationKind, ViolationSet, SHARED_ENV_NAME};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{info, instrument, warn};

#[cfg(test)]
#[path = "isolation_tests.rs"]
mod tests;

const ENV_FILE_PREFIX: &str = ".deploy.env.";

/// Deployment target of one environment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TargetIdentity {
    pub registry_host: String,
    pub remote_user: String,
    pub remote_host: String,
    pub remote_port: String,
}

impl TargetIdentity {
    pub fn new(
        registry_host: impl Into<String>,
        remote_user: impl Into<String>,
        remote_host: impl Into<String>,
        remote_port: impl Into<String>,
    ) -> Self {
        Self {
            registry_host: registry_host.into(),
            remote_user: remote_user.into(),
            remote_host: remote_host.into(),
            remote_port: remote_port.into(),
        }
    }

    /// Reads the identity from merged variables. Missing values are empty and
    /// `REMOTE_PORT` falls back to 22 as in the entrypoint.
    pub fn from_merged(merged: &MergedVars) -> Self {
        let get = |key: &str| merged.vars.get(key).unwrap_or("").trim().to_string();
        let port = merged
            .vars
            .get_non_empty("REMOTE_PORT")
            .unwrap_or("22")
            .trim()
            .to_string();
        Self {
            registry_host: get("REGISTRY_HOST"),
            remote_user: get("REMOTE_USER"),
            remote_host: get("REMOTE_HOST"),
            remote_port: port,
        }
    }
}

/// Outcome of the isolation check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IsolationReport {
    pub environments: Vec<EnvironmentName>,
    #[serde(flatten)]
    pub findings: ViolationSet,
}

impl IsolationReport {
    pub fn is_ok(&self) -> bool {
        self.findings.is_ok()
    }
}

/// Checks that no environment shares `prod`'s exact target identity.
///
/// Each colliding environment is one violation; `test` colliding with `prod`
/// is reported a second time with its own message.
pub fn check_isolation(identities: &BTreeMap<EnvironmentName, TargetIdentity>) -> IsolationReport {
    let mut findings = ViolationSet::new();
    let environments: Vec<EnvironmentName> = identities.keys().cloned().collect();

    if identities.is_empty() {
        findings.add(Violation::new(
            ViolationKind::MissingEnvironment,
            ENV_FILE_PREFIX,
            "No environment files found",
        ));
        return IsolationReport {
            environments,
            findings,
        };
    }

    let prod_name = EnvironmentName::prod();
    let Some(prod) = identities.get(&prod_name) else {
        findings.add(Violation::new(
            ViolationKind::MissingEnvironment,
            prod_name.as_str(),
            "Missing .deploy.env.prod",
        ));
        return IsolationReport {
            environments,
            findings,
        };
    };

    for (env, identity) in identities.iter().filter(|(env, _)| !env.is_prod()) {
        if identity == prod {
            findings.add(Violation::new(
                ViolationKind::IsolationCollision,
                env.as_str(),
                format!("environment {env} shares exact target identity with prod"),
            ));
        }
    }

    if identities.get(&EnvironmentName::test()) == Some(prod) {
        findings.add(Violation::new(
            ViolationKind::IsolationCollision,
            "test",
            "test and prod share exact target identity",
        ));
    }

    IsolationReport {
        environments,
        findings,
    }
}

/// Derives the target identity of every environment that has a variable
/// file under `root`. Files with invalid environment names are skipped.
#[instrument(skip_all, fields(root = %root.display()))]
pub fn load_identities(root: &Path) -> Result<BTreeMap<EnvironmentName, TargetIdentity>> {
    if !root.is_dir() {
        return Err(Error::RootNotFound {
            path: root.display().to_string(),
        });
    }

    let mut identities = BTreeMap::new();
    for entry in fs::read_dir(root).map_err(|e| Error::io(root, e))? {
        let entry = entry.map_err(|e| Error::io(root, e))?;
        let file_name = entry.file_name().to_string_lossy().into_owned();
        let Some(name) = file_name.strip_prefix(ENV_FILE_PREFIX) else {
            continue;
        };
        if name == SHARED_ENV_NAME || !entry.path().is_file() {
            continue;
        }

        let env = match EnvironmentName::parse(name) {
            Ok(env) if env.as_str() == name => env,
            Ok(env) => {
                warn!(
                    file = %file_name,
                    env = %env,
                    "Skipping environment file with non-normalized name"
                );
                continue;
            }
            Err(e) => {
                warn!(file = %file_name, error = %e, "Skipping environment file");
                continue;
            }
        };

        let merged = MergedVars::load(root, &env)?;
        identities.insert(env, TargetIdentity::from_merged(&merged));
    }

    info!(count = identities.len(), "Loaded target identities");
    Ok(identities)
}
