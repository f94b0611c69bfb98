//! Deployment record archive.
//!
//! Every deployment attempt can be archived as one JSON line in an
//! append-only file under the project root. A record captures who deployed
//! what where, with the merged variables in effect at the time.

use crate::merged_vars::{read_optional, MergedVars};
use crate::{Error, Result};
use artifact_engine::MAKEFILE;
use chrono::Utc;
use deploy_config::{EnvVars, EnvironmentName};
use serde::Serialize;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use tracing::{info, instrument};
use uuid::Uuid;

#[cfg(test)]
#[path = "record_tests.rs"]
mod tests;

/// Default archive file name.
pub const DEFAULT_ARCHIVE_FILE: &str = "deployment-records.jsonl";

/// App name used when the entrypoint does not define one.
pub const UNKNOWN_APP: &str = "unknown-app";

/// What to archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordRequest {
    pub env: EnvironmentName,
    pub version: String,
    pub actor: String,
    pub result: String,
    pub reason: String,
    /// Archive path relative to the project root.
    pub archive_file: String,
}

impl RecordRequest {
    pub fn new(env: EnvironmentName, version: impl Into<String>, result: impl Into<String>) -> Self {
        Self {
            env,
            version: version.into(),
            actor: "unknown".to_string(),
            result: result.into(),
            reason: String::new(),
            archive_file: DEFAULT_ARCHIVE_FILE.to_string(),
        }
    }
}

/// One archived line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeploymentRecord {
    pub record_id: String,
    pub archived_at: i64,
    pub app_name: String,
    pub env_mode: EnvironmentName,
    pub version: String,
    pub actor: String,
    pub result: String,
    pub reason: String,
    pub env_file: String,
    pub env_values: EnvVars,
}

/// Where a record was written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordReceipt {
    pub archive_file: String,
    pub record_id: String,
}

/// Reads `APP_NAME` from the first `APP_NAME ?=` line of the entrypoint.
pub fn entrypoint_app_name(makefile: &str) -> Option<&str> {
    makefile.lines().find_map(|line| {
        let (key, value) = line.split_once("?=")?;
        let value = value.trim();
        (key.trim() == "APP_NAME" && !value.is_empty()).then_some(value)
    })
}

/// Appends a deployment record to the archive under `root`.
///
/// # Errors
///
/// Returns `Error::RootNotFound` for a missing root and `Error::Io` when
/// the archive cannot be opened or written.
#[instrument(skip_all, fields(env = %request.env, version = %request.version))]
pub fn archive_record(root: &Path, request: &RecordRequest) -> Result<RecordReceipt> {
    if !root.is_dir() {
        return Err(Error::RootNotFound {
            path: root.display().to_string(),
        });
    }

    let makefile = read_optional(&root.join(MAKEFILE))?;
    let app_name = makefile
        .as_deref()
        .and_then(entrypoint_app_name)
        .unwrap_or(UNKNOWN_APP)
        .to_string();
    let merged = MergedVars::load(root, &request.env)?;

    let record = DeploymentRecord {
        record_id: Uuid::new_v4().to_string(),
        archived_at: Utc::now().timestamp(),
        app_name,
        env_mode: request.env.clone(),
        version: request.version.clone(),
        actor: request.actor.clone(),
        result: request.result.clone(),
        reason: request.reason.clone(),
        env_file: request.env.env_file_name(),
        env_values: merged.vars,
    };

    let path = root.join(&request.archive_file);
    let line = serde_json::to_string(&record).map_err(|e| Error::Json {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(|e| Error::io(&path, e))?;
    writeln!(file, "{line}").map_err(|e| Error::io(&path, e))?;

    info!(
        record_id = %record.record_id,
        archive = %request.archive_file,
        "Archived deployment record"
    );
    Ok(RecordReceipt {
        archive_file: request.archive_file.clone(),
        record_id: record.record_id,
    })
}
