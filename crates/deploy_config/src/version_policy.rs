//! Version tag syntax and release policy.
//!
//! Version tags become part of image references
//! (`<registry>/<app>:<version>`), so they are restricted to
//! `[A-Za-z0-9._-]+`. Deploying the floating `latest` tag to `prod` is a
//! policy violation when strict, and a warning otherwise.

use crate::{
    ConfigError, ConfigResult, EnvironmentName, Violation, ViolationKind, ViolationSet,
};
use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;
use tracing::{debug, warn};

#[cfg(test)]
#[path = "version_policy_tests.rs"]
mod tests;

/// The floating tag that production deployments should avoid.
pub const FLOATING_TAG: &str = "latest";

fn version_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z0-9._-]+$").expect("static pattern"))
}

/// Whether `version` is a syntactically valid tag.
pub fn is_valid_version(version: &str) -> bool {
    version_pattern().is_match(version)
}

/// Validates version syntax.
///
/// # Errors
///
/// Returns `ConfigError::InvalidVersion` when the tag contains characters
/// outside `[A-Za-z0-9._-]` or is empty.
pub fn validate_version(version: &str) -> ConfigResult<()> {
    if is_valid_version(version) {
        Ok(())
    } else {
        Err(ConfigError::InvalidVersion {
            version: version.to_string(),
        })
    }
}

/// Outcome of a version policy check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionReport {
    pub env: String,
    pub version: String,
    pub strict: bool,
    #[serde(flatten)]
    pub findings: ViolationSet,
}

impl VersionReport {
    /// True when there are no hard violations.
    pub fn is_ok(&self) -> bool {
        self.findings.is_ok()
    }
}

/// Checks `version` against the release policy for `env`.
pub fn check_version(env: &EnvironmentName, version: &str, strict: bool) -> VersionReport {
    let mut findings = ViolationSet::new();

    if !is_valid_version(version) {
        findings.add(Violation::new(
            ViolationKind::VersionPolicy,
            version,
            format!("Invalid VERSION '{version}': expected [A-Za-z0-9._-]+"),
        ));
    } else if env.is_prod() && version == FLOATING_TAG {
        let message = format!("Deploying '{FLOATING_TAG}' to prod is not reproducible; pin a release tag");
        if strict {
            findings.add(Violation::new(ViolationKind::VersionPolicy, version, message));
        } else {
            warn!(env = %env, version, "Floating tag deployed to prod");
            findings.warn(message);
        }
    }

    debug!(env = %env, version, strict, ok = findings.is_ok(), "Checked version policy");

    VersionReport {
        env: env.to_string(),
        version: version.to_string(),
        strict,
        findings,
    }
}
