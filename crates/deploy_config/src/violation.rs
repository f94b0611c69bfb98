//! Violation and warning records shared by all checks.
//!
//! Checks collect every problem they find instead of stopping at the first
//! one, so problems are plain data rather than errors.
//!
//! # Examples
//!
//! ```rust
//! use deploy_config::{Violation, ViolationKind, ViolationSet};
//!
//! let mut set = ViolationSet::new();
//! assert!(set.is_ok());
//!
//! set.add(Violation::new(
//!     ViolationKind::MissingVariable,
//!     "REMOTE_HOST",
//!     "REMOTE_HOST is required for stage 'push-compose-file'",
//! ));
//!
//! assert!(!set.is_ok());
//! assert_eq!(set.violations().len(), 1);
//! ```

use serde::Serialize;
use std::fmt;

/// Violation categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    /// A required file does not exist.
    MissingArtifact,
    /// A required sentinel, target or definition is absent from a file.
    MissingContract,
    /// A required variable is absent or empty.
    MissingVariable,
    /// A variable is present but has an invalid value.
    InvalidValue,
    /// A compose descriptor lacks a required token.
    MissingToken,
    /// Two environments share a deployment target identity.
    IsolationCollision,
    /// A required environment has no configuration.
    MissingEnvironment,
    /// A version tag breaks syntax or release policy.
    VersionPolicy,
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingArtifact => write!(f, "MissingArtifact"),
            Self::MissingContract => write!(f, "MissingContract"),
            Self::MissingVariable => write!(f, "MissingVariable"),
            Self::InvalidValue => write!(f, "InvalidValue"),
            Self::MissingToken => write!(f, "MissingToken"),
            Self::IsolationCollision => write!(f, "IsolationCollision"),
            Self::MissingEnvironment => write!(f, "MissingEnvironment"),
            Self::VersionPolicy => write!(f, "VersionPolicy"),
        }
    }
}

/// One problem found by a check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// The category of the problem.
    pub kind: ViolationKind,
    /// What the problem is about: a file, key, token or environment.
    pub subject: String,
    /// Human-readable description.
    pub message: String,
}

impl Violation {
    pub fn new(kind: ViolationKind, subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            subject: subject.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)
    }
}

/// Ordered collection of violations and non-blocking warnings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ViolationSet {
    violations: Vec<Violation>,
    warnings: Vec<String>,
}

impl ViolationSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when there are no violations; warnings do not count.
    pub fn is_ok(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn add(&mut self, violation: Violation) {
        self.violations.push(violation);
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    pub fn extend(&mut self, other: ViolationSet) {
        self.violations.extend(other.violations);
        self.warnings.extend(other.warnings);
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Violations as display strings, for reports.
    pub fn messages(&self) -> Vec<String> {
        self.violations.iter().map(|v| v.message.clone()).collect()
    }
}
