//! Configuration error types.
//!
//! Errors raised while loading a profile or resolving an environment. Every
//! variant is fatal to the current invocation and is raised before any
//! artifact on disk is touched.

use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Errors produced by profile loading and configuration resolution.
///
/// Collected problems (missing variables, isolation collisions, policy
/// violations) are not errors; they are reported as [`crate::Violation`]
/// values so that callers can show the full list in one pass.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Profile not found: {path}")]
    ProfileNotFound { path: String },

    #[error("Failed to parse profile {path}: {reason}")]
    ProfileParse { path: String, reason: String },

    #[error("Invalid environment name '{name}': {reason}")]
    InvalidEnvironmentName { name: String, reason: String },

    #[error("Environment name '{name}' is reserved")]
    ReservedEnvironmentName { name: String },

    #[error("Invalid version '{version}': only letters, digits, '.', '_' and '-' are allowed")]
    InvalidVersion { version: String },

    #[error("Invalid port for {key}: '{value}' is not an integer in 1..=65535")]
    InvalidPort { key: String, value: String },

    #[error("Invalid value for {key}: '{value}' - {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    #[error("Failed to access {path}: {reason}")]
    Io { path: String, reason: String },

    /// A failure while resolving one environment of a batch.
    #[error("Environment '{env}': {source}")]
    Environment {
        env: String,
        #[source]
        source: Box<ConfigError>,
    },
}

impl ConfigError {
    /// Wraps this error with the name of the environment being resolved.
    pub fn in_environment(self, env: impl Into<String>) -> Self {
        ConfigError::Environment {
            env: env.into(),
            source: Box::new(self),
        }
    }

    /// Creates an IO error that names the path being accessed.
    pub fn io(path: impl AsRef<std::path::Path>, err: &std::io::Error) -> Self {
        ConfigError::Io {
            path: path.as_ref().display().to_string(),
            reason: err.to_string(),
        }
    }
}

/// Result type alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;
