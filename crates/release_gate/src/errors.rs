use deploy_config::ConfigError;
use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Errors that stop a release check from producing a report.
///
/// Problems the checks are designed to find (missing variables, collisions,
/// missing descriptor tokens) are not errors; they are collected as
/// [`deploy_config::Violation`] values in the report.
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {path}: {reason}")]
    Json { path: String, reason: String },

    #[error("Project root does not exist: {path}")]
    RootNotFound { path: String },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl Error {
    pub(crate) fn io(path: impl AsRef<std::path::Path>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.as_ref().display().to_string(),
            source,
        }
    }
}

/// Result type alias for release checks.
pub type Result<T> = std::result::Result<T, Error>;
