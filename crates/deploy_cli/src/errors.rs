use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Errors that can occur in the deploy-config CLI.
///
/// Each library crate's error converts into this enum so command handlers can
/// propagate with `?`.
#[derive(Error, Debug)]
pub enum Error {
    /// Profile loading or configuration resolution failed.
    #[error("Configuration error: {0}")]
    Config(#[from] deploy_config::ConfigError),

    /// Artifact rendering or writing failed.
    #[error("Artifact error: {0}")]
    Artifact(#[from] artifact_engine::Error),

    /// A release check could not produce a report.
    #[error("Release check error: {0}")]
    Release(#[from] release_gate::Error),

    /// The command report could not be serialized.
    #[error("Failed to serialize report: {0}")]
    Report(#[from] serde_json::Error),

    /// Invalid or incompatible command-line arguments.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),
}
