use deploy_config::ConfigError;
use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Error types that can occur while synthesizing deployment artifacts.
///
/// Every variant aborts synthesis of the remaining artifacts. Artifacts that
/// were already written stay on disk; each of them is complete because its
/// content is computed in memory before the single write.
#[derive(Error, Debug)]
pub enum Error {
    /// Reading or writing an artifact failed.
    #[error("IO error on {path}: {source}")]
    Io {
        /// The file or directory being accessed
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The project root does not exist or is not a directory.
    #[error("Project root does not exist: {path}")]
    RootNotFound { path: String },

    /// A template failed to compile or render.
    #[error("Failed to render template '{template}': {message}")]
    Render { template: String, message: String },

    /// Two planned artifacts resolve to the same file.
    #[error("Artifact path {path} is planned twice: {first} and {second}")]
    PathConflict {
        path: String,
        first: String,
        second: String,
    },

    /// The configuration handed to the synthesizer is invalid.
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
