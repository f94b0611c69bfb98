//! Artifact write strategies.
//!
//! Both strategies compute the complete new file content in memory and then
//! perform at most one write. An `Unchanged` or `Skipped` outcome performs
//! no write at all.

use crate::marked_block;
use crate::{Error, Result};
use serde::Serialize;
use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::debug;

#[cfg(test)]
#[path = "writer_tests.rs"]
mod tests;

/// What happened to one artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactOutcome {
    /// The file did not exist and was written.
    Created,
    /// The file existed and its content changed.
    Updated,
    /// The file existed with exactly the generated content.
    Unchanged,
    /// The file existed and overwriting it was not requested.
    Skipped,
}

impl fmt::Display for ArtifactOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactOutcome::Created => write!(f, "created"),
            ArtifactOutcome::Updated => write!(f, "updated"),
            ArtifactOutcome::Unchanged => write!(f, "unchanged"),
            ArtifactOutcome::Skipped => write!(f, "skipped"),
        }
    }
}

/// How an artifact is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteStrategy {
    /// Only the region between the sentinels is generated.
    MarkedBlock {
        start: &'static str,
        end: &'static str,
    },
    /// The generator owns the whole file; existing files are kept unless
    /// `force` is set.
    WholeFile { force: bool },
}

/// Reads a file, returning `None` when it does not exist.
pub(crate) fn read_existing(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(Error::io(path, e)),
    }
}

/// Inserts or replaces the marked block in `path`.
pub fn write_marked_block(path: &Path, start: &str, end: &str, block: &str) -> Result<ArtifactOutcome> {
    let existing = read_existing(path)?;
    let (content, outcome) = marked_block::upsert(existing.as_deref(), start, end, block);

    if outcome != ArtifactOutcome::Unchanged {
        fs::write(path, content).map_err(|e| Error::io(path, e))?;
    }

    debug!(path = %path.display(), outcome = %outcome, "Wrote marked block");
    Ok(outcome)
}

/// Writes a generator-owned file.
///
/// Content is normalised to end with exactly one newline. An existing file is
/// left alone (`Skipped`) unless `force` is set, in which case it is always
/// rewritten and reported `Updated`.
pub fn write_whole_file(path: &Path, content: &str, force: bool) -> Result<ArtifactOutcome> {
    let existing = read_existing(path)?;
    let content = marked_block::normalize_block(content);

    let outcome = match existing {
        Some(_) if !force => ArtifactOutcome::Skipped,
        Some(_) => ArtifactOutcome::Updated,
        None => ArtifactOutcome::Created,
    };

    if matches!(outcome, ArtifactOutcome::Created | ArtifactOutcome::Updated) {
        fs::write(path, &content).map_err(|e| Error::io(path, e))?;
    }

    debug!(path = %path.display(), outcome = %outcome, force, "Wrote whole file");
    Ok(outcome)
}

/// Applies `strategy` to `path`.
pub fn write_artifact(path: &Path, strategy: &WriteStrategy, content: &str) -> Result<ArtifactOutcome> {
    match strategy {
        WriteStrategy::MarkedBlock { start, end } => write_marked_block(path, start, end, content),
        WriteStrategy::WholeFile { force } => write_whole_file(path, content, *force),
    }
}
