//! Flat `KEY=VALUE` variable file codec.
//!
//! Variable files are the persisted form of per-environment overrides
//! (`.deploy.env.<env>`) and of the shared file (`.deploy.env.common`).
//! Lines are trimmed; blank lines, `#` comments and lines without `=` are
//! ignored. Values are untyped strings; consumers validate types themselves.

use crate::{ConfigError, ConfigResult};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::debug;

#[cfg(test)]
#[path = "env_file_tests.rs"]
mod tests;

/// Parsed contents of a variable file.
///
/// Later assignments of the same key replace earlier ones, matching how the
/// files are consumed by `make`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct EnvVars(BTreeMap<String, String>);

impl EnvVars {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Returns the value for `key`, including empty values.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Returns the value for `key` only if it is present and not blank.
    pub fn get_non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|v| !v.trim().is_empty())
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Overlays `other` on top of `self`; keys in `other` win.
    pub fn merge_from(&mut self, other: &EnvVars) {
        for (key, value) in &other.0 {
            self.0.insert(key.clone(), value.clone());
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl FromIterator<(String, String)> for EnvVars {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Parses variable file text.
pub fn parse(text: &str) -> EnvVars {
    let mut vars = EnvVars::new();
    for raw in text.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((key, value)) = line.split_once('=') {
            vars.insert(key.trim(), value.trim());
        }
    }
    vars
}

/// Renders `pairs` as variable file text.
///
/// The optional header becomes a leading `# header` comment. Output always
/// ends with a newline.
pub fn render<K, V>(header: Option<&str>, pairs: &[(K, V)]) -> String
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut out = String::new();
    if let Some(header) = header {
        out.push_str("# ");
        out.push_str(header);
        out.push('\n');
    }
    for (key, value) in pairs {
        out.push_str(key.as_ref());
        out.push('=');
        out.push_str(value.as_ref());
        out.push('\n');
    }
    out
}

/// Reads and parses a variable file.
///
/// Returns `Ok(None)` when the file does not exist.
///
/// # Errors
///
/// Returns `ConfigError::Io` naming the path when the file exists but cannot
/// be read.
pub fn read(path: &Path) -> ConfigResult<Option<EnvVars>> {
    match fs::read_to_string(path) {
        Ok(text) => {
            let vars = parse(&text);
            debug!(path = %path.display(), keys = vars.len(), "Read variable file");
            Ok(Some(vars))
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(ConfigError::io(path, &e)),
    }
}
