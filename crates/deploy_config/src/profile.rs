//! Deployment profile documents.
//!
//! A profile supplies global defaults, per-environment override sections and
//! an optional list of declared custom environments:
//!
//! ```json
//! {
//!   "app_name": "svc",
//!   "registry_host": "registry.example.com",
//!   "environments": {
//!     "prod": { "registry_host": "r.example.com", "remote_port": 2222 },
//!     "canary": { "remote_host": "canary.example.com" }
//!   },
//!   "custom_envs": ["staging"]
//! }
//! ```
//!
//! Profiles are read from JSON (the default) or TOML, chosen by file
//! extension. Unknown keys are ignored. Scalar values may be strings, numbers
//! or booleans and are normalised to strings; `null` and empty strings count
//! as absent.

use crate::{ConfigError, ConfigKey, ConfigResult, EnvironmentName};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

#[cfg(test)]
#[path = "profile_tests.rs"]
mod tests;

/// Scalar entries of one profile level (global or one environment).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileSection {
    entries: HashMap<String, String>,
}

impl ProfileSection {
    /// Builds a section from the scalar members of a JSON object.
    ///
    /// Nested objects and arrays are skipped.
    fn from_object(object: &serde_json::Map<String, Value>) -> Self {
        let entries = object
            .iter()
            .filter_map(|(key, value)| scalar_to_string(value).map(|v| (key.clone(), v)))
            .collect();
        Self { entries }
    }

    /// Returns the first non-empty value among the key's profile spellings.
    pub fn lookup(&self, key: ConfigKey) -> Option<&str> {
        key.profile_names()
            .into_iter()
            .find_map(|name| self.get(name))
    }

    /// Returns a non-empty raw entry.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// Sets a raw entry; mainly useful for building profiles in code.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(name.into(), value.into());
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// An immutable deployment profile.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Profile {
    global: ProfileSection,
    environments: BTreeMap<EnvironmentName, ProfileSection>,
    environment_order: Vec<EnvironmentName>,
    custom_envs: Vec<EnvironmentName>,
}

impl Profile {
    /// An empty profile; resolution falls back to built-in defaults.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Loads a profile from disk.
    ///
    /// Files ending in `.toml` are parsed as TOML, everything else as JSON.
    ///
    /// # Errors
    ///
    /// - `ConfigError::ProfileNotFound` if the file does not exist
    /// - `ConfigError::Io` if it cannot be read
    /// - `ConfigError::ProfileParse` if it is not a valid document
    /// - `ConfigError::InvalidEnvironmentName` for bad environment names
    pub fn load(path: &Path) -> ConfigResult<Self> {
        debug!(path = %path.display(), "Loading profile");

        if !path.exists() {
            return Err(ConfigError::ProfileNotFound {
                path: path.display().to_string(),
            });
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::io(path, &e))?;
        let is_toml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

        let value: Value = if is_toml {
            toml::from_str(&content).map_err(|e| ConfigError::ProfileParse {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?
        } else {
            serde_json::from_str(&content).map_err(|e| ConfigError::ProfileParse {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?
        };

        let profile = Self::from_value(&value).map_err(|e| match e {
            ConfigError::ProfileParse { reason, .. } => ConfigError::ProfileParse {
                path: path.display().to_string(),
                reason,
            },
            other => other,
        })?;

        info!(
            path = %path.display(),
            environments = profile.environments.len(),
            custom_envs = profile.custom_envs.len(),
            "Loaded profile"
        );
        Ok(profile)
    }

    /// Parses a profile from JSON text.
    pub fn from_json_str(text: &str) -> ConfigResult<Self> {
        let value: Value = serde_json::from_str(text).map_err(|e| ConfigError::ProfileParse {
            path: "<inline>".to_string(),
            reason: e.to_string(),
        })?;
        Self::from_value(&value)
    }

    /// Builds a profile from an already-parsed document.
    pub fn from_value(value: &Value) -> ConfigResult<Self> {
        let object = value.as_object().ok_or_else(|| ConfigError::ProfileParse {
            path: "<inline>".to_string(),
            reason: "profile must be an object".to_string(),
        })?;

        let global = ProfileSection::from_object(object);

        let mut environments = BTreeMap::new();
        let mut environment_order = Vec::new();
        if let Some(Value::Object(envs)) = object.get("environments") {
            for (name, section) in envs {
                let env = EnvironmentName::parse(name)?;
                let section = match section {
                    Value::Object(entries) => ProfileSection::from_object(entries),
                    _ => ProfileSection::default(),
                };
                if !environment_order.contains(&env) {
                    environment_order.push(env.clone());
                }
                environments.insert(env, section);
            }
        }

        let mut custom_envs = Vec::new();
        if let Some(Value::Array(items)) = object.get("custom_envs") {
            for item in items {
                if let Some(name) = scalar_to_string(item) {
                    custom_envs.push(EnvironmentName::parse(name)?);
                }
            }
        }

        Ok(Self {
            global,
            environments,
            environment_order,
            custom_envs,
        })
    }

    /// Global (top-level) entries.
    pub fn global(&self) -> &ProfileSection {
        &self.global
    }

    /// The override section for `env`, if the profile declares one.
    pub fn environment(&self, env: &EnvironmentName) -> Option<&ProfileSection> {
        self.environments.get(env)
    }

    /// Environment names from the `environments` mapping, in document order.
    pub fn environment_names(&self) -> &[EnvironmentName] {
        &self.environment_order
    }

    /// Names listed under `custom_envs`.
    pub fn declared_custom_envs(&self) -> &[EnvironmentName] {
        &self.custom_envs
    }

    /// Returns a copy with `env`'s section entry set; used by tests and callers
    /// assembling profiles programmatically.
    pub fn with_environment_entry(
        mut self,
        env: EnvironmentName,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        if !self.environment_order.contains(&env) {
            self.environment_order.push(env.clone());
        }
        self.environments.entry(env).or_default().set(name, value);
        self
    }

    /// Returns a copy with a global entry set.
    pub fn with_global_entry(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.global.set(name, value);
        self
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
