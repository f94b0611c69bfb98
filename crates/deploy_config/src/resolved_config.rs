//! Resolved per-environment configuration.
//!
//! A `ResolvedConfig` is the output of the resolver for one environment. It
//! is total: every [`ConfigKey`] has a value. Alongside the values it keeps a
//! source trace recording which precedence layer supplied each key, which is
//! what `create` reports and what debugging precedence problems needs.
//!
//! # Examples
//!
//! ```rust
//! use deploy_config::{ConfigKey, ConfigResolver, EnvironmentName, Overrides, Profile};
//!
//! let resolved = ConfigResolver::new()
//!     .resolve(&Profile::empty(), &EnvironmentName::prod(), &Overrides::new())
//!     .unwrap();
//!
//! assert_eq!(resolved.get(ConfigKey::RegistryHost), "registry.prod.example.com");
//! assert_eq!(resolved.remote_port(), 22);
//! ```

use crate::config_key::parse_bool;
use crate::{ConfigKey, EnvVars, EnvironmentName};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

#[cfg(test)]
#[path = "resolved_config_tests.rs"]
mod tests;

/// Precedence layer that supplied a resolved value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionSource {
    /// Explicit per-invocation override (highest precedence).
    Override,

    /// The environment's own profile section.
    EnvironmentProfile,

    /// Top-level profile entries.
    GlobalProfile,

    /// Defaults of the environment class (`local`, `test`, `prod`).
    ClassDefault,

    /// Hard-coded key default (lowest precedence).
    BuiltinDefault,
}

impl fmt::Display for ResolutionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolutionSource::Override => write!(f, "Override"),
            ResolutionSource::EnvironmentProfile => write!(f, "EnvironmentProfile"),
            ResolutionSource::GlobalProfile => write!(f, "GlobalProfile"),
            ResolutionSource::ClassDefault => write!(f, "ClassDefault"),
            ResolutionSource::BuiltinDefault => write!(f, "BuiltinDefault"),
        }
    }
}

/// Total configuration for one environment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedConfig {
    env: EnvironmentName,
    values: BTreeMap<ConfigKey, String>,
    source_trace: BTreeMap<ConfigKey, ResolutionSource>,
    #[serde(skip)]
    remote_port: u16,
    #[serde(skip)]
    app_port: u16,
}

impl ResolvedConfig {
    /// Assembles a record from already validated values.
    ///
    /// Callers outside the resolver go through
    /// [`ConfigResolver`](crate::ConfigResolver), which guarantees totality
    /// and the value invariants.
    pub(crate) fn from_parts(
        env: EnvironmentName,
        values: BTreeMap<ConfigKey, String>,
        source_trace: BTreeMap<ConfigKey, ResolutionSource>,
        remote_port: u16,
        app_port: u16,
    ) -> Self {
        Self {
            env,
            values,
            source_trace,
            remote_port,
            app_port,
        }
    }

    pub fn env(&self) -> &EnvironmentName {
        &self.env
    }

    /// Value of `key`.
    pub fn get(&self, key: ConfigKey) -> &str {
        self.values
            .get(&key)
            .map(String::as_str)
            .unwrap_or_else(|| key.builtin_default())
    }

    /// Layer that supplied `key`.
    pub fn source(&self, key: ConfigKey) -> Option<ResolutionSource> {
        self.source_trace.get(&key).copied()
    }

    pub fn source_trace(&self) -> &BTreeMap<ConfigKey, ResolutionSource> {
        &self.source_trace
    }

    pub fn app_name(&self) -> &str {
        self.get(ConfigKey::AppName)
    }

    pub fn version(&self) -> &str {
        self.get(ConfigKey::Version)
    }

    pub fn compose_file(&self) -> &str {
        self.get(ConfigKey::LocalComposeFile)
    }

    pub fn remote_port(&self) -> u16 {
        self.remote_port
    }

    pub fn app_port(&self) -> u16 {
        self.app_port
    }

    pub fn use_sudo(&self) -> bool {
        parse_bool(self.get(ConfigKey::UseSudo))
    }

    /// `(canonical name, value)` pairs for `keys`, in the given order.
    pub fn pairs(&self, keys: &[ConfigKey]) -> Vec<(&'static str, &str)> {
        keys.iter()
            .map(|key| (key.canonical_name(), self.get(*key)))
            .collect()
    }

    /// All values keyed by canonical name.
    pub fn to_env_vars(&self) -> EnvVars {
        ConfigKey::ALL
            .iter()
            .map(|key| (key.canonical_name().to_string(), self.get(*key).to_string()))
            .collect()
    }
}

