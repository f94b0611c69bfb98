//! Explicit per-invocation overrides.
//!
//! Overrides have the highest precedence. A global override applies to every
//! environment resolved in the invocation; an environment override (for
//! example `--prod-remote-host`) applies only to that environment and beats
//! the global one.

use crate::{ConfigKey, EnvironmentName};
use std::collections::BTreeMap;

#[cfg(test)]
#[path = "overrides_tests.rs"]
mod tests;

/// Caller-supplied values for one invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    global: BTreeMap<ConfigKey, String>,
    per_env: BTreeMap<EnvironmentName, BTreeMap<ConfigKey, String>>,
    custom_envs: Vec<EnvironmentName>,
}

impl Overrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a global override, returning the updated value.
    pub fn with(mut self, key: ConfigKey, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    /// Sets an override for a single environment, returning the updated value.
    pub fn with_env(
        mut self,
        env: EnvironmentName,
        key: ConfigKey,
        value: impl Into<String>,
    ) -> Self {
        self.set_for(env, key, value);
        self
    }

    pub fn set(&mut self, key: ConfigKey, value: impl Into<String>) {
        self.global.insert(key, value.into());
    }

    pub fn set_for(&mut self, env: EnvironmentName, key: ConfigKey, value: impl Into<String>) {
        self.per_env.entry(env).or_default().insert(key, value.into());
    }

    /// Declares a custom environment explicitly (e.g. `--custom-env`).
    pub fn add_custom_env(&mut self, env: EnvironmentName) {
        self.custom_envs.push(env);
    }

    pub fn custom_envs(&self) -> &[EnvironmentName] {
        &self.custom_envs
    }

    /// Returns the override for `key` in `env`, if any.
    ///
    /// Environment overrides win over global ones; an empty value counts as
    /// unset at either level. Per-environment keys such as the descriptor file
    /// name are never taken from global overrides.
    pub fn lookup(&self, env: &EnvironmentName, key: ConfigKey) -> Option<&str> {
        let scoped = self
            .per_env
            .get(env)
            .and_then(|values| values.get(&key))
            .map(String::as_str)
            .filter(|v| !v.is_empty());

        let global = || {
            if key.is_per_environment() {
                None
            } else {
                self.global
                    .get(&key)
                    .map(String::as_str)
                    .filter(|v| !v.is_empty())
            }
        };

        scoped.or_else(global)
    }
}
