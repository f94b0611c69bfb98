//! Multi-source configuration resolution.
//!
//! This module resolves a total [`ResolvedConfig`] for an environment from
//! the following sources, highest precedence first:
//!
//! 1. **Override**: explicit values for this invocation. Environment scoped
//!    overrides beat global ones.
//! 2. **Environment profile**: the environment's section of the profile,
//!    then global entries prefixed with the environment name
//!    (`prod_registry_host`, `PROD_REGISTRY_HOST`).
//! 3. **Global profile**: top-level profile entries.
//! 4. **Class default**: `prod` gets production registry, user and host; each
//!    class gets its descriptor file name. Custom environments get no
//!    standard class values.
//! 5. **Builtin default**: [`ConfigKey::builtin_default`].
//!
//! The layer order is a versioned [`PrecedenceTable`] so a change of policy
//! is an explicit, reviewable edit.
//!
//! Resolution validates ports, the version tag and the descriptor file name
//! before returning, so no file is written from an invalid record.

use crate::config_key::{parse_bool, parse_port};
use crate::resolved_config::ResolutionSource;
use crate::version_policy::validate_version;
use crate::{
    ConfigError, ConfigKey, ConfigResult, EnvironmentClass, EnvironmentName, Overrides, Profile,
    ResolvedConfig,
};
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;
use tracing::{debug, info, instrument};

#[cfg(test)]
#[path = "resolver_tests.rs"]
mod tests;

/// Ordered resolution layers, highest precedence first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrecedenceTable {
    pub version: u32,
    pub layers: &'static [ResolutionSource],
}

/// Current precedence policy.
///
/// Version 2 places environment-specific profile entries above global ones
/// for every environment class.
pub const PRECEDENCE: PrecedenceTable = PrecedenceTable {
    version: 2,
    layers: &[
        ResolutionSource::Override,
        ResolutionSource::EnvironmentProfile,
        ResolutionSource::GlobalProfile,
        ResolutionSource::ClassDefault,
        ResolutionSource::BuiltinDefault,
    ],
};

fn file_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z0-9._-]+$").expect("static pattern"))
}

/// Fixed-name files owned by synthesis.
pub const RESERVED_FILE_NAMES: [&str; 4] = ["Makefile", "Dockerfile", "AGENTS.md", "CLAUDE.md"];

const ENV_FILE_PREFIX: &str = ".deploy.env.";

/// Whether `name` is a plain file name in the project root.
pub fn is_valid_file_name(name: &str) -> bool {
    name != "." && name != ".." && file_name_pattern().is_match(name)
}

/// Whether `name` belongs to another generated artifact and so cannot be
/// used as a descriptor file.
pub fn is_reserved_file_name(name: &str) -> bool {
    RESERVED_FILE_NAMES.contains(&name) || name.starts_with(ENV_FILE_PREFIX)
}

fn validate_compose_file(name: &str) -> ConfigResult<()> {
    let reason = if !is_valid_file_name(name) {
        "expected a plain file name matching [A-Za-z0-9._-]+"
    } else if is_reserved_file_name(name) {
        "name is used by another generated artifact"
    } else {
        return Ok(());
    };
    Err(ConfigError::InvalidValue {
        key: ConfigKey::LocalComposeFile.canonical_name().to_string(),
        value: name.to_string(),
        reason: reason.to_string(),
    })
}

/// Resolves configuration records from a profile and overrides.
///
/// The resolver is stateless; it can be reused across environments and
/// invocations.
#[derive(Debug, Clone, Copy)]
pub struct ConfigResolver {
    table: PrecedenceTable,
}

impl ConfigResolver {
    /// Creates a resolver using the current [`PRECEDENCE`] table.
    pub fn new() -> Self {
        Self { table: PRECEDENCE }
    }

    pub fn precedence(&self) -> PrecedenceTable {
        self.table
    }

    /// Resolves the total configuration for `env`.
    ///
    /// # Errors
    ///
    /// - `ConfigError::InvalidPort` if `REMOTE_PORT` or `APP_PORT` is not an
    ///   integer in `1..=65535`
    /// - `ConfigError::InvalidVersion` if `VERSION` is not `[A-Za-z0-9._-]+`
    /// - `ConfigError::InvalidValue` if the descriptor file name is not a plain
    ///   file name or is taken by another generated artifact
    #[instrument(skip_all, fields(env = %env))]
    pub fn resolve(
        &self,
        profile: &Profile,
        env: &EnvironmentName,
        overrides: &Overrides,
    ) -> ConfigResult<ResolvedConfig> {
        let mut values = BTreeMap::new();
        let mut source_trace = BTreeMap::new();

        for key in ConfigKey::ALL {
            let (value, source) = if key == ConfigKey::EnvMode {
                (env.as_str().to_string(), ResolutionSource::ClassDefault)
            } else {
                self.resolve_key(profile, env, overrides, key)
            };
            values.insert(key, value);
            source_trace.insert(key, source);
        }

        let use_sudo = values
            .get(&ConfigKey::UseSudo)
            .map(|v| parse_bool(v))
            .unwrap_or(true);
        values.insert(ConfigKey::UseSudo, use_sudo.to_string());

        let remote_port = validated_port(&values, ConfigKey::RemotePort)?;
        let app_port = validated_port(&values, ConfigKey::AppPort)?;

        if let Some(version) = values.get(&ConfigKey::Version) {
            validate_version(version)?;
        }

        if let Some(compose_file) = values.get(&ConfigKey::LocalComposeFile) {
            validate_compose_file(compose_file)?;
        }

        debug!(
            env = %env,
            remote_host = values.get(&ConfigKey::RemoteHost).map(String::as_str).unwrap_or(""),
            "Resolved environment configuration"
        );

        Ok(ResolvedConfig::from_parts(
            env.clone(),
            values,
            source_trace,
            remote_port,
            app_port,
        ))
    }

    /// Resolves every environment independently.
    ///
    /// # Errors
    ///
    /// Fails on the first invalid environment with a
    /// `ConfigError::Environment` naming it.
    pub fn resolve_all(
        &self,
        profile: &Profile,
        envs: &[EnvironmentName],
        overrides: &Overrides,
    ) -> ConfigResult<Vec<ResolvedConfig>> {
        let resolved = envs
            .iter()
            .map(|env| {
                self.resolve(profile, env, overrides)
                    .map_err(|e| e.in_environment(env.as_str()))
            })
            .collect::<ConfigResult<Vec<_>>>()?;

        info!(count = resolved.len(), "Resolved environments");
        Ok(resolved)
    }

    fn resolve_key(
        &self,
        profile: &Profile,
        env: &EnvironmentName,
        overrides: &Overrides,
        key: ConfigKey,
    ) -> (String, ResolutionSource) {
        for layer in self.table.layers {
            if let Some(value) = layer_value(*layer, profile, env, overrides, key) {
                return (value, *layer);
            }
        }
        (
            key.builtin_default().to_string(),
            ResolutionSource::BuiltinDefault,
        )
    }
}

impl Default for ConfigResolver {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolves `env` with the current precedence table.
pub fn resolve(
    profile: &Profile,
    env: &EnvironmentName,
    overrides: &Overrides,
) -> ConfigResult<ResolvedConfig> {
    ConfigResolver::new().resolve(profile, env, overrides)
}

fn layer_value(
    layer: ResolutionSource,
    profile: &Profile,
    env: &EnvironmentName,
    overrides: &Overrides,
    key: ConfigKey,
) -> Option<String> {
    match layer {
        ResolutionSource::Override => overrides.lookup(env, key).map(str::to_string),
        ResolutionSource::EnvironmentProfile => profile
            .environment(env)
            .and_then(|section| section.lookup(key))
            .or_else(|| prefixed_global(profile, env, key))
            .map(str::to_string),
        ResolutionSource::GlobalProfile => {
            if key.is_per_environment() {
                None
            } else {
                profile.global().lookup(key).map(str::to_string)
            }
        }
        ResolutionSource::ClassDefault => class_default(env, key),
        ResolutionSource::BuiltinDefault => Some(key.builtin_default().to_string()),
    }
}

/// Global profile entries written as `<env>_<key>`, e.g. `test_remote_host`.
fn prefixed_global<'a>(
    profile: &'a Profile,
    env: &EnvironmentName,
    key: ConfigKey,
) -> Option<&'a str> {
    let [snake, canonical] = key.profile_names();
    let lower = format!("{}_{}", env.as_str(), snake);
    let upper = format!("{}_{}", env.as_str().to_ascii_uppercase(), canonical);
    profile
        .global()
        .get(&lower)
        .or_else(|| profile.global().get(&upper))
}

fn class_default(env: &EnvironmentName, key: ConfigKey) -> Option<String> {
    match (env.class(), key) {
        (_, ConfigKey::LocalComposeFile) => Some(env.default_compose_file()),
        (EnvironmentClass::Prod, ConfigKey::RegistryHost) => {
            Some("registry.prod.example.com".to_string())
        }
        (EnvironmentClass::Prod, ConfigKey::RemoteUser) => Some("deploy-prod".to_string()),
        (EnvironmentClass::Prod, ConfigKey::RemoteHost) => Some("prod.example.com".to_string()),
        _ => None,
    }
}

fn validated_port(values: &BTreeMap<ConfigKey, String>, key: ConfigKey) -> ConfigResult<u16> {
    let raw = values
        .get(&key)
        .map(String::as_str)
        .unwrap_or_else(|| key.builtin_default());
    parse_port(raw).ok_or_else(|| ConfigError::InvalidPort {
        key: key.canonical_name().to_string(),
        value: raw.to_string(),
    })
}

/// Custom environments for one invocation, in discovery order.
///
/// Sources are consulted in order: explicitly requested names, the profile's
/// `custom_envs` list, the profile's `environments` keys, and finally the
/// requested environment itself. Standard names are excluded and the first
/// occurrence of each name wins.
pub fn collect_custom_envs(
    explicit: &[EnvironmentName],
    profile: &Profile,
    requested: Option<&EnvironmentName>,
) -> Vec<EnvironmentName> {
    let mut custom: Vec<EnvironmentName> = Vec::new();
    let candidates = explicit
        .iter()
        .chain(profile.declared_custom_envs())
        .chain(profile.environment_names())
        .chain(requested);

    for env in candidates {
        if env.is_custom() && !custom.contains(env) {
            custom.push(env.clone());
        }
    }
    custom
}

/// Standard environments followed by `custom`.
pub fn known_environments(custom: &[EnvironmentName]) -> Vec<EnvironmentName> {
    let mut envs = EnvironmentName::standard();
    for env in custom {
        if !envs.contains(env) {
            envs.push(env.clone());
        }
    }
    envs
}

/// Environment used when the caller does not name one: the profile's
/// `env_mode`, else `test`.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvironmentName` when the profile's
/// `env_mode` is not a valid name.
pub fn default_environment(profile: &Profile) -> ConfigResult<EnvironmentName> {
    match profile.global().lookup(ConfigKey::EnvMode) {
        Some(name) => EnvironmentName::parse(name),
        None => Ok(EnvironmentName::test()),
    }
}
