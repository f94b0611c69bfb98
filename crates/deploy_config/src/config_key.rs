//! Canonical configuration keys.
//!
//! Every resolved environment carries a value for each of these keys. The
//! canonical (upper-case) name is what appears in variable files and the
//! generated automation entrypoint; the profile name is the snake_case
//! spelling used in profile documents.

use serde::Serialize;
use std::fmt;

#[cfg(test)]
#[path = "config_key_tests.rs"]
mod tests;

/// A canonical key of a resolved configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConfigKey {
    AppName,
    Version,
    EnvMode,
    RegistryHost,
    RemoteUser,
    RemoteHost,
    RemotePort,
    RemoteComposePath,
    LocalComposeFile,
    AppPort,
    HealthEndpoint,
    UseSudo,
    MonorepoRoot,
}

impl ConfigKey {
    /// All keys, in the order they are reported and written.
    pub const ALL: [ConfigKey; 13] = [
        ConfigKey::AppName,
        ConfigKey::Version,
        ConfigKey::EnvMode,
        ConfigKey::RegistryHost,
        ConfigKey::RemoteUser,
        ConfigKey::RemoteHost,
        ConfigKey::RemotePort,
        ConfigKey::RemoteComposePath,
        ConfigKey::LocalComposeFile,
        ConfigKey::AppPort,
        ConfigKey::HealthEndpoint,
        ConfigKey::UseSudo,
        ConfigKey::MonorepoRoot,
    ];

    /// Keys written to each environment's own variable file.
    pub const TARGET: [ConfigKey; 6] = [
        ConfigKey::RegistryHost,
        ConfigKey::RemoteUser,
        ConfigKey::RemoteHost,
        ConfigKey::RemotePort,
        ConfigKey::RemoteComposePath,
        ConfigKey::LocalComposeFile,
    ];

    /// Keys shared by every environment, written to the shared variable file.
    pub const SHARED: [ConfigKey; 6] = [
        ConfigKey::AppName,
        ConfigKey::Version,
        ConfigKey::UseSudo,
        ConfigKey::MonorepoRoot,
        ConfigKey::AppPort,
        ConfigKey::HealthEndpoint,
    ];

    /// Upper-case name used in variable files, e.g. `REMOTE_PORT`.
    pub fn canonical_name(self) -> &'static str {
        match self {
            ConfigKey::AppName => "APP_NAME",
            ConfigKey::Version => "VERSION",
            ConfigKey::EnvMode => "ENV_MODE",
            ConfigKey::RegistryHost => "REGISTRY_HOST",
            ConfigKey::RemoteUser => "REMOTE_USER",
            ConfigKey::RemoteHost => "REMOTE_HOST",
            ConfigKey::RemotePort => "REMOTE_PORT",
            ConfigKey::RemoteComposePath => "REMOTE_COMPOSE_PATH",
            ConfigKey::LocalComposeFile => "LOCAL_COMPOSE_FILE",
            ConfigKey::AppPort => "APP_PORT",
            ConfigKey::HealthEndpoint => "HEALTH_ENDPOINT",
            ConfigKey::UseSudo => "USE_SUDO",
            ConfigKey::MonorepoRoot => "MONOREPO_ROOT",
        }
    }

    /// Spellings accepted in profile documents, in lookup order.
    pub fn profile_names(self) -> [&'static str; 2] {
        match self {
            ConfigKey::AppName => ["app_name", "APP_NAME"],
            ConfigKey::Version => ["version", "VERSION"],
            ConfigKey::EnvMode => ["env_mode", "ENV_MODE"],
            ConfigKey::RegistryHost => ["registry_host", "REGISTRY_HOST"],
            ConfigKey::RemoteUser => ["remote_user", "REMOTE_USER"],
            ConfigKey::RemoteHost => ["remote_host", "REMOTE_HOST"],
            ConfigKey::RemotePort => ["remote_port", "REMOTE_PORT"],
            ConfigKey::RemoteComposePath => ["remote_compose_path", "REMOTE_COMPOSE_PATH"],
            ConfigKey::LocalComposeFile => ["compose_file", "LOCAL_COMPOSE_FILE"],
            ConfigKey::AppPort => ["app_port", "APP_PORT"],
            ConfigKey::HealthEndpoint => ["health_endpoint", "HEALTH_ENDPOINT"],
            ConfigKey::UseSudo => ["use_sudo", "USE_SUDO"],
            ConfigKey::MonorepoRoot => ["monorepo_root", "MONOREPO_ROOT"],
        }
    }

    /// Hard-coded default used when no other source supplies the key.
    ///
    /// `ENV_MODE` and `LOCAL_COMPOSE_FILE` depend on the environment and are
    /// filled by the resolver's class layer; their entries here are only the
    /// fallbacks of last resort.
    pub fn builtin_default(self) -> &'static str {
        match self {
            ConfigKey::AppName => "service-app",
            ConfigKey::Version => "latest",
            ConfigKey::EnvMode => "test",
            ConfigKey::RegistryHost => "registry.example.com",
            ConfigKey::RemoteUser => "deploy",
            ConfigKey::RemoteHost => "127.0.0.1",
            ConfigKey::RemotePort => "22",
            ConfigKey::RemoteComposePath => "~/docker-composes",
            ConfigKey::LocalComposeFile => "docker-compose.test.yaml",
            ConfigKey::AppPort => "8080",
            ConfigKey::HealthEndpoint => "/healthz",
            ConfigKey::UseSudo => "true",
            ConfigKey::MonorepoRoot => ".",
        }
    }

    /// Keys that only make sense per environment and are never taken from
    /// global profile entries or global overrides.
    pub fn is_per_environment(self) -> bool {
        matches!(self, ConfigKey::EnvMode | ConfigKey::LocalComposeFile)
    }

    /// Whether the value must be an integer port in `1..=65535`.
    pub fn is_port(self) -> bool {
        matches!(self, ConfigKey::RemotePort | ConfigKey::AppPort)
    }

    /// Looks up a key by its canonical name.
    pub fn from_canonical(name: &str) -> Option<ConfigKey> {
        ConfigKey::ALL
            .into_iter()
            .find(|key| key.canonical_name() == name)
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.canonical_name())
    }
}

/// Parses a truthy flag the way the generated Makefile does.
pub fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Parses a port value, accepting only integers in `1..=65535`.
pub fn parse_port(value: &str) -> Option<u16> {
    match value.trim().parse::<u32>() {
        Ok(port) if (1..=65535).contains(&port) => u16::try_from(port).ok(),
        _ => None,
    }
}
