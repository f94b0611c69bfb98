//! Deployment configuration model and resolution.
//!
//! Loads deployment profiles, resolves a total per-environment configuration
//! record through a fixed precedence table, and provides the variable file
//! codec, the violation model and the version policy shared by artifact
//! synthesis and release validation.

// Core types
pub mod config_key;
pub mod environment_name;
pub mod errors;

// Sources
pub mod env_file;
pub mod overrides;
pub mod profile;

// Resolution
pub mod resolved_config;
pub mod resolver;

// Checks
pub mod version_policy;
pub mod violation;

pub use config_key::{parse_bool, parse_port, ConfigKey};
pub use env_file::EnvVars;
pub use environment_name::{
    shared_env_file_name, EnvironmentClass, EnvironmentName, SHARED_ENV_NAME,
    STANDARD_ENVIRONMENTS,
};
pub use errors::{ConfigError, ConfigResult};
pub use overrides::Overrides;
pub use profile::{Profile, ProfileSection};
pub use resolved_config::{ResolutionSource, ResolvedConfig};
pub use resolver::{
    collect_custom_envs, default_environment, is_reserved_file_name, is_valid_file_name,
    known_environments, ConfigResolver, PrecedenceTable, PRECEDENCE, RESERVED_FILE_NAMES,
};
pub use version_policy::{check_version, is_valid_version, validate_version, VersionReport};
pub use violation::{Violation, ViolationKind, ViolationSet};
