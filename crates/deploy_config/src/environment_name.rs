//! Environment name validation.
//!
//! Provides a branded type for deployment environment names. Three names are
//! standard (`local`, `test`, `prod`) and receive built-in defaults and
//! dedicated generated file names; any other valid name is a custom
//! environment.

use crate::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::ops::Deref;

#[cfg(test)]
#[path = "environment_name_tests.rs"]
mod tests;

/// Names of the standard environments, in generation order.
pub const STANDARD_ENVIRONMENTS: [&str; 3] = ["local", "test", "prod"];

/// Name used for the shared variable file (`.deploy.env.common`).
pub const SHARED_ENV_NAME: &str = "common";

/// Classification of an environment for default and structural rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EnvironmentClass {
    /// Built from source on the developer machine.
    Local,
    /// Shared pre-production target.
    Test,
    /// Production target; the isolation reference.
    Prod,
    /// Any other user-defined environment.
    Custom,
}

/// A validated, normalized environment name.
///
/// Names are trimmed and lower-cased, then must be non-empty and contain only
/// lowercase ASCII letters, digits, `_` and `-`.
///
/// # Examples
///
/// ```
/// use deploy_config::{EnvironmentClass, EnvironmentName};
///
/// let prod = EnvironmentName::parse(" PROD ").unwrap();
/// assert_eq!(prod.as_str(), "prod");
/// assert_eq!(prod.class(), EnvironmentClass::Prod);
///
/// let canary = EnvironmentName::parse("canary").unwrap();
/// assert!(canary.is_custom());
///
/// assert!(EnvironmentName::parse("").is_err());
/// assert!(EnvironmentName::parse("eu west").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EnvironmentName(String);

impl EnvironmentName {
    /// Normalizes and validates an environment name.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvironmentName` when the name is empty or
    /// contains characters outside `[a-z0-9_-]` after lower-casing, and
    /// `ConfigError::ReservedEnvironmentName` for the shared file name.
    pub fn parse(name: impl AsRef<str>) -> ConfigResult<Self> {
        let raw = name.as_ref();
        let value = raw.trim().to_ascii_lowercase();

        if value.is_empty() {
            return Err(ConfigError::InvalidEnvironmentName {
                name: raw.to_string(),
                reason: "environment name cannot be empty".to_string(),
            });
        }

        if !value
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
        {
            return Err(ConfigError::InvalidEnvironmentName {
                name: raw.to_string(),
                reason: "only letters, digits, '-' and '_' are allowed".to_string(),
            });
        }

        if value == SHARED_ENV_NAME {
            return Err(ConfigError::ReservedEnvironmentName { name: value });
        }

        Ok(Self(value))
    }

    /// The `local` environment.
    pub fn local() -> Self {
        Self("local".to_string())
    }

    /// The `test` environment.
    pub fn test() -> Self {
        Self("test".to_string())
    }

    /// The `prod` environment.
    pub fn prod() -> Self {
        Self("prod".to_string())
    }

    /// The three standard environments in generation order.
    pub fn standard() -> Vec<Self> {
        vec![Self::local(), Self::test(), Self::prod()]
    }

    /// Returns the classification of this environment.
    pub fn class(&self) -> EnvironmentClass {
        match self.0.as_str() {
            "local" => EnvironmentClass::Local,
            "test" => EnvironmentClass::Test,
            "prod" => EnvironmentClass::Prod,
            _ => EnvironmentClass::Custom,
        }
    }

    /// Whether this is one of `local`, `test` or `prod`.
    pub fn is_standard(&self) -> bool {
        self.class() != EnvironmentClass::Custom
    }

    pub fn is_custom(&self) -> bool {
        !self.is_standard()
    }

    pub fn is_prod(&self) -> bool {
        self.class() == EnvironmentClass::Prod
    }

    /// File name of this environment's variable file, e.g. `.deploy.env.test`.
    pub fn env_file_name(&self) -> String {
        format!(".deploy.env.{}", self.0)
    }

    /// Default descriptor file name for this environment.
    pub fn default_compose_file(&self) -> String {
        match self.class() {
            EnvironmentClass::Local => "docker-compose.local.yaml".to_string(),
            EnvironmentClass::Test => "docker-compose.test.yaml".to_string(),
            EnvironmentClass::Prod => "docker-compose.yaml".to_string(),
            EnvironmentClass::Custom => format!("docker-compose.{}.yaml", self.0),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EnvironmentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for EnvironmentName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Deref for EnvironmentName {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Borrow<str> for EnvironmentName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for EnvironmentName {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<EnvironmentName> for String {
    fn from(name: EnvironmentName) -> String {
        name.0
    }
}

/// Path of the shared variable file relative to the project root.
pub fn shared_env_file_name() -> String {
    format!(".deploy.env.{SHARED_ENV_NAME}")
}
