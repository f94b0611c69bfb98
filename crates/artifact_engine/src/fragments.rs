//! Environment-conditioned pieces of generated files.
//!
//! Templates stay free of environment logic: anything that differs between
//! environment classes is computed here from `(EnvironmentName,
//! ResolvedConfig)` and handed to the renderer as plain values.

use deploy_config::{ConfigKey, EnvironmentClass, EnvironmentName, ResolvedConfig};
use serde_json::{json, Value};

#[cfg(test)]
#[path = "fragments_tests.rs"]
mod tests;

/// Placeholder listed in the Makefile help when no custom environment exists.
pub const CUSTOM_ENV_PLACEHOLDER: &str = "custom-env";

/// The `image:`/`build:` lines of a compose service.
///
/// `local` builds from source and tags a local image; every other
/// environment pulls the registry image.
pub fn image_or_build(env: &EnvironmentName, app_name: &str) -> String {
    match env.class() {
        EnvironmentClass::Local => format!(
            "    build:\n      context: .\n      dockerfile: Dockerfile\n    image: {app_name}:local"
        ),
        _ => "    image: ${FULL_REGISTRY_IMAGE}".to_string(),
    }
}

/// Resource limits appended to the production service, empty otherwise.
pub fn deploy_section(env: &EnvironmentName) -> String {
    if env.is_prod() {
        concat!(
            "\n",
            "    deploy:\n",
            "      resources:\n",
            "        limits:\n",
            "          cpus: \"1.0\"\n",
            "          memory: \"512M\"",
        )
        .to_string()
    } else {
        String::new()
    }
}

/// Space separated custom environment names for the Makefile help.
pub fn custom_env_hint(custom_envs: &[EnvironmentName]) -> String {
    if custom_envs.is_empty() {
        CUSTOM_ENV_PLACEHOLDER.to_string()
    } else {
        custom_envs
            .iter()
            .map(|env| env.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Template data for one compose descriptor.
pub fn compose_context(config: &ResolvedConfig) -> Value {
    let env = config.env();
    json!({
        "env": env.as_str(),
        "app_name": config.app_name(),
        "app_port": config.app_port(),
        "health_endpoint": config.get(ConfigKey::HealthEndpoint),
        "image_or_build": image_or_build(env, config.app_name()),
        "deploy_section": deploy_section(env),
    })
}

/// Target values of one standard environment for its Makefile branch.
pub fn target_context(config: &ResolvedConfig) -> Value {
    json!({
        "registry_host": config.get(ConfigKey::RegistryHost),
        "remote_user": config.get(ConfigKey::RemoteUser),
        "remote_host": config.get(ConfigKey::RemoteHost),
        "remote_port": config.remote_port(),
        "remote_compose_path": config.get(ConfigKey::RemoteComposePath),
        "compose_file": config.compose_file(),
    })
}

/// Template data for the Makefile block.
///
/// `base` supplies the global defaults; `local`, `test` and `prod` supply the
/// branch defaults of the standard environments.
pub fn makefile_context(
    base: &ResolvedConfig,
    local: &ResolvedConfig,
    test: &ResolvedConfig,
    prod: &ResolvedConfig,
    custom_envs: &[EnvironmentName],
) -> Value {
    json!({
        "app_name": base.app_name(),
        "version": base.version(),
        "env_mode": base.env().as_str(),
        "use_sudo": base.use_sudo(),
        "monorepo_root": base.get(ConfigKey::MonorepoRoot),
        "app_port": base.app_port(),
        "health_endpoint": base.get(ConfigKey::HealthEndpoint),
        "local": target_context(local),
        "test": target_context(test),
        "prod": target_context(prod),
        "custom_envs": custom_env_hint(custom_envs),
    })
}

/// Template data for the container build file.
pub fn dockerfile_context(base: &ResolvedConfig) -> Value {
    json!({ "app_port": base.app_port() })
}
