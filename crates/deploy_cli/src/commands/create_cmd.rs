use std::path::PathBuf;

use artifact_engine::{ArtifactSynthesizer, ForceOptions, SynthesisPlan};
use clap::Args;
use deploy_config::{default_environment, ConfigKey, EnvironmentName, Overrides, Profile};
use tracing::{debug, info, instrument};

use crate::commands::parse_env_name;
use crate::errors::Error;
use crate::report::{CommandReport, Status};

#[cfg(test)]
#[path = "create_cmd_tests.rs"]
mod tests;

/// Arguments for the create command.
#[derive(Args, Debug, Clone)]
pub struct CreateArgs {
    /// Project root to write artifacts into
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// Environment the shared values are resolved for (default: profile env_mode, else test)
    #[arg(long, value_parser = parse_env_name)]
    pub env_mode: Option<EnvironmentName>,

    /// Profile document (.json or .toml)
    #[arg(long)]
    pub profile: Option<PathBuf>,

    #[arg(long)]
    pub app_name: Option<String>,

    #[arg(long)]
    pub version: Option<String>,

    #[arg(long)]
    pub registry_host: Option<String>,

    #[arg(long)]
    pub remote_user: Option<String>,

    #[arg(long)]
    pub remote_host: Option<String>,

    #[arg(long)]
    pub remote_port: Option<String>,

    #[arg(long)]
    pub remote_compose_path: Option<String>,

    #[arg(long)]
    pub app_port: Option<String>,

    #[arg(long)]
    pub health_endpoint: Option<String>,

    #[arg(long)]
    pub use_sudo: Option<String>,

    #[arg(long)]
    pub monorepo_root: Option<String>,

    /// Compose file name of the requested environment
    #[arg(long)]
    pub compose_file: Option<String>,

    #[arg(long)]
    pub test_registry_host: Option<String>,

    #[arg(long)]
    pub test_remote_user: Option<String>,

    #[arg(long)]
    pub test_remote_host: Option<String>,

    #[arg(long)]
    pub test_remote_port: Option<String>,

    #[arg(long)]
    pub test_remote_compose_path: Option<String>,

    #[arg(long)]
    pub prod_registry_host: Option<String>,

    #[arg(long)]
    pub prod_remote_user: Option<String>,

    #[arg(long)]
    pub prod_remote_host: Option<String>,

    #[arg(long)]
    pub prod_remote_port: Option<String>,

    #[arg(long)]
    pub prod_remote_compose_path: Option<String>,

    /// Additional custom environment to generate (repeatable)
    #[arg(long = "custom-env", value_parser = parse_env_name)]
    pub custom_envs: Vec<EnvironmentName>,

    /// Overwrite existing compose descriptors
    #[arg(long)]
    pub force_compose: bool,

    /// Overwrite existing .deploy.env.* files
    #[arg(long)]
    pub force_env_files: bool,

    /// Overwrite an existing Dockerfile
    #[arg(long)]
    pub force_dockerfile: bool,
}

impl CreateArgs {
    /// Collects every override flag that was given.
    pub fn overrides(&self, requested: &EnvironmentName) -> Overrides {
        let mut overrides = Overrides::new();

        let global = [
            (ConfigKey::AppName, &self.app_name),
            (ConfigKey::Version, &self.version),
            (ConfigKey::RegistryHost, &self.registry_host),
            (ConfigKey::RemoteUser, &self.remote_user),
            (ConfigKey::RemoteHost, &self.remote_host),
            (ConfigKey::RemotePort, &self.remote_port),
            (ConfigKey::RemoteComposePath, &self.remote_compose_path),
            (ConfigKey::AppPort, &self.app_port),
            (ConfigKey::HealthEndpoint, &self.health_endpoint),
            (ConfigKey::UseSudo, &self.use_sudo),
            (ConfigKey::MonorepoRoot, &self.monorepo_root),
        ];
        for (key, value) in global {
            if let Some(value) = value {
                overrides.set(key, value.as_str());
            }
        }

        let scoped = [
            (EnvironmentName::test(), ConfigKey::RegistryHost, &self.test_registry_host),
            (EnvironmentName::test(), ConfigKey::RemoteUser, &self.test_remote_user),
            (EnvironmentName::test(), ConfigKey::RemoteHost, &self.test_remote_host),
            (EnvironmentName::test(), ConfigKey::RemotePort, &self.test_remote_port),
            (
                EnvironmentName::test(),
                ConfigKey::RemoteComposePath,
                &self.test_remote_compose_path,
            ),
            (EnvironmentName::prod(), ConfigKey::RegistryHost, &self.prod_registry_host),
            (EnvironmentName::prod(), ConfigKey::RemoteUser, &self.prod_remote_user),
            (EnvironmentName::prod(), ConfigKey::RemoteHost, &self.prod_remote_host),
            (EnvironmentName::prod(), ConfigKey::RemotePort, &self.prod_remote_port),
            (
                EnvironmentName::prod(),
                ConfigKey::RemoteComposePath,
                &self.prod_remote_compose_path,
            ),
            (requested.clone(), ConfigKey::LocalComposeFile, &self.compose_file),
        ];
        for (env, key, value) in scoped {
            if let Some(value) = value {
                overrides.set_for(env, key, value.as_str());
            }
        }

        for env in &self.custom_envs {
            overrides.add_custom_env(env.clone());
        }
        overrides
    }

    pub fn force(&self) -> ForceOptions {
        ForceOptions {
            compose: self.force_compose,
            env_files: self.force_env_files,
            dockerfile: self.force_dockerfile,
        }
    }
}

/// Loads the profile, resolves every environment and writes the artifacts.
#[instrument(skip_all, fields(root = %args.root.display()))]
pub fn execute(args: &CreateArgs) -> Result<CommandReport, Error> {
    let profile = match &args.profile {
        Some(path) => Profile::load(path)?,
        None => Profile::empty(),
    };

    let env = match &args.env_mode {
        Some(env) => env.clone(),
        None => default_environment(&profile)?,
    };
    debug!(env = %env, "Creating deployment artifacts");

    let plan = SynthesisPlan::resolve(&profile, &env, &args.overrides(&env), args.force())?;
    let report = ArtifactSynthesizer::new()?.synthesize(&args.root, &plan)?;

    info!(
        env = %env,
        artifacts = report.artifacts.len(),
        "Deployment artifacts synthesized"
    );

    let mut command_report = CommandReport::new(Status::Ok, &report)?;
    command_report
        .fields
        .insert("env".to_string(), serde_json::Value::String(env.to_string()));
    Ok(command_report)
}
