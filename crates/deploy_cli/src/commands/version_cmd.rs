use std::path::PathBuf;

use clap::Args;
use deploy_config::{check_version, EnvironmentName};
use release_gate::MergedVars;
use tracing::{debug, instrument};

use crate::commands::{env_or_default, parse_env_name};
use crate::errors::Error;
use crate::report::{CommandReport, Status};

#[cfg(test)]
#[path = "version_cmd_tests.rs"]
mod tests;

/// Arguments for the check-version command.
#[derive(Args, Debug, Clone)]
pub struct VersionArgs {
    /// Version tag to check (default: merged VERSION of the environment)
    #[arg(long)]
    pub version: Option<String>,

    /// Environment the version is deployed to (default: test)
    #[arg(long, value_parser = parse_env_name)]
    pub env_mode: Option<EnvironmentName>,

    /// Treat a floating tag in prod as a violation instead of a warning
    #[arg(long)]
    pub strict: bool,

    /// Project root used when --version is not given
    #[arg(long, default_value = ".")]
    pub root: PathBuf,
}

/// Checks the version tag against the release policy.
#[instrument(skip_all)]
pub fn execute(args: &VersionArgs) -> Result<CommandReport, Error> {
    let env = env_or_default(args.env_mode.as_ref());

    let version = match &args.version {
        Some(version) => version.clone(),
        None => MergedVars::load(&args.root, &env)?
            .vars
            .get_non_empty("VERSION")
            .map(str::to_string)
            .ok_or_else(|| {
                Error::InvalidArguments(format!(
                    "--version not given and no VERSION configured for {env}"
                ))
            })?,
    };
    debug!(env = %env, version = %version, "Checking version policy");

    let report = check_version(&env, &version, args.strict);
    CommandReport::new(Status::from_check(report.is_ok()), &report)
}
