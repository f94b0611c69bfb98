//! Command implementations for the deploy-config CLI.
//!
//! Each submodule handles one subcommand:
//!
//! - `create_cmd`: synthesize the deployment artifacts of a project
//! - `validate_cmd`: validate one release stage for one environment
//! - `isolation_cmd`: check that no environment shares prod's target
//! - `version_cmd`: check the version tag policy
//! - `lint_cmd`: lint compose descriptors and the Makefile
//! - `record_cmd`: archive a deployment record
//! - `post_check_cmd`: decide whether a deployment must be rolled back

pub mod create_cmd;
pub mod isolation_cmd;
pub mod lint_cmd;
pub mod post_check_cmd;
pub mod record_cmd;
pub mod validate_cmd;
pub mod version_cmd;

use crate::errors::Error;
use crate::report::CommandReport;
use clap::Subcommand;
use deploy_config::EnvironmentName;

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;

/// Subcommands of the CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create or update deployment artifacts
    Create(create_cmd::CreateArgs),

    /// Validate the release contract of one stage
    Validate(validate_cmd::ValidateArgs),

    /// Check that no environment deploys to prod's exact target
    CheckIsolation(isolation_cmd::IsolationArgs),

    /// Check the version tag against the release policy
    CheckVersion(version_cmd::VersionArgs),

    /// Lint compose descriptors against the token contract
    LintCompose(lint_cmd::LintComposeArgs),

    /// Lint the generated Makefile block
    LintMakefile(lint_cmd::LintMakefileArgs),

    /// Append a deployment record to the archive
    ArchiveRecord(record_cmd::RecordArgs),

    /// Decide the rollout outcome from smoke and metrics results
    PostCheck(post_check_cmd::PostCheckArgs),
}

/// Executes a command and builds its report.
pub fn execute(command: Commands) -> Result<CommandReport, Error> {
    match command {
        Commands::Create(args) => create_cmd::execute(&args),
        Commands::Validate(args) => validate_cmd::execute(&args),
        Commands::CheckIsolation(args) => isolation_cmd::execute(&args),
        Commands::CheckVersion(args) => version_cmd::execute(&args),
        Commands::LintCompose(args) => lint_cmd::execute_compose(&args),
        Commands::LintMakefile(args) => lint_cmd::execute_makefile(&args),
        Commands::ArchiveRecord(args) => record_cmd::execute(&args),
        Commands::PostCheck(args) => post_check_cmd::execute(&args),
    }
}

/// Parses an environment name argument.
pub fn parse_env_name(s: &str) -> Result<EnvironmentName, String> {
    EnvironmentName::parse(s).map_err(|e| e.to_string())
}

/// The environment a release command applies to: the given one, else `test`.
pub(crate) fn env_or_default(env: Option<&EnvironmentName>) -> EnvironmentName {
    env.cloned().unwrap_or_else(EnvironmentName::test)
}
