use std::path::PathBuf;

use clap::Args;
use deploy_config::EnvironmentName;
use release_gate::{MergedVars, RecordRequest, DEFAULT_ARCHIVE_FILE};
use tracing::instrument;

use crate::commands::{env_or_default, parse_env_name};
use crate::errors::Error;
use crate::report::{CommandReport, Status};

/// Arguments for the archive-record command.
#[derive(Args, Debug, Clone)]
pub struct RecordArgs {
    /// Environment that was deployed (default: test)
    #[arg(long, value_parser = parse_env_name)]
    pub env_mode: Option<EnvironmentName>,

    /// Deployed version (default: merged VERSION, else "unknown")
    #[arg(long)]
    pub version: Option<String>,

    /// Who ran the deployment
    #[arg(long, default_value = "unknown")]
    pub actor: String,

    /// Outcome of the deployment, e.g. success or rollback
    #[arg(long)]
    pub result: String,

    /// Free-form explanation
    #[arg(long, default_value = "")]
    pub reason: String,

    /// Archive file relative to the project root
    #[arg(long, default_value = DEFAULT_ARCHIVE_FILE)]
    pub archive_file: String,

    /// Project root
    #[arg(long, default_value = ".")]
    pub root: PathBuf,
}

/// Appends a deployment record to the archive.
#[instrument(skip_all, fields(result = %args.result))]
pub fn execute(args: &RecordArgs) -> Result<CommandReport, Error> {
    let env = env_or_default(args.env_mode.as_ref());

    let version = match &args.version {
        Some(version) => version.clone(),
        None => MergedVars::load(&args.root, &env)?
            .vars
            .get_non_empty("VERSION")
            .unwrap_or("unknown")
            .to_string(),
    };

    let request = RecordRequest {
        env,
        version,
        actor: args.actor.clone(),
        result: args.result.clone(),
        reason: args.reason.clone(),
        archive_file: args.archive_file.clone(),
    };
    let receipt = release_gate::archive_record(&args.root, &request)?;
    CommandReport::new(Status::Ok, &receipt)
}
