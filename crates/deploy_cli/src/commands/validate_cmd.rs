use std::path::PathBuf;

use clap::Args;
use deploy_config::EnvironmentName;
use release_gate::StageStatus;
use tracing::{info, instrument};

use crate::commands::{env_or_default, parse_env_name};
use crate::errors::Error;
use crate::report::{CommandReport, Status};

/// Arguments for the validate command.
#[derive(Args, Debug, Clone)]
pub struct ValidateArgs {
    /// Release stage, e.g. push or remote-deploy
    #[arg(long)]
    pub stage: String,

    /// Environment to validate (default: test)
    #[arg(long, value_parser = parse_env_name)]
    pub env_mode: Option<EnvironmentName>,

    /// Project root
    #[arg(long, default_value = ".")]
    pub root: PathBuf,
}

/// Validates the release contract of one stage.
#[instrument(skip_all, fields(stage = %args.stage))]
pub fn execute(args: &ValidateArgs) -> Result<CommandReport, Error> {
    let env = env_or_default(args.env_mode.as_ref());
    let report = release_gate::validate(&args.stage, &env, &args.root)?;

    let status = match report.status {
        StageStatus::Ok => Status::Ok,
        StageStatus::Skipped => Status::Skipped,
        StageStatus::Failed => Status::Error,
    };
    info!(
        env = %env,
        status = %status,
        violations = report.findings.violations().len(),
        "Stage validated"
    );
    CommandReport::new(status, &report)
}
