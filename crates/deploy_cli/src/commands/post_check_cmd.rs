use std::path::PathBuf;

use clap::Args;
use release_gate::{read_json, RolloutStatus, RolloutThresholds, ServiceMetrics, SmokeResult};
use tracing::{info, instrument};

use crate::errors::Error;
use crate::report::{CommandReport, Status};

#[cfg(test)]
#[path = "post_check_cmd_tests.rs"]
mod tests;

/// Arguments for the post-check command.
#[derive(Args, Debug, Clone)]
pub struct PostCheckArgs {
    /// Smoke test result JSON
    #[arg(long)]
    pub smoke_file: PathBuf,

    /// Service metrics JSON
    #[arg(long)]
    pub metrics_file: Option<PathBuf>,

    /// Minimum success rate in percent
    #[arg(long, default_value_t = 99.0)]
    pub min_success_rate: f64,

    /// Maximum p95 latency in milliseconds
    #[arg(long, default_value_t = 500.0)]
    pub max_p95_latency: f64,
}

/// Decides whether the deployment stays or must be rolled back.
#[instrument(skip_all, fields(smoke = %args.smoke_file.display()))]
pub fn execute(args: &PostCheckArgs) -> Result<CommandReport, Error> {
    let smoke: SmokeResult = read_json(&args.smoke_file)?;
    let metrics: Option<ServiceMetrics> = match &args.metrics_file {
        Some(path) => Some(read_json(path)?),
        None => None,
    };

    let thresholds = RolloutThresholds {
        min_success_rate: args.min_success_rate,
        max_p95_latency: args.max_p95_latency,
    };
    let decision = release_gate::decide(&smoke, metrics.as_ref(), thresholds);

    let status = match decision.status {
        RolloutStatus::Ok => Status::Ok,
        RolloutStatus::Skipped => Status::Skipped,
        RolloutStatus::RollbackRequired => Status::RollbackRequired,
    };
    info!(status = %status, "Post-deploy check finished");
    CommandReport::new(status, &decision)
}
