use std::path::PathBuf;

use clap::Args;
use tracing::{info, instrument};

use crate::errors::Error;
use crate::report::{CommandReport, Status};

/// Arguments for the check-isolation command.
#[derive(Args, Debug, Clone)]
pub struct IsolationArgs {
    /// Project root
    #[arg(long, default_value = ".")]
    pub root: PathBuf,
}

/// Compares the target identity of every environment with prod.
#[instrument(skip_all, fields(root = %args.root.display()))]
pub fn execute(args: &IsolationArgs) -> Result<CommandReport, Error> {
    let identities = release_gate::load_identities(&args.root)?;
    let report = release_gate::check_isolation(&identities);

    info!(
        environments = report.environments.len(),
        ok = report.is_ok(),
        "Isolation checked"
    );
    CommandReport::new(Status::from_check(report.is_ok()), &report)
}
