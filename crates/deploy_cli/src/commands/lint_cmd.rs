use std::path::PathBuf;

use clap::Args;
use deploy_config::EnvironmentName;
use release_gate::descriptor_contract::descriptor_file;
use release_gate::{DescriptorTarget, MergedVars};
use tracing::{info, instrument};

use crate::commands::{env_or_default, parse_env_name};
use crate::errors::Error;
use crate::report::{CommandReport, Status};

/// Arguments for the lint-compose command.
#[derive(Args, Debug, Clone)]
pub struct LintComposeArgs {
    /// Environment whose descriptor is linted (default: test)
    #[arg(long, value_parser = parse_env_name, conflicts_with = "all")]
    pub env_mode: Option<EnvironmentName>,

    /// Lint the standard descriptors and every custom docker-compose.<env>.yaml
    #[arg(long)]
    pub all: bool,

    /// Project root
    #[arg(long, default_value = ".")]
    pub root: PathBuf,
}

/// Arguments for the lint-makefile command.
#[derive(Args, Debug, Clone)]
pub struct LintMakefileArgs {
    /// Project root
    #[arg(long, default_value = ".")]
    pub root: PathBuf,
}

/// Lints compose descriptors against the token contract.
#[instrument(skip_all, fields(all = args.all))]
pub fn execute_compose(args: &LintComposeArgs) -> Result<CommandReport, Error> {
    let targets = if args.all {
        release_gate::discover_descriptors(&args.root)?
    } else {
        let env = env_or_default(args.env_mode.as_ref());
        let merged = MergedVars::load(&args.root, &env)?;
        let file = descriptor_file(&merged.vars, &env);
        vec![DescriptorTarget::new(env, file)]
    };

    let report = release_gate::lint_descriptors(&args.root, &targets)?;
    info!(files = report.files.len(), ok = report.is_ok(), "Compose lint finished");
    CommandReport::new(Status::from_check(report.is_ok()), &report)
}

/// Lints the generated Makefile block.
#[instrument(skip_all)]
pub fn execute_makefile(args: &LintMakefileArgs) -> Result<CommandReport, Error> {
    let report = release_gate::lint_entrypoint(&args.root)?;
    info!(ok = report.is_ok(), "Makefile lint finished");
    CommandReport::new(Status::from_check(report.is_ok()), &report)
}
