//! deploy-config CLI library exports for integration testing.
//!
//! The binary is a thin wrapper: it installs logging, parses [`Cli`], runs
//! [`commands::execute`] and prints the resulting report.

pub mod commands;
pub mod errors;
pub mod report;

use clap::Parser;

/// deploy-config: generate and gate deployment configuration
#[derive(Parser, Debug)]
#[command(name = "deploy-config")]
#[command(
    about = "Generate deployment artifacts and validate release stages",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: commands::Commands,
}
