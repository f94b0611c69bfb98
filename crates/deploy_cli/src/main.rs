use clap::Parser;
use deploy_cli::commands;
use deploy_cli::report::CommandReport;
use deploy_cli::Cli;
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() {
    // Logs go to stderr so stdout carries only the JSON report
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_env("DEPLOY_CONFIG_LOG"))
        .init();

    let cli = Cli::parse();
    let report = match commands::execute(cli.command) {
        Ok(report) => report,
        Err(e) => {
            error!("Error: {e}");
            CommandReport::from_error(&e)
        }
    };

    println!("{}", report.to_json());
    std::process::exit(report.exit_code());
}
