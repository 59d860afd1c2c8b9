use clap::Parser;
use repocat::handlers::{run_aggregate, run_diff, run_estimate};
use repocat::Cli;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "repocat=debug" } else { "repocat=warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.estimate {
        return run_estimate(&cli).await;
    }

    if cli.diff_mode() {
        return run_diff(&cli).await;
    }

    run_aggregate(&cli).await
}
