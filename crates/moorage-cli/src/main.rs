//! CLI entry point - the composition root.

use std::process::ExitCode;

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::error;

use moorage_axum::start_server;
use moorage_cli::{Cli, CliError, cancel_on_signal, init_tracing};

async fn run(cli: Cli) -> Result<(), CliError> {
    let config = cli.server_config()?;

    let shutdown = CancellationToken::new();
    cancel_on_signal(shutdown.clone());

    start_server(config, shutdown)
        .await
        .map_err(|e| CliError::Server(format!("{e:#}")))
}

#[tokio::main]
async fn main() -> ExitCode {
    // .env first so it can feed clap's env defaults
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    if let Err(e) = init_tracing(cli.log_json, cli.verbose) {
        eprintln!("{e}");
        return ExitCode::from(e.exit_code());
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "moorage stopped");
            ExitCode::from(e.exit_code())
        }
    }
}
