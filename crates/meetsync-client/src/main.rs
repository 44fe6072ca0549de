//! meetsync CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use tracing::info;

use meetsync_client::cli::Cli;
use meetsync_client::config::SyncConfig;
use meetsync_client::error::{ClientError, ClientResult};
use meetsync_client::sync;
use meetsync_core::init_tracing;
use meetsync_providers::MeetupClient;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Missing settings are reported before any logging or network activity
    let config = match SyncConfig::resolve(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = init_tracing(config.tracing_config()) {
        eprintln!("error: {}", ClientError::from(e));
        return ExitCode::FAILURE;
    }

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(config: SyncConfig) -> ClientResult<()> {
    let client = MeetupClient::new(config.meetup_config()?)?;
    let summary = sync::run(&client, &config.time_window).await?;
    info!(
        events = summary.events,
        attendees = summary.attendees,
        "sync complete"
    );
    Ok(())
}
