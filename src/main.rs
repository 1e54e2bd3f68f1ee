use clap::Parser;
use std::process::ExitCode;

use audio_player::config::Settings;
use audio_player::lifecycle::startup;
use audio_player::observability::{logging, metrics};

#[tokio::main]
async fn main() -> ExitCode {
    let settings = Settings::parse();

    if settings.version {
        println!("{}", startup::version_line());
        return ExitCode::SUCCESS;
    }

    logging::init(&settings.log_level);
    tracing::info!("{}", startup::version_line());

    if let Some(addr) = settings.metrics_address {
        metrics::init_metrics(addr);
    }

    match startup::run(settings).await {
        Ok(()) => {
            tracing::info!("Shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "Fatal");
            ExitCode::FAILURE
        }
    }
}
