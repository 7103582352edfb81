use std::process::ExitCode;

use clap::Parser;
use index_notify::cli::{self, Cli};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let settings = match cli::load_settings(&cli) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return Ok(ExitCode::from(2));
        }
    };

    cli::init_logging(&cli, &settings)?;

    tracing::debug!(
        version = index_notify::pkg_version(),
        application = %settings.application.name,
        "Starting"
    );

    match cli::execute_command(&cli, &settings).await {
        Ok(true) => Ok(ExitCode::SUCCESS),
        Ok(false) => Ok(ExitCode::FAILURE),
        Err(e) => {
            tracing::error!(error = %e, "Command failed");
            eprintln!("Error: {}", e);
            Ok(ExitCode::from(2))
        }
    }
}
