use anyhow::Result;
use clap::Parser;
use std::fs::File;
use std::sync::Mutex;
use tracing::error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;

use cli::Cli;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file
    let dotenv = dotenvy::dotenv();

    let cli = Cli::parse();

    // Initialize logging/tracing
    if let Err(e) = init_logging(&cli) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = dotenv {
        // Don't error if .env file doesn't exist, just log it
        tracing::debug!("No .env file found or error loading it: {}", e);
    }

    if let Err(e) = cli.execute().await {
        error!("Application error: {}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn init_logging(cli: &Cli) -> Result<()> {
    let default_level = if cli.debug {
        "dialog_registry=debug"
    } else {
        "dialog_registry=info"
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_level.into());

    // The interactive screen owns the terminal: without a log file, keep quiet
    let file_layer = match &cli.log_file {
        Some(path) => {
            let file = File::create(path)
                .map_err(|e| anyhow::anyhow!("Failed to open log file {}: {}", path.display(), e))?;
            Some(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };
    let stderr_layer = (cli.log_file.is_none() && !cli.is_interactive())
        .then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {}", e))?;

    Ok(())
}
