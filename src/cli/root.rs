use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{debug, info};

use dialog_registry::{config::HostConfig, tui, version};

use super::snapshot::SnapshotCommand;

/// Key-addressed dialogs for terminal UIs
#[derive(Parser)]
#[command(
    name = "dialog-registry",
    version,
    about = "Key-addressed dialogs for terminal UIs",
    long_about = r#"Demonstrates a dialog registry: screens register dialogs once under a key,
then open, close and re-parameterize them from anywhere through a controller.

Examples:
  dialog-registry                          # Interactive API token screen
  dialog-registry snapshot --item router1  # Render the confirm-delete dialog headlessly
  dialog-registry --log-file dialogs.log   # Keep logs while the TUI owns the terminal"#
)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short = 'd', long = "debug", global = true)]
    pub debug: bool,

    /// Write logs to this file instead of stderr
    #[arg(long = "log-file", global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the interactive API token screen (default)
    Demo,

    /// Render the confirm-delete walkthrough to stdout
    Snapshot(SnapshotCommand),

    /// Print build information
    Version,
}

impl Cli {
    /// Whether the command takes over the terminal
    pub fn is_interactive(&self) -> bool {
        matches!(self.command, None | Some(Commands::Demo))
    }

    pub async fn execute(self) -> Result<()> {
        if self.debug {
            debug!("Debug logging enabled");
        }

        match self.command {
            Some(Commands::Version) => {
                println!("{}", version::build_info());
                Ok(())
            }
            Some(Commands::Snapshot(snapshot_cmd)) => {
                let config = load_config().await?;
                snapshot_cmd.execute(&config)
            }
            Some(Commands::Demo) | None => {
                let config = load_config().await?;
                tui::run(&config).await?;
                info!("Application finished");
                Ok(())
            }
        }
    }
}

async fn load_config() -> Result<HostConfig> {
    let config = HostConfig::init().await?;
    debug!(?config, "Configuration initialized");
    Ok(config)
}
