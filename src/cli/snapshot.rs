use anyhow::{anyhow, Result};
use clap::Args;
use tracing::debug;

use dialog_registry::{config::HostConfig, tui::snapshot::render_confirm_delete};

/// Render the confirm-delete walkthrough without a terminal
#[derive(Args)]
pub struct SnapshotCommand {
    /// Item name passed to the dialog props
    #[arg(long = "item", default_value = "router1")]
    pub item: String,

    /// Width of the virtual terminal
    #[arg(long = "width", default_value_t = 60)]
    pub width: u16,

    /// Height of the virtual terminal
    #[arg(long = "height", default_value_t = 14)]
    pub height: u16,

    /// Close the dialog again before rendering
    #[arg(long = "closed")]
    pub closed: bool,
}

impl SnapshotCommand {
    pub fn execute(&self, config: &HostConfig) -> Result<()> {
        debug!("Executing snapshot command");

        if self.width == 0 || self.height == 0 {
            return Err(anyhow!("Snapshot size must be at least 1x1"));
        }

        let lines = render_confirm_delete(config, &self.item, self.width, self.height, self.closed)?;
        for line in lines {
            println!("{}", line);
        }

        Ok(())
    }
}
