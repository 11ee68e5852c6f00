use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::tui::theme::Theme;

/// Dialog host and demo screen configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Dim the screen under open dialogs
    pub dim_background: bool,

    /// Theme name, see `Theme::NAMES`
    pub theme: String,

    /// Event loop tick in milliseconds
    pub tick_rate_ms: u64,

    /// Capture mouse events
    pub mouse: bool,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            dim_background: true,
            theme: "dark".to_string(),
            tick_rate_ms: 100,
            mouse: false,
        }
    }
}

impl HostConfig {
    /// Initialize configuration: defaults, then the first config file found,
    /// then `DIALOGS_*` environment variables.
    pub async fn init() -> Result<Self> {
        debug!("Initializing configuration");

        let mut config = match Self::find_config_file() {
            Some(path) => Self::load_from_file(&path).await?,
            None => Self::default(),
        };

        config.load_from_env();
        config.validate()?;

        Ok(config)
    }

    /// Candidate config files, in priority order
    pub fn config_paths() -> Vec<PathBuf> {
        let mut config_paths = vec![
            PathBuf::from("./.dialogs.json"),
            PathBuf::from("./dialogs.json"),
        ];

        if let Some(config_dir) = dirs::config_dir() {
            config_paths.push(config_dir.join("dialog-registry").join("dialogs.json"));
        }

        config_paths
    }

    fn find_config_file() -> Option<PathBuf> {
        Self::config_paths().into_iter().find(|path| path.exists())
    }

    /// Load configuration from a JSON file; missing fields keep their defaults
    pub async fn load_from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from: {}", path.display());
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))?;
        let config: Self = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Invalid configuration in {}: {}", path.display(), e))?;
        Ok(config)
    }

    /// Load configuration from environment variables
    pub fn load_from_env(&mut self) {
        self.apply_env(|name| std::env::var(name).ok());
    }

    /// Apply `DIALOGS_*` overrides from `lookup`; unparsable values are ignored
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dim) = lookup("DIALOGS_DIM_BACKGROUND") {
            if let Some(dim) = parse_bool(&dim) {
                self.dim_background = dim;
            }
        }

        if let Some(theme) = lookup("DIALOGS_THEME") {
            self.theme = theme;
        }

        if let Some(tick_str) = lookup("DIALOGS_TICK_RATE_MS") {
            if let Ok(tick_rate_ms) = tick_str.parse() {
                self.tick_rate_ms = tick_rate_ms;
            }
        }

        if let Some(mouse) = lookup("DIALOGS_MOUSE") {
            if let Some(mouse) = parse_bool(&mouse) {
                self.mouse = mouse;
            }
        }
    }

    /// Resolved theme
    pub fn theme(&self) -> Theme {
        Theme::by_name(&self.theme).unwrap_or_default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if Theme::by_name(&self.theme).is_none() {
            return Err(anyhow::anyhow!(
                "Unknown theme '{}'; expected one of: {}",
                self.theme,
                Theme::NAMES.join(", ")
            ));
        }

        if self.tick_rate_ms == 0 {
            return Err(anyhow::anyhow!("tick_rate_ms must be greater than 0"));
        }

        Ok(())
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
