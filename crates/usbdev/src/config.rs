//! usbdev configuration management

use crate::watcher::WatchOptions;
use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UsbdevConfig {
    #[serde(default)]
    pub watch: WatchSettings,
    /// USB ID database location
    #[serde(default)]
    pub database: DatabaseSettings,
    /// Report format and logging
    #[serde(default)]
    pub output: OutputSettings,
}

/// Polling loop configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchSettings {
    /// Seconds to wait between the two snapshots of a poll
    #[serde(default = "WatchSettings::default_interval")]
    pub interval_secs: u64,
    /// Give up after this many polls without a new device
    #[serde(default = "WatchSettings::default_max_polls")]
    pub max_polls: u32,
}

impl Default for WatchSettings {
    fn default() -> Self {
        Self {
            interval_secs: Self::default_interval(),
            max_polls: Self::default_max_polls(),
        }
    }
}

impl WatchSettings {
    fn default_interval() -> u64 {
        1
    }

    fn default_max_polls() -> u32 {
        60 // one minute at the default interval
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DatabaseSettings {
    /// Path to usb.ids; `~` is expanded. When unset the standard
    /// locations are searched.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Report format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// A single JSON document on stdout
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(default)]
    pub format: OutputFormat,
    #[serde(default = "OutputSettings::default_log_level")]
    pub log_level: String,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            log_level: Self::default_log_level(),
        }
    }
}

impl OutputSettings {
    fn default_log_level() -> String {
        "warn".to_string()
    }
}

/// Values given on the command line; `None` keeps the configured value
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub interval_secs: Option<u64>,
    pub max_polls: Option<u32>,
    pub database_path: Option<PathBuf>,
    pub format: Option<OutputFormat>,
    pub log_level: Option<String>,
}

impl UsbdevConfig {
    /// Load configuration from the specified path
    ///
    /// Values are not validated here; command-line overrides may still
    /// replace them. Call [`UsbdevConfig::validate`] once they are applied.
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        let config_path = if let Some(p) = path {
            p
        } else {
            Self::find_existing(Self::search_paths())
                .ok_or_else(|| anyhow!("No configuration file found"))?
        };

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let config: UsbdevConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", config_path.display()))?;

        tracing::info!("Loaded configuration from: {}", config_path.display());
        Ok(config)
    }

    /// Load the first configuration file found in `candidates`
    ///
    /// Defaults are used only when none of them exists. A file that exists
    /// but cannot be read or parsed is an error.
    pub fn load_or_default_from(candidates: Vec<PathBuf>) -> Result<Self> {
        match Self::find_existing(candidates) {
            Some(path) => Self::load(Some(path)),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from the standard locations, or defaults
    pub fn load_or_default() -> Result<Self> {
        Self::load_or_default_from(Self::search_paths())
    }

    /// Standard configuration locations, in search order
    pub fn search_paths() -> Vec<PathBuf> {
        vec![Self::default_path(), PathBuf::from("/etc/usbdev/config.toml")]
    }

    fn find_existing(candidates: Vec<PathBuf>) -> Option<PathBuf> {
        candidates.into_iter().find(|p| p.exists())
    }

    /// Replace configured values with those given on the command line
    pub fn apply_overrides(&mut self, overrides: Overrides) {
        if let Some(secs) = overrides.interval_secs {
            self.watch.interval_secs = secs;
        }
        if let Some(max_polls) = overrides.max_polls {
            self.watch.max_polls = max_polls;
        }
        if let Some(path) = overrides.database_path {
            self.database.path = Some(path);
        }
        if let Some(format) = overrides.format {
            self.output.format = format;
        }
        if let Some(level) = overrides.log_level {
            self.output.log_level = level;
        }
    }

    /// Save configuration to the specified path
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        // Create parent directories if they don't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        tracing::info!("Saved configuration to: {}", path.display());
        Ok(())
    }

    /// Get the default configuration file path
    pub fn default_path() -> PathBuf {
        if let Some(config_dir) = dirs::config_dir() {
            config_dir.join("usbdev").join("config.toml")
        } else {
            PathBuf::from(".config/usbdev/config.toml")
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.output.log_level.as_str()) {
            return Err(anyhow!(
                "Invalid log level '{}', must be one of: {}",
                self.output.log_level,
                valid_levels.join(", ")
            ));
        }

        if self.watch.interval_secs == 0 {
            return Err(anyhow!("Invalid interval_secs 0, must be at least 1"));
        }

        if self.watch.max_polls == 0 {
            return Err(anyhow!("Invalid max_polls 0, must be at least 1"));
        }

        Ok(())
    }

    /// Database paths to try, in order
    pub fn database_candidates(&self) -> Vec<PathBuf> {
        match &self.database.path {
            Some(path) => vec![expand_path(path)],
            None => usbids::default_candidates(),
        }
    }

    pub fn watch_options(&self) -> WatchOptions {
        WatchOptions {
            interval: Duration::from_secs(self.watch.interval_secs),
            max_polls: self.watch.max_polls,
        }
    }
}

fn expand_path(path: &Path) -> PathBuf {
    PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).as_ref())
}
