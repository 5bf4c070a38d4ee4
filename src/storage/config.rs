//! Configuration handling for FlowTrack
//!
//! Configuration is read from `~/.config/flowtrack/config.toml` (global), or
//! from an explicit file passed with `--config` / `$FLOWTRACK_CONFIG`.
//! Nothing is ever written back.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cli::OutputFormat;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to parse configuration: {0}")]
    Parse(String),

    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),
}

/// Where the initial board comes from
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct BoardConfig {
    /// Snapshot file (JSON or YAML). Relative paths resolve against the
    /// directory holding the config file.
    pub snapshot: Option<PathBuf>,
}

/// Settings for the interactive board
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TuiConfig {
    /// Input poll interval in milliseconds
    pub tick_rate_ms: u64,

    /// Cells the pointer must travel with the button held before a drag starts
    pub drag_activation_cells: u16,

    /// Show the assignee line on cards
    pub show_assignee: bool,

    /// Show the due date on cards
    pub show_due_date: bool,

    /// Max characters of a card title before truncation
    pub title_width: usize,
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: 250,
            drag_activation_cells: 1,
            show_assignee: true,
            show_due_date: true,
            title_width: 28,
        }
    }
}

/// Complete configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Default output format (text or json)
    pub default_format: Option<OutputFormat>,

    /// Initial board settings
    pub board: BoardConfig,

    /// Interactive board settings
    pub tui: TuiConfig,

    /// File this configuration was read from
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

impl Config {
    /// Loads configuration from an explicit path, or the global location
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => {
                if !path.is_file() {
                    return Err(ConfigError::NotFound(path.to_path_buf()).into());
                }
                Self::load_from(path)
            }
            None => Self::load_global(),
        }
    }

    /// Returns the global config directory
    pub fn global_config_dir() -> Option<PathBuf> {
        ProjectDirs::from("dev", "flowtrack", "flowtrack")
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Loads global configuration, falling back to defaults
    fn load_global() -> Result<Self> {
        let config_dir = match Self::global_config_dir() {
            Some(dir) => dir,
            None => return Ok(Self::default()),
        };

        let config_path = config_dir.join("config.toml");
        if !config_path.exists() {
            return Ok(Self::default());
        }

        Self::load_from(&config_path)
    }

    /// Loads and validates configuration from a specific file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;

        let mut config = Self::parse(&content)
            .with_context(|| format!("Failed to load config: {}", path.display()))?;
        config.source = Some(path.to_path_buf());
        Ok(config)
    }

    /// Parses configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.tui.tick_rate_ms == 0 {
            return Err(ConfigError::Invalid(
                "tui.tick_rate_ms must be greater than 0".to_string(),
            ));
        }
        if self.tui.title_width < 4 {
            return Err(ConfigError::Invalid(
                "tui.title_width must be at least 4".to_string(),
            ));
        }
        Ok(())
    }

    /// Snapshot path from config, resolved against the config file location
    pub fn snapshot_path(&self) -> Option<PathBuf> {
        let snapshot = self.board.snapshot.as_ref()?;
        if snapshot.is_absolute() {
            return Some(snapshot.clone());
        }

        let base = self
            .source
            .as_deref()
            .and_then(Path::parent)
            .unwrap_or_else(|| Path::new("."));
        Some(base.join(snapshot))
    }
}
