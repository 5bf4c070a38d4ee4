//! # Storage Layer
//!
//! Read-only inputs for FlowTrack. The board lives in memory for the length
//! of a session; nothing is persisted.
//!
//! | Data | Format | Location |
//! |------|--------|----------|
//! | Board snapshot | JSON or YAML | `--board <file>` or `board.snapshot` in config |
//! | Config | TOML | `--config <file>` or `~/.config/flowtrack/config.toml` |
//!
//! ## Key Types
//!
//! - [`SnapshotFile`] - Reads and validates a board snapshot
//! - [`Config`] - User configuration

mod config;
mod snapshot;

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::Result;

pub use config::{BoardConfig, Config, ConfigError, TuiConfig};
pub use snapshot::{SnapshotError, SnapshotFile, SnapshotFormat};

use crate::domain::BoardState;

/// Where the initial board was taken from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardSource {
    /// The built-in sample board
    Builtin,
    /// A snapshot file
    File(PathBuf),
}

impl fmt::Display for BoardSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoardSource::Builtin => write!(f, "built-in board"),
            BoardSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Loads the initial board: an explicit snapshot wins over the configured
/// one, and the built-in board is used when neither is given
pub fn load_initial_board(
    explicit: Option<&Path>,
    config: &Config,
) -> Result<(BoardState, BoardSource)> {
    let path = explicit.map(Path::to_path_buf).or_else(|| config.snapshot_path());

    match path {
        Some(path) => {
            let file = SnapshotFile::new(path);
            let board = file.read()?;
            Ok((board, BoardSource::File(file.path().to_path_buf())))
        }
        None => Ok((BoardState::default(), BoardSource::Builtin)),
    }
}
