//! Board snapshot files
//!
//! The initial board can be supplied as JSON or YAML, in the same shape the
//! board serializes to:
//!
//! ```json
//! {
//!   "tasks": { "task-1": { "id": "task-1", "title": "Define success metrics" } },
//!   "columns": [ { "id": "col-backlog", "title": "Backlog", "taskIds": ["task-1"] } ]
//! }
//! ```
//!
//! Snapshots are only read. Every loaded board is checked against the board
//! invariants before it reaches the controller.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use thiserror::Error;

use crate::domain::{BoardError, BoardState};

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Unsupported snapshot format '{0}': expected .json, .yaml or .yml")]
    UnsupportedFormat(String),

    #[error("Invalid board snapshot: {0}")]
    Invalid(#[from] BoardError),
}

/// Encoding of a snapshot file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotFormat {
    Json,
    Yaml,
}

impl SnapshotFormat {
    /// Picks the format from a file extension
    pub fn from_path(path: &Path) -> Result<Self, SnapshotError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_lowercase();

        match ext.as_str() {
            "json" => Ok(SnapshotFormat::Json),
            "yaml" | "yml" => Ok(SnapshotFormat::Yaml),
            _ => Err(SnapshotError::UnsupportedFormat(ext)),
        }
    }
}

/// A board snapshot on disk
pub struct SnapshotFile {
    path: PathBuf,
}

impl SnapshotFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the path to the snapshot file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads, parses and validates the snapshot
    pub fn read(&self) -> Result<BoardState> {
        let format = SnapshotFormat::from_path(&self.path)?;

        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read board snapshot: {}", self.path.display()))?;

        parse(&content, format)
            .with_context(|| format!("Failed to load board snapshot: {}", self.path.display()))
    }
}

/// Parses and validates a snapshot from text
fn parse(content: &str, format: SnapshotFormat) -> Result<BoardState> {
    let board: BoardState = match format {
        SnapshotFormat::Json => {
            serde_json::from_str(content).context("Failed to parse JSON snapshot")?
        }
        SnapshotFormat::Yaml => {
            serde_yaml::from_str(content).context("Failed to parse YAML snapshot")?
        }
    };

    board.validate().map_err(SnapshotError::Invalid)?;
    Ok(board)
}
