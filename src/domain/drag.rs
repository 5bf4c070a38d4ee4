//! Drag gesture lifecycle
//!
//! A gesture is `start`, zero or more `over`, then `end` (or `cancel`).
//! Ids carried by `over`/`end` are raw strings from the input layer and may
//! name either a task or a column.

use std::fmt;

use thiserror::Error;

use super::id::TaskId;
use super::reorder::{MoveReport, ReorderError};

/// Drag state machine
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        active: TaskId,
    },
}

impl DragState {
    pub fn active(&self) -> Option<&TaskId> {
        match self {
            DragState::Idle => None,
            DragState::Dragging { active } => Some(active),
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self, DragState::Dragging { .. })
    }
}

/// One event of a drag gesture
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragEvent {
    /// A task was picked up
    Start(TaskId),
    /// The pointer hovers an id, or nothing droppable
    Over(Option<String>),
    /// The task was released over an id, or over nothing droppable
    End(Option<String>),
    /// The gesture was aborted
    Cancel,
}

/// Why an event did not move anything
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Skipped {
    #[error("no drag in progress")]
    NotDragging,

    #[error("task '{0}' is not on the board")]
    UnknownTask(TaskId),

    #[error("no drop target")]
    NoTarget,

    #[error("drag cancelled")]
    Cancelled,

    #[error(transparent)]
    Rejected(#[from] ReorderError),
}

/// Result of feeding one event to the controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragOutcome {
    /// A drag began
    Started(TaskId),
    /// A hover re-parented the task into another column
    Previewed(MoveReport),
    /// The drop placed the task and the gesture finished
    Dropped(MoveReport),
    /// The event changed nothing; the gesture (if any) continues
    Ignored(Skipped),
    /// The gesture finished without a further move
    Discarded(Skipped),
}

impl DragOutcome {
    /// Returns true if the board changed as a result
    pub fn moved(&self) -> bool {
        match self {
            DragOutcome::Previewed(report) | DragOutcome::Dropped(report) => {
                !report.is_unchanged()
            }
            _ => false,
        }
    }
}

impl fmt::Display for DragOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DragOutcome::Started(task) => write!(f, "picked up {}", task),
            DragOutcome::Previewed(report) => write!(f, "preview {}", report),
            DragOutcome::Dropped(report) => write!(f, "dropped {}", report),
            DragOutcome::Ignored(reason) => write!(f, "ignored: {}", reason),
            DragOutcome::Discarded(reason) => write!(f, "discarded: {}", reason),
        }
    }
}
