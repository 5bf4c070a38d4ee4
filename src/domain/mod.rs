//! Domain models for FlowTrack
//!
//! Contains the board model, the reorder engine and the drag controller
//! without any I/O concerns.

mod id;
mod task;
mod board;
mod reorder;
mod drag;
mod controller;

pub use id::{ColumnId, IdError, TaskId};
pub use task::Task;
pub use board::{BoardError, BoardState, Column, DropTarget};
pub use reorder::{
    move_across_columns, move_within_column, relocate, reparent, MoveReport, Placement,
    ReorderError,
};
pub use drag::{DragEvent, DragOutcome, DragState, Skipped};
pub use controller::BoardController;
