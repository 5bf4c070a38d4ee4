//! FlowTrack - a terminal kanban board
//!
//! Columns hold ordered lists of task cards. Cards are dragged within and
//! across columns with the mouse or keyboard; the [`domain`] module holds the
//! reorder engine and the controller that applies drag gestures to the board.

pub mod domain;
pub mod storage;
pub mod cli;

pub use domain::{BoardController, BoardState, Column, ColumnId, Task, TaskId};
