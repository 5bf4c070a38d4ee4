//! Reorder engine
//!
//! Moves a task id within or across columns of a draft board. Each operation
//! either applies completely or returns an error with the draft untouched, so
//! a task can never end up in two columns or in none.
//!
//! Insertion "before" a reference task is resolved against the column as it
//! looks *after* the moved task has been taken out:
//!
//! ```text
//! [t1, t2, t3]  drop t1 on t3  ->  remove t1: [t2, t3]
//!                                  index of t3: 1
//!                                  insert:      [t2, t1, t3]
//! ```

use std::fmt;

use thiserror::Error;

use super::board::{BoardState, DropTarget};
use super::id::{ColumnId, TaskId};

/// Why a move was not applied
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ReorderError {
    #[error("task '{0}' is not in any column")]
    MissingSource(TaskId),

    #[error("'{0}' is neither a task nor a column")]
    MissingTarget(String),

    #[error("column '{0}' does not exist")]
    UnknownColumn(ColumnId),

    #[error("task '{task}' is not in column '{column}'")]
    NotInColumn { task: TaskId, column: ColumnId },

    #[error("task '{task}' is already in column '{column}'")]
    AlreadyInColumn { task: TaskId, column: ColumnId },

    #[error("task '{0}' dropped onto itself")]
    SelfDrop(TaskId),

    #[error("task '{task}' is already in target column '{column}'")]
    SameColumn { task: TaskId, column: ColumnId },

    #[error("reference task '{reference}' is not in column '{column}'")]
    UnresolvedPlacement { reference: TaskId, column: ColumnId },
}

/// Where a moved task lands in its target column
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placement {
    /// At an explicit index, clamped to the column bounds
    At(usize),
    /// Immediately before another task
    Before(TaskId),
    /// Appended after the last task
    End,
}

impl Placement {
    /// The placement implied by dropping onto a target: before a hovered
    /// task, or at the end of a hovered column body
    pub fn for_target(target: &DropTarget) -> Self {
        match target {
            DropTarget::Task { task, .. } => Placement::Before(task.clone()),
            DropTarget::Column { .. } => Placement::End,
        }
    }
}

/// Where a task was and where it went
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveReport {
    pub task: TaskId,
    pub from: ColumnId,
    pub from_index: usize,
    pub to: ColumnId,
    pub to_index: usize,
}

impl MoveReport {
    /// Returns true if the task ended exactly where it started
    pub fn is_unchanged(&self) -> bool {
        self.from == self.to && self.from_index == self.to_index
    }

    /// Returns true if the task changed columns
    pub fn crossed_columns(&self) -> bool {
        self.from != self.to
    }
}

impl fmt::Display for MoveReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unchanged() {
            write!(f, "{} stays at {}[{}]", self.task, self.to, self.to_index)
        } else {
            write!(
                f,
                "{} {}[{}] -> {}[{}]",
                self.task, self.from, self.from_index, self.to, self.to_index
            )
        }
    }
}

fn column_index(draft: &BoardState, column: &ColumnId) -> Result<usize, ReorderError> {
    draft
        .column_index(column)
        .ok_or_else(|| ReorderError::UnknownColumn(column.clone()))
}

/// Moves a task to a new position inside the column that holds it.
///
/// Leaves the draft untouched when the position would not change.
pub fn move_within_column(
    draft: &mut BoardState,
    task_id: &TaskId,
    column_id: &ColumnId,
    placement: Placement,
) -> Result<MoveReport, ReorderError> {
    let col = column_index(draft, column_id)?;
    let column = &draft.columns[col];

    let from = column
        .position(task_id)
        .ok_or_else(|| ReorderError::NotInColumn {
            task: task_id.clone(),
            column: column_id.clone(),
        })?;
    let last = column.len() - 1;

    let to = match placement {
        Placement::At(index) => index.min(last),
        Placement::End => last,
        Placement::Before(reference) => {
            if &reference == task_id {
                return Err(ReorderError::SelfDrop(task_id.clone()));
            }
            let at = column
                .position(&reference)
                .ok_or_else(|| ReorderError::UnresolvedPlacement {
                    reference: reference.clone(),
                    column: column_id.clone(),
                })?;
            // Index of the reference once the moved task is gone
            if at > from {
                at - 1
            } else {
                at
            }
        }
    };

    if to != from {
        let ids = &mut draft.columns[col].task_ids;
        let moved = ids.remove(from);
        ids.insert(to, moved);
    }

    Ok(MoveReport {
        task: task_id.clone(),
        from: column_id.clone(),
        from_index: from,
        to: column_id.clone(),
        to_index: to,
    })
}

/// Moves a task out of `source` and into `target`.
///
/// Delegates to [`move_within_column`] when both columns are the same.
pub fn move_across_columns(
    draft: &mut BoardState,
    task_id: &TaskId,
    source_id: &ColumnId,
    target_id: &ColumnId,
    placement: Placement,
) -> Result<MoveReport, ReorderError> {
    if source_id == target_id {
        return move_within_column(draft, task_id, target_id, placement);
    }

    let src = column_index(draft, source_id)?;
    let tgt = column_index(draft, target_id)?;

    let from = draft.columns[src]
        .position(task_id)
        .ok_or_else(|| ReorderError::NotInColumn {
            task: task_id.clone(),
            column: source_id.clone(),
        })?;

    let target = &draft.columns[tgt];
    if target.contains(task_id) {
        return Err(ReorderError::AlreadyInColumn {
            task: task_id.clone(),
            column: target_id.clone(),
        });
    }

    let to = match placement {
        Placement::At(index) => index.min(target.len()),
        Placement::End => target.len(),
        Placement::Before(reference) => {
            if &reference == task_id {
                return Err(ReorderError::SelfDrop(task_id.clone()));
            }
            target
                .position(&reference)
                .ok_or_else(|| ReorderError::UnresolvedPlacement {
                    reference: reference.clone(),
                    column: target_id.clone(),
                })?
        }
    };

    let moved = draft.columns[src].task_ids.remove(from);
    draft.columns[tgt].task_ids.insert(to, moved);

    Ok(MoveReport {
        task: task_id.clone(),
        from: source_id.clone(),
        from_index: from,
        to: target_id.clone(),
        to_index: to,
    })
}

/// Locates the column holding `task_id` and the column `over_id` resolves to
fn locate(
    draft: &BoardState,
    task_id: &TaskId,
    over_id: &str,
) -> Result<(ColumnId, DropTarget), ReorderError> {
    if task_id.as_str() == over_id {
        return Err(ReorderError::SelfDrop(task_id.clone()));
    }

    let source = draft
        .column_of(task_id)
        .ok_or_else(|| ReorderError::MissingSource(task_id.clone()))?;
    let target = draft
        .resolve_target(over_id)
        .ok_or_else(|| ReorderError::MissingTarget(over_id.to_string()))?;

    Ok((draft.columns[source].id.clone(), target))
}

/// Final placement of a dropped task.
///
/// `over_id` names either a task (insert before it) or a column (append).
pub fn relocate(
    draft: &mut BoardState,
    task_id: &TaskId,
    over_id: &str,
) -> Result<MoveReport, ReorderError> {
    let (source, target) = locate(draft, task_id, over_id)?;
    let target_column = draft.columns[target.column()].id.clone();

    move_across_columns(
        draft,
        task_id,
        &source,
        &target_column,
        Placement::for_target(&target),
    )
}

/// Live re-parenting while hovering.
///
/// Only moves the task when `over_id` resolves to a column other than the
/// one currently holding it.
pub fn reparent(
    draft: &mut BoardState,
    task_id: &TaskId,
    over_id: &str,
) -> Result<MoveReport, ReorderError> {
    let (source, target) = locate(draft, task_id, over_id)?;
    let target_column = draft.columns[target.column()].id.clone();

    if source == target_column {
        return Err(ReorderError::SameColumn {
            task: task_id.clone(),
            column: source,
        });
    }

    move_across_columns(
        draft,
        task_id,
        &source,
        &target_column,
        Placement::for_target(&target),
    )
}
