//! Board state: columns of ordered task references plus the task table
//!
//! A well-formed board satisfies four invariants:
//!
//! 1. every id in a column's `task_ids` is a key of `tasks`
//! 2. every task appears in exactly one column, exactly once
//! 3. column and task identities never change
//! 4. column order never changes
//!
//! The reorder engine only ever moves ids between and within `task_ids`, so
//! (3) and (4) hold structurally. [`BoardState::validate`] checks (1) and (2)
//! for boards arriving from outside.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::id::{ColumnId, TaskId};
use super::task::Task;

#[derive(Debug, Error, PartialEq)]
pub enum BoardError {
    #[error("Duplicate column ID: {0}")]
    DuplicateColumn(ColumnId),

    #[error("Task stored under key '{key}' has ID '{id}'")]
    KeyMismatch { key: TaskId, id: TaskId },

    #[error("Column '{column}' references unknown task '{task}'")]
    UnknownTask { column: ColumnId, task: TaskId },

    #[error("Task '{0}' appears more than once across columns")]
    DuplicateTask(TaskId),

    #[error("Task '{0}' is not placed in any column")]
    OrphanTask(TaskId),
}

/// A named, ordered bucket of task references
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub id: ColumnId,
    pub title: String,
    #[serde(default)]
    pub task_ids: Vec<TaskId>,
}

impl Column {
    pub fn new(id: ColumnId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            task_ids: Vec::new(),
        }
    }

    /// Position of a task within this column
    pub fn position(&self, task_id: &TaskId) -> Option<usize> {
        self.task_ids.iter().position(|id| id == task_id)
    }

    pub fn contains(&self, task_id: &TaskId) -> bool {
        self.task_ids.contains(task_id)
    }

    pub fn len(&self) -> usize {
        self.task_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.task_ids.is_empty()
    }
}

/// What a hovered or dropped-on id refers to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropTarget {
    /// A task card inside the column at `column`
    Task { column: usize, task: TaskId },
    /// The body of the column at `column`
    Column { column: usize },
}

impl DropTarget {
    /// Index of the column the target lives in
    pub fn column(&self) -> usize {
        match self {
            DropTarget::Task { column, .. } | DropTarget::Column { column } => *column,
        }
    }
}

/// The complete kanban state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardState {
    pub tasks: BTreeMap<TaskId, Task>,
    pub columns: Vec<Column>,
}

impl BoardState {
    /// Creates a board from columns and tasks without validating it
    pub fn new(columns: Vec<Column>, tasks: impl IntoIterator<Item = Task>) -> Self {
        Self {
            tasks: tasks.into_iter().map(|t| (t.id.clone(), t)).collect(),
            columns,
        }
    }

    /// Looks up a task by ID
    pub fn task(&self, task_id: &TaskId) -> Option<&Task> {
        self.tasks.get(task_id)
    }

    /// Looks up a column by ID
    pub fn column(&self, column_id: &ColumnId) -> Option<&Column> {
        self.columns.iter().find(|c| &c.id == column_id)
    }

    /// Index of a column in display order
    pub fn column_index(&self, column_id: &ColumnId) -> Option<usize> {
        self.columns.iter().position(|c| &c.id == column_id)
    }

    /// Index of the column currently holding a task
    pub fn column_of(&self, task_id: &TaskId) -> Option<usize> {
        self.columns.iter().position(|c| c.contains(task_id))
    }

    /// Resolves a raw id from the input layer to a task or column target.
    ///
    /// Columns are scanned in board order; the first column that either
    /// holds a task with this id or is itself named by it wins. Within that
    /// column the column id takes precedence over a task sharing it.
    pub fn resolve_target(&self, over_id: &str) -> Option<DropTarget> {
        self.columns.iter().enumerate().find_map(|(idx, column)| {
            if column.id.as_str() == over_id {
                return Some(DropTarget::Column { column: idx });
            }
            column
                .task_ids
                .iter()
                .find(|id| id.as_str() == over_id)
                .map(|task| DropTarget::Task {
                    column: idx,
                    task: task.clone(),
                })
        })
    }

    /// Resolves a column's task ids to tasks, in column order.
    ///
    /// Ids missing from the task table are skipped.
    pub fn tasks_in<'a>(&'a self, column: &'a Column) -> impl Iterator<Item = &'a Task> + 'a {
        column.task_ids.iter().filter_map(|id| self.tasks.get(id))
    }

    /// Total number of task references across all columns
    pub fn placed_count(&self) -> usize {
        self.columns.iter().map(Column::len).sum()
    }

    /// Checks the referential and placement invariants
    pub fn validate(&self) -> Result<(), BoardError> {
        let mut column_ids = HashSet::new();
        for column in &self.columns {
            if !column_ids.insert(&column.id) {
                return Err(BoardError::DuplicateColumn(column.id.clone()));
            }
        }

        for (key, task) in &self.tasks {
            if key != &task.id {
                return Err(BoardError::KeyMismatch {
                    key: key.clone(),
                    id: task.id.clone(),
                });
            }
        }

        let mut placed = HashSet::new();
        for column in &self.columns {
            for task_id in &column.task_ids {
                if !self.tasks.contains_key(task_id) {
                    return Err(BoardError::UnknownTask {
                        column: column.id.clone(),
                        task: task_id.clone(),
                    });
                }
                if !placed.insert(task_id) {
                    return Err(BoardError::DuplicateTask(task_id.clone()));
                }
            }
        }

        if let Some(orphan) = self.tasks.keys().find(|id| !placed.contains(id)) {
            return Err(BoardError::OrphanTask(orphan.clone()));
        }

        Ok(())
    }

    /// Returns the column id and title sequence, the part of the board that
    /// must never change under reordering
    pub fn column_shape(&self) -> Vec<(&ColumnId, &str)> {
        self.columns
            .iter()
            .map(|c| (&c.id, c.title.as_str()))
            .collect()
    }
}

impl Default for BoardState {
    /// The built-in sample board used when no snapshot is supplied
    fn default() -> Self {
        let tid = TaskId::new_unchecked;
        let column = |id: &str, title: &str, tasks: &[&str]| Column {
            id: ColumnId::new_unchecked(id),
            title: title.to_string(),
            task_ids: tasks.iter().map(|t| TaskId::new_unchecked(t)).collect(),
        };

        let tasks = [
            Task::new(tid("task-1"), "Define success metrics")
                .with_assignee("Asha")
                .with_due_date("Apr 28"),
            Task::new(tid("task-2"), "Draft onboarding walkthrough").with_assignee("Miguel"),
            Task::new(tid("task-3"), "Set up Supabase schema").with_assignee("Asha"),
            Task::new(tid("task-4"), "Implement drag & drop interactions")
                .with_assignee("Jules")
                .with_due_date("May 2"),
            Task::new(tid("task-5"), "Record stakeholder demo"),
        ];

        let columns = vec![
            column("col-backlog", "Backlog", &["task-1", "task-2"]),
            column("col-in-progress", "In Progress", &["task-3", "task-4"]),
            column("col-done", "Done", &["task-5"]),
        ];

        Self::new(columns, tasks)
    }
}
