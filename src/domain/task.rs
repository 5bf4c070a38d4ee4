//! Task domain model
//!
//! Tasks are the cards on the board. They come from seed data and are only
//! ever relocated between columns, never edited.

use serde::{Deserialize, Serialize};

use super::id::TaskId;

/// A unit of work rendered as a card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique task ID
    pub id: TaskId,

    /// Task title
    pub title: String,

    /// Person the task is assigned to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,

    /// Free-form due date label (e.g. "Apr 28")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
}

impl Task {
    /// Creates a new task with just a title
    pub fn new(id: TaskId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            assignee: None,
            due_date: None,
        }
    }

    /// Sets the assignee
    pub fn with_assignee(mut self, assignee: impl Into<String>) -> Self {
        self.assignee = Some(assignee.into());
        self
    }

    /// Sets the due date label
    pub fn with_due_date(mut self, due_date: impl Into<String>) -> Self {
        self.due_date = Some(due_date.into());
        self
    }
}
