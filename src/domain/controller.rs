//! Board controller
//!
//! Owns the committed [`BoardState`] and the drag state, and is the only
//! place the board changes. Every update works on a private deep copy of the
//! board and commits it by swapping the shared pointer, so a
//! [`BoardController::snapshot`] taken earlier keeps seeing the old board.
//!
//! Consumers get the controller passed in explicitly; nothing looks it up
//! from ambient state.

use std::sync::Arc;

use super::board::{BoardState, Column};
use super::drag::{DragEvent, DragOutcome, DragState, Skipped};
use super::id::{ColumnId, TaskId};
use super::reorder;
use super::task::Task;

/// Single source of truth for one board
#[derive(Debug, Clone)]
pub struct BoardController {
    board: Arc<BoardState>,
    drag: DragState,
    revision: u64,
}

impl BoardController {
    /// Creates a controller from an initial snapshot
    pub fn new(initial: BoardState) -> Self {
        Self {
            board: Arc::new(initial),
            drag: DragState::Idle,
            revision: 0,
        }
    }

    /// The current committed board
    pub fn board(&self) -> &BoardState {
        &self.board
    }

    /// A handle to the current board that outlives later updates
    pub fn snapshot(&self) -> Arc<BoardState> {
        Arc::clone(&self.board)
    }

    /// Number of committed updates so far
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn column(&self, column_id: &ColumnId) -> Option<&Column> {
        self.board.column(column_id)
    }

    pub fn task(&self, task_id: &TaskId) -> Option<&Task> {
        self.board.task(task_id)
    }

    pub fn drag_state(&self) -> &DragState {
        &self.drag
    }

    /// The task being dragged, if any
    pub fn active_task_id(&self) -> Option<&TaskId> {
        self.drag.active()
    }

    /// The task to render in the drag overlay
    pub fn active_task(&self) -> Option<&Task> {
        self.active_task_id().and_then(|id| self.board.task(id))
    }

    /// Runs `transform` on a fresh copy of the board and commits the result
    pub fn update_board<F>(&mut self, transform: F)
    where
        F: FnOnce(BoardState) -> BoardState,
    {
        let next = transform(self.draft());
        self.commit(next);
    }

    fn draft(&self) -> BoardState {
        BoardState::clone(&self.board)
    }

    fn commit(&mut self, next: BoardState) {
        self.board = Arc::new(next);
        self.revision += 1;
    }

    /// Like [`update_board`](Self::update_board), but only commits when the
    /// operation succeeds
    fn apply<R, E>(&mut self, op: impl FnOnce(&mut BoardState) -> Result<R, E>) -> Result<R, E> {
        let mut draft = self.draft();
        let value = op(&mut draft)?;
        self.commit(draft);
        Ok(value)
    }

    /// Feeds one gesture event through the state machine
    pub fn handle(&mut self, event: DragEvent) -> DragOutcome {
        match event {
            DragEvent::Start(task_id) => self.start(task_id),
            DragEvent::Over(over_id) => self.over(over_id.as_deref()),
            DragEvent::End(over_id) => self.end(over_id.as_deref()),
            DragEvent::Cancel => self.cancel(),
        }
    }

    /// Picks up a task. A start during a drag replaces the active task.
    pub fn start(&mut self, task_id: TaskId) -> DragOutcome {
        if self.board.task(&task_id).is_none() {
            return DragOutcome::Ignored(Skipped::UnknownTask(task_id));
        }

        self.drag = DragState::Dragging {
            active: task_id.clone(),
        };
        DragOutcome::Started(task_id)
    }

    /// Hover: re-parents the active task when `over_id` is in another column
    pub fn over(&mut self, over_id: Option<&str>) -> DragOutcome {
        let Some(active) = self.drag.active().cloned() else {
            return DragOutcome::Ignored(Skipped::NotDragging);
        };
        let Some(over_id) = over_id else {
            return DragOutcome::Ignored(Skipped::NoTarget);
        };

        match self.apply(|draft| reorder::reparent(draft, &active, over_id)) {
            Ok(report) => DragOutcome::Previewed(report),
            Err(err) => DragOutcome::Ignored(err.into()),
        }
    }

    /// Drop: places the active task relative to `over_id` and returns to idle.
    ///
    /// Whatever `over` already applied stands even when the drop is
    /// discarded.
    pub fn end(&mut self, over_id: Option<&str>) -> DragOutcome {
        let DragState::Dragging { active } = std::mem::take(&mut self.drag) else {
            return DragOutcome::Ignored(Skipped::NotDragging);
        };
        let Some(over_id) = over_id else {
            return DragOutcome::Discarded(Skipped::NoTarget);
        };

        match self.apply(|draft| reorder::relocate(draft, &active, over_id)) {
            Ok(report) => DragOutcome::Dropped(report),
            Err(err) => DragOutcome::Discarded(err.into()),
        }
    }

    /// Aborts the gesture
    pub fn cancel(&mut self) -> DragOutcome {
        if !self.drag.is_dragging() {
            return DragOutcome::Ignored(Skipped::NotDragging);
        }
        self.drag = DragState::Idle;
        DragOutcome::Discarded(Skipped::Cancelled)
    }
}

impl Default for BoardController {
    fn default() -> Self {
        Self::new(BoardState::default())
    }
}
