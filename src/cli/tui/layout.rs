//! Screen geometry for the board
//!
//! The same layout is used to draw the board and to map pointer positions
//! back to task and column ids.

use ratatui::layout::{Constraint, Direction, Layout, Position, Rect};

use crate::domain::{BoardState, ColumnId, Task, TaskId};
use crate::storage::TuiConfig;

/// Width of the "+ New Task" control in the header
const NEW_TASK_WIDTH: u16 = 16;

/// What the pointer is over
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Hit {
    Task(TaskId),
    Column(ColumnId),
    NewTaskButton,
}

impl Hit {
    /// The id to report as a drag target, if this is droppable
    pub fn target_id(&self) -> Option<&str> {
        match self {
            Hit::Task(id) => Some(id.as_str()),
            Hit::Column(id) => Some(id.as_str()),
            Hit::NewTaskButton => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardRegion {
    pub task: TaskId,
    pub area: Rect,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRegion {
    pub column: ColumnId,
    pub area: Rect,
    pub cards: Vec<CardRegion>,
    /// Number of cards that did not fit
    pub hidden: usize,
}

/// Regions of one frame
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardLayout {
    pub header: Rect,
    pub new_task_button: Rect,
    pub columns: Vec<ColumnRegion>,
    pub status: Rect,
}

/// Which card lines are shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardStyle {
    pub show_assignee: bool,
    pub show_due_date: bool,
}

impl CardStyle {
    pub fn from_config(config: &TuiConfig) -> Self {
        Self {
            show_assignee: config.show_assignee,
            show_due_date: config.show_due_date,
        }
    }

    /// True if a card for `task` has a footer line
    pub fn has_footer(&self, task: &Task) -> bool {
        (self.show_assignee && task.assignee.is_some())
            || (self.show_due_date && task.due_date.is_some())
    }

    /// Card height in rows, borders included
    pub fn card_height(&self, task: &Task) -> u16 {
        if self.has_footer(task) {
            4
        } else {
            3
        }
    }
}

/// The area inside a one-cell border
pub fn inner(area: Rect) -> Rect {
    Rect::new(
        area.x.saturating_add(1),
        area.y.saturating_add(1),
        area.width.saturating_sub(2),
        area.height.saturating_sub(2),
    )
}

impl BoardLayout {
    /// Computes the regions for `board` drawn into `area`
    pub fn compute(area: Rect, board: &BoardState, style: CardStyle) -> Self {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(5),    // Columns
                Constraint::Length(3), // Status bar
            ])
            .split(area);

        let header_parts = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(10), Constraint::Length(NEW_TASK_WIDTH)])
            .split(rows[0]);

        let count = board.columns.len();
        let columns = if count == 0 {
            Vec::new()
        } else {
            let constraints = vec![Constraint::Ratio(1, count as u32); count];
            let areas = Layout::default()
                .direction(Direction::Horizontal)
                .constraints(constraints)
                .split(rows[1]);

            board
                .columns
                .iter()
                .zip(areas.iter())
                .map(|(column, &col_area)| {
                    let body = inner(col_area);
                    let mut cards = Vec::new();
                    let mut y = body.y;
                    let mut hidden = 0;

                    for task in board.tasks_in(column) {
                        let height = style.card_height(task);
                        if hidden > 0 || y + height > body.bottom() {
                            hidden += 1;
                            continue;
                        }
                        cards.push(CardRegion {
                            task: task.id.clone(),
                            area: Rect::new(body.x, y, body.width, height),
                        });
                        y += height;
                    }

                    ColumnRegion {
                        column: column.id.clone(),
                        area: col_area,
                        cards,
                        hidden,
                    }
                })
                .collect()
        };

        Self {
            header: header_parts[0],
            new_task_button: header_parts[1],
            columns,
            status: rows[2],
        }
    }

    /// Maps a pointer position to what lies under it.
    ///
    /// Cards win over the column around them; any other point inside a
    /// column (border included) is the column body.
    pub fn hit(&self, x: u16, y: u16) -> Option<Hit> {
        let pos = Position::new(x, y);

        if self.new_task_button.contains(pos) {
            return Some(Hit::NewTaskButton);
        }

        let column = self.columns.iter().find(|c| c.area.contains(pos))?;
        let card = column.cards.iter().find(|card| card.area.contains(pos));

        Some(match card {
            Some(card) => Hit::Task(card.task.clone()),
            None => Hit::Column(column.column.clone()),
        })
    }

    /// Region of a rendered card
    pub fn card(&self, task: &TaskId) -> Option<&CardRegion> {
        self.columns
            .iter()
            .flat_map(|c| c.cards.iter())
            .find(|card| &card.task == task)
    }
}
