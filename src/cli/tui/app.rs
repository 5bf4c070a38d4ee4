//! TUI application state and logic

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;

use super::event::{Event, EventHandler};
use super::input::PointerTracker;
use super::layout::{BoardLayout, CardStyle, Hit};
use super::ui::Terminal;
use super::views;
use crate::domain::{BoardController, BoardState, DragEvent, DragOutcome, TaskId};
use crate::storage::TuiConfig;

const HELP: &str = "h/l:column j/k:card space:pick up enter:drop esc:cancel n:new task q:quit";
const NEW_TASK_STUB: &str = "New tasks can't be created from the board yet";

/// Selected card position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    pub column: usize,
    pub row: usize,
}

/// Input mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    /// Keyboard drag. The slot's row indexes the target column with the
    /// dragged task left out; one past the end means the column body.
    KeyDrag { slot: Cursor },
}

/// Application state
pub struct App {
    controller: BoardController,
    config: TuiConfig,
    style: CardStyle,

    /// Regions of the last frame
    layout: BoardLayout,
    area: Rect,

    cursor: Cursor,
    input_mode: InputMode,
    pointer: PointerTracker,

    status_message: Option<String>,
    should_quit: bool,
}

impl App {
    pub fn new(board: BoardState, config: TuiConfig) -> Self {
        Self {
            controller: BoardController::new(board),
            style: CardStyle::from_config(&config),
            pointer: PointerTracker::new(config.drag_activation_cells),
            config,
            layout: BoardLayout::default(),
            area: Rect::default(),
            cursor: Cursor::default(),
            input_mode: InputMode::Normal,
            status_message: None,
            should_quit: false,
        }
    }

    /// Run the main application loop
    pub fn run(&mut self, terminal: &mut Terminal, events: EventHandler) -> Result<()> {
        while !self.should_quit {
            terminal.draw(|frame| {
                self.relayout(frame.area());
                views::board::draw(frame, self);
            })?;

            match events.next()? {
                Event::Key(key) => self.handle_key(key),
                Event::Mouse(mouse) => self.handle_mouse(mouse),
                Event::Resize(width, height) => self.relayout(Rect::new(0, 0, width, height)),
                Event::FocusLost => self.abort_drag(),
                Event::Tick => {}
            }
        }

        Ok(())
    }

    /// Recomputes the layout for `area` from the current board
    fn relayout(&mut self, area: Rect) {
        self.area = area;
        self.layout = BoardLayout::compute(area, self.controller.board(), self.style);
    }

    /// Feeds one event to the controller and reflects the outcome
    fn dispatch(&mut self, event: DragEvent) -> DragOutcome {
        let outcome = self.controller.handle(event);

        match &outcome {
            DragOutcome::Previewed(report) | DragOutcome::Dropped(report) => {
                if let Some(column) = self.controller.board().column_index(&report.to) {
                    self.cursor = Cursor {
                        column,
                        row: report.to_index,
                    };
                }
                self.relayout(self.area);
            }
            _ => {}
        }

        // Hovering the source column is routine; don't flood the status bar
        if !matches!(outcome, DragOutcome::Ignored(_)) {
            self.status_message = Some(outcome.to_string());
        }
        outcome
    }

    /// Cancels whatever drag is in progress
    fn abort_drag(&mut self) {
        if let Some(event) = self.pointer.abort() {
            self.dispatch(event);
        }
        if matches!(self.input_mode, InputMode::KeyDrag { .. }) {
            self.input_mode = InputMode::Normal;
            self.dispatch(DragEvent::Cancel);
        }
    }

    /// Handle key events
    fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        match self.input_mode {
            InputMode::Normal => self.handle_normal_key(key),
            InputMode::KeyDrag { slot } => self.handle_drag_key(key, slot),
        }
    }

    /// Handle keys in normal mode
    fn handle_normal_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => {
                self.should_quit = true;
            }
            KeyCode::Esc => {
                self.abort_drag();
            }

            KeyCode::Char('h') | KeyCode::Left => {
                self.cursor.column = self.cursor.column.saturating_sub(1);
                self.clamp_cursor();
            }
            KeyCode::Char('l') | KeyCode::Right => {
                self.cursor.column += 1;
                self.clamp_cursor();
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.cursor.row = self.cursor.row.saturating_sub(1);
                self.clamp_cursor();
            }
            KeyCode::Char('j') | KeyCode::Down => {
                self.cursor.row += 1;
                self.clamp_cursor();
            }

            KeyCode::Char(' ') | KeyCode::Enter => {
                self.pick_up();
            }

            KeyCode::Char('n') => {
                self.status_message = Some(NEW_TASK_STUB.to_string());
            }
            KeyCode::Char('?') => {
                self.status_message = Some(HELP.to_string());
            }

            _ => {}
        }
    }

    /// Handle keys while carrying a task with the keyboard
    fn handle_drag_key(&mut self, key: KeyEvent, slot: Cursor) {
        let columns = self.controller.board().columns.len();
        let mut next = slot;

        match key.code {
            KeyCode::Esc => {
                self.input_mode = InputMode::Normal;
                self.dispatch(DragEvent::Cancel);
                return;
            }
            KeyCode::Char(' ') | KeyCode::Enter => {
                self.input_mode = InputMode::Normal;
                let target = self.slot_target(slot);
                self.dispatch(DragEvent::End(target));
                return;
            }

            KeyCode::Char('h') | KeyCode::Left => {
                next.column = next.column.saturating_sub(1);
            }
            KeyCode::Char('l') | KeyCode::Right => {
                next.column = (next.column + 1).min(columns.saturating_sub(1));
            }
            KeyCode::Char('k') | KeyCode::Up => {
                next.row = next.row.saturating_sub(1);
            }
            KeyCode::Char('j') | KeyCode::Down => {
                next.row += 1;
            }

            _ => return,
        }

        next.row = next.row.min(self.slot_rows(next.column));
        if next == slot {
            return;
        }

        self.input_mode = InputMode::KeyDrag { slot: next };
        let target = self.slot_target(next);
        self.dispatch(DragEvent::Over(target));
    }

    /// Starts a keyboard drag of the selected card
    fn pick_up(&mut self) {
        if self.pointer.is_dragging() {
            return;
        }
        let Some(task) = self.selected_task_id().cloned() else {
            return;
        };

        if let DragOutcome::Started(_) = self.dispatch(DragEvent::Start(task)) {
            // A held but not yet activated press must not wake up later
            self.pointer.abort();
            // The slot just after the card leaves it where it is
            self.input_mode = InputMode::KeyDrag { slot: self.cursor };
        }
    }

    /// Number of other cards in a column; the largest valid slot row
    fn slot_rows(&self, column: usize) -> usize {
        let active = self.controller.active_task_id();
        self.controller
            .board()
            .columns
            .get(column)
            .map(|c| c.task_ids.iter().filter(|id| Some(*id) != active).count())
            .unwrap_or(0)
    }

    /// The id a keyboard slot drops onto: the card it sits before, or the
    /// column body past the last card
    fn slot_target(&self, slot: Cursor) -> Option<String> {
        let active = self.controller.active_task_id();
        let column = self.controller.board().columns.get(slot.column)?;

        let target = column
            .task_ids
            .iter()
            .filter(|id| Some(*id) != active)
            .nth(slot.row)
            .map(|id| id.as_str())
            .unwrap_or(column.id.as_str());

        Some(target.to_string())
    }

    /// Handle mouse events
    fn handle_mouse(&mut self, mouse: MouseEvent) {
        // Mouse input waits while the keyboard carries a task
        if matches!(self.input_mode, InputMode::KeyDrag { .. }) {
            return;
        }

        let hit = self.layout.hit(mouse.column, mouse.row);
        let over = hit.as_ref().and_then(Hit::target_id);

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => match &hit {
                Some(Hit::Task(task)) => {
                    self.select(task);
                    self.pointer.press(task.clone(), mouse.column, mouse.row);
                }
                Some(Hit::Column(column)) => {
                    if let Some(index) = self.controller.board().column_index(column) {
                        self.cursor.column = index;
                        self.clamp_cursor();
                    }
                }
                Some(Hit::NewTaskButton) => {
                    self.status_message = Some(NEW_TASK_STUB.to_string());
                }
                None => {}
            },
            MouseEventKind::Drag(MouseButton::Left) => {
                let events = self.pointer.motion(mouse.column, mouse.row, over);
                for event in events {
                    self.dispatch(event);
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                if let Some(event) = self.pointer.release(over) {
                    self.dispatch(event);
                }
            }
            _ => {}
        }
    }

    /// Moves the cursor onto a task
    fn select(&mut self, task: &TaskId) {
        let board = self.controller.board();
        let Some(column) = board.column_of(task) else {
            return;
        };
        let row = board.columns[column].position(task).unwrap_or(0);
        self.cursor = Cursor { column, row };
    }

    fn clamp_cursor(&mut self) {
        let board = self.controller.board();
        let columns = board.columns.len();

        self.cursor.column = self.cursor.column.min(columns.saturating_sub(1));
        let cards = board
            .columns
            .get(self.cursor.column)
            .map(|c| c.len())
            .unwrap_or(0);
        self.cursor.row = self.cursor.row.min(cards.saturating_sub(1));
    }

    // Public accessors for views

    pub fn board(&self) -> &BoardState {
        self.controller.board()
    }

    pub fn controller(&self) -> &BoardController {
        &self.controller
    }

    pub fn layout(&self) -> &BoardLayout {
        &self.layout
    }

    pub fn style(&self) -> CardStyle {
        self.style
    }

    pub fn title_width(&self) -> usize {
        self.config.title_width
    }

    pub fn input_mode(&self) -> InputMode {
        self.input_mode
    }

    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    pub fn selected_task_id(&self) -> Option<&TaskId> {
        self.board()
            .columns
            .get(self.cursor.column)
            .and_then(|c| c.task_ids.get(self.cursor.row))
    }

    /// The id currently targeted by a drag, from either input source
    pub fn drop_target(&self) -> Option<String> {
        match self.input_mode {
            InputMode::KeyDrag { slot } => self.slot_target(slot),
            InputMode::Normal => self.pointer.over().map(str::to_string),
        }
    }

    /// Where to draw the drag overlay
    pub fn pointer_position(&self) -> Option<(u16, u16)> {
        if self.pointer.is_dragging() {
            self.pointer.position()
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ColumnId, DragState};

    fn app() -> App {
        let mut app = App::new(BoardState::default(), TuiConfig::default());
        app.relayout(Rect::new(0, 0, 90, 30));
        app
    }

    fn tid(s: &str) -> TaskId {
        s.parse().unwrap()
    }

    fn column_tasks(app: &App, column: &str) -> Vec<String> {
        let column: ColumnId = column.parse().unwrap();
        app.board()
            .column(&column)
            .unwrap()
            .task_ids
            .iter()
            .map(|id| id.to_string())
            .collect()
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn down(app: &mut App, x: u16, y: u16) {
        app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), x, y));
    }

    fn drag(app: &mut App, x: u16, y: u16) {
        app.handle_mouse(mouse(MouseEventKind::Drag(MouseButton::Left), x, y));
    }

    fn up(app: &mut App, x: u16, y: u16) {
        app.handle_mouse(mouse(MouseEventKind::Up(MouseButton::Left), x, y));
    }

    // ==========================================================================
    // Mouse drag
    // ==========================================================================

    #[test]
    fn click_selects_without_dragging() {
        let mut app = app();
        down(&mut app, 5, 9);
        up(&mut app, 5, 9);

        assert_eq!(app.selected_task_id(), Some(&tid("task-2")));
        assert_eq!(app.controller().drag_state(), &DragState::Idle);
        assert_eq!(app.controller().revision(), 0);
    }

    #[test]
    fn mouse_drag_onto_task_in_other_column() {
        let mut app = app();
        down(&mut app, 5, 5);
        // Over task-4: re-parented before it
        drag(&mut app, 35, 9);
        assert_eq!(column_tasks(&app, "col-in-progress"), ["task-3", "task-1", "task-4"]);
        assert_eq!(app.pointer_position(), Some((35, 9)));
        assert_eq!(app.drop_target().as_deref(), Some("task-4"));

        // task-4 moved down a card; release on it
        drag(&mut app, 35, 13);
        up(&mut app, 35, 13);

        assert_eq!(column_tasks(&app, "col-backlog"), ["task-2"]);
        assert_eq!(column_tasks(&app, "col-in-progress"), ["task-3", "task-1", "task-4"]);
        assert_eq!(app.controller().drag_state(), &DragState::Idle);
        assert!(app.status_message().unwrap().starts_with("dropped"));
        assert_eq!(app.selected_task_id(), Some(&tid("task-1")));
        assert_eq!(app.pointer_position(), None);
    }

    #[test]
    fn mouse_drop_on_column_body_appends() {
        let mut app = app();
        down(&mut app, 5, 5);
        drag(&mut app, 65, 20);
        up(&mut app, 65, 20);

        assert_eq!(column_tasks(&app, "col-done"), ["task-5", "task-1"]);
        assert_eq!(app.selected_task_id(), Some(&tid("task-1")));
    }

    #[test]
    fn mouse_drop_outside_board_keeps_preview() {
        let mut app = app();
        down(&mut app, 5, 5);
        drag(&mut app, 65, 20);
        drag(&mut app, 5, 1);
        up(&mut app, 5, 1);

        assert_eq!(column_tasks(&app, "col-done"), ["task-5", "task-1"]);
        assert_eq!(app.status_message(), Some("discarded: no drop target"));
    }

    #[test]
    fn escape_cancels_mouse_drag() {
        let mut app = app();
        down(&mut app, 5, 5);
        drag(&mut app, 6, 5);
        assert!(app.controller().drag_state().is_dragging());

        app.handle_key(key(KeyCode::Esc));
        assert_eq!(app.controller().drag_state(), &DragState::Idle);
        assert_eq!(app.status_message(), Some("discarded: drag cancelled"));

        // Later motion with the button still held does nothing
        drag(&mut app, 65, 20);
        assert_eq!(column_tasks(&app, "col-done"), ["task-5"]);
    }

    #[test]
    fn focus_loss_cancels_mouse_drag() {
        let mut app = app();
        down(&mut app, 5, 5);
        drag(&mut app, 35, 9);
        app.abort_drag();

        assert_eq!(app.controller().drag_state(), &DragState::Idle);
        // The hover re-parent stands
        assert_eq!(column_tasks(&app, "col-in-progress"), ["task-3", "task-1", "task-4"]);
    }

    #[test]
    fn new_task_button_is_a_stub() {
        let mut app = app();
        down(&mut app, 80, 1);
        assert_eq!(app.status_message(), Some(NEW_TASK_STUB));
        assert_eq!(app.controller().revision(), 0);
    }

    // ==========================================================================
    // Keyboard
    // ==========================================================================

    #[test]
    fn cursor_moves_and_clamps() {
        let mut app = app();
        app.handle_key(key(KeyCode::Char('j')));
        app.handle_key(key(KeyCode::Char('j')));
        assert_eq!(app.selected_task_id(), Some(&tid("task-2")));

        app.handle_key(key(KeyCode::Char('l')));
        app.handle_key(key(KeyCode::Char('l')));
        app.handle_key(key(KeyCode::Char('l')));
        assert_eq!(app.cursor, Cursor { column: 2, row: 0 });
        assert_eq!(app.selected_task_id(), Some(&tid("task-5")));
    }

    #[test]
    fn keyboard_drag_across_and_within_columns() {
        let mut app = app();

        app.handle_key(key(KeyCode::Char(' ')));
        assert!(matches!(app.input_mode(), InputMode::KeyDrag { .. }));
        assert_eq!(app.drop_target().as_deref(), Some("task-2"));

        app.handle_key(key(KeyCode::Char('l')));
        assert_eq!(column_tasks(&app, "col-in-progress"), ["task-1", "task-3", "task-4"]);

        app.handle_key(key(KeyCode::Char('j')));
        assert_eq!(app.drop_target().as_deref(), Some("task-4"));

        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.input_mode(), InputMode::Normal);
        assert_eq!(column_tasks(&app, "col-backlog"), ["task-2"]);
        assert_eq!(column_tasks(&app, "col-in-progress"), ["task-3", "task-1", "task-4"]);
        assert_eq!(app.selected_task_id(), Some(&tid("task-1")));
    }

    #[test]
    fn keyboard_drop_past_last_card_appends() {
        let mut app = app();
        app.handle_key(key(KeyCode::Char(' ')));
        app.handle_key(key(KeyCode::Char('l')));
        app.handle_key(key(KeyCode::Char('l')));
        app.handle_key(key(KeyCode::Char('j')));
        assert_eq!(app.drop_target().as_deref(), Some("col-done"));

        app.handle_key(key(KeyCode::Enter));
        assert_eq!(column_tasks(&app, "col-done"), ["task-5", "task-1"]);
        assert_eq!(column_tasks(&app, "col-in-progress"), ["task-3", "task-4"]);
    }

    #[test]
    fn keyboard_drop_in_place_changes_nothing() {
        let mut app = app();
        app.handle_key(key(KeyCode::Char(' ')));
        app.handle_key(key(KeyCode::Enter));

        assert_eq!(column_tasks(&app, "col-backlog"), ["task-1", "task-2"]);
        assert!(app.status_message().unwrap().contains("stays at"));
    }

    #[test]
    fn escape_cancels_keyboard_drag() {
        let mut app = app();
        app.handle_key(key(KeyCode::Char(' ')));
        app.handle_key(key(KeyCode::Esc));

        assert_eq!(app.input_mode(), InputMode::Normal);
        assert_eq!(app.controller().drag_state(), &DragState::Idle);
        assert_eq!(app.controller().revision(), 0);
    }

    #[test]
    fn mouse_is_ignored_during_keyboard_drag() {
        let mut app = app();
        app.handle_key(key(KeyCode::Char(' ')));
        down(&mut app, 35, 5);
        drag(&mut app, 65, 20);

        assert_eq!(app.pointer_position(), None);
        assert_eq!(app.controller().active_task_id(), Some(&tid("task-1")));
    }

    #[test]
    fn keyboard_pick_up_is_ignored_during_mouse_drag() {
        let mut app = app();
        down(&mut app, 5, 5);
        drag(&mut app, 6, 5);
        assert_eq!(app.controller().active_task_id(), Some(&tid("task-1")));

        app.handle_key(key(KeyCode::Char('j')));
        app.handle_key(key(KeyCode::Char(' ')));
        app.handle_key(key(KeyCode::Enter));

        assert_eq!(app.input_mode(), InputMode::Normal);
        assert_eq!(app.controller().active_task_id(), Some(&tid("task-1")));
        assert_eq!(app.pointer_position(), Some((6, 5)));

        up(&mut app, 6, 5);
        assert!(!app.controller().drag_state().is_dragging());
        assert_eq!(app.pointer_position(), None);
    }

    #[test]
    fn keyboard_pick_up_releases_pending_press() {
        let mut app = app();
        down(&mut app, 5, 5);
        app.handle_key(key(KeyCode::Char(' ')));
        app.handle_key(key(KeyCode::Esc));
        assert_eq!(app.input_mode(), InputMode::Normal);

        drag(&mut app, 65, 20);
        assert_eq!(app.pointer_position(), None);
        assert!(!app.controller().drag_state().is_dragging());
        assert_eq!(column_tasks(&app, "col-backlog"), ["task-1", "task-2"]);
    }

    #[test]
    fn pick_up_on_empty_column_does_nothing() {
        let board = BoardState::new(
            vec![crate::domain::Column::new("col-empty".parse().unwrap(), "Empty")],
            Vec::new(),
        );
        let mut app = App::new(board, TuiConfig::default());
        app.handle_key(key(KeyCode::Char(' ')));

        assert_eq!(app.input_mode(), InputMode::Normal);
        assert_eq!(app.selected_task_id(), None);
    }

    #[test]
    fn quit_keys() {
        let mut app = app();
        app.handle_key(key(KeyCode::Char('q')));
        assert!(app.should_quit);

        let mut app = self::app();
        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit);

        let mut app = self::app();
        app.handle_key(key(KeyCode::Char('n')));
        assert_eq!(app.status_message(), Some(NEW_TASK_STUB));
        assert!(!app.should_quit);
    }
}
