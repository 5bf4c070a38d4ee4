//! Property tests for the reorder engine and the drag controller
//!
//! Random boards are fed random gesture sequences; after every event the
//! board must still be well-formed, with the same columns and tasks.

use flowtrack::domain::{BoardController, BoardState, Column, DragEvent, DragOutcome, Task, TaskId};
use proptest::prelude::*;

const MAX_COLUMNS: usize = 4;
const MAX_TASKS: usize = 8;

fn tid(s: &str) -> TaskId {
    s.parse().unwrap()
}

/// Builds a board where task `i` sits in column `placement[i]`
fn build_board(columns: usize, placement: &[usize]) -> BoardState {
    let mut cols: Vec<Column> = (0..columns)
        .map(|i| Column::new(format!("c{i}").parse().unwrap(), format!("Column {i}")))
        .collect();

    let tasks: Vec<Task> = placement
        .iter()
        .enumerate()
        .map(|(i, &col)| {
            let id = tid(&format!("t{i}"));
            cols[col].task_ids.push(id.clone());
            Task::new(id, format!("Task {i}"))
        })
        .collect();

    BoardState::new(cols, tasks)
}

fn board_strategy() -> impl Strategy<Value = BoardState> {
    (1..=MAX_COLUMNS, 0..=MAX_TASKS).prop_flat_map(|(columns, tasks)| {
        prop::collection::vec(0..columns, tasks)
            .prop_map(move |placement| build_board(columns, &placement))
    })
}

/// Boards with at least one task
fn nonempty_board_strategy() -> impl Strategy<Value = BoardState> {
    (1..=MAX_COLUMNS, 1..=MAX_TASKS).prop_flat_map(|(columns, tasks)| {
        prop::collection::vec(0..columns, tasks)
            .prop_map(move |placement| build_board(columns, &placement))
    })
}

/// Task ids, column ids and ids that exist nowhere
fn id_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        (0..=MAX_TASKS).prop_map(|i| format!("t{i}")),
        (0..=MAX_COLUMNS).prop_map(|i| format!("c{i}")),
        Just("ghost".to_string()),
    ]
}

fn event_strategy() -> impl Strategy<Value = DragEvent> {
    prop_oneof![
        (0..=MAX_TASKS).prop_map(|i| DragEvent::Start(tid(&format!("t{i}")))),
        prop::option::of(id_strategy()).prop_map(DragEvent::Over),
        prop::option::of(id_strategy()).prop_map(DragEvent::End),
        Just(DragEvent::Cancel),
    ]
}

/// Reference drop: take the task out, then insert it where `over` sits (or
/// at the end of the column `over` names)
fn model_drop(board: &BoardState, task: &TaskId, over: &str) -> Vec<Vec<String>> {
    let mut columns: Vec<(String, Vec<String>)> = board
        .columns
        .iter()
        .map(|c| {
            (
                c.id.to_string(),
                c.task_ids
                    .iter()
                    .filter(|id| *id != task)
                    .map(|id| id.to_string())
                    .collect(),
            )
        })
        .collect();

    let (col, index) = columns
        .iter()
        .enumerate()
        .find_map(|(ci, (id, ids))| {
            if id == over {
                Some((ci, ids.len()))
            } else {
                ids.iter().position(|t| t == over).map(|i| (ci, i))
            }
        })
        .expect("over must name a task or a column");
    columns[col].1.insert(index, task.to_string());

    columns.into_iter().map(|(_, ids)| ids).collect()
}

fn layout(board: &BoardState) -> Vec<Vec<String>> {
    board
        .columns
        .iter()
        .map(|c| c.task_ids.iter().map(|id| id.to_string()).collect())
        .collect()
}

proptest! {
    #[test]
    fn gestures_preserve_board_invariants(
        board in board_strategy(),
        events in prop::collection::vec(event_strategy(), 0..24),
    ) {
        let initial = board.clone();
        let mut controller = BoardController::new(board);

        for event in events {
            let outcome = controller.handle(event);
            let current = controller.board();

            prop_assert_eq!(current.validate(), Ok(()), "after {}", outcome);
            prop_assert_eq!(current.column_shape(), initial.column_shape());
            prop_assert_eq!(&current.tasks, &initial.tasks);
            prop_assert_eq!(current.placed_count(), initial.tasks.len());
        }
    }

    #[test]
    fn snapshots_outlive_later_updates(
        board in nonempty_board_strategy(),
        events in prop::collection::vec(event_strategy(), 1..16),
    ) {
        let mut controller = BoardController::new(board.clone());
        let before = controller.snapshot();

        for event in events {
            controller.handle(event);
        }

        prop_assert_eq!(&*before, &board);
    }

    #[test]
    fn dropping_onto_itself_changes_nothing(board in nonempty_board_strategy(), pick in any::<prop::sample::Index>()) {
        let ids: Vec<TaskId> = board.tasks.keys().cloned().collect();
        let task = pick.get(&ids).clone();

        let mut controller = BoardController::new(board.clone());
        controller.handle(DragEvent::Start(task.clone()));
        let outcome = controller.handle(DragEvent::End(Some(task.to_string())));

        prop_assert!(matches!(outcome, DragOutcome::Discarded(_)));
        prop_assert_eq!(controller.board(), &board);
        prop_assert!(!controller.drag_state().is_dragging());
    }

    #[test]
    fn drop_matches_reference_model(
        board in nonempty_board_strategy(),
        pick in any::<prop::sample::Index>(),
        over in id_strategy(),
    ) {
        let ids: Vec<TaskId> = board.tasks.keys().cloned().collect();
        let task = pick.get(&ids).clone();
        prop_assume!(over != task.as_str());
        prop_assume!(board.resolve_target(&over).is_some());

        let expected = model_drop(&board, &task, &over);

        let mut controller = BoardController::new(board);
        controller.handle(DragEvent::Start(task.clone()));
        let outcome = controller.handle(DragEvent::End(Some(over.clone())));

        prop_assert!(matches!(outcome, DragOutcome::Dropped(_)), "got {}", outcome);
        prop_assert_eq!(layout(controller.board()), expected);
    }

    #[test]
    fn hover_then_drop_on_column_appends(
        board in nonempty_board_strategy(),
        pick in any::<prop::sample::Index>(),
        target in 0..MAX_COLUMNS,
    ) {
        let ids: Vec<TaskId> = board.tasks.keys().cloned().collect();
        let task = pick.get(&ids).clone();
        let target = target % board.columns.len();
        let column = board.columns[target].id.to_string();

        let mut controller = BoardController::new(board);
        controller.handle(DragEvent::Start(task.clone()));
        controller.handle(DragEvent::Over(Some(column.clone())));
        controller.handle(DragEvent::End(Some(column)));

        let ids = &controller.board().columns[target].task_ids;
        prop_assert_eq!(ids.last(), Some(&task));
    }
}
