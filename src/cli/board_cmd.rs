//! Board commands (show, check, drag)

use anyhow::{Context, Result};

use super::output::Output;
use super::tui::truncate_str;
use crate::domain::{BoardController, BoardState, DragEvent, DragOutcome, TaskId};
use crate::storage::BoardSource;

/// Print the board
pub fn show(output: &Output, board: &BoardState) -> Result<()> {
    if output.is_json() {
        output.data(board);
    } else {
        print_board(board);
    }

    Ok(())
}

/// Report that the loaded board satisfies the board invariants.
///
/// Loading already rejects invalid snapshots, so reaching this point means
/// the board is well-formed; validate once more against the in-memory value.
pub fn check(output: &Output, board: &BoardState, source: &BoardSource) -> Result<()> {
    board
        .validate()
        .with_context(|| format!("Board from {} is invalid", source))?;

    output.verbose_ctx(
        "check",
        &format!(
            "{} columns, {} tasks, {} placements",
            board.columns.len(),
            board.tasks.len(),
            board.placed_count()
        ),
    );

    if output.is_json() {
        output.data(&serde_json::json!({
            "valid": true,
            "source": source.to_string(),
            "columns": board.columns.len(),
            "tasks": board.tasks.len(),
        }));
    } else {
        output.success(&format!(
            "Board OK: {} columns, {} tasks ({})",
            board.columns.len(),
            board.tasks.len(),
            source
        ));
    }

    Ok(())
}

/// The event sequence for one scripted gesture
pub fn gesture(task: TaskId, overs: &[String], drop: Option<&str>, cancel: bool) -> Vec<DragEvent> {
    let mut events = Vec::with_capacity(overs.len() + 2);
    events.push(DragEvent::Start(task));
    events.extend(overs.iter().map(|id| DragEvent::Over(Some(id.clone()))));
    events.push(if cancel {
        DragEvent::Cancel
    } else {
        DragEvent::End(drop.map(str::to_string))
    });
    events
}

/// Replay one drag gesture against the board and print the result
pub fn drag(
    output: &Output,
    board: BoardState,
    task: &str,
    overs: &[String],
    drop: Option<&str>,
    cancel: bool,
) -> Result<()> {
    let task_id: TaskId = task.parse()?;
    let mut controller = BoardController::new(board);

    let mut outcomes: Vec<DragOutcome> = Vec::new();
    for event in gesture(task_id, overs, drop, cancel) {
        output.verbose_ctx("drag", &format!("{:?}", event));
        let outcome = controller.handle(event);
        output.verbose_ctx("drag", &outcome.to_string());
        outcomes.push(outcome);
    }

    let moved = outcomes.iter().any(DragOutcome::moved);
    output.verbose_ctx(
        "drag",
        &format!("{} committed updates", controller.revision()),
    );

    if output.is_json() {
        let events: Vec<String> = outcomes.iter().map(ToString::to_string).collect();
        output.data(&serde_json::json!({
            "events": events,
            "moved": moved,
            "board": controller.board(),
        }));
    } else {
        for outcome in &outcomes {
            println!("{}", outcome);
        }
        println!();
        print_board(controller.board());
    }

    Ok(())
}

/// Text rendering: one block per column, tasks in order
fn print_board(board: &BoardState) {
    for (i, column) in board.columns.iter().enumerate() {
        if i > 0 {
            println!();
        }
        println!("{} ({}) [{}]", column.title, column.len(), column.id);
        println!("{}", "-".repeat(60));

        if column.is_empty() {
            println!("  (empty)");
            continue;
        }

        for task in board.tasks_in(column) {
            let meta: Vec<&str> = [task.assignee.as_deref(), task.due_date.as_deref()]
                .into_iter()
                .flatten()
                .collect();
            println!(
                "  {:<12} {:<36} {}",
                task.id,
                truncate_str(&task.title, 36),
                meta.join(", ")
            );
        }
    }
}
