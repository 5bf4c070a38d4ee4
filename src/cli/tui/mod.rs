//! Interactive board
//!
//! Renders the board with ratatui and lets cards be dragged between columns
//! with the mouse or the keyboard. Every move goes through the
//! [`BoardController`](crate::domain::BoardController); nothing is written
//! back to disk.

mod app;
mod event;
mod input;
mod layout;
mod ui;
mod utils;
mod views;

use std::panic::{self, AssertUnwindSafe};

use anyhow::{anyhow, Result};

use super::Output;
use crate::domain::BoardState;
use crate::storage::TuiConfig;
use app::App;
use event::EventHandler;

pub(crate) use utils::truncate_str;

/// Launch the TUI
pub fn run(output: &Output, config: &TuiConfig, board: BoardState) -> Result<()> {
    output.verbose_ctx(
        "tui",
        &format!(
            "Initializing board: {} columns, {} tasks",
            board.columns.len(),
            board.placed_count()
        ),
    );

    let mut app = App::new(board, config.clone());

    // Initialize terminal
    let mut terminal = ui::init_terminal()?;

    let event_handler = EventHandler::new(config.tick_rate_ms);

    // Run the main loop with panic safety
    // This ensures terminal is restored even if the app panics
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        app.run(&mut terminal, event_handler)
    }));

    // Always restore terminal, even on panic
    let restore_result = ui::restore_terminal();

    match result {
        Ok(inner_result) => {
            restore_result?;
            output.verbose_ctx(
                "tui",
                &format!("Exited at revision {}", app.controller().revision()),
            );
            inner_result
        }
        Err(panic_payload) => {
            let _ = restore_result;
            if let Some(s) = panic_payload.downcast_ref::<&str>() {
                Err(anyhow!("TUI panicked: {}", s))
            } else if let Some(s) = panic_payload.downcast_ref::<String>() {
                Err(anyhow!("TUI panicked: {}", s))
            } else {
                Err(anyhow!("TUI panicked with unknown error"))
            }
        }
    }
}
