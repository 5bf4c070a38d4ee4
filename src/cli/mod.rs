//! # Command-Line Interface
//!
//! User-facing commands, output formatting and the interactive board.
//!
//! ## Commands
//!
//! | Command | Purpose |
//! |---------|---------|
//! | `tui` (default) | Interactive board with mouse and keyboard drag |
//! | `show` | Print the board |
//! | `check` | Validate a board snapshot |
//! | `drag` | Replay one drag gesture headlessly |
//!
//! ## Output Formats
//!
//! All commands support `--format`:
//! - `text` (default) - Human-readable output
//! - `json` - Machine-parseable JSON
//!
//! ## Verbose Mode
//!
//! Use `--verbose` (or `-v`) for debug output on stderr:
//! ```bash
//! flowtrack --verbose drag task-1 --over col-done --drop col-done
//! ```

mod app;
mod output;
mod board_cmd;
mod tui;

pub use app::{run, Cli, Commands};
pub use output::{Output, OutputFormat};
