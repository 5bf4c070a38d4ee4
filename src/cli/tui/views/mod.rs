//! Views for the TUI

pub mod board;
