//! Main CLI application structure

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use super::board_cmd;
use super::output::{Output, OutputFormat};
use super::tui;
use crate::storage::{load_initial_board, Config};

#[derive(Parser)]
#[command(name = "flowtrack")]
#[command(author, version, about = "Terminal kanban board with drag-and-drop reordering")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (defaults to the configured format, then text)
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Board snapshot to load (JSON or YAML)
    #[arg(long, short = 'b', global = true, env = "FLOWTRACK_BOARD")]
    pub board: Option<PathBuf>,

    /// Configuration file
    #[arg(long, global = true, env = "FLOWTRACK_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Open the interactive board (default)
    Tui,

    /// Print the board
    Show,

    /// Validate the board snapshot
    Check,

    /// Replay one drag gesture and print the resulting board
    Drag {
        /// Task to pick up
        task: String,

        /// Ids hovered during the drag, in order (tasks or columns)
        #[arg(long = "over", value_name = "ID")]
        over: Vec<String>,

        /// Id to drop on; omit to release over nothing
        #[arg(long, value_name = "ID", conflicts_with = "cancel")]
        drop: Option<String>,

        /// Abort the gesture instead of dropping
        #[arg(long)]
        cancel: bool,
    },
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref())?;
    let format = cli.format.or(config.default_format).unwrap_or_default();
    let output = Output::new(format, cli.verbose);

    output.verbose("FlowTrack starting");
    match &config.source {
        Some(path) => output.verbose_ctx("config", &format!("Loaded {}", path.display())),
        None => output.verbose_ctx("config", "Using default configuration"),
    }

    let (board, source) = load_initial_board(cli.board.as_deref(), &config)?;
    output.verbose_ctx(
        "board",
        &format!(
            "Loaded {}: {} columns, {} tasks",
            source,
            board.columns.len(),
            board.tasks.len()
        ),
    );

    match cli.command.unwrap_or(Commands::Tui) {
        Commands::Tui => tui::run(&output, &config.tui, board)?,
        Commands::Show => board_cmd::show(&output, &board)?,
        Commands::Check => board_cmd::check(&output, &board, &source)?,
        Commands::Drag {
            task,
            over,
            drop,
            cancel,
        } => board_cmd::drag(&output, board, &task, &over, drop.as_deref(), cancel)?,
    }

    output.verbose("Command completed successfully");
    Ok(())
}
