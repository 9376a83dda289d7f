//! Command-line interface for strictly_codenames.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Strictly Codenames - two language models play cooperative Codenames
#[derive(Parser, Debug)]
#[command(name = "strictly_codenames")]
#[command(about = "Watch an LLM clue giver and an LLM guesser play Codenames", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Settings shared by every mode
    #[command(flatten)]
    pub game: GameArgs,

    /// Subcommand to run (defaults to the terminal UI)
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Game settings that override the config file.
#[derive(Args, Debug, Clone)]
pub struct GameArgs {
    /// Path to the game config file (defaults are used if it is missing)
    #[arg(short, long, global = true, default_value = "codenames.toml")]
    pub config: PathBuf,

    /// Word list to draw the board from
    #[arg(short, long, global = true)]
    pub words: Option<PathBuf>,

    /// Seed for a reproducible board
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    /// Time limit in seconds for each clue or guess
    #[arg(long, global = true)]
    pub max_thinking_time: Option<f64>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Play in the terminal UI
    Tui,

    /// Play without a UI, logging each event
    Headless,
}
