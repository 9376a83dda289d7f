//! Strictly Codenames - Unified CLI
//!
//! Plays a game either in the terminal UI or headless.

#![warn(missing_docs)]

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command, GameArgs};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::Arc;
use strictly_codenames::{
    Board, ClueSource, Collaborators, GameConfig, GameSession, GuessSource, LlmClueGiver,
    LlmGuesser, LogDisplay, load_word_pool, tui,
};
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command.unwrap_or(Command::Tui) {
        Command::Tui => run_tui(cli.game).await,
        Command::Headless => run_headless(cli.game).await,
    }
}

/// Everything needed to start a session.
struct Prepared {
    config: GameConfig,
    board: Board,
    clue_source: Arc<dyn ClueSource>,
    guess_source: Arc<dyn GuessSource>,
}

/// Loads config, word pool and agents, then sets up the board.
#[instrument(skip_all, fields(config_path = %args.config.display()))]
fn prepare(args: GameArgs) -> Result<Prepared> {
    let mut config = GameConfig::load_or_default(&args.config)?;
    if let Some(words) = args.words {
        config = config.with_word_file_path(words);
    }
    if let Some(limit) = args.max_thinking_time {
        config = config.with_max_thinking_time_seconds(limit);
    }

    let pool = load_word_pool(config.word_file_path())
        .with_context(|| format!("Failed to load words from {}", config.word_file_path().display()))?;

    let mut rng = match args.seed {
        Some(seed) => {
            info!(seed, "Using seeded board");
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_os_rng(),
    };
    let board = Board::setup(&pool, config.layout(), &mut rng)?;

    let clue_source: Arc<dyn ClueSource> =
        Arc::new(LlmClueGiver::from_config("Clue Giver", config.clue_giver())?);
    let guess_source: Arc<dyn GuessSource> =
        Arc::new(LlmGuesser::from_config("Guesser", config.guesser())?);

    Ok(Prepared {
        config,
        board,
        clue_source,
        guess_source,
    })
}

/// Run the terminal UI
async fn run_tui(args: GameArgs) -> Result<()> {
    tui::init_logging()?;

    let prepared = prepare(args)?;
    let timing = prepared.config.timing()?;

    if let Some(report) = tui::run_tui(
        prepared.board,
        prepared.clue_source,
        prepared.guess_source,
        timing,
    )
    .await?
    {
        println!("{} after {} turn(s)", report.ending(), report.turns_played());
    }
    Ok(())
}

/// Run without a UI
async fn run_headless(args: GameArgs) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(strictly_codenames::DEFAULT_LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .init();

    info!("Starting headless game");

    let prepared = prepare(args)?;
    let timing = prepared.config.timing()?;
    let collaborators = Collaborators::new(
        prepared.clue_source,
        prepared.guess_source,
        Arc::new(LogDisplay),
    );

    let session = GameSession::new(prepared.board, collaborators, timing);
    let stop = session.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupted");
            stop.cancel();
        }
    });

    let report = session.run().await?;
    let clues: Vec<String> = report
        .clue_history()
        .iter()
        .map(ToString::to_string)
        .collect();
    println!(
        "{} after {} turn(s). Clues: {}",
        report.ending(),
        report.turns_played(),
        if clues.is_empty() {
            "none".to_string()
        } else {
            clues.join(" | ")
        }
    );
    Ok(())
}
