//! Strictly Codenames library - cooperative Codenames played by LLM agents
//!
//! One language model gives clues, another guesses, and a turn engine
//! referees the board between them.
//!
//! # Architecture
//!
//! - **Codenames**: board setup, guess rules and the turn engine
//! - **Agents**: clue givers and guessers (LLM-backed or scripted)
//! - **Session**: runs the engine as a background task
//! - **TUI**: terminal frontend fed by display events
//!
//! # Example
//!
//! ```no_run
//! use rand::SeedableRng;
//! use std::sync::Arc;
//! use strictly_codenames::{
//!     Collaborators, GameConfig, GameSession, LlmClueGiver, LlmGuesser, LogDisplay,
//!     load_word_pool,
//! };
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = GameConfig::default();
//! let pool = load_word_pool(config.word_file_path())?;
//! let mut rng = rand::rngs::StdRng::seed_from_u64(7);
//!
//! let collaborators = Collaborators::new(
//!     Arc::new(LlmClueGiver::from_config("Clue Giver", config.clue_giver())?),
//!     Arc::new(LlmGuesser::from_config("Guesser", config.guesser())?),
//!     Arc::new(LogDisplay),
//! );
//! let session = GameSession::setup(&pool, config.layout(), &mut rng, collaborators, config.timing()?)?;
//! let report = session.run().await?;
//! println!("{}", report.ending());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod codenames;
pub mod tui;

// Private module declarations
mod agents;
mod game_config;
mod llm_client;
mod session;

/// Log filter used when `RUST_LOG` is not set.
pub const DEFAULT_LOG_FILTER: &str = "info,strictly_codenames=debug";

// Crate-level exports - Codenames core
pub use codenames::{
    Board, BoardLayout, ChannelDisplay, Clue, ClueGenerationError, ClueRecord, ClueRequest,
    ClueSource, DisplayAdapter, DisplayEvent, EngineTiming, GameEnding, GameOutcome, GameReport,
    GuessGenerationError, GuessRequest, GuessSource, LogDisplay, RevealStyle, SessionFailure,
    TurnEngine, TurnPhase, WordPool, WordPoolError, WordPoolErrorKind, WordReveal, WordRole,
    load_word_pool,
};

// Crate-level exports - Agents
pub use agents::{
    LlmClueGiver, LlmGuesser, ScriptedClueGiver, ScriptedGuesser, build_clue_prompt,
    build_guess_prompt, parse_clue, parse_guesses,
};

// Crate-level exports - Configuration
pub use game_config::{ConfigError, GameConfig, RoleModelConfig};

// Crate-level exports - LLM client
pub use llm_client::{LlmClient, LlmConfig, LlmError, LlmProvider};

// Crate-level exports - Session management
pub use session::{Collaborators, GameSession, SessionError, SessionErrorKind};
