//! Cooperative Codenames: board, rules, and the turn engine.

mod board;
mod display;
mod engine;
pub mod invariants;
mod oracle;
mod rules;
mod types;
mod word_pool;

pub use board::{Board, BoardLayout};
pub use display::{ChannelDisplay, DisplayAdapter, DisplayEvent, GameEnding, LogDisplay};
pub use engine::{EngineTiming, GameReport, SessionFailure, TurnEngine, TurnPhase};
pub use oracle::{
    ClueGenerationError, ClueRequest, ClueSource, GuessGenerationError, GuessRequest, GuessSource,
};
pub use rules::{GuessVerdict, TurnTally, resolve_guess};
pub use types::{Clue, ClueRecord, GameOutcome, RevealStyle, WordReveal, WordRole};
pub use word_pool::{WordPool, WordPoolError, WordPoolErrorKind, load_word_pool, normalize_word};
