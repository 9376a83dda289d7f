//! Contracts for the two role oracles: the clue giver and the guesser.
//!
//! The turn engine treats both as untrusted, long-running async calls.
//! Implementations live elsewhere (LLM-backed agents, scripted test doubles).

use super::board::Board;
use super::types::{Clue, ClueRecord};
use derive_getters::Getters;
use derive_more::{Display, Error};
use std::collections::BTreeSet;
use tracing::{error, instrument};

/// Everything the clue giver is allowed to see.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct ClueRequest {
    target_words: BTreeSet<String>,
    neutral_words: BTreeSet<String>,
    assassin_words: BTreeSet<String>,
    clue_history: Vec<ClueRecord>,
}

impl ClueRequest {
    /// Creates a request from explicit word sets.
    pub fn new(
        target_words: BTreeSet<String>,
        neutral_words: BTreeSet<String>,
        assassin_words: BTreeSet<String>,
        clue_history: Vec<ClueRecord>,
    ) -> Self {
        Self {
            target_words,
            neutral_words,
            assassin_words,
            clue_history,
        }
    }

    /// Snapshots the current board: outstanding targets, all neutral and
    /// assassin words, and every clue given so far.
    pub fn from_board(board: &Board) -> Self {
        Self::new(
            board.remaining_targets().clone(),
            board.neutral_words(),
            board.assassin_words(),
            board.clue_history().to_vec(),
        )
    }
}

/// Everything the guesser is allowed to see.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct GuessRequest {
    clue_word: String,
    target_count: usize,
    candidate_words: BTreeSet<String>,
}

impl GuessRequest {
    /// Creates a guess request.
    pub fn new(
        clue_word: impl Into<String>,
        target_count: usize,
        candidate_words: BTreeSet<String>,
    ) -> Self {
        Self {
            clue_word: clue_word.into(),
            target_count,
            candidate_words,
        }
    }
}

/// Produces clues from the clue giver's view of the board.
///
/// The returned count should not exceed the number of target words. The
/// clue word should not be a board word; the engine does not check this.
#[async_trait::async_trait]
pub trait ClueSource: Send + Sync {
    /// Generates the next clue.
    async fn give_clue(&self, request: &ClueRequest) -> Result<Clue, ClueGenerationError>;

    /// Returns the display name of this clue giver.
    fn name(&self) -> &str;
}

/// Produces an ordered list of guesses for a clue.
///
/// Guesses should come from the candidate words and number at most the
/// clue count plus one. The engine filters anything else.
#[async_trait::async_trait]
pub trait GuessSource: Send + Sync {
    /// Generates guesses, most confident first.
    async fn guess(&self, request: &GuessRequest) -> Result<Vec<String>, GuessGenerationError>;

    /// Returns the display name of this guesser.
    fn name(&self) -> &str;
}

/// The clue giver failed or timed out.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("Clue generation failed: {} at {}:{}", message, file, line)]
pub struct ClueGenerationError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ClueGenerationError {
    /// Creates a new clue generation error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        let message = message.into();
        error!(error_message = %message, "Clue generation error created");
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

/// The guesser failed or timed out.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("Guess generation failed: {} at {}:{}", message, file, line)]
pub struct GuessGenerationError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl GuessGenerationError {
    /// Creates a new guess generation error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        let message = message.into();
        error!(error_message = %message, "Guess generation error created");
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
