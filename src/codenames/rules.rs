//! Guess resolution rules.
//!
//! Each guess is resolved on its own against the board. The caller feeds
//! guesses one at a time and stops as soon as a verdict says the turn or
//! the game is over.

use super::board::Board;
use super::types::{GameOutcome, WordReveal, WordRole};
use tracing::{debug, info, instrument};

/// Per-turn bookkeeping for guess resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnTally {
    clue_count: usize,
    successful: usize,
}

impl TurnTally {
    /// Starts a tally for a clue that promised `clue_count` targets.
    pub fn new(clue_count: usize) -> Self {
        Self {
            clue_count,
            successful: 0,
        }
    }

    /// Correct guesses so far this turn.
    pub fn successful(&self) -> usize {
        self.successful
    }

    /// Largest number of guesses the turn can use: the clue count plus one bonus.
    pub fn max_guesses(&self) -> usize {
        self.clue_count.saturating_add(1)
    }

    fn bonus_consumed(&self) -> bool {
        self.successful > self.clue_count
    }
}

/// What resolving a single guess did to the turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuessVerdict {
    /// The word was not on the table; nothing changed.
    Skipped,
    /// A target was found and the guesser may keep going.
    Continue(WordReveal),
    /// The turn is over: a neutral word was hit or the bonus guess is spent.
    EndTurn(WordReveal),
    /// The game is over.
    GameOver {
        /// The word that ended the game.
        reveal: WordReveal,
        /// Final outcome.
        outcome: GameOutcome,
    },
}

impl GuessVerdict {
    /// Returns the reveal carried by this verdict, if any.
    pub fn reveal(&self) -> Option<&WordReveal> {
        match self {
            Self::Skipped => None,
            Self::Continue(reveal) | Self::EndTurn(reveal) => Some(reveal),
            Self::GameOver { reveal, .. } => Some(reveal),
        }
    }
}

/// Resolves one guess against the board.
///
/// Words already picked, or not on the board at all, are skipped without
/// touching any state. Otherwise the word is removed from the unguessed set
/// and:
/// - an assassin loses the game,
/// - a target is claimed, winning the game if it was the last one and ending
///   the turn once the bonus guess has been used,
/// - a neutral word ends the turn.
#[instrument(skip(board, tally), fields(successful = tally.successful))]
pub fn resolve_guess(board: &mut Board, word: &str, tally: &mut TurnTally) -> GuessVerdict {
    let Some(role) = board.take_unguessed(word) else {
        debug!("Guess skipped, word not available");
        return GuessVerdict::Skipped;
    };
    let reveal = WordReveal::new(word, role);

    match role {
        WordRole::Assassin => {
            info!("Assassin picked");
            GuessVerdict::GameOver {
                reveal,
                outcome: GameOutcome::LostAssassin,
            }
        }
        WordRole::Target => {
            board.claim_target(word);
            tally.successful += 1;

            if board.all_targets_found() {
                info!("Last target found");
                GuessVerdict::GameOver {
                    reveal,
                    outcome: GameOutcome::Won,
                }
            } else if tally.bonus_consumed() {
                debug!("Bonus guess used, turn over");
                GuessVerdict::EndTurn(reveal)
            } else {
                GuessVerdict::Continue(reveal)
            }
        }
        WordRole::Neutral => {
            debug!("Neutral word picked, turn over");
            GuessVerdict::EndTurn(reveal)
        }
    }
}
