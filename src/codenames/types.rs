//! Core domain types for cooperative Codenames.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Hidden role of a word on the board.
///
/// Assigned once at setup and never changed afterwards.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum WordRole {
    /// A word the team must find.
    Target,
    /// A bystander; picking it ends the turn.
    Neutral,
    /// Picking it loses the game immediately.
    Assassin,
}

impl WordRole {
    /// Returns the visual style used when a word with this role is revealed.
    #[instrument]
    pub fn reveal_style(self) -> RevealStyle {
        match self {
            Self::Target => RevealStyle::Correct,
            Self::Neutral => RevealStyle::Wrong,
            Self::Assassin => RevealStyle::Assassin,
        }
    }
}

/// How a revealed word is highlighted on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum RevealStyle {
    /// The guess hit a target word.
    Correct,
    /// The guess hit a neutral word.
    Wrong,
    /// The guess hit an assassin.
    Assassin,
}

/// A word whose role has just been revealed by a guess.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Getters, Serialize, Deserialize)]
pub struct WordReveal {
    word: String,
    role: WordRole,
}

impl WordReveal {
    /// Creates a reveal for `word` with its true role.
    pub fn new(word: impl Into<String>, role: WordRole) -> Self {
        Self {
            word: word.into(),
            role,
        }
    }

    /// Returns the highlight style for this reveal.
    pub fn style(&self) -> RevealStyle {
        self.role.reveal_style()
    }
}

/// A clue as produced by the clue giver: one word plus a target count.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Getters, Serialize, Deserialize)]
pub struct Clue {
    word: String,
    count: usize,
}

impl Clue {
    /// Creates a new clue.
    pub fn new(word: impl Into<String>, count: usize) -> Self {
        Self {
            word: word.into(),
            count,
        }
    }
}

/// A clue that was given during the game.
///
/// Records are appended once per turn and never modified.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Getters, Serialize, Deserialize)]
pub struct ClueRecord {
    clue_word: String,
    target_count: usize,
    /// One-based index of the turn the clue was given in.
    turn_index: usize,
}

impl ClueRecord {
    pub(crate) fn new(clue_word: impl Into<String>, target_count: usize, turn_index: usize) -> Self {
        Self {
            clue_word: clue_word.into(),
            target_count,
            turn_index,
        }
    }
}

impl std::fmt::Display for ClueRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}, {}", self.clue_word, self.target_count)
    }
}

/// Outcome of a game.
///
/// Once an outcome other than [`GameOutcome::InProgress`] is reached it never changes.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, strum::Display,
)]
pub enum GameOutcome {
    /// The game is still being played.
    #[default]
    #[strum(to_string = "In progress")]
    InProgress,
    /// Every target word was found.
    #[strum(to_string = "Won")]
    Won,
    /// An assassin was picked.
    #[strum(to_string = "Lost to the assassin")]
    LostAssassin,
    /// A collaborator failed, timed out, or the session was cancelled.
    #[strum(to_string = "Aborted on error")]
    AbortedOnError,
}

impl GameOutcome {
    /// Returns true if the game has finished.
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::InProgress)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reveal_styles_follow_roles() {
        assert_eq!(WordRole::Target.reveal_style(), RevealStyle::Correct);
        assert_eq!(WordRole::Neutral.reveal_style(), RevealStyle::Wrong);
        assert_eq!(WordRole::Assassin.reveal_style(), RevealStyle::Assassin);
    }

    #[test]
    fn test_only_in_progress_is_open() {
        assert!(!GameOutcome::InProgress.is_terminal());
        assert!(GameOutcome::Won.is_terminal());
        assert!(GameOutcome::LostAssassin.is_terminal());
        assert!(GameOutcome::AbortedOnError.is_terminal());
    }

    #[test]
    fn test_clue_record_display() {
        let record = ClueRecord::new("OCEAN", 3, 1);
        assert_eq!(record.to_string(), "OCEAN, 3");
    }
}
