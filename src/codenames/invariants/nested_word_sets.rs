//! Nested word sets: remaining targets ⊆ unguessed words ⊆ all words.

use super::Invariant;
use crate::codenames::board::Board;
use crate::codenames::types::WordRole;

/// Invariant: the shrinking sets stay nested inside each other.
///
/// Every remaining target is still unguessed and really is a target, and
/// every unguessed word is on the board.
pub struct NestedWordSetsInvariant;

impl Invariant<Board> for NestedWordSetsInvariant {
    fn holds(board: &Board) -> bool {
        let targets_nested = board.remaining_targets().iter().all(|w| {
            board.is_unguessed(w) && board.role_of(w) == Some(WordRole::Target)
        });
        let unguessed_nested = board
            .unguessed_words()
            .iter()
            .all(|w| board.all_words().contains(w));

        targets_nested && unguessed_nested
    }

    fn description() -> &'static str {
        "Remaining targets are unguessed, unguessed words are on the board"
    }
}
