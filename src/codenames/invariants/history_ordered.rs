//! Clue history ordering.

use super::Invariant;
use crate::codenames::board::Board;

/// Invariant: clue records are numbered 1, 2, 3, ... in append order.
pub struct HistoryOrderedInvariant;

impl Invariant<Board> for HistoryOrderedInvariant {
    fn holds(board: &Board) -> bool {
        board
            .clue_history()
            .iter()
            .enumerate()
            .all(|(i, record)| *record.turn_index() == i + 1)
    }

    fn description() -> &'static str {
        "Clue history turn indices increase by one from 1"
    }
}
