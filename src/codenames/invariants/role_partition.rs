//! Role partition: every board word has exactly one role.

use super::Invariant;
use crate::codenames::board::Board;
use crate::codenames::types::WordRole;
use std::collections::BTreeSet;
use strum::IntoEnumIterator;

/// Invariant: the roles partition the board words exactly.
///
/// Words are unique, and the per-role sets cover the board with no
/// overlaps and no omissions.
pub struct RolePartitionInvariant;

impl Invariant<Board> for RolePartitionInvariant {
    fn holds(board: &Board) -> bool {
        let all: BTreeSet<&String> = board.all_words().iter().collect();
        if all.len() != board.all_words().len() {
            return false;
        }

        let mut covered = 0;
        for role in WordRole::iter() {
            let words = board.words_with_role(role);
            if !words.iter().all(|w| all.contains(w)) {
                return false;
            }
            covered += words.len();
        }

        covered == all.len()
    }

    fn description() -> &'static str {
        "Roles partition the board words exactly"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructed_board_partitions() {
        let board = Board::with_roles([
            ("A", WordRole::Target),
            ("B", WordRole::Neutral),
            ("C", WordRole::Assassin),
            ("D", WordRole::Neutral),
        ])
        .unwrap();
        assert!(RolePartitionInvariant::holds(&board));
    }
}
