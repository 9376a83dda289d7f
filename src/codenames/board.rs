//! Board state and board setup.
//!
//! A [`Board`] owns the hidden role of every word plus the two shrinking
//! sets the turn engine works against: words nobody has picked yet, and
//! target words not yet found.

use super::types::{Clue, ClueRecord, WordRole};
use super::word_pool::{WordPool, WordPoolError, WordPoolErrorKind, normalize_word};
use derive_getters::Getters;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, info, instrument};

/// Role counts for a board.
///
/// The neutral count is whatever remains after targets and assassins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct BoardLayout {
    total_count: usize,
    target_count: usize,
    assassin_count: usize,
}

impl BoardLayout {
    /// Creates a layout from explicit counts.
    pub fn new(total_count: usize, target_count: usize, assassin_count: usize) -> Self {
        Self {
            total_count,
            target_count,
            assassin_count,
        }
    }

    /// Number of neutral words on the board.
    pub fn neutral_count(&self) -> usize {
        self.total_count
            .saturating_sub(self.target_count + self.assassin_count)
    }

    /// Checks that the role counts fit the board.
    ///
    /// # Errors
    ///
    /// Returns [`WordPoolErrorKind::InvalidLayout`] when there are no targets or
    /// when targets and assassins do not fit in the board.
    #[instrument]
    pub fn validate(&self) -> Result<(), WordPoolError> {
        if self.target_count == 0 {
            return Err(WordPoolError::new(WordPoolErrorKind::InvalidLayout(
                "board needs at least one target word".to_string(),
            )));
        }
        if self.target_count + self.assassin_count > self.total_count {
            return Err(WordPoolError::new(WordPoolErrorKind::InvalidLayout(format!(
                "{} targets and {} assassins do not fit in {} words",
                self.target_count, self.assassin_count, self.total_count
            ))));
        }
        Ok(())
    }
}

impl Default for BoardLayout {
    fn default() -> Self {
        Self::new(16, 8, 2)
    }
}

/// The authoritative game state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    /// All words in display order.
    words: Vec<String>,
    roles: HashMap<String, WordRole>,
    unguessed: BTreeSet<String>,
    remaining_targets: BTreeSet<String>,
    clue_history: Vec<ClueRecord>,
}

impl Board {
    /// Draws and role-assigns a fresh board from `pool`.
    ///
    /// Words are drawn uniformly without replacement. The first
    /// `target_count` drawn become targets, the next `assassin_count`
    /// assassins, the rest neutral. Display order comes from a second,
    /// independent shuffle so position on the board says nothing about role.
    ///
    /// # Errors
    ///
    /// Returns [`WordPoolError`] if the layout is invalid or the pool holds
    /// fewer than `total_count` unique words.
    #[instrument(skip(pool, rng), fields(pool_size = pool.len()))]
    pub fn setup<R: Rng + ?Sized>(
        pool: &WordPool,
        layout: BoardLayout,
        rng: &mut R,
    ) -> Result<Self, WordPoolError> {
        layout.validate()?;

        let required = layout.total_count;
        if pool.len() < required {
            return Err(WordPoolError::new(WordPoolErrorKind::InsufficientWords {
                found: pool.len(),
                required,
            }));
        }

        let mut candidates: Vec<&String> = pool.words().iter().collect();
        let (drawn, _) = candidates.partial_shuffle(rng, required);

        let assignments: Vec<(String, WordRole)> = drawn
            .iter()
            .enumerate()
            .map(|(i, word)| {
                let role = if i < layout.target_count {
                    WordRole::Target
                } else if i < layout.target_count + layout.assassin_count {
                    WordRole::Assassin
                } else {
                    WordRole::Neutral
                };
                ((*word).clone(), role)
            })
            .collect();

        let mut display_order = assignments;
        display_order.shuffle(rng);

        let board = Self::with_roles(display_order)?;
        info!(
            words = board.words.len(),
            targets = board.remaining_targets.len(),
            "Board set up"
        );
        Ok(board)
    }

    /// Builds a board from explicit `(word, role)` pairs in display order.
    ///
    /// Words are normalized to uppercase.
    ///
    /// # Errors
    ///
    /// Returns [`WordPoolErrorKind::InvalidLayout`] for blank or repeated words.
    #[instrument(skip(assignments))]
    pub fn with_roles<I, S>(assignments: I) -> Result<Self, WordPoolError>
    where
        I: IntoIterator<Item = (S, WordRole)>,
        S: AsRef<str>,
    {
        let mut words = Vec::new();
        let mut roles = HashMap::new();

        for (raw, role) in assignments {
            let word = normalize_word(raw.as_ref()).ok_or_else(|| {
                WordPoolError::new(WordPoolErrorKind::InvalidLayout(
                    "blank word on board".to_string(),
                ))
            })?;
            if roles.insert(word.clone(), role).is_some() {
                return Err(WordPoolError::new(WordPoolErrorKind::InvalidLayout(
                    format!("word {} appears twice", word),
                )));
            }
            words.push(word);
        }

        let unguessed = words.iter().cloned().collect();
        let remaining_targets = words
            .iter()
            .filter(|w| roles.get(*w) == Some(&WordRole::Target))
            .cloned()
            .collect();

        Ok(Self {
            words,
            roles,
            unguessed,
            remaining_targets,
            clue_history: Vec::new(),
        })
    }

    /// Returns all words in display order.
    pub fn all_words(&self) -> &[String] {
        &self.words
    }

    /// Returns the hidden role of `word`, if it is on the board.
    pub fn role_of(&self, word: &str) -> Option<WordRole> {
        self.roles.get(word).copied()
    }

    /// Returns every word with the given role, sorted.
    pub fn words_with_role(&self, role: WordRole) -> BTreeSet<String> {
        self.roles
            .iter()
            .filter(|(_, r)| **r == role)
            .map(|(w, _)| w.clone())
            .collect()
    }

    /// Returns the neutral words.
    pub fn neutral_words(&self) -> BTreeSet<String> {
        self.words_with_role(WordRole::Neutral)
    }

    /// Returns the assassin words.
    pub fn assassin_words(&self) -> BTreeSet<String> {
        self.words_with_role(WordRole::Assassin)
    }

    /// Words nobody has picked yet.
    pub fn unguessed_words(&self) -> &BTreeSet<String> {
        &self.unguessed
    }

    /// Returns true if `word` is still on the table.
    pub fn is_unguessed(&self, word: &str) -> bool {
        self.unguessed.contains(word)
    }

    /// Target words that have not been found yet.
    pub fn remaining_targets(&self) -> &BTreeSet<String> {
        &self.remaining_targets
    }

    /// Clues given so far, oldest first.
    pub fn clue_history(&self) -> &[ClueRecord] {
        &self.clue_history
    }

    /// Returns true once every target has been found.
    pub fn all_targets_found(&self) -> bool {
        self.remaining_targets.is_empty()
    }

    /// Removes `word` from the unguessed set and returns its role.
    ///
    /// Returns `None` if the word is not on the board or was already picked,
    /// which is what makes guesses idempotent.
    pub(crate) fn take_unguessed(&mut self, word: &str) -> Option<WordRole> {
        if !self.unguessed.remove(word) {
            return None;
        }
        let role = self.role_of(word);
        debug!(word, ?role, "Word picked");
        role
    }

    /// Marks a target as found. Returns false if it was not outstanding.
    pub(crate) fn claim_target(&mut self, word: &str) -> bool {
        self.remaining_targets.remove(word)
    }

    /// Appends a clue to the history and returns the stored record.
    pub(crate) fn record_clue(&mut self, clue: &Clue) -> ClueRecord {
        let record = ClueRecord::new(
            clue.word().clone(),
            *clue.count(),
            self.clue_history.len() + 1,
        );
        self.clue_history.push(record.clone());
        record
    }
}
