//! Word pool loading and normalization.

use derive_more::{Display, Error};
use std::collections::BTreeSet;
use std::path::Path;
use tracing::{debug, info, instrument, warn};

/// Normalizes a raw word: trims whitespace and uppercases it.
///
/// Returns `None` for blank input.
pub fn normalize_word(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_uppercase())
    }
}

/// A set of unique, uppercase candidate words for the board.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordPool {
    words: BTreeSet<String>,
}

impl WordPool {
    /// Builds a pool from raw words, deduplicating case-insensitively.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words = words
            .into_iter()
            .filter_map(|w| normalize_word(w.as_ref()))
            .collect();
        Self { words }
    }

    /// Returns the words in sorted order.
    pub fn words(&self) -> &BTreeSet<String> {
        &self.words
    }

    /// Returns the number of unique words.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Returns true if the pool has no words.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Loads a newline-delimited word file into a [`WordPool`].
///
/// Blank lines are skipped, each line is trimmed and uppercased, and
/// duplicates are dropped case-insensitively.
///
/// # Errors
///
/// Returns [`WordPoolError`] if the file cannot be read.
#[instrument(skip(path), fields(path = %path.as_ref().display()))]
pub fn load_word_pool(path: impl AsRef<Path>) -> Result<WordPool, WordPoolError> {
    let path = path.as_ref();
    debug!("Loading word pool");

    let content = std::fs::read_to_string(path).map_err(|e| {
        warn!(error = %e, "Word file unreadable");
        WordPoolError::new(WordPoolErrorKind::Unreadable {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    })?;

    let pool = WordPool::from_words(content.lines());
    info!(words = pool.len(), "Word pool loaded");
    Ok(pool)
}

/// What went wrong while preparing words for a board.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum WordPoolErrorKind {
    /// The word file could not be read.
    #[display("Failed to read word file {path}: {reason}")]
    Unreadable {
        /// Path that was attempted.
        path: String,
        /// Underlying I/O error text.
        reason: String,
    },
    /// The pool is smaller than the board.
    #[display("Word pool has {found} unique words but the board needs {required}")]
    InsufficientWords {
        /// Unique words available.
        found: usize,
        /// Words needed for the board.
        required: usize,
    },
    /// Role counts do not fit the board, or a word was assigned twice.
    #[display("Invalid board layout: {_0}")]
    InvalidLayout(String),
}

/// Error raised while loading words or setting up a board.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("Word pool error: {} at {}:{}", kind, file, line)]
pub struct WordPoolError {
    /// What went wrong.
    pub kind: WordPoolErrorKind,
    /// Line number where the error occurred.
    pub line: u32,
    /// Source file where the error occurred.
    pub file: &'static str,
}

impl WordPoolError {
    /// Creates a new word pool error with caller location tracking.
    #[track_caller]
    #[instrument(skip(kind))]
    pub fn new(kind: WordPoolErrorKind) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            kind,
            line: loc.line(),
            file: loc.file(),
        }
    }

    /// Returns the error kind.
    pub fn kind(&self) -> &WordPoolErrorKind {
        &self.kind
    }
}
