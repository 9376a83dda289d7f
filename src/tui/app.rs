//! Application state fed by display events.

use crate::codenames::{DisplayEvent, GameEnding, RevealStyle};
use std::collections::HashMap;
use tracing::debug;

/// What the terminal shows.
#[derive(Debug, Clone)]
pub struct App {
    words: Vec<String>,
    reveals: HashMap<String, RevealStyle>,
    clue_line: String,
    guess_line: String,
    guesses: Vec<String>,
    turn: usize,
    ending: Option<GameEnding>,
}

impl App {
    /// Creates the state for a board shown in `words` order.
    pub fn new(words: Vec<String>) -> Self {
        Self {
            words,
            reveals: HashMap::new(),
            clue_line: "Clue Giver: …".to_string(),
            guess_line: "Guesser: …".to_string(),
            guesses: Vec::new(),
            turn: 0,
            ending: None,
        }
    }

    /// Board words in display order.
    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Reveal style of `word`, if it has been guessed.
    pub fn reveal(&self, word: &str) -> Option<RevealStyle> {
        self.reveals.get(word).copied()
    }

    /// Clue giver's line in the dialog panel.
    pub fn clue_line(&self) -> &str {
        &self.clue_line
    }

    /// Guesser's line in the dialog panel.
    pub fn guess_line(&self) -> &str {
        &self.guess_line
    }

    /// Current turn number, zero before the first clue is requested.
    pub fn turn(&self) -> usize {
        self.turn
    }

    /// How the game ended, once it has.
    pub fn ending(&self) -> Option<&GameEnding> {
        self.ending.as_ref()
    }

    /// Returns true once the game has ended.
    pub fn is_finished(&self) -> bool {
        self.ending.is_some()
    }

    /// Applies one display event.
    pub fn handle_event(&mut self, event: DisplayEvent) {
        debug!(?event, "Handling display event");

        match event {
            DisplayEvent::TurnStarted { turn_index } => {
                self.turn = turn_index;
                self.clue_line = "Clue Giver: …".to_string();
                self.guess_line = "Guesser: …".to_string();
                self.guesses.clear();
            }
            DisplayEvent::ClueRevealed { clue, count } => {
                self.clue_line = format!("Clue Giver: {}, {}", clue, count);
            }
            DisplayEvent::GuessStarted => {
                self.guess_line = "Guesser: Thinking...".to_string();
            }
            DisplayEvent::WordResolved(reveal) => {
                self.guesses.push(reveal.word().clone());
                self.guess_line = format!("Guesser: {}", self.guesses.join(", "));
                self.reveals.insert(reveal.word().clone(), reveal.style());
            }
            DisplayEvent::GameEnded(ending) => {
                self.ending = Some(ending);
            }
        }
    }

    /// Status line text.
    pub fn status(&self) -> String {
        match &self.ending {
            Some(ending) => format!("{} Press any key to exit.", ending),
            None if self.turn == 0 => "Starting game...".to_string(),
            None => format!("Turn {}", self.turn),
        }
    }
}
