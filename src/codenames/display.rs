//! Display adapter contract between the turn engine and a UI.
//!
//! The engine calls an adapter synchronously at fixed points in a turn.
//! Adapters must return immediately; anything slow (drawing, I/O across
//! threads) is the adapter's job to queue elsewhere.

use super::engine::SessionFailure;
use super::types::{GameOutcome, WordReveal};
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

/// How a game ended, as shown to the player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEnding {
    /// All targets were found.
    Won,
    /// An assassin was picked.
    LostAssassin,
    /// The session stopped because of an error or cancellation.
    Aborted(SessionFailure),
}

impl GameEnding {
    /// Returns the terminal outcome this ending corresponds to.
    pub fn outcome(&self) -> GameOutcome {
        match self {
            Self::Won => GameOutcome::Won,
            Self::LostAssassin => GameOutcome::LostAssassin,
            Self::Aborted(_) => GameOutcome::AbortedOnError,
        }
    }
}

impl std::fmt::Display for GameEnding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Won => write!(f, "Win!"),
            Self::LostAssassin => write!(f, "The assassin was picked. Game lost."),
            Self::Aborted(failure) => write!(f, "Game aborted: {}", failure),
        }
    }
}

/// Receives game progress from the turn engine.
pub trait DisplayAdapter: Send + Sync {
    /// A new turn is starting; the clue giver is thinking.
    fn on_turn_started(&self, _turn_index: usize) {}

    /// The clue giver produced a clue.
    fn on_clue_revealed(&self, clue: &str, count: usize);

    /// The guesser is about to think about the clue.
    fn on_guess_started(&self);

    /// A single guess was resolved against the board.
    fn on_word_resolved(&self, reveal: &WordReveal);

    /// The game is over. Called exactly once per session.
    fn on_game_ended(&self, ending: &GameEnding);
}

/// A display update as an owned value, for handing across tasks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayEvent {
    /// A new turn started.
    TurnStarted {
        /// One-based turn number.
        turn_index: usize,
    },
    /// A clue was given.
    ClueRevealed {
        /// Clue word.
        clue: String,
        /// Number of targets the clue points at.
        count: usize,
    },
    /// The guesser is thinking.
    GuessStarted,
    /// One guess was resolved.
    WordResolved(WordReveal),
    /// The game ended.
    GameEnded(GameEnding),
}

/// Adapter that forwards every call as a [`DisplayEvent`] over a channel.
///
/// This is how the engine task talks to a UI running elsewhere: sends never
/// block, and a UI that has gone away is simply ignored.
#[derive(Debug, Clone)]
pub struct ChannelDisplay {
    tx: mpsc::UnboundedSender<DisplayEvent>,
}

impl ChannelDisplay {
    /// Wraps an existing sender.
    pub fn new(tx: mpsc::UnboundedSender<DisplayEvent>) -> Self {
        Self { tx }
    }

    /// Creates an adapter together with the receiving end.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<DisplayEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }

    fn send(&self, event: DisplayEvent) {
        if let Err(e) = self.tx.send(event) {
            debug!(event = ?e.0, "Display receiver gone, dropping event");
        }
    }
}

impl DisplayAdapter for ChannelDisplay {
    fn on_turn_started(&self, turn_index: usize) {
        self.send(DisplayEvent::TurnStarted { turn_index });
    }

    fn on_clue_revealed(&self, clue: &str, count: usize) {
        self.send(DisplayEvent::ClueRevealed {
            clue: clue.to_string(),
            count,
        });
    }

    fn on_guess_started(&self) {
        self.send(DisplayEvent::GuessStarted);
    }

    fn on_word_resolved(&self, reveal: &WordReveal) {
        self.send(DisplayEvent::WordResolved(reveal.clone()));
    }

    fn on_game_ended(&self, ending: &GameEnding) {
        self.send(DisplayEvent::GameEnded(ending.clone()));
    }
}

/// Adapter that writes progress to the log. Used by headless runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogDisplay;

impl DisplayAdapter for LogDisplay {
    #[instrument(skip(self))]
    fn on_turn_started(&self, turn_index: usize) {
        info!(turn = turn_index, "Clue Giver: …");
    }

    #[instrument(skip(self))]
    fn on_clue_revealed(&self, clue: &str, count: usize) {
        info!("Clue Giver: {}, {}", clue, count);
    }

    #[instrument(skip(self))]
    fn on_guess_started(&self) {
        info!("Guesser: Thinking...");
    }

    #[instrument(skip(self), fields(word = %reveal.word(), role = %reveal.role()))]
    fn on_word_resolved(&self, reveal: &WordReveal) {
        info!(style = %reveal.style(), "Guesser picked {}", reveal.word());
    }

    #[instrument(skip(self))]
    fn on_game_ended(&self, ending: &GameEnding) {
        match ending {
            GameEnding::Aborted(_) => warn!("{}", ending),
            _ => info!("{}", ending),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codenames::types::WordRole;

    #[test]
    fn test_channel_display_forwards_in_order() {
        let (display, mut rx) = ChannelDisplay::channel();

        display.on_turn_started(1);
        display.on_clue_revealed("FRUIT", 2);
        display.on_guess_started();
        display.on_word_resolved(&WordReveal::new("APPLE", WordRole::Target));
        display.on_game_ended(&GameEnding::Won);

        assert_eq!(rx.try_recv().unwrap(), DisplayEvent::TurnStarted { turn_index: 1 });
        assert_eq!(
            rx.try_recv().unwrap(),
            DisplayEvent::ClueRevealed {
                clue: "FRUIT".to_string(),
                count: 2
            }
        );
        assert_eq!(rx.try_recv().unwrap(), DisplayEvent::GuessStarted);
        assert_eq!(
            rx.try_recv().unwrap(),
            DisplayEvent::WordResolved(WordReveal::new("APPLE", WordRole::Target))
        );
        assert_eq!(rx.try_recv().unwrap(), DisplayEvent::GameEnded(GameEnding::Won));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_channel_display_ignores_closed_receiver() {
        let (display, rx) = ChannelDisplay::channel();
        drop(rx);
        display.on_guess_started();
    }

    #[test]
    fn test_ending_outcomes() {
        assert_eq!(GameEnding::Won.outcome(), GameOutcome::Won);
        assert_eq!(GameEnding::LostAssassin.outcome(), GameOutcome::LostAssassin);
        assert_eq!(
            GameEnding::Aborted(SessionFailure::Cancelled).outcome(),
            GameOutcome::AbortedOnError
        );
    }
}
