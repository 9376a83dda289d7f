//! Turn engine: the state machine that drives a game to its end.
//!
//! Each turn moves through
//! `AwaitingClue → AwaitingGuesses → ResolvingGuesses → AwaitingClue`
//! until a guess ends the game or a collaborator fails. The engine owns the
//! board outright, makes at most one collaborator call at a time, and
//! checks for cancellation between transitions.

use super::board::Board;
use super::display::{DisplayAdapter, GameEnding};
use super::invariants;
use super::oracle::{
    ClueGenerationError, ClueRequest, ClueSource, GuessGenerationError, GuessRequest, GuessSource,
};
use super::rules::{GuessVerdict, TurnTally, resolve_guess};
use super::types::{ClueRecord, GameOutcome};
use super::word_pool::normalize_word;
use derive_getters::Getters;
use derive_more::{Display, Error};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, timeout};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

/// Timing knobs for the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Getters)]
pub struct EngineTiming {
    /// Upper bound on a single clue or guess call.
    max_thinking_time: Duration,
    /// Cosmetic pause between the clue and "guesser thinking".
    turn_pause: Duration,
    /// Cosmetic pause before each revealed guess.
    guess_reveal_pause: Duration,
}

impl EngineTiming {
    /// Creates timing settings.
    pub fn new(max_thinking_time: Duration, turn_pause: Duration, guess_reveal_pause: Duration) -> Self {
        Self {
            max_thinking_time,
            turn_pause,
            guess_reveal_pause,
        }
    }

    /// No pauses, with the given thinking limit.
    pub fn immediate(max_thinking_time: Duration) -> Self {
        Self::new(max_thinking_time, Duration::ZERO, Duration::ZERO)
    }
}

impl Default for EngineTiming {
    fn default() -> Self {
        Self::new(
            Duration::from_secs(60),
            Duration::from_secs(1),
            Duration::from_secs(1),
        )
    }
}

/// Why a session stopped before reaching a game outcome.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum SessionFailure {
    /// The clue giver failed or timed out.
    #[display("{_0}")]
    Clue(ClueGenerationError),
    /// The guesser failed or timed out.
    #[display("{_0}")]
    Guess(GuessGenerationError),
    /// The session was stopped by its owner.
    #[display("Session cancelled")]
    Cancelled,
}

/// Current state of the turn engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnPhase {
    /// Waiting on the clue giver.
    AwaitingClue,
    /// Waiting on the guesser for the given clue.
    AwaitingGuesses(ClueRecord),
    /// Applying a batch of guesses, in order.
    ResolvingGuesses {
        /// The clue being answered.
        clue: ClueRecord,
        /// Guesses left after filtering.
        guesses: Vec<String>,
    },
    /// The game is over.
    Terminated(GameOutcome),
}

/// Summary of a finished session.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct GameReport {
    outcome: GameOutcome,
    failure: Option<SessionFailure>,
    /// Clues given, oldest first. Its length is the number of turns played.
    clue_history: Vec<ClueRecord>,
    remaining_targets: BTreeSet<String>,
    unguessed_words: BTreeSet<String>,
}

impl GameReport {
    /// Number of clues given.
    pub fn turns_played(&self) -> usize {
        self.clue_history.len()
    }

    /// The ending to show the player.
    pub fn ending(&self) -> GameEnding {
        match (&self.outcome, &self.failure) {
            (GameOutcome::Won, _) => GameEnding::Won,
            (GameOutcome::LostAssassin, _) => GameEnding::LostAssassin,
            (_, Some(failure)) => GameEnding::Aborted(failure.clone()),
            (_, None) => GameEnding::Aborted(SessionFailure::Cancelled),
        }
    }
}

/// Drives a single game from the first clue to a terminal outcome.
pub struct TurnEngine {
    board: Board,
    phase: TurnPhase,
    clue_source: Arc<dyn ClueSource>,
    guess_source: Arc<dyn GuessSource>,
    display: Arc<dyn DisplayAdapter>,
    timing: EngineTiming,
    cancel: CancellationToken,
    failure: Option<SessionFailure>,
}

impl std::fmt::Debug for TurnEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TurnEngine")
            .field("phase", &self.phase)
            .field("clue_source", &self.clue_source.name())
            .field("guess_source", &self.guess_source.name())
            .field("timing", &self.timing)
            .finish_non_exhaustive()
    }
}

impl TurnEngine {
    /// Creates an engine over a freshly set up board.
    pub fn new(
        board: Board,
        clue_source: Arc<dyn ClueSource>,
        guess_source: Arc<dyn GuessSource>,
        display: Arc<dyn DisplayAdapter>,
        timing: EngineTiming,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            board,
            phase: TurnPhase::AwaitingClue,
            clue_source,
            guess_source,
            display,
            timing,
            cancel,
            failure: None,
        }
    }

    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the current phase.
    pub fn phase(&self) -> &TurnPhase {
        &self.phase
    }

    /// Returns the outcome so far.
    pub fn outcome(&self) -> GameOutcome {
        match self.phase {
            TurnPhase::Terminated(outcome) => outcome,
            _ => GameOutcome::InProgress,
        }
    }

    /// Runs turns until the game terminates and returns the report.
    ///
    /// Cancellation is checked before every transition. A collaborator call
    /// already in flight is allowed to finish; its result is then discarded.
    #[instrument(skip(self), fields(clue_giver = %self.clue_source.name(), guesser = %self.guess_source.name()))]
    pub async fn run(mut self) -> GameReport {
        info!("Starting game");

        loop {
            if let TurnPhase::Terminated(outcome) = self.phase {
                info!(%outcome, turns = self.board.clue_history().len(), "Game over");
                return self.into_report(outcome);
            }

            if self.cancel.is_cancelled() {
                info!("Cancellation requested, stopping");
                self.phase = self.abort(SessionFailure::Cancelled);
                continue;
            }

            self.step().await;
        }
    }

    /// Performs a single transition.
    pub async fn step(&mut self) {
        let phase = std::mem::replace(&mut self.phase, TurnPhase::AwaitingClue);
        self.phase = match phase {
            TurnPhase::AwaitingClue => self.request_clue().await,
            TurnPhase::AwaitingGuesses(clue) => self.request_guesses(clue).await,
            TurnPhase::ResolvingGuesses { clue, guesses } => {
                self.resolve_guesses(&clue, &guesses).await
            }
            terminated @ TurnPhase::Terminated(_) => terminated,
        };
        debug_assert!(
            invariants::check_board(&self.board).is_ok(),
            "board invariants violated: {:?}",
            invariants::check_board(&self.board)
        );
    }

    #[instrument(skip(self), fields(turn = self.board.clue_history().len() + 1))]
    async fn request_clue(&mut self) -> TurnPhase {
        let turn_index = self.board.clue_history().len() + 1;
        self.display.on_turn_started(turn_index);

        let request = ClueRequest::from_board(&self.board);
        debug!(targets = request.target_words().len(), "Asking for a clue");

        let limit = self.timing.max_thinking_time;
        let clue = match timeout(limit, self.clue_source.give_clue(&request)).await {
            Ok(Ok(clue)) => clue,
            Ok(Err(e)) => return self.abort(SessionFailure::Clue(e)),
            Err(_) => {
                warn!(?limit, "Clue giver timed out");
                return self.abort(SessionFailure::Clue(ClueGenerationError::new(format!(
                    "{} did not answer within {:?}",
                    self.clue_source.name(),
                    limit
                ))));
            }
        };

        if self.cancel.is_cancelled() {
            debug!("Discarding clue from cancelled session");
            return TurnPhase::AwaitingClue;
        }

        let record = self.board.record_clue(&clue);
        info!(clue = %record.clue_word(), count = record.target_count(), "Clue given");
        self.display
            .on_clue_revealed(record.clue_word(), *record.target_count());
        TurnPhase::AwaitingGuesses(record)
    }

    #[instrument(skip(self, clue), fields(clue = %clue.clue_word(), count = clue.target_count()))]
    async fn request_guesses(&mut self, clue: ClueRecord) -> TurnPhase {
        let pause = self.timing.turn_pause;
        if !pause.is_zero() {
            sleep(pause).await;
        }
        self.display.on_guess_started();

        let request = GuessRequest::new(
            clue.clue_word().clone(),
            *clue.target_count(),
            self.board.unguessed_words().clone(),
        );

        let limit = self.timing.max_thinking_time;
        let raw = match timeout(limit, self.guess_source.guess(&request)).await {
            Ok(Ok(guesses)) => guesses,
            Ok(Err(e)) => return self.abort(SessionFailure::Guess(e)),
            Err(_) => {
                warn!(?limit, "Guesser timed out");
                return self.abort(SessionFailure::Guess(GuessGenerationError::new(format!(
                    "{} did not answer within {:?}",
                    self.guess_source.name(),
                    limit
                ))));
            }
        };

        if self.cancel.is_cancelled() {
            debug!("Discarding guesses from cancelled session");
            return TurnPhase::AwaitingGuesses(clue);
        }

        let guesses = sanitize_guesses(
            raw,
            self.board.unguessed_words(),
            TurnTally::new(*clue.target_count()).max_guesses(),
        );
        info!(?guesses, "Guesses received");
        TurnPhase::ResolvingGuesses { clue, guesses }
    }

    #[instrument(skip(self, clue, guesses), fields(clue = %clue.clue_word()))]
    async fn resolve_guesses(&mut self, clue: &ClueRecord, guesses: &[String]) -> TurnPhase {
        let mut tally = TurnTally::new(*clue.target_count());
        let pause = self.timing.guess_reveal_pause;

        for word in guesses {
            if !self.board.is_unguessed(word) {
                debug!(%word, "Skipping unavailable guess");
                continue;
            }
            if !pause.is_zero() {
                sleep(pause).await;
            }

            let verdict = resolve_guess(&mut self.board, word, &mut tally);
            if let Some(reveal) = verdict.reveal() {
                info!(word = %reveal.word(), role = %reveal.role(), "Guess resolved");
                self.display.on_word_resolved(reveal);
            }

            match verdict {
                GuessVerdict::Skipped | GuessVerdict::Continue(_) => {}
                GuessVerdict::EndTurn(_) => return TurnPhase::AwaitingClue,
                GuessVerdict::GameOver { outcome, .. } => return TurnPhase::Terminated(outcome),
            }
        }

        debug!(successful = tally.successful(), "Guess batch exhausted");
        TurnPhase::AwaitingClue
    }

    fn abort(&mut self, failure: SessionFailure) -> TurnPhase {
        warn!(%failure, "Session aborted");
        self.failure = Some(failure);
        TurnPhase::Terminated(GameOutcome::AbortedOnError)
    }

    fn into_report(self, outcome: GameOutcome) -> GameReport {
        GameReport {
            outcome,
            failure: self.failure,
            clue_history: self.board.clue_history().to_vec(),
            remaining_targets: self.board.remaining_targets().clone(),
            unguessed_words: self.board.unguessed_words().clone(),
        }
    }
}

/// Normalizes raw guesses, keeps unguessed board words and caps the batch
/// at `max_guesses`.
///
/// Blank, off-board, already guessed and repeated entries are dropped before
/// the cap, so only playable words use up a slot.
fn sanitize_guesses(
    raw: Vec<String>,
    unguessed: &BTreeSet<String>,
    max_guesses: usize,
) -> Vec<String> {
    let mut seen = BTreeSet::new();
    let playable: Vec<String> = raw
        .iter()
        .filter_map(|w| normalize_word(w))
        .filter(|w| unguessed.contains(w) && seen.insert(w.clone()))
        .collect();
    if playable.len() < raw.len() {
        debug!(
            received = raw.len(),
            playable = playable.len(),
            "Dropped guesses that are not playable"
        );
    }
    if playable.len() > max_guesses {
        warn!(
            playable = playable.len(),
            max_guesses, "Guesser sent too many guesses, truncating"
        );
    }
    playable.into_iter().take(max_guesses).collect()
}
