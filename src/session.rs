//! Game session lifecycle.
//!
//! A [`GameSession`] owns one board, the collaborators that play on it, and
//! the background task the turn engine runs on. The UI side only ever sees
//! display events; it never touches the board.

use crate::codenames::{
    Board, BoardLayout, ClueSource, DisplayAdapter, EngineTiming, GameReport, GuessSource,
    TurnEngine, WordPool, WordPoolError,
};
use derive_more::{Display, Error};
use rand::Rng;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

/// The injected participants of a session.
#[derive(Clone)]
pub struct Collaborators {
    /// Produces clues.
    pub clue_source: Arc<dyn ClueSource>,
    /// Produces guesses.
    pub guess_source: Arc<dyn GuessSource>,
    /// Receives display updates.
    pub display: Arc<dyn DisplayAdapter>,
}

impl Collaborators {
    /// Bundles the three collaborators.
    pub fn new(
        clue_source: Arc<dyn ClueSource>,
        guess_source: Arc<dyn GuessSource>,
        display: Arc<dyn DisplayAdapter>,
    ) -> Self {
        Self {
            clue_source,
            guess_source,
            display,
        }
    }
}

impl std::fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collaborators")
            .field("clue_source", &self.clue_source.name())
            .field("guess_source", &self.guess_source.name())
            .finish_non_exhaustive()
    }
}

/// A single game from setup to its ending.
#[derive(Debug)]
pub struct GameSession {
    board: Option<Board>,
    collaborators: Collaborators,
    timing: EngineTiming,
    cancel: CancellationToken,
    task: Option<JoinHandle<GameReport>>,
}

impl GameSession {
    /// Sets up a board from `pool` and wraps it in a session.
    ///
    /// # Errors
    ///
    /// Returns [`WordPoolError`] if the board cannot be set up. The session
    /// is never created in that case.
    #[instrument(skip(pool, rng, collaborators))]
    pub fn setup<R: Rng + ?Sized>(
        pool: &WordPool,
        layout: BoardLayout,
        rng: &mut R,
        collaborators: Collaborators,
        timing: EngineTiming,
    ) -> Result<Self, WordPoolError> {
        let board = Board::setup(pool, layout, rng)?;
        Ok(Self::new(board, collaborators, timing))
    }

    /// Wraps an existing board in a session.
    #[instrument(skip(board, collaborators))]
    pub fn new(board: Board, collaborators: Collaborators, timing: EngineTiming) -> Self {
        info!(words = board.all_words().len(), "Creating game session");
        Self {
            board: Some(board),
            collaborators,
            timing,
            cancel: CancellationToken::new(),
            task: None,
        }
    }

    /// Board words in display order, if the game has not started yet.
    pub fn board(&self) -> Option<&Board> {
        self.board.as_ref()
    }

    /// Returns true once [`GameSession::start`] has been called.
    pub fn is_started(&self) -> bool {
        self.board.is_none()
    }

    /// Spawns the turn engine on the tokio runtime.
    ///
    /// When the engine terminates, the display adapter's `on_game_ended` is
    /// called exactly once with the ending. Must be called from within a
    /// tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if the session was already started.
    #[instrument(skip(self))]
    pub fn start(&mut self) -> Result<(), SessionError> {
        let board = self.board.take().ok_or_else(|| {
            warn!("Session already started");
            SessionError::new(SessionErrorKind::AlreadyStarted)
        })?;

        let engine = TurnEngine::new(
            board,
            Arc::clone(&self.collaborators.clue_source),
            Arc::clone(&self.collaborators.guess_source),
            Arc::clone(&self.collaborators.display),
            self.timing,
            self.cancel.child_token(),
        );
        let display = Arc::clone(&self.collaborators.display);

        self.task = Some(tokio::spawn(async move {
            let report = engine.run().await;
            display.on_game_ended(&report.ending());
            report
        }));

        info!("Session started");
        Ok(())
    }

    /// Asks the engine to stop before its next transition.
    ///
    /// A clue or guess call already in flight finishes, and its result is
    /// discarded. The session then ends as aborted.
    #[instrument(skip(self))]
    pub fn stop(&self) {
        info!("Stopping session");
        self.cancel.cancel();
    }

    /// A token that stops the session when cancelled.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Waits for the engine task to finish and returns its report.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if the session was never started, was
    /// already waited on, or the engine task panicked.
    #[instrument(skip(self))]
    pub async fn wait(&mut self) -> Result<GameReport, SessionError> {
        let task = self
            .task
            .take()
            .ok_or_else(|| SessionError::new(SessionErrorKind::NotRunning))?;

        let report = task
            .await
            .map_err(|e| SessionError::new(SessionErrorKind::TaskFailed(e.to_string())))?;
        debug!(outcome = %report.outcome(), "Session finished");
        Ok(report)
    }

    /// Starts the session and waits for it to finish.
    ///
    /// # Errors
    ///
    /// See [`GameSession::start`] and [`GameSession::wait`].
    pub async fn run(mut self) -> Result<GameReport, SessionError> {
        self.start()?;
        self.wait().await
    }
}

/// What went wrong with a session.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum SessionErrorKind {
    /// [`GameSession::start`] was called twice.
    #[display("Session already started")]
    AlreadyStarted,
    /// The session was never started or was already waited on.
    #[display("Session is not running")]
    NotRunning,
    /// The engine task panicked or was aborted.
    #[display("Engine task failed: {}", _0)]
    TaskFailed(String),
}

/// Session lifecycle misuse or engine task failure.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("Session error: {} at {}:{}", kind, file, line)]
pub struct SessionError {
    /// What went wrong.
    pub kind: SessionErrorKind,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl SessionError {
    /// Creates a new session error.
    #[track_caller]
    #[instrument(skip(kind))]
    pub fn new(kind: SessionErrorKind) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            kind,
            line: loc.line(),
            file: loc.file(),
        }
    }

    /// Returns the error kind.
    pub fn kind(&self) -> &SessionErrorKind {
        &self.kind
    }
}
