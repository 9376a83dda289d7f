//! Scripted collaborators for demos and tests.
//!
//! Each answers from a fixed queue and records the requests it received.

use crate::codenames::{
    Clue, ClueGenerationError, ClueRequest, ClueSource, GuessGenerationError, GuessRequest,
    GuessSource,
};
use std::collections::VecDeque;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, instrument, warn};

/// Clue giver that replays a fixed list of answers.
#[derive(Debug)]
pub struct ScriptedClueGiver {
    name: String,
    answers: Mutex<VecDeque<Result<Clue, String>>>,
    requests: Mutex<Vec<ClueRequest>>,
    delay: Duration,
}

impl ScriptedClueGiver {
    /// Creates a clue giver that hands out `clues` in order.
    pub fn new(name: impl Into<String>, clues: impl IntoIterator<Item = Clue>) -> Self {
        Self::from_answers(name, clues.into_iter().map(Ok))
    }

    /// Creates a clue giver from answers that may be failures.
    pub fn from_answers(
        name: impl Into<String>,
        answers: impl IntoIterator<Item = Result<Clue, String>>,
    ) -> Self {
        Self {
            name: name.into(),
            answers: Mutex::new(answers.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
            delay: Duration::ZERO,
        }
    }

    /// Sleeps for `delay` before every answer.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Requests received so far.
    pub async fn requests(&self) -> Vec<ClueRequest> {
        self.requests.lock().await.clone()
    }
}

#[async_trait::async_trait]
impl ClueSource for ScriptedClueGiver {
    #[instrument(skip(self, request), fields(agent = %self.name))]
    async fn give_clue(&self, request: &ClueRequest) -> Result<Clue, ClueGenerationError> {
        self.requests.lock().await.push(request.clone());
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        match self.answers.lock().await.pop_front() {
            Some(Ok(clue)) => {
                debug!(clue = %clue.word(), count = clue.count(), "Scripted clue");
                Ok(clue)
            }
            Some(Err(message)) => Err(ClueGenerationError::new(message)),
            None => {
                warn!("Clue script exhausted");
                Err(ClueGenerationError::new("Clue script exhausted"))
            }
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Guesser that replays a fixed list of answers.
#[derive(Debug)]
pub struct ScriptedGuesser {
    name: String,
    answers: Mutex<VecDeque<Result<Vec<String>, String>>>,
    requests: Mutex<Vec<GuessRequest>>,
    delay: Duration,
}

impl ScriptedGuesser {
    /// Creates a guesser that answers each turn with the next list.
    pub fn new<I, S>(name: impl Into<String>, turns: impl IntoIterator<Item = I>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_answers(
            name,
            turns
                .into_iter()
                .map(|turn| Ok(turn.into_iter().map(Into::into).collect())),
        )
    }

    /// Creates a guesser from answers that may be failures.
    pub fn from_answers(
        name: impl Into<String>,
        answers: impl IntoIterator<Item = Result<Vec<String>, String>>,
    ) -> Self {
        Self {
            name: name.into(),
            answers: Mutex::new(answers.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
            delay: Duration::ZERO,
        }
    }

    /// Sleeps for `delay` before every answer.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Requests received so far.
    pub async fn requests(&self) -> Vec<GuessRequest> {
        self.requests.lock().await.clone()
    }
}

#[async_trait::async_trait]
impl GuessSource for ScriptedGuesser {
    #[instrument(skip(self, request), fields(agent = %self.name))]
    async fn guess(&self, request: &GuessRequest) -> Result<Vec<String>, GuessGenerationError> {
        self.requests.lock().await.push(request.clone());
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        match self.answers.lock().await.pop_front() {
            Some(Ok(guesses)) => {
                debug!(?guesses, "Scripted guesses");
                Ok(guesses)
            }
            Some(Err(message)) => Err(GuessGenerationError::new(message)),
            None => {
                warn!("Guess script exhausted");
                Err(GuessGenerationError::new("Guess script exhausted"))
            }
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}
