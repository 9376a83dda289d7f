//! LLM-backed clue giver.

use crate::codenames::{Clue, ClueGenerationError, ClueRequest, ClueSource};
use crate::game_config::{ConfigError, RoleModelConfig};
use crate::llm_client::LlmClient;
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;
use tracing::{debug, info, instrument, warn};

/// Clue used when the model's answer cannot be parsed.
const FALLBACK_CLUE: &str = "SAFE";

/// Clue giver that prompts a language model.
#[derive(Debug, Clone)]
pub struct LlmClueGiver {
    name: String,
    client: LlmClient,
}

impl LlmClueGiver {
    /// Creates a clue giver backed by `client`.
    #[instrument(skip(name, client), fields(model = %client.config().model()))]
    pub fn new(name: impl Into<String>, client: LlmClient) -> Self {
        let name = name.into();
        info!(agent = %name, "Creating clue giver");
        Self { name, client }
    }

    /// Creates a clue giver from role settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the provider's API key is not set.
    pub fn from_config(name: impl Into<String>, config: &RoleModelConfig) -> Result<Self, ConfigError> {
        let client = LlmClient::new(config.create_llm_config()?);
        Ok(Self::new(name, client))
    }
}

#[async_trait::async_trait]
impl ClueSource for LlmClueGiver {
    #[instrument(skip(self, request), fields(agent = %self.name))]
    async fn give_clue(&self, request: &ClueRequest) -> Result<Clue, ClueGenerationError> {
        let prompt = build_clue_prompt(request);
        debug!(prompt_length = prompt.len(), "Sending clue prompt");

        let response = self
            .client
            .generate(&prompt)
            .await
            .map_err(|e| ClueGenerationError::new(e.to_string()))?;

        let max_count = request.target_words().len();
        match parse_clue(&response, max_count) {
            Some(clue) => {
                info!(clue = %clue.word(), count = clue.count(), "Clue parsed");
                Ok(clue)
            }
            None => {
                warn!(%response, "Unparseable clue, defaulting to {}, 1", FALLBACK_CLUE);
                Ok(Clue::new(FALLBACK_CLUE, 1))
            }
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

fn join_sorted(words: &BTreeSet<String>) -> String {
    words.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
}

/// Builds the clue giver prompt from the visible board state.
pub fn build_clue_prompt(request: &ClueRequest) -> String {
    let previous = if request.clue_history().is_empty() {
        "None".to_string()
    } else {
        request
            .clue_history()
            .iter()
            .map(|record| format!("{} ({})", record.clue_word(), record.target_count()))
            .collect::<Vec<_>>()
            .join(", ")
    };

    format!(
        "You are the Clue Giver in a game of Codenames. Your goal is to get your partner \
(the Guesser) to select ALL of your target words using the fewest clues possible.

---
BOARD STATE
* TARGET WORDS (Your team must pick these): {targets}
* NEUTRAL WORDS (Picking these ends your turn): {neutral}
* ASSASSIN WORDS (Picking these loses the game immediately): {assassins}
* PREVIOUS CLUES GIVEN: {previous}

---
RULES
1. Your clue MUST be a single, English word.
2. Your clue MUST NOT be any of the words currently on the board.
3. Your clue should relate to at least two of the TARGET WORDS.
4. Your clue MUST NOT relate strongly to the NEUTRAL or ASSASSIN words.
5. You MUST output your response in the format: CLUE, NUMBER.
    NUMBER: The count of target words your clue relates to (maximum {max}).

Based on the board state, generate the best possible clue.",
        targets = join_sorted(request.target_words()),
        neutral = join_sorted(request.neutral_words()),
        assassins = join_sorted(request.assassin_words()),
        previous = previous,
        max = request.target_words().len(),
    )
}

/// First `WORD, NUMBER` pair in a model response.
static CLUE_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(\w+),\s*(\d+)").ok());

/// Extracts the first `WORD, NUMBER` pair from a model response.
///
/// The word is uppercased and the number clamped to `max_count`.
pub fn parse_clue(response: &str, max_count: usize) -> Option<Clue> {
    let captures = CLUE_PATTERN.as_ref()?.captures(response)?;
    let word = captures.get(1)?.as_str().to_uppercase();
    let count = captures
        .get(2)?
        .as_str()
        .parse::<usize>()
        .unwrap_or(usize::MAX)
        .min(max_count);
    Some(Clue::new(word, count))
}
