//! LLM-backed guesser.

use crate::codenames::{GuessGenerationError, GuessRequest, GuessSource};
use crate::game_config::{ConfigError, RoleModelConfig};
use crate::llm_client::LlmClient;
use std::collections::BTreeSet;
use tracing::{debug, info, instrument};

/// Guesser that prompts a language model.
#[derive(Debug, Clone)]
pub struct LlmGuesser {
    name: String,
    client: LlmClient,
}

impl LlmGuesser {
    /// Creates a guesser backed by `client`.
    #[instrument(skip(name, client), fields(model = %client.config().model()))]
    pub fn new(name: impl Into<String>, client: LlmClient) -> Self {
        let name = name.into();
        info!(agent = %name, "Creating guesser");
        Self { name, client }
    }

    /// Creates a guesser from role settings.
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
impl GuessSource for LlmGuesser {
    #[instrument(skip(self, request), fields(agent = %self.name, clue = %request.clue_word()))]
    async fn guess(&self, request: &GuessRequest) -> Result<Vec<String>, GuessGenerationError> {
        let prompt = build_guess_prompt(request);
        debug!(prompt_length = prompt.len(), "Sending guess prompt");

        let response = self
            .client
            .generate(&prompt)
            .await
            .map_err(|e| GuessGenerationError::new(e.to_string()))?;

        let guesses = parse_guesses(&response, request.candidate_words(), *request.target_count());
        info!(?guesses, "Guesses parsed");
        Ok(guesses)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Builds the guesser prompt for a clue.
pub fn build_guess_prompt(request: &GuessRequest) -> String {
    let words = request
        .candidate_words()
        .iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    let clue = request.clue_word();
    let count = *request.target_count();

    format!(
        "You are the Guesser in a game of Codenames. The available words are: {words}.

---
CURRENT CLUE
* Clue: {clue}
* Count: {count} (Max words to guess is {max} including bonus.)

---
RULES
1. Your turn ends immediately if you pick a Neutral or Assassin word.
2. You should aim to pick up to {count} words, plus one optional bonus word.
3. You MUST output your response as a comma-separated list of the words you want to pick (UPPERCASE).

Based on the clue '{clue}' for '{count}' words, list the words you will pick in order.",
        max = count + 1,
    )
}

/// Splits a comma-separated answer into board words.
///
/// Entries that are not candidates are dropped; at most `count + 1` remain.
pub fn parse_guesses(response: &str, candidates: &BTreeSet<String>, count: usize) -> Vec<String> {
    response
        .split(',')
        .map(|entry| entry.trim().to_uppercase())
        .filter(|entry| candidates.contains(entry))
        .take(count + 1)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidates() -> BTreeSet<String> {
        ["BANK", "RIVER", "FISH", "PIANO"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn test_parse_keeps_order_and_uppercases() {
        let guesses = parse_guesses(" river, bank ,Fish", &candidates(), 2);
        assert_eq!(guesses, vec!["RIVER", "BANK", "FISH"]);
    }

    #[test]
    fn test_parse_drops_unknown_and_truncates() {
        let guesses = parse_guesses("WATER, RIVER, BANK, FISH, PIANO", &candidates(), 1);
        assert_eq!(guesses, vec!["RIVER", "BANK"]);
    }

    #[test]
    fn test_parse_prose_yields_nothing() {
        assert!(parse_guesses("I'm not sure about this one", &candidates(), 2).is_empty());
    }

    #[test]
    fn test_prompt_mentions_bonus_limit() {
        let request = GuessRequest::new("WATER", 2, candidates());
        let prompt = build_guess_prompt(&request);
        assert!(prompt.contains("The available words are: BANK, FISH, PIANO, RIVER."));
        assert!(prompt.contains("Max words to guess is 3 including bonus."));
        assert!(prompt.contains("Based on the clue 'WATER' for '2' words"));
    }
}
