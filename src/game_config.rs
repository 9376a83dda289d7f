//! Game configuration loaded from TOML.

use crate::codenames::{BoardLayout, EngineTiming};
use crate::llm_client::{LlmConfig, LlmProvider};
use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Model settings for one of the two AI roles.
#[derive(Debug, Clone, PartialEq, Getters, Serialize, Deserialize)]
pub struct RoleModelConfig {
    /// LLM provider (openai or anthropic).
    #[serde(default = "default_provider")]
    provider: LlmProvider,

    /// Model name (e.g., "gpt-4o", "claude-3-5-haiku-20241022").
    model: String,

    /// Maximum tokens for responses.
    #[serde(default = "default_max_tokens")]
    max_tokens: u32,

    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    temperature: f32,
}

fn default_provider() -> LlmProvider {
    LlmProvider::OpenAI
}

fn default_max_tokens() -> u32 {
    150
}

fn default_temperature() -> f32 {
    0.7
}

impl RoleModelConfig {
    /// Creates role settings with default token limit and temperature.
    pub fn new(provider: LlmProvider, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
        }
    }

    /// Creates LLM configuration for this role.
    ///
    /// Requires OPENAI_API_KEY or ANTHROPIC_API_KEY depending on the provider.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the API key variable is not set.
    #[instrument(skip(self), fields(provider = ?self.provider, model = %self.model))]
    pub fn create_llm_config(&self) -> Result<LlmConfig, ConfigError> {
        debug!("Creating LLM config");
        let var = self.provider.api_key_var();
        let api_key = std::env::var(var)
            .map_err(|_| ConfigError::new(format!("{} environment variable not set", var)))?;

        Ok(LlmConfig::new(
            self.provider,
            api_key,
            self.model.clone(),
            self.max_tokens,
            self.temperature,
        ))
    }
}

fn default_clue_giver() -> RoleModelConfig {
    RoleModelConfig::new(LlmProvider::OpenAI, "gpt-4o")
}

fn default_guesser() -> RoleModelConfig {
    RoleModelConfig::new(LlmProvider::OpenAI, "gpt-4o-mini")
}

fn default_word_file_path() -> PathBuf {
    PathBuf::from("words.txt")
}

fn default_total_word_count() -> usize {
    16
}

fn default_target_count() -> usize {
    8
}

fn default_assassin_count() -> usize {
    2
}

fn default_max_thinking_time_seconds() -> f64 {
    60.0
}

fn default_turn_pause_seconds() -> f64 {
    1.0
}

fn default_guess_reveal_pause_seconds() -> f64 {
    1.0
}

/// Settings for a game.
#[derive(Debug, Clone, PartialEq, Getters, Serialize, Deserialize)]
pub struct GameConfig {
    /// Newline-delimited word list.
    #[serde(default = "default_word_file_path")]
    word_file_path: PathBuf,

    /// Words on the board.
    #[serde(default = "default_total_word_count")]
    total_word_count: usize,

    /// Target words on the board.
    #[serde(default = "default_target_count")]
    target_count: usize,

    /// Assassin words on the board.
    #[serde(default = "default_assassin_count")]
    assassin_count: usize,

    /// Time limit for a single clue or guess call.
    #[serde(default = "default_max_thinking_time_seconds")]
    max_thinking_time_seconds: f64,

    /// Pause before the guesser starts thinking.
    #[serde(default = "default_turn_pause_seconds")]
    turn_pause_seconds: f64,

    /// Pause before each guess is revealed.
    #[serde(default = "default_guess_reveal_pause_seconds")]
    guess_reveal_pause_seconds: f64,

    /// Model playing the clue giver.
    #[serde(default = "default_clue_giver")]
    clue_giver: RoleModelConfig,

    /// Model playing the guesser.
    #[serde(default = "default_guesser")]
    guesser: RoleModelConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            word_file_path: default_word_file_path(),
            total_word_count: default_total_word_count(),
            target_count: default_target_count(),
            assassin_count: default_assassin_count(),
            max_thinking_time_seconds: default_max_thinking_time_seconds(),
            turn_pause_seconds: default_turn_pause_seconds(),
            guess_reveal_pause_seconds: default_guess_reveal_pause_seconds(),
            clue_giver: default_clue_giver(),
            guesser: default_guesser(),
        }
    }
}

impl GameConfig {
    /// Loads configuration from TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config = Self::from_toml(&content)?;
        info!(words = %config.word_file_path.display(), "Config loaded successfully");
        Ok(config)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the TOML is invalid.
    #[instrument(skip(content))]
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))
    }

    /// Loads `path` if it exists, otherwise falls back to defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file exists but is invalid.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            Self::from_file(path)
        } else {
            info!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Overrides the word file.
    pub fn with_word_file_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.word_file_path = path.into();
        self
    }

    /// Overrides the per-call thinking limit.
    pub fn with_max_thinking_time_seconds(mut self, seconds: f64) -> Self {
        self.max_thinking_time_seconds = seconds;
        self
    }

    /// Overrides both cosmetic pauses.
    pub fn with_pauses(mut self, turn_pause_seconds: f64, guess_reveal_pause_seconds: f64) -> Self {
        self.turn_pause_seconds = turn_pause_seconds;
        self.guess_reveal_pause_seconds = guess_reveal_pause_seconds;
        self
    }

    /// Board role counts.
    pub fn layout(&self) -> BoardLayout {
        BoardLayout::new(self.total_word_count, self.target_count, self.assassin_count)
    }

    /// Engine timing settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if any duration is negative, not finite, or a
    /// zero thinking limit.
    #[instrument(skip(self))]
    pub fn timing(&self) -> Result<EngineTiming, ConfigError> {
        let max_thinking_time = seconds("max_thinking_time_seconds", self.max_thinking_time_seconds)?;
        if max_thinking_time.is_zero() {
            return Err(ConfigError::new(
                "max_thinking_time_seconds must be greater than zero".to_string(),
            ));
        }
        Ok(EngineTiming::new(
            max_thinking_time,
            seconds("turn_pause_seconds", self.turn_pause_seconds)?,
            seconds("guess_reveal_pause_seconds", self.guess_reveal_pause_seconds)?,
        ))
    }
}

fn seconds(name: &str, value: f64) -> Result<Duration, ConfigError> {
    Duration::try_from_secs_f64(value)
        .map_err(|e| ConfigError::new(format!("{} = {} is not a valid duration: {}", name, value, e)))
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_gives_reference_defaults() {
        let config = GameConfig::from_toml("").unwrap();
        assert_eq!(config, GameConfig::default());
        assert_eq!(config.layout(), BoardLayout::new(16, 8, 2));
    }

    #[test]
    fn test_partial_toml_overrides() {
        let config = GameConfig::from_toml(
            r#"
word_file_path = "my_words.txt"
max_thinking_time_seconds = 12.5
turn_pause_seconds = 0.0

[guesser]
provider = "anthropic"
model = "claude-3-5-haiku-20241022"
"#,
        )
        .unwrap();

        assert_eq!(config.word_file_path(), &PathBuf::from("my_words.txt"));
        assert_eq!(*config.target_count(), 8);
        assert_eq!(*config.guesser().provider(), LlmProvider::Anthropic);
        assert_eq!(*config.guesser().max_tokens(), 150);
        assert_eq!(config.clue_giver().model(), "gpt-4o");

        let timing = config.timing().unwrap();
        assert_eq!(*timing.max_thinking_time(), Duration::from_millis(12_500));
        assert_eq!(*timing.turn_pause(), Duration::ZERO);
    }

    #[test]
    fn test_invalid_durations_rejected() {
        let negative = GameConfig::default().with_pauses(-1.0, 0.0);
        assert!(negative.timing().is_err());

        let zero_limit = GameConfig::default().with_max_thinking_time_seconds(0.0);
        assert!(zero_limit.timing().is_err());
    }

    #[test]
    fn test_sample_config_matches_defaults() {
        let config = GameConfig::from_toml(include_str!("../codenames.toml")).unwrap();
        assert_eq!(config, GameConfig::default());
    }

    #[test]
    fn test_bad_toml_is_error() {
        assert!(GameConfig::from_toml("total_word_count = \"lots\"").is_err());
    }
}
