//! Clue givers and guessers.

mod clue_giver;
mod guesser;
mod scripted;

pub use clue_giver::{LlmClueGiver, build_clue_prompt, parse_clue};
pub use guesser::{LlmGuesser, build_guess_prompt, parse_guesses};
pub use scripted::{ScriptedClueGiver, ScriptedGuesser};
