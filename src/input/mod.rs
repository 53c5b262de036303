//! # Input Module
//!
//! Line-based input handling for player interactions.

pub mod commands;

pub use commands::*;

use crate::{DelveError, DelveResult, Difficulty, SessionPhase};

/// Converts lines of text into player inputs.
///
/// What a line means depends on the session phase: a difficulty choice
/// while selecting, a yes/no answer after depletion, a command otherwise.
#[derive(Debug, Clone, Default)]
pub struct InputHandler;

impl InputHandler {
    /// Creates a new input handler.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::{Difficulty, InputHandler, PlayerInput, SessionPhase};
    ///
    /// let input_handler = InputHandler::new();
    /// let input = input_handler.parse_line("2", SessionPhase::Selecting).unwrap();
    /// assert_eq!(input, PlayerInput::SelectDifficulty(Difficulty::Normal));
    /// ```
    pub fn new() -> Self {
        Self
    }

    /// Parses a line according to the session phase.
    pub fn parse_line(&self, line: &str, phase: SessionPhase) -> DelveResult<PlayerInput> {
        let line = line.trim();
        match phase {
            SessionPhase::Unset | SessionPhase::Selecting => line
                .parse::<Difficulty>()
                .map(PlayerInput::SelectDifficulty)
                .map_err(|_| {
                    DelveError::InvalidCommand("Please enter a valid number (1-3): ".to_string())
                }),
            SessionPhase::Restarting => match line.to_lowercase().as_str() {
                "y" | "yes" | "restart" => Ok(PlayerInput::RestartChoice(true)),
                "n" | "no" | "quit" | "exit" => Ok(PlayerInput::RestartChoice(false)),
                _ => Err(DelveError::InvalidCommand(
                    "Would you like to restart the level? (yes/no)".to_string(),
                )),
            },
            SessionPhase::Running => Command::parse(line).map(PlayerInput::Command),
            SessionPhase::Ended => Err(DelveError::InvalidState(
                "The adventure is over".to_string(),
            )),
        }
    }
}

/// Player input types that can be processed by the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerInput {
    SelectDifficulty(Difficulty),
    Command(Command),
    /// Whether to restart the level after depletion
    RestartChoice(bool),
}
