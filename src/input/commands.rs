//! # Command Definitions
//!
//! Text commands accepted while an adventure is running, with their aliases.

use crate::{DelveError, DelveResult, Direction};
use serde::{Deserialize, Serialize};

/// A parsed player command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    Move(Direction),
    Look,
    Take(String),
    Use(String),
    Drop(String),
    Inventory,
    /// Show the room's puzzle, or answer it
    Solve(Option<String>),
    Reveal,
    Status,
    Map,
    Help,
    Hint,
    Quit,
}

/// One line of the help listing: usage and explanation.
pub const HELP_ENTRIES: &[(&str, &str)] = &[
    ("move/go [direction]", "Move in the specified direction (north, south, east, west)"),
    ("n/s/e/w", "Shortcut for moving in a direction"),
    ("look", "Examine your surroundings in detail"),
    ("take/pickup/grab [item]", "Pick up an item"),
    ("use [item]", "Use an item from your inventory"),
    ("drop [item]", "Drop an item from your inventory"),
    ("inventory/inv", "Display your inventory"),
    ("map", "Display the map of explored areas"),
    ("status", "Display your current status"),
    ("solve [answer]", "Show the room's puzzle, or answer it"),
    ("reveal", "Use a Torch to reveal hidden passages in the current room"),
    ("hint/tips", "Get a random gameplay tip"),
    ("quit/exit", "Exit the game"),
    ("help", "Display this help message"),
];

impl Command {
    /// Parses a line of player input.
    ///
    /// The verb is case-insensitive and may be any of its aliases; the rest
    /// of the line is the argument.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::{Command, Direction};
    ///
    /// assert_eq!(Command::parse("go North").unwrap(), Command::Move(Direction::North));
    /// assert_eq!(Command::parse("e").unwrap(), Command::Move(Direction::East));
    /// assert_eq!(
    ///     Command::parse("grab Health Potion").unwrap(),
    ///     Command::Take("Health Potion".to_string())
    /// );
    /// assert!(Command::parse("dance").is_err());
    /// ```
    pub fn parse(input: &str) -> DelveResult<Command> {
        let input = input.trim();
        if input.is_empty() {
            return Err(DelveError::InvalidCommand(
                "Please enter a valid command.".to_string(),
            ));
        }

        let (verb, rest) = match input.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (input, ""),
        };
        let verb = verb.to_lowercase();
        let argument = (!rest.is_empty()).then(|| rest.to_string());

        let command = match verb.as_str() {
            "move" | "go" | "walk" | "run" | "travel" => {
                let direction = require(argument, "Move where? Try: north, south, east, or west")?;
                Command::Move(direction.parse().map_err(|_| {
                    DelveError::InvalidCommand(
                        "Invalid direction. Please use: north, south, east, or west".to_string(),
                    )
                })?)
            }
            "n" | "s" | "e" | "w" | "north" | "south" | "east" | "west" => {
                Command::Move(verb.parse()?)
            }
            "look" | "examine" | "inspect" | "observe" => Command::Look,
            "take" | "pickup" | "grab" | "collect" => {
                Command::Take(require(argument, "What do you want to pick up?")?)
            }
            "use" => Command::Use(require(argument, "What do you want to use?")?),
            "drop" => Command::Drop(require(argument, "What do you want to drop?")?),
            "inventory" | "inv" | "items" | "bag" => Command::Inventory,
            "solve" => Command::Solve(argument),
            "reveal" => Command::Reveal,
            "status" => Command::Status,
            "map" => Command::Map,
            "help" => Command::Help,
            "hint" | "tips" => Command::Hint,
            "quit" | "exit" | "leave" | "end" => Command::Quit,
            other => {
                return Err(DelveError::InvalidCommand(format!(
                    "I don't understand '{}'. Type 'help' for a list of commands.",
                    other
                )))
            }
        };
        Ok(command)
    }

    /// The help listing, one command per line.
    pub fn help_text() -> String {
        let mut text = String::from("=== Available Commands ===");
        for (usage, explanation) in HELP_ENTRIES {
            text.push_str(&format!("\n{}: {}", usage, explanation));
        }
        text
    }
}

fn require(argument: Option<String>, prompt: &str) -> DelveResult<String> {
    argument.ok_or_else(|| DelveError::InvalidCommand(prompt.to_string()))
}
