//! # Game Module
//!
//! Core game model: rooms and the graph that links them, items, puzzles,
//! the player, encounter resolution and the adventure session.
//!
//! This module contains the fundamental building blocks of Delve:
//! - Grid addressing ([`RoomId`]) and movement ([`Direction`])
//! - Difficulty tuning shared by generation and the player
//! - The level model and the rules applied when a room is entered

pub mod encounter;
pub mod graph;
pub mod items;
pub mod level;
pub mod player;
pub mod puzzle;
pub mod room;
pub mod state;

pub use encounter::*;
pub use graph::*;
pub use items::*;
pub use level::*;
pub use player::*;
pub use puzzle::*;
pub use room::*;
pub use state::*;

use crate::DelveError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Grid address of a room.
///
/// Rendered as the stable key `"x,y"`, which is also its serialized form.
///
/// # Examples
///
/// ```
/// use delve::RoomId;
///
/// let id = RoomId::new(3, 4);
/// assert_eq!(id.to_string(), "3,4");
/// assert_eq!("3,4".parse::<RoomId>().unwrap(), id);
/// assert_eq!(RoomId::origin().manhattan_distance(id), 7);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct RoomId {
    pub x: i32,
    pub y: i32,
}

impl RoomId {
    /// Creates a room id from grid coordinates.
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the origin `(0, 0)`, where every level starts.
    pub fn origin() -> Self {
        Self::new(0, 0)
    }

    /// Calculates the Manhattan distance to another room.
    pub fn manhattan_distance(self, other: RoomId) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// Returns the grid neighbour in the given direction.
    pub fn step(self, direction: Direction) -> RoomId {
        let (dx, dy) = direction.to_delta();
        RoomId::new(self.x + dx, self.y + dy)
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

impl FromStr for RoomId {
    type Err = DelveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DelveError::InvalidState(format!("Malformed room id '{}'", s));
        let (x, y) = s.trim().split_once(',').ok_or_else(invalid)?;
        let x = x.trim().parse().map_err(|_| invalid())?;
        let y = y.trim().parse().map_err(|_| invalid())?;
        Ok(Self::new(x, y))
    }
}

impl From<RoomId> for String {
    fn from(id: RoomId) -> Self {
        id.to_string()
    }
}

impl TryFrom<String> for RoomId {
    type Error = DelveError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Cardinal directions between rooms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    /// Converts a direction to a grid delta. North is towards smaller `y`.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::Direction;
    ///
    /// assert_eq!(Direction::North.to_delta(), (0, -1));
    /// assert_eq!(Direction::East.to_delta(), (1, 0));
    /// ```
    pub fn to_delta(self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::South => (0, 1),
            Direction::East => (1, 0),
            Direction::West => (-1, 0),
        }
    }

    /// Returns the direction pointing back the way this one came.
    pub fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::East => Direction::West,
            Direction::West => Direction::East,
        }
    }

    /// Returns the four cardinal directions.
    pub fn all() -> [Direction; 4] {
        [
            Direction::North,
            Direction::South,
            Direction::East,
            Direction::West,
        ]
    }

    /// Lowercase name used in messages and serialized exits.
    pub fn name(self) -> &'static str {
        match self {
            Direction::North => "north",
            Direction::South => "south",
            Direction::East => "east",
            Direction::West => "west",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Direction {
    type Err = DelveError;

    /// Parses a direction case-insensitively, accepting single-letter forms.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "north" | "n" => Ok(Direction::North),
            "south" | "s" => Ok(Direction::South),
            "east" | "e" => Ok(Direction::East),
            "west" | "w" => Ok(Direction::West),
            other => Err(DelveError::InvalidCommand(format!(
                "Invalid direction '{}'. Please use: north, south, east, or west",
                other
            ))),
        }
    }
}

/// Difficulty chosen at the start of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Normal,
    Hard,
}

impl Difficulty {
    /// Power points a fresh player starts with.
    pub fn starting_power(self) -> i32 {
        match self {
            Difficulty::Easy => 100,
            Difficulty::Normal => 75,
            Difficulty::Hard => 150,
        }
    }

    /// Multiplier applied to the base healing amount of generated potions.
    pub fn healing_rate(self) -> f32 {
        match self {
            Difficulty::Easy => 0.6,
            Difficulty::Normal => 0.4,
            Difficulty::Hard => 0.2,
        }
    }

    /// Multiplier applied to barrier and trap damage.
    pub fn barrier_strength(self) -> f32 {
        match self {
            Difficulty::Easy => 0.7,
            Difficulty::Normal => 1.0,
            Difficulty::Hard => 1.3,
        }
    }

    /// Multiplier applied to puzzle operand ranges.
    pub fn puzzle_modifier(self) -> f32 {
        match self {
            Difficulty::Easy => 0.8,
            Difficulty::Normal => 1.0,
            Difficulty::Hard => 1.2,
        }
    }

    /// All difficulties from easiest to hardest.
    pub fn all() -> [Difficulty; 3] {
        [Difficulty::Easy, Difficulty::Normal, Difficulty::Hard]
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Difficulty::Easy => "EASY",
            Difficulty::Normal => "NORMAL",
            Difficulty::Hard => "HARD",
        };
        f.write_str(name)
    }
}

impl FromStr for Difficulty {
    type Err = DelveError;

    /// Accepts the menu numbers `1`-`3` or the difficulty names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1" | "easy" => Ok(Difficulty::Easy),
            "2" | "normal" => Ok(Difficulty::Normal),
            "3" | "hard" => Ok(Difficulty::Hard),
            other => Err(DelveError::InvalidCommand(format!(
                "Unknown difficulty '{}'. Please enter a number between 1-3",
                other
            ))),
        }
    }
}
