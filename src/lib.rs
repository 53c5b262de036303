//! # Delve
//!
//! A grid dungeon crawl where every procedurally generated level is
//! guaranteed to be solvable.
//!
//! ## Architecture Overview
//!
//! The crate is organised around a small number of cooperating pieces:
//!
//! - **Game**: rooms, the room graph, items, puzzles, the player, encounter
//!   resolution and the adventure session that sequences turns and levels
//! - **Generation**: difficulty-driven level generation, the default item
//!   factory and puzzle generation
//! - **Utils**: reachability analysis and corridor repair over the room graph
//! - **Input**: text command parsing for front ends
//!
//! All randomness flows through a single seeded [`rand::rngs::StdRng`] owned by
//! the caller, so a fixed seed reproduces a level exactly.

pub mod game;
pub mod generation;
pub mod input;
pub mod utils;

// Core module re-exports
pub use game::*;
pub use generation::*;
pub use input::*;
pub use utils::*;

/// Core error type for the Delve engine.
#[derive(thiserror::Error, Debug)]
pub enum DelveError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Session or level state does not allow the operation
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Text command could not be understood
    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    /// Generation broke one of its own invariants
    #[error("Generation failed: {0}")]
    GenerationFailed(String),

    /// Generation parameters are unusable
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type used throughout the Delve codebase.
pub type DelveResult<T> = Result<T, DelveError>;

/// Version information for the game.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Game configuration constants.
pub mod config {
    /// Maximum number of items a player can carry
    pub const INVENTORY_CAPACITY: usize = 20;

    /// Power granted for solving a puzzle
    pub const PUZZLE_REWARD: i32 = 10;

    /// Power lost for a wrong puzzle answer
    pub const WRONG_ANSWER_PENALTY: i32 = 5;

    /// Number of levels in a default session
    pub const DEFAULT_LEVEL_COUNT: u32 = 3;

    /// Flat part of the bonus for reaching the treasure room
    pub const TREASURE_BONUS_BASE: i32 = 50;

    /// Base damage of a barrier before difficulty scaling
    pub const BARRIER_BASE_DAMAGE: f32 = 15.0;
}
