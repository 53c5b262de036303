//! # Generation Module
//!
//! Procedural content generation for levels, items and puzzles.
//!
//! Every generator draws from one caller-owned [`StdRng`], so a level built
//! from a given [`GenerationConfig`] and seed is reproducible.

pub mod dungeon;
pub mod encounters;
pub mod loot;

pub use dungeon::*;
pub use encounters::*;
pub use loot::*;

use crate::{DelveError, DelveResult, Difficulty};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

/// Configuration for level generation.
///
/// Percentages are whole numbers in `0..=100` compared against a roll of
/// `0..100`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Random seed for reproducible generation
    pub seed: u64,
    pub difficulty: Difficulty,
    /// One-based level index
    pub level_number: u32,
    /// Smallest grid side, inclusive
    pub min_size: i32,
    /// Largest grid side, inclusive
    pub max_size: i32,
    /// Chance of a loose item in a room
    pub item_chance: u32,
    /// Chance of a puzzle in a room
    pub puzzle_chance: u32,
    /// Chance of a hidden passage in a room
    pub hidden_chance: u32,
    /// Chance that a loose item is swapped for a hazard (never on EASY)
    pub hazard_item_chance: u32,
    /// Base chance of a barrier in a room
    pub blocked_chance: u32,
    /// Base chance of an extra trap in a room
    pub negative_chance: u32,
    /// Extra barrier chance in the middle of the grid
    pub middle_boost: u32,
    /// Extra trap chance in the middle of the grid
    pub middle_negative_boost: u32,
    /// Probability of a detour per corridor step during path repair
    pub detour_chance: f64,
}

impl GenerationConfig {
    /// Creates the configuration for a difficulty.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::{Difficulty, GenerationConfig};
    ///
    /// let config = GenerationConfig::for_difficulty(7, Difficulty::Hard, 2);
    /// assert_eq!((config.min_size, config.max_size), (7, 12));
    /// assert_eq!(config.blocked_chance, 50);
    /// assert!(config.validate().is_ok());
    /// ```
    pub fn for_difficulty(seed: u64, difficulty: Difficulty, level_number: u32) -> Self {
        let (min_size, max_size) = match difficulty {
            Difficulty::Easy => (4, 7),
            Difficulty::Normal => (5, 10),
            Difficulty::Hard => (7, 12),
        };
        let (item_chance, puzzle_chance, hidden_chance) = match difficulty {
            Difficulty::Easy => (20, 15, 15),
            Difficulty::Normal => (30, 20, 10),
            Difficulty::Hard => (40, 25, 5),
        };
        let (blocked_chance, negative_chance) = match difficulty {
            Difficulty::Easy => (20, 10),
            Difficulty::Normal => (35, 25),
            Difficulty::Hard => (50, 40),
        };

        Self {
            seed,
            difficulty,
            level_number,
            min_size,
            max_size,
            item_chance,
            puzzle_chance,
            hidden_chance,
            hazard_item_chance: if difficulty == Difficulty::Easy { 0 } else { 30 },
            blocked_chance,
            negative_chance,
            middle_boost: 20,
            middle_negative_boost: 15,
            detour_chance: crate::DEFAULT_DETOUR_CHANCE,
        }
    }

    /// Creates a configuration for tests: NORMAL difficulty, first level.
    pub fn for_testing(seed: u64) -> Self {
        Self::for_difficulty(seed, Difficulty::Normal, 1)
    }

    /// Rejects configurations no level can be built from.
    pub fn validate(&self) -> DelveResult<()> {
        if self.min_size <= 0 || self.max_size <= 0 {
            return Err(DelveError::InvalidConfig(format!(
                "Grid sides must be positive, got {}..={}",
                self.min_size, self.max_size
            )));
        }
        if self.min_size > self.max_size {
            return Err(DelveError::InvalidConfig(format!(
                "Grid size range {}..={} is inverted",
                self.min_size, self.max_size
            )));
        }

        let chances = [
            ("item", self.item_chance),
            ("puzzle", self.puzzle_chance),
            ("hidden", self.hidden_chance),
            ("hazard item", self.hazard_item_chance),
            ("blocked", self.blocked_chance),
            ("negative", self.negative_chance),
        ];
        if let Some((name, value)) = chances.iter().find(|(_, value)| *value > 100) {
            return Err(DelveError::InvalidConfig(format!(
                "{} chance {} exceeds 100",
                name, value
            )));
        }

        if !(0.0..=1.0).contains(&self.detour_chance) {
            return Err(DelveError::InvalidConfig(format!(
                "Detour chance {} is not a probability",
                self.detour_chance
            )));
        }

        Ok(())
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self::for_testing(42)
    }
}

/// Trait for procedural generators.
///
/// All generation systems in Delve implement this trait, which keeps the
/// random source an explicit argument.
pub trait Generator<T> {
    /// Generates content using the provided configuration and random number generator.
    fn generate(&self, config: &GenerationConfig, rng: &mut StdRng) -> DelveResult<T>;

    /// Validates that the generated content meets requirements.
    fn validate(&self, content: &T, config: &GenerationConfig) -> DelveResult<()>;

    /// Gets the generator type name for logging and debugging.
    fn generator_type(&self) -> &'static str;
}

/// Utility functions for generation algorithms.
pub mod utils {
    use super::*;

    /// Creates a seeded random number generator from the config.
    pub fn create_rng(config: &GenerationConfig) -> StdRng {
        StdRng::seed_from_u64(config.seed)
    }

    /// Rolls a percentage chance against `0..100`.
    pub fn roll_percent(rng: &mut StdRng, chance: u32) -> bool {
        use rand::Rng;
        rng.gen_range(0..100) < chance
    }
}
