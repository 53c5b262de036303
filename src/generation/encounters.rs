//! # Puzzle Generation
//!
//! Random puzzles whose difficulty follows the configured difficulty.

use crate::{DelveError, DelveResult, GenerationConfig, Generator, Puzzle};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;

const COLORS: &[(&str, &str)] = &[
    ("red", "bed"),
    ("blue", "shoe"),
    ("green", "bean"),
    ("yellow", "mellow"),
];

/// Creates math, colour and odd-or-even puzzles.
#[derive(Debug, Clone, Default)]
pub struct PuzzleGenerator;

impl PuzzleGenerator {
    /// Creates a puzzle generator.
    pub fn new() -> Self {
        Self
    }

    /// Generates one puzzle. `modifier` widens the operand range of math
    /// puzzles: operands fall in `1..=10 + floor(10 * modifier)`.
    pub fn generate_with_modifier(&self, modifier: f32, rng: &mut StdRng) -> Puzzle {
        match rng.gen_range(0..3) {
            0 => {
                let upper = 10 + (10.0 * modifier) as u32;
                let a = rng.gen_range(1..=upper);
                let b = rng.gen_range(1..=upper);
                Puzzle::new(
                    format!("What is {} + {}?", a, b),
                    (a + b).to_string(),
                    "A math puzzle",
                )
            }
            1 => {
                let (color, rhyme) = COLORS.choose(rng).copied().unwrap_or(COLORS[0]);
                Puzzle::new(
                    format!("What color am I thinking of? It rhymes with: {}", rhyme),
                    color,
                    "A color-guessing puzzle",
                )
            }
            _ => {
                let number = rng.gen_range(1..=100);
                Puzzle::new(
                    "I'm thinking of a number between 1 and 100. Is it odd or even?",
                    if number % 2 == 0 { "even" } else { "odd" },
                    "An odd-or-even guessing puzzle",
                )
            }
        }
    }
}

impl Generator<Puzzle> for PuzzleGenerator {
    fn generate(&self, config: &GenerationConfig, rng: &mut StdRng) -> DelveResult<Puzzle> {
        let puzzle = self.generate_with_modifier(config.difficulty.puzzle_modifier(), rng);
        self.validate(&puzzle, config)?;
        Ok(puzzle)
    }

    fn validate(&self, puzzle: &Puzzle, _config: &GenerationConfig) -> DelveResult<()> {
        if puzzle.question.trim().is_empty() || puzzle.answer.trim().is_empty() {
            return Err(DelveError::GenerationFailed(
                "Puzzle has an empty question or answer".to_string(),
            ));
        }
        Ok(())
    }

    fn generator_type(&self) -> &'static str {
        "PuzzleGenerator"
    }
}
