//! # Puzzles
//!
//! Question/answer challenges attached to rooms.

use serde::{Deserialize, Serialize};

/// A puzzle with its solved flag. Once solved it stays solved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Puzzle {
    pub question: String,
    pub answer: String,
    pub description: String,
    solved: bool,
}

impl Puzzle {
    /// Creates an unsolved puzzle.
    pub fn new(
        question: impl Into<String>,
        answer: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            description: description.into(),
            solved: false,
        }
    }

    /// Compares an answer after trimming, ignoring case.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::Puzzle;
    ///
    /// let puzzle = Puzzle::new("What is 2 + 2?", "4", "A math puzzle");
    /// assert!(puzzle.check_answer(" 4 "));
    /// assert!(!puzzle.check_answer("five"));
    /// ```
    pub fn check_answer(&self, answer: &str) -> bool {
        answer.trim().eq_ignore_ascii_case(self.answer.trim())
    }

    /// Whether the puzzle has been solved.
    pub fn is_solved(&self) -> bool {
        self.solved
    }

    /// Marks the puzzle as solved.
    pub fn mark_solved(&mut self) {
        self.solved = true;
    }
}
