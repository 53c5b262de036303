//! # Utilities Module
//!
//! Graph algorithms shared by generation and the session.

pub mod pathfinding;

pub use pathfinding::*;
