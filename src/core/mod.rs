//! Core shared primitives.
//!
//! Small building blocks used by both the game logic and the store:
//! the injectable secret-number source and timestamp helpers.

pub mod rng;
pub mod time;

// Re-export core types
pub use rng::{ScriptedSource, SecretSource, SeededSource, ThreadRngSource};
pub use time::{now_stamp, round1};
