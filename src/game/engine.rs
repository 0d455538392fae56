//! Active-Game State Machine
//!
//! One [`ActiveGame`] per in-progress round: the fixed secret, the guess
//! budget, and the guesses taken so far. Guess evaluation is pure state
//! transition; the caller decides what to persist on a terminal outcome.

use std::time::Instant;

use thiserror::Error;

use crate::core::rng::SecretSource;
use crate::core::time::round1;
use crate::game::difficulty::{Difficulty, DifficultySettings};
use crate::WINNING_SCORE;

/// Result of a valid guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuessOutcome {
    /// Guess matched the secret. The round is over.
    Win {
        /// Points earned: base points plus 2 per unused guess.
        earned: u64,
        /// Guesses that were left when the win landed.
        remaining: u32,
    },
    /// Budget exhausted without a match. The round is over.
    Lose,
    /// Guess was below the secret; the round continues.
    TooLow {
        /// Proximity hint for the client.
        hint: Hint,
        /// Guesses left.
        remaining: u32,
    },
    /// Guess was above the secret; the round continues.
    TooHigh {
        /// Proximity hint for the client.
        hint: Hint,
        /// Guesses left.
        remaining: u32,
    },
}

/// Rejected guesses. Neither variant consumes a guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GuessError {
    /// Guess fell outside the round's range.
    #[error("Enter a number between {min} and {max}.")]
    OutOfRange {
        /// Smallest accepted value.
        min: i64,
        /// Largest accepted value.
        max: i64,
    },

    /// Guess budget was already spent.
    #[error("No guesses left. Start a new game.")]
    NoGuessesLeft,
}

// =============================================================================
// HINTS
// =============================================================================

/// Proximity hint attached to a miss.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hint {
    /// Within 3 of the secret.
    VeryClose,
    /// Within 10 of the secret.
    Warm,
    /// More than 10 away.
    Cold,
}

impl Hint {
    /// Classify a miss by distance from the secret.
    pub fn from_distance(guess: i64, secret: i64) -> Hint {
        let diff = (guess - secret).abs();
        if diff <= 3 {
            Hint::VeryClose
        } else if diff <= 10 {
            Hint::Warm
        } else {
            Hint::Cold
        }
    }

    /// Message shown to the player.
    pub fn message(&self) -> &'static str {
        match self {
            Hint::VeryClose => "Very close!",
            Hint::Warm => "Getting warm!",
            Hint::Cold => "Cold. Far away.",
        }
    }
}

// =============================================================================
// ACTIVE GAME
// =============================================================================

/// One in-progress round.
///
/// Created by `start`, consumed by the winning/losing guess or a forfeit.
/// The secret is fixed for the lifetime of the round.
#[derive(Debug, Clone)]
pub struct ActiveGame {
    difficulty: Difficulty,
    settings: DifficultySettings,
    secret: i64,
    guesses_taken: u32,
    guess_history: Vec<i64>,
    started_at: Instant,
}

impl ActiveGame {
    /// Start a round at the given difficulty, drawing the secret from
    /// `secrets`.
    pub fn start(difficulty: Difficulty, secrets: &dyn SecretSource) -> Self {
        let settings = difficulty.settings();
        let secret = secrets.pick(settings.range_min, settings.range_max);

        Self {
            difficulty,
            settings,
            secret,
            guesses_taken: 0,
            guess_history: Vec::new(),
            started_at: Instant::now(),
        }
    }

    /// Evaluate one guess.
    ///
    /// Range and budget checks happen before the guess is counted, so a
    /// rejected guess leaves the round untouched.
    pub fn submit(&mut self, guess: i64) -> Result<GuessOutcome, GuessError> {
        if guess < self.settings.range_min || guess > self.settings.range_max {
            return Err(GuessError::OutOfRange {
                min: self.settings.range_min,
                max: self.settings.range_max,
            });
        }

        if self.guesses_taken >= self.settings.max_guesses {
            return Err(GuessError::NoGuessesLeft);
        }

        self.guesses_taken += 1;
        self.guess_history.push(guess);
        let remaining = self.settings.max_guesses - self.guesses_taken;

        if guess == self.secret {
            let earned = self.base_points() + u64::from(remaining) * 2;
            return Ok(GuessOutcome::Win { earned, remaining });
        }

        if remaining == 0 {
            return Ok(GuessOutcome::Lose);
        }

        let hint = Hint::from_distance(guess, self.secret);
        if guess < self.secret {
            Ok(GuessOutcome::TooLow { hint, remaining })
        } else {
            Ok(GuessOutcome::TooHigh { hint, remaining })
        }
    }

    /// Points a win is worth before the unused-guess bonus.
    pub fn base_points(&self) -> u64 {
        WINNING_SCORE * self.settings.multiplier
    }

    /// Seconds since the round started, rounded to one decimal.
    pub fn elapsed_secs(&self) -> f64 {
        round1(self.started_at.elapsed().as_secs_f64())
    }

    /// The round's difficulty tier.
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// The round's fixed parameters.
    pub fn settings(&self) -> DifficultySettings {
        self.settings
    }

    /// The secret. Revealed to the player only when the round ends.
    pub fn secret(&self) -> i64 {
        self.secret
    }

    /// Guesses taken so far.
    pub fn guesses_taken(&self) -> u32 {
        self.guesses_taken
    }

    /// Guesses left.
    pub fn remaining(&self) -> u32 {
        self.settings.max_guesses - self.guesses_taken
    }

    /// Every guess submitted this round, in order.
    pub fn guess_history(&self) -> &[i64] {
        &self.guess_history
    }
}

// =============================================================================
// TESTS
// =============================================================================
