//! Difficulty Table
//!
//! Each difficulty fixes the secret's range, the guess budget, and the
//! score multiplier. Unrecognized labels fall back to easy rather than
//! erroring, so older or hand-edited clients keep working.

use serde::{Deserialize, Serialize};

/// Game difficulty tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    /// 1-20, 5 guesses, 1x score.
    #[default]
    Easy,
    /// 1-25, 4 guesses, 2x score.
    Medium,
    /// 1-30, 3 guesses, 3x score.
    Hard,
    /// 1-40, 3 guesses, 4x score.
    Extreme,
}

/// Parameters a difficulty tier fixes for a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DifficultySettings {
    /// Smallest possible secret (inclusive).
    pub range_min: i64,
    /// Largest possible secret (inclusive).
    pub range_max: i64,
    /// Guess budget for the round.
    pub max_guesses: u32,
    /// Score multiplier applied to the base winning score.
    pub multiplier: u64,
}

impl Difficulty {
    /// All tiers, in ascending order of difficulty.
    pub fn all() -> [Difficulty; 4] {
        [
            Difficulty::Easy,
            Difficulty::Medium,
            Difficulty::Hard,
            Difficulty::Extreme,
        ]
    }

    /// Resolve a client-supplied label. Unknown labels map to `Easy`.
    pub fn from_label(label: &str) -> Difficulty {
        match label {
            "easy" => Difficulty::Easy,
            "medium" => Difficulty::Medium,
            "hard" => Difficulty::Hard,
            "extreme" => Difficulty::Extreme,
            _ => Difficulty::Easy,
        }
    }

    /// Canonical label, as recorded in history entries.
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
            Difficulty::Extreme => "extreme",
        }
    }

    /// Round parameters for this tier.
    pub fn settings(&self) -> DifficultySettings {
        match self {
            Difficulty::Easy => DifficultySettings {
                range_min: 1,
                range_max: 20,
                max_guesses: 5,
                multiplier: 1,
            },
            Difficulty::Medium => DifficultySettings {
                range_min: 1,
                range_max: 25,
                max_guesses: 4,
                multiplier: 2,
            },
            Difficulty::Hard => DifficultySettings {
                range_min: 1,
                range_max: 30,
                max_guesses: 3,
                multiplier: 3,
            },
            Difficulty::Extreme => DifficultySettings {
                range_min: 1,
                range_max: 40,
                max_guesses: 3,
                multiplier: 4,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_medium_settings() {
        let s = Difficulty::Medium.settings();
        assert_eq!(s.range_min, 1);
        assert_eq!(s.range_max, 25);
        assert_eq!(s.max_guesses, 4);
        assert_eq!(s.multiplier, 2);
    }

    #[test]
    fn test_unknown_label_behaves_as_easy() {
        let fallback = Difficulty::from_label("nightmare");
        assert_eq!(fallback, Difficulty::Easy);
        assert_eq!(fallback.settings(), Difficulty::Easy.settings());
    }

    #[test]
    fn test_labels_are_exact() {
        // Case-sensitive on purpose: "Medium" is not a known tier.
        assert_eq!(Difficulty::from_label("Medium"), Difficulty::Easy);
    }

    #[test]
    fn test_label_round_trip() {
        for tier in Difficulty::all() {
            assert_eq!(Difficulty::from_label(tier.as_str()), tier);
        }
    }

    #[test]
    fn test_ranges_start_at_one() {
        for tier in Difficulty::all() {
            assert_eq!(tier.settings().range_min, 1);
        }
    }
}
