//! Profile Records and Totals Reconciliation
//!
//! A profile's `total_games` and `games_won` are always recomputed from
//! its history log. Serde field defaults shape partially-stored records
//! on load, so a profile written by an older build still deserializes
//! into the full field set.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::time::{now_stamp, round1};
use crate::MAX_HISTORY;

/// The persisted record: username to profile.
pub type ProfileMap = BTreeMap<String, Profile>;

/// One completed round, immutable once appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// When the round ended, local time.
    #[serde(rename = "ts", default)]
    pub timestamp: String,
    /// Whether the round was won.
    #[serde(default)]
    pub won: bool,
    /// Points earned; 0 on a loss.
    #[serde(default)]
    pub score: u64,
    /// Round duration in seconds, one decimal. Absent for legacy entries.
    #[serde(default)]
    pub time_taken: Option<f64>,
    /// Difficulty tag the round was played at.
    #[serde(default)]
    pub difficulty: String,
}

/// Durable per-username record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// Derived: always `history.len()` after reconciliation.
    #[serde(default)]
    pub total_games: u32,
    /// Derived: always the count of won history entries.
    #[serde(default)]
    pub games_won: u32,
    /// Cumulative score. Only ever increases, on wins.
    #[serde(default)]
    pub total_score: u64,
    /// When the profile was created.
    #[serde(default = "now_stamp")]
    pub date_created: String,
    /// Last login or completed round.
    #[serde(default = "now_stamp")]
    pub last_played: String,
    /// The most recent rounds, oldest first, at most [`MAX_HISTORY`].
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
}

/// Aggregate stats computed strictly from history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameSummary {
    /// Rounds on record.
    pub total_games: u32,
    /// Rounds won.
    pub wins: u32,
    /// Rounds lost.
    pub losses: u32,
    /// Win percentage, one decimal; 0.0 with no rounds.
    pub win_pct: f64,
    /// Loss percentage, one decimal; 0.0 with no rounds.
    pub lose_pct: f64,
    /// Mean round duration over timed rounds, one decimal; 0.0 if none.
    pub avg_time: f64,
}

impl Profile {
    /// Fresh zero-valued profile stamped with the current time.
    pub fn new() -> Self {
        let now = now_stamp();
        Self {
            total_games: 0,
            games_won: 0,
            total_score: 0,
            date_created: now.clone(),
            last_played: now,
            history: Vec::new(),
        }
    }

    /// Refresh `last_played` to the current time.
    pub fn touch(&mut self) {
        self.last_played = now_stamp();
    }

    /// Append one round outcome and evict the oldest entries beyond
    /// [`MAX_HISTORY`].
    pub fn append_outcome(
        &mut self,
        won: bool,
        earned_score: u64,
        time_taken: Option<f64>,
        difficulty: &str,
    ) {
        self.history.push(HistoryEntry {
            timestamp: now_stamp(),
            won,
            score: earned_score,
            time_taken: time_taken.map(round1),
            difficulty: difficulty.to_string(),
        });

        if self.history.len() > MAX_HISTORY {
            let excess = self.history.len() - MAX_HISTORY;
            self.history.drain(..excess);
        }
    }

    /// Repair the aggregate counters from history.
    ///
    /// Called after every history mutation, before persisting, and when a
    /// profile is loaded for display.
    pub fn resync_totals(&mut self) {
        self.total_games = self.history.len() as u32;
        self.games_won = self.history.iter().filter(|h| h.won).count() as u32;
    }

    /// Compute aggregate stats from history alone.
    pub fn summary(&self) -> GameSummary {
        let total = self.history.len() as u32;
        let wins = self.history.iter().filter(|h| h.won).count() as u32;
        let losses = total - wins;

        let (win_pct, lose_pct) = if total > 0 {
            (
                round1(f64::from(wins) / f64::from(total) * 100.0),
                round1(f64::from(losses) / f64::from(total) * 100.0),
            )
        } else {
            (0.0, 0.0)
        };

        let times: Vec<f64> = self.history.iter().filter_map(|h| h.time_taken).collect();
        let avg_time = if times.is_empty() {
            0.0
        } else {
            round1(times.iter().sum::<f64>() / times.len() as f64)
        };

        GameSummary {
            total_games: total,
            wins,
            losses,
            win_pct,
            lose_pct,
            avg_time,
        }
    }

    /// The `n` most recent entries, newest first.
    pub fn recent(&self, n: usize) -> Vec<HistoryEntry> {
        self.history.iter().rev().take(n).cloned().collect()
    }
}

impl Default for Profile {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// TESTS
// =============================================================================
