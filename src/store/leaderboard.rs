//! Leaderboard Projection
//!
//! The leaderboard is derived on demand from the profile map, never
//! stored. Ties keep the map's iteration order (username order).

use serde::Serialize;

use crate::store::profile::ProfileMap;

/// One leaderboard row, projected from a profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaderboardRow {
    /// Profile name.
    pub username: String,
    /// Cumulative score.
    pub total_score: u64,
    /// Rounds won, per the stored counter.
    pub wins: u32,
    /// Rounds on record, per the stored counter.
    pub games: u32,
}

/// Rank every profile by total score, descending. `limit` truncates the
/// result; `None` returns the full board.
pub fn ranking(profiles: &ProfileMap, limit: Option<usize>) -> Vec<LeaderboardRow> {
    let mut rows: Vec<LeaderboardRow> = profiles
        .iter()
        .map(|(username, profile)| LeaderboardRow {
            username: username.clone(),
            total_score: profile.total_score,
            wins: profile.games_won,
            games: profile.total_games,
        })
        .collect();

    // Stable sort: equal scores keep encounter order.
    rows.sort_by(|a, b| b.total_score.cmp(&a.total_score));

    if let Some(limit) = limit {
        rows.truncate(limit);
    }
    rows
}
