//! API Schemas
//!
//! Typed request and response bodies for every endpoint. Requests are
//! validated here at the boundary before any game logic runs; responses
//! carry `ok: true` (errors render through `ApiError`).

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::store::leaderboard::LeaderboardRow;
use crate::store::profile::{GameSummary, HistoryEntry, Profile};

// =============================================================================
// REQUESTS
// =============================================================================

/// Body carrying only the client identifier.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientRef {
    /// Caller-chosen client identifier.
    #[serde(default)]
    pub client_id: String,
}

/// Body naming a profile: create, login, delete, profile view.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountRequest {
    /// Caller-chosen client identifier.
    #[serde(default)]
    pub client_id: String,
    /// Target username. Trimmed before use.
    #[serde(default)]
    pub username: String,
}

/// Body for starting a round.
#[derive(Debug, Clone, Deserialize)]
pub struct StartRequest {
    /// Caller-chosen client identifier.
    #[serde(default)]
    pub client_id: String,
    /// Difficulty label; unknown labels fall back to easy.
    #[serde(default = "default_difficulty")]
    pub difficulty: String,
}

fn default_difficulty() -> String {
    "easy".to_string()
}

/// Body for submitting a guess.
#[derive(Debug, Clone, Deserialize)]
pub struct GuessRequest {
    /// Caller-chosen client identifier.
    #[serde(default)]
    pub client_id: String,
    /// Raw guess value; see [`parse_guess`] for accepted forms.
    #[serde(default)]
    pub guess: Value,
}

/// Coerce a raw guess to an integer.
///
/// Accepts JSON integers, integral floats (`12.0`), and numeric strings
/// (`"12"`). Anything else is an invalid guess.
pub fn parse_guess(raw: &Value) -> Option<i64> {
    match raw {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                return Some(i);
            }
            n.as_f64()
                .filter(|f| f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                .map(|f| f as i64)
        }
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

// =============================================================================
// RESPONSES
// =============================================================================

/// Bare acknowledgement: logout, delete.
#[derive(Debug, Clone, Serialize)]
pub struct AckResponse {
    /// Always true on success.
    pub ok: bool,
}

impl AckResponse {
    /// The success acknowledgement.
    pub fn ok() -> Self {
        Self { ok: true }
    }
}

/// Full leaderboard.
#[derive(Debug, Clone, Serialize)]
pub struct LeaderboardResponse {
    /// Always true on success.
    pub ok: bool,
    /// Rows sorted by score, descending.
    pub leaderboard: Vec<LeaderboardRow>,
}

/// Create/login result: the freshly shaped profile.
#[derive(Debug, Clone, Serialize)]
pub struct AccountResponse {
    /// Always true on success.
    pub ok: bool,
    /// The username logged in.
    pub username: String,
    /// The stored profile after reconciliation.
    pub profile: Profile,
}

/// The logged-in player's own summary and history.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryResponse {
    /// Always true on success.
    pub ok: bool,
    /// The player this history belongs to.
    pub username: String,
    /// Aggregates computed from history.
    pub summary: GameSummary,
    /// The retained history, oldest first.
    pub history: Vec<HistoryEntry>,
}

/// Any profile's detailed view.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileResponse {
    /// Always true on success.
    pub ok: bool,
    /// The profile viewed.
    pub username: String,
    /// Aggregates plus score and timestamps.
    pub summary: ProfileSummary,
    /// The retained history (at most 50), oldest first.
    pub history: Vec<HistoryEntry>,
    /// The 10 most recent entries, newest first.
    pub recent: Vec<HistoryEntry>,
}

/// Profile-view summary: [`GameSummary`] plus score and timestamps.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileSummary {
    /// Cumulative score.
    pub total_score: u64,
    /// Rounds on record.
    pub total_games: u32,
    /// Rounds won.
    pub wins: u32,
    /// Rounds lost.
    pub losses: u32,
    /// Win percentage, one decimal.
    pub win_pct: f64,
    /// Loss percentage, one decimal.
    pub lose_pct: f64,
    /// Mean round duration, one decimal.
    pub avg_time: f64,
    /// Profile creation time.
    pub date_created: String,
    /// Last login or completed round.
    pub last_played: String,
}

/// Parameters of a freshly started round.
#[derive(Debug, Clone, Serialize)]
pub struct GameParams {
    /// Canonical difficulty tag.
    pub difficulty: String,
    /// Smallest possible secret.
    pub range_min: i64,
    /// Largest possible secret.
    pub range_max: i64,
    /// Guess budget.
    pub max_guesses: u32,
    /// Points a win is worth before the unused-guess bonus.
    pub base_points: u64,
}

/// Start result.
#[derive(Debug, Clone, Serialize)]
pub struct StartResponse {
    /// Always true on success.
    pub ok: bool,
    /// The new round's parameters. The secret stays server-side.
    pub game: GameParams,
}

/// Guess result, tagged by status.
#[derive(Debug, Clone, Serialize)]
pub struct GuessResponse {
    /// Always true on success.
    pub ok: bool,
    /// Outcome payload; the `status` tag is win/lose/low/high.
    #[serde(flatten)]
    pub reply: GuessReply,
}

/// The four guess outcomes a client can see.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GuessReply {
    /// Secret matched; the round is over and the profile was credited.
    Win {
        /// "Correct!".
        message: String,
        /// Points credited for this round.
        earned: u64,
        /// Round duration in seconds, one decimal.
        time_taken: f64,
        /// The updated profile.
        profile: Profile,
        /// The refreshed full leaderboard.
        leaderboard: Vec<LeaderboardRow>,
    },
    /// Budget exhausted; the round is over and a loss was recorded.
    Lose {
        /// Reveals the secret.
        message: String,
        /// Every guess submitted this round.
        history: Vec<i64>,
        /// Always 0.
        remaining: u32,
        /// The updated profile, unless it vanished mid-round.
        profile: Option<Profile>,
        /// The refreshed full leaderboard.
        leaderboard: Vec<LeaderboardRow>,
    },
    /// Guess was below the secret; the round continues.
    Low {
        /// "Too low.".
        message: String,
        /// Proximity hint.
        hint: &'static str,
        /// Every guess submitted this round.
        history: Vec<i64>,
        /// Guesses left.
        remaining: u32,
    },
    /// Guess was above the secret; the round continues.
    High {
        /// "Too high.".
        message: String,
        /// Proximity hint.
        hint: &'static str,
        /// Every guess submitted this round.
        history: Vec<i64>,
        /// Guesses left.
        remaining: u32,
    },
}

/// Forfeit result: always a recorded loss.
#[derive(Debug, Clone, Serialize)]
pub struct ForfeitResponse {
    /// Always true on success.
    pub ok: bool,
    /// Always "lose".
    pub status: &'static str,
    /// Reveals the secret.
    pub message: String,
    /// The updated profile, unless it vanished mid-round.
    pub profile: Option<Profile>,
}

// =============================================================================
// TESTS
// =============================================================================
