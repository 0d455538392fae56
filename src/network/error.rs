//! API Error Surface
//!
//! Every failure a handler can hit, with its user-facing message and
//! HTTP status. Errors render as `{"ok": false, "error": <message>}`;
//! nothing is retried internally.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::game::engine::GuessError;
use crate::network::session::SessionError;
use crate::store::file::StoreError;

/// Request-level failures surfaced to the client.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No client identifier in the request body.
    #[error("Missing client_id")]
    MissingClientId,

    /// The session has no logged-in user.
    #[error("Please login first.")]
    NotLoggedIn,

    /// Named profile does not exist.
    #[error("User not found.")]
    UserNotFound,

    /// Login attempted against a username with no profile.
    #[error("User not found. Create a new user.")]
    UnknownLogin,

    /// Create attempted with a blank username.
    #[error("Username cannot be empty.")]
    UsernameEmpty,

    /// Profile lookup attempted with a blank username.
    #[error("Missing username.")]
    MissingUsername,

    /// Create attempted with a username that already exists.
    #[error("Username already exists. Use Login.")]
    UsernameTaken,

    /// Guess or forfeit without a round in progress.
    #[error("No active game. Start a new game.")]
    NoActiveGame,

    /// Guess was not an integer.
    #[error("Guess must be a number.")]
    InvalidGuess,

    /// Guess fell outside the round's range.
    #[error("Enter a number between {min} and {max}.")]
    OutOfRange {
        /// Smallest accepted value.
        min: i64,
        /// Largest accepted value.
        max: i64,
    },

    /// Guess submitted with no budget left.
    #[error("No guesses left. Start a new game.")]
    NoGuessesLeft,

    /// The profile vanished between login and this action.
    #[error("User profile missing.")]
    ProfileMissing,

    /// Store read or write failed.
    #[error("Storage failure: {0}")]
    Store(#[from] StoreError),
}

impl ApiError {
    /// HTTP status for this error: 400 input, 401 auth, 404 missing
    /// entity, 500 internal inconsistency.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingClientId
            | ApiError::UsernameEmpty
            | ApiError::MissingUsername
            | ApiError::UsernameTaken
            | ApiError::NoActiveGame
            | ApiError::InvalidGuess
            | ApiError::OutOfRange { .. }
            | ApiError::NoGuessesLeft => StatusCode::BAD_REQUEST,
            ApiError::NotLoggedIn => StatusCode::UNAUTHORIZED,
            ApiError::UserNotFound | ApiError::UnknownLogin => StatusCode::NOT_FOUND,
            ApiError::ProfileMissing | ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::MissingClientId => ApiError::MissingClientId,
        }
    }
}

impl From<GuessError> for ApiError {
    fn from(err: GuessError) -> Self {
        match err {
            GuessError::OutOfRange { min, max } => ApiError::OutOfRange { min, max },
            GuessError::NoGuessesLeft => ApiError::NoGuessesLeft,
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    ok: bool,
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(%status, error = %self, "request failed");
        }

        let body = ErrorBody {
            ok: false,
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::MissingClientId.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::NotLoggedIn.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::UserNotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::UnknownLogin.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::ProfileMissing.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_out_of_range_message_names_bounds() {
        let err = ApiError::OutOfRange { min: 1, max: 25 };
        assert_eq!(err.to_string(), "Enter a number between 1 and 25.");
    }

    #[test]
    fn test_guess_error_conversion() {
        let err: ApiError = GuessError::NoGuessesLeft.into();
        assert!(matches!(err, ApiError::NoGuessesLeft));

        let err: ApiError = GuessError::OutOfRange { min: 1, max: 20 }.into();
        assert!(matches!(err, ApiError::OutOfRange { min: 1, max: 20 }));
    }

    #[test]
    fn test_session_error_conversion() {
        let err: ApiError = SessionError::MissingClientId.into();
        assert!(matches!(err, ApiError::MissingClientId));
    }
}
