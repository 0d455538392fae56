//! Endpoint Orchestration
//!
//! One handler per endpoint. Handlers wire the session registry, the
//! game engine, and the profile store together; the rules they enforce
//! live in those modules.
//!
//! Round-ending guesses run in two phases: the session transition
//! happens under the registry lock (the active game is consumed there),
//! then the profile write happens under the store lock. A race between
//! two sessions acting on one username is accepted; see the store's
//! serialization notes.

use axum::extract::State;
use axum::response::Html;
use axum::Json;
use tracing::info;

use crate::game::difficulty::Difficulty;
use crate::game::engine::{ActiveGame, GuessOutcome};
use crate::network::error::ApiError;
use crate::network::protocol::{
    parse_guess, AccountRequest, AccountResponse, AckResponse, ClientRef, ForfeitResponse,
    GameParams, GuessReply, GuessRequest, GuessResponse, HistoryResponse,
    LeaderboardResponse, ProfileResponse, ProfileSummary, StartRequest, StartResponse,
};
use crate::network::server::AppState;
use crate::store::leaderboard::ranking;
use crate::store::profile::Profile;

/// Minimal page shell served at the root. The real front-end is a static
/// bundle deployed separately; this keeps a bare server navigable.
const INDEX_HTML: &str = r#"<!doctype html>
<html>
  <head>
    <meta charset="utf-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1" />
    <title>Hi-Lo</title>
  </head>
  <body>
    <h1>Hi-Lo server is running</h1>
    <p>The API lives under <code>/api</code>.</p>
  </body>
</html>"#;

/// `GET /` - static page shell.
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// `GET /api/leaderboard` - the full board.
pub async fn leaderboard(
    State(app): State<AppState>,
) -> Result<Json<LeaderboardResponse>, ApiError> {
    let profiles = app.store.load().await?;
    Ok(Json(LeaderboardResponse {
        ok: true,
        leaderboard: ranking(&profiles, None),
    }))
}

// =============================================================================
// ACCOUNTS
// =============================================================================

/// `POST /api/create` - new profile, logged in on success.
pub async fn create(
    State(app): State<AppState>,
    Json(req): Json<AccountRequest>,
) -> Result<Json<AccountResponse>, ApiError> {
    app.sessions.get(&req.client_id).await?;

    let username = req.username.trim().to_string();
    if username.is_empty() {
        return Err(ApiError::UsernameEmpty);
    }

    let profile = app
        .store
        .update(|profiles| {
            if profiles.contains_key(&username) {
                return Err(ApiError::UsernameTaken);
            }
            let profile = Profile::new();
            profiles.insert(username.clone(), profile.clone());
            Ok(profile)
        })
        .await??;

    app.sessions
        .mutate(&req.client_id, |session| session.login(&username))
        .await?;

    info!(%username, "profile created");
    Ok(Json(AccountResponse {
        ok: true,
        username,
        profile,
    }))
}

/// `POST /api/login` - log into an existing profile.
pub async fn login(
    State(app): State<AppState>,
    Json(req): Json<AccountRequest>,
) -> Result<Json<AccountResponse>, ApiError> {
    app.sessions.get(&req.client_id).await?;

    let username = req.username.trim().to_string();
    if username.is_empty() {
        return Err(ApiError::UsernameEmpty);
    }

    let profile = app
        .store
        .update(|profiles| {
            profiles.get_mut(&username).map(|p| {
                p.resync_totals();
                p.touch();
                p.clone()
            })
        })
        .await?
        .ok_or(ApiError::UnknownLogin)?;

    app.sessions
        .mutate(&req.client_id, |session| session.login(&username))
        .await?;

    info!(%username, "logged in");
    Ok(Json(AccountResponse {
        ok: true,
        username,
        profile,
    }))
}

/// `POST /api/logout` - clear login and any round in progress.
pub async fn logout(
    State(app): State<AppState>,
    Json(req): Json<ClientRef>,
) -> Result<Json<AckResponse>, ApiError> {
    app.sessions
        .mutate(&req.client_id, |session| session.logout())
        .await?;
    Ok(Json(AckResponse::ok()))
}

/// `POST /api/delete` - remove a profile; logs the caller out if it was
/// their own.
pub async fn delete(
    State(app): State<AppState>,
    Json(req): Json<AccountRequest>,
) -> Result<Json<AckResponse>, ApiError> {
    app.sessions.get(&req.client_id).await?;

    let username = req.username.trim().to_string();
    let removed = app
        .store
        .update(|profiles| profiles.remove(&username).is_some())
        .await?;
    if !removed {
        return Err(ApiError::UserNotFound);
    }

    app.sessions
        .mutate(&req.client_id, |session| {
            if session.username.as_deref() == Some(username.as_str()) {
                session.logout();
            }
        })
        .await?;

    info!(%username, "profile deleted");
    Ok(Json(AckResponse::ok()))
}

// =============================================================================
// PROFILE VIEWS
// =============================================================================

/// `POST /api/player_history` - the logged-in player's own summary and
/// history, self-healed and persisted on the way out.
pub async fn player_history(
    State(app): State<AppState>,
    Json(req): Json<ClientRef>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let session = app.sessions.get(&req.client_id).await?;
    let username = session.username.ok_or(ApiError::NotLoggedIn)?;

    let profile = app
        .store
        .update(|profiles| {
            profiles.get_mut(&username).map(|p| {
                p.resync_totals();
                p.clone()
            })
        })
        .await?
        .ok_or(ApiError::UserNotFound)?;

    Ok(Json(HistoryResponse {
        ok: true,
        username,
        summary: profile.summary(),
        history: profile.history,
    }))
}

/// `POST /api/profile` - any profile's detailed view; requires login.
pub async fn profile(
    State(app): State<AppState>,
    Json(req): Json<AccountRequest>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let session = app.sessions.get(&req.client_id).await?;
    if session.username.is_none() {
        return Err(ApiError::NotLoggedIn);
    }

    let username = req.username.trim().to_string();
    if username.is_empty() {
        return Err(ApiError::MissingUsername);
    }

    let profile = app
        .store
        .update(|profiles| {
            profiles.get_mut(&username).map(|p| {
                p.resync_totals();
                p.clone()
            })
        })
        .await?
        .ok_or(ApiError::UserNotFound)?;

    let stats = profile.summary();
    let summary = ProfileSummary {
        total_score: profile.total_score,
        total_games: stats.total_games,
        wins: stats.wins,
        losses: stats.losses,
        win_pct: stats.win_pct,
        lose_pct: stats.lose_pct,
        avg_time: stats.avg_time,
        date_created: profile.date_created.clone(),
        last_played: profile.last_played.clone(),
    };
    let recent = profile.recent(10);

    Ok(Json(ProfileResponse {
        ok: true,
        username,
        summary,
        history: profile.history,
        recent,
    }))
}

// =============================================================================
// GAMEPLAY
// =============================================================================

/// `POST /api/start` - begin a round, replacing any round in progress.
pub async fn start(
    State(app): State<AppState>,
    Json(req): Json<StartRequest>,
) -> Result<Json<StartResponse>, ApiError> {
    let difficulty = Difficulty::from_label(&req.difficulty);

    let game = app
        .sessions
        .mutate(&req.client_id, |session| {
            if session.username.is_none() {
                return Err(ApiError::NotLoggedIn);
            }
            let game = ActiveGame::start(difficulty, app.secrets.as_ref());
            let params = game.clone();
            session.active_game = Some(game);
            Ok(params)
        })
        .await??;

    let settings = game.settings();
    Ok(Json(StartResponse {
        ok: true,
        game: GameParams {
            difficulty: difficulty.as_str().to_string(),
            range_min: settings.range_min,
            range_max: settings.range_max,
            max_guesses: settings.max_guesses,
            base_points: game.base_points(),
        },
    }))
}

/// What a guess left behind after the session-side transition.
enum Evaluated {
    /// Round won; profile must be credited.
    Win {
        username: String,
        earned: u64,
        time_taken: f64,
        difficulty: Difficulty,
    },
    /// Budget exhausted; a loss must be recorded.
    Lose {
        username: String,
        secret: i64,
        time_taken: f64,
        difficulty: Difficulty,
        guesses: Vec<i64>,
    },
    /// Round continues; nothing to persist.
    Miss { reply: GuessReply },
}

/// `POST /api/guess` - evaluate one guess.
pub async fn guess(
    State(app): State<AppState>,
    Json(req): Json<GuessRequest>,
) -> Result<Json<GuessResponse>, ApiError> {
    // Phase 1: session-side transition under the registry lock.
    let evaluated = app
        .sessions
        .mutate(&req.client_id, |session| {
            let username = session.username.clone().ok_or(ApiError::NotLoggedIn)?;
            let game = session.active_game.as_mut().ok_or(ApiError::NoActiveGame)?;
            let guess = parse_guess(&req.guess).ok_or(ApiError::InvalidGuess)?;

            let outcome = game.submit(guess)?;
            let time_taken = game.elapsed_secs();
            let difficulty = game.difficulty();
            let secret = game.secret();
            let guesses = game.guess_history().to_vec();

            Ok::<Evaluated, ApiError>(match outcome {
                GuessOutcome::Win { earned, .. } => {
                    session.active_game = None;
                    Evaluated::Win {
                        username,
                        earned,
                        time_taken,
                        difficulty,
                    }
                }
                GuessOutcome::Lose => {
                    session.active_game = None;
                    Evaluated::Lose {
                        username,
                        secret,
                        time_taken,
                        difficulty,
                        guesses,
                    }
                }
                GuessOutcome::TooLow { hint, remaining } => Evaluated::Miss {
                    reply: GuessReply::Low {
                        message: "Too low.".to_string(),
                        hint: hint.message(),
                        history: guesses,
                        remaining,
                    },
                },
                GuessOutcome::TooHigh { hint, remaining } => Evaluated::Miss {
                    reply: GuessReply::High {
                        message: "Too high.".to_string(),
                        hint: hint.message(),
                        history: guesses,
                        remaining,
                    },
                },
            })
        })
        .await??;

    // Phase 2: persist terminal outcomes under the store lock.
    let reply = match evaluated {
        Evaluated::Win {
            username,
            earned,
            time_taken,
            difficulty,
        } => {
            let (profile, board) = app
                .store
                .update(|profiles| {
                    let profile = profiles.get_mut(&username).map(|p| {
                        p.total_score += earned;
                        p.touch();
                        p.append_outcome(true, earned, Some(time_taken), difficulty.as_str());
                        p.resync_totals();
                        p.clone()
                    });
                    (profile, ranking(profiles, None))
                })
                .await?;
            let profile = profile.ok_or(ApiError::ProfileMissing)?;

            info!(%username, earned, time_taken, "round won");
            GuessReply::Win {
                message: "Correct!".to_string(),
                earned,
                time_taken,
                profile,
                leaderboard: board,
            }
        }
        Evaluated::Lose {
            username,
            secret,
            time_taken,
            difficulty,
            guesses,
        } => {
            let (profile, board) = app
                .store
                .update(|profiles| {
                    let profile = profiles.get_mut(&username).map(|p| {
                        p.touch();
                        p.append_outcome(false, 0, Some(time_taken), difficulty.as_str());
                        p.resync_totals();
                        p.clone()
                    });
                    (profile, ranking(profiles, None))
                })
                .await?;

            info!(%username, secret, "round lost");
            GuessReply::Lose {
                message: format!(
                    "Game over! You ran out of guesses. The number was {secret}."
                ),
                history: guesses,
                remaining: 0,
                profile,
                leaderboard: board,
            }
        }
        Evaluated::Miss { reply } => reply,
    };

    Ok(Json(GuessResponse { ok: true, reply }))
}

/// `POST /api/forfeit` - give up the round; records a loss.
pub async fn forfeit(
    State(app): State<AppState>,
    Json(req): Json<ClientRef>,
) -> Result<Json<ForfeitResponse>, ApiError> {
    let (username, secret, time_taken, difficulty) = app
        .sessions
        .mutate(&req.client_id, |session| {
            let username = session.username.clone().ok_or(ApiError::NotLoggedIn)?;
            let game = session.active_game.take().ok_or(ApiError::NoActiveGame)?;
            Ok::<_, ApiError>((
                username,
                game.secret(),
                game.elapsed_secs(),
                game.difficulty(),
            ))
        })
        .await??;

    // The profile may have been deleted mid-round; the forfeit still
    // succeeds, it just has nothing to record against.
    let profile = app
        .store
        .update(|profiles| {
            profiles.get_mut(&username).map(|p| {
                p.touch();
                p.append_outcome(false, 0, Some(time_taken), difficulty.as_str());
                p.resync_totals();
                p.clone()
            })
        })
        .await?;

    info!(%username, secret, "round forfeited");
    Ok(Json(ForfeitResponse {
        ok: true,
        status: "lose",
        message: format!("Game over. The number was {secret}."),
        profile,
    }))
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::core::rng::ScriptedSource;
    use axum::http::StatusCode;
    use serde_json::json;

    const CLIENT: &str = "client-1";

    fn test_app(secrets: impl IntoIterator<Item = i64>) -> (tempfile::TempDir, AppState) {
        let dir = tempfile::tempdir().unwrap();
        let app = AppState::with_secrets(dir.path(), Arc::new(ScriptedSource::new(secrets)));
        (dir, app)
    }

    async fn create_user(app: &AppState, client: &str, username: &str) {
        create(
            State(app.clone()),
            Json(AccountRequest {
                client_id: client.to_string(),
                username: username.to_string(),
            }),
        )
        .await
        .unwrap();
    }

    async fn start_game(app: &AppState, client: &str, difficulty: &str) -> StartResponse {
        start(
            State(app.clone()),
            Json(StartRequest {
                client_id: client.to_string(),
                difficulty: difficulty.to_string(),
            }),
        )
        .await
        .unwrap()
        .0
    }

    async fn submit_guess(
        app: &AppState,
        client: &str,
        value: serde_json::Value,
    ) -> Result<GuessResponse, ApiError> {
        guess(
            State(app.clone()),
            Json(GuessRequest {
                client_id: client.to_string(),
                guess: value,
            }),
        )
        .await
        .map(|json| json.0)
    }

    #[tokio::test]
    async fn test_end_to_end_hard_first_try() {
        // create alice -> start hard (1-30, 3 guesses, mult 3) -> win on
        // the first guess: earned = 30 + 2*2 = 34.
        let (_dir, app) = test_app([17]);
        create_user(&app, CLIENT, "alice").await;

        let started = start_game(&app, CLIENT, "hard").await;
        assert_eq!(started.game.range_min, 1);
        assert_eq!(started.game.range_max, 30);
        assert_eq!(started.game.max_guesses, 3);
        assert_eq!(started.game.base_points, 30);

        let response = submit_guess(&app, CLIENT, json!(17)).await.unwrap();
        match response.reply {
            GuessReply::Win {
                earned,
                profile,
                leaderboard,
                ..
            } => {
                assert_eq!(earned, 34);
                assert_eq!(profile.total_score, 34);
                assert_eq!(profile.total_games, 1);
                assert_eq!(profile.games_won, 1);
                assert_eq!(profile.history.len(), 1);
                assert!(profile.history[0].won);
                assert_eq!(profile.history[0].score, 34);
                assert_eq!(profile.history[0].difficulty, "hard");

                assert_eq!(leaderboard.len(), 1);
                assert_eq!(leaderboard[0].username, "alice");
                assert_eq!(leaderboard[0].total_score, 34);
            }
            other => panic!("expected win, got {other:?}"),
        }

        // The round was consumed.
        let session = app.sessions.get(CLIENT).await.unwrap();
        assert!(session.active_game.is_none());
    }

    #[tokio::test]
    async fn test_unknown_difficulty_starts_as_easy() {
        let (_dir, app) = test_app([5]);
        create_user(&app, CLIENT, "alice").await;

        let started = start_game(&app, CLIENT, "nightmare").await;

        assert_eq!(started.game.difficulty, "easy");
        assert_eq!(started.game.range_max, 20);
        assert_eq!(started.game.max_guesses, 5);
        assert_eq!(started.game.base_points, 10);
    }

    #[tokio::test]
    async fn test_start_requires_login() {
        let (_dir, app) = test_app([5]);

        let result = start(
            State(app.clone()),
            Json(StartRequest {
                client_id: CLIENT.to_string(),
                difficulty: "easy".to_string(),
            }),
        )
        .await;

        let err = result.unwrap_err();
        assert!(matches!(err, ApiError::NotLoggedIn));
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_guess_without_game_rejected() {
        let (_dir, app) = test_app([5]);
        create_user(&app, CLIENT, "alice").await;

        let err = submit_guess(&app, CLIENT, json!(5)).await.unwrap_err();

        assert!(matches!(err, ApiError::NoActiveGame));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_non_numeric_guess_rejected() {
        let (_dir, app) = test_app([5]);
        create_user(&app, CLIENT, "alice").await;
        start_game(&app, CLIENT, "easy").await;

        let err = submit_guess(&app, CLIENT, json!("banana")).await.unwrap_err();

        assert!(matches!(err, ApiError::InvalidGuess));
    }

    #[tokio::test]
    async fn test_out_of_range_guess_consumes_nothing() {
        let (_dir, app) = test_app([10]);
        create_user(&app, CLIENT, "alice").await;
        start_game(&app, CLIENT, "easy").await;

        let err = submit_guess(&app, CLIENT, json!(25)).await.unwrap_err();
        assert!(matches!(err, ApiError::OutOfRange { min: 1, max: 20 }));

        // All five guesses are still available: a first-guess win keeps
        // the full unused-guess bonus (10 + 4*2 = 18).
        let response = submit_guess(&app, CLIENT, json!(10)).await.unwrap();
        match response.reply {
            GuessReply::Win { earned, .. } => assert_eq!(earned, 18),
            other => panic!("expected win, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_miss_returns_hint_and_keeps_game() {
        let (_dir, app) = test_app([10]);
        create_user(&app, CLIENT, "alice").await;
        start_game(&app, CLIENT, "easy").await;

        let response = submit_guess(&app, CLIENT, json!(12)).await.unwrap();
        match response.reply {
            GuessReply::High {
                hint,
                remaining,
                history,
                ..
            } => {
                assert_eq!(hint, "Very close!");
                assert_eq!(remaining, 4);
                assert_eq!(history, vec![12]);
            }
            other => panic!("expected high, got {other:?}"),
        }

        let response = submit_guess(&app, CLIENT, json!(1)).await.unwrap();
        match response.reply {
            GuessReply::Low { hint, .. } => assert_eq!(hint, "Getting warm!"),
            other => panic!("expected low, got {other:?}"),
        }

        let session = app.sessions.get(CLIENT).await.unwrap();
        assert!(session.active_game.is_some());
    }

    #[tokio::test]
    async fn test_exhausting_guesses_records_loss() {
        let (_dir, app) = test_app([30]);
        create_user(&app, CLIENT, "alice").await;
        start_game(&app, CLIENT, "hard").await;

        submit_guess(&app, CLIENT, json!(1)).await.unwrap();
        submit_guess(&app, CLIENT, json!(2)).await.unwrap();
        let response = submit_guess(&app, CLIENT, json!(3)).await.unwrap();

        match response.reply {
            GuessReply::Lose {
                message,
                history,
                remaining,
                profile,
                ..
            } => {
                assert!(message.contains("The number was 30."));
                assert_eq!(history, vec![1, 2, 3]);
                assert_eq!(remaining, 0);

                let profile = profile.expect("profile still exists");
                assert_eq!(profile.total_score, 0);
                assert_eq!(profile.total_games, 1);
                assert_eq!(profile.games_won, 0);
                assert!(!profile.history[0].won);
                assert_eq!(profile.history[0].score, 0);
            }
            other => panic!("expected lose, got {other:?}"),
        }

        let session = app.sessions.get(CLIENT).await.unwrap();
        assert!(session.active_game.is_none());
    }

    #[tokio::test]
    async fn test_forfeit_records_loss_and_reveals_secret() {
        let (_dir, app) = test_app([22]);
        create_user(&app, CLIENT, "alice").await;
        start_game(&app, CLIENT, "extreme").await;

        let response = forfeit(
            State(app.clone()),
            Json(ClientRef {
                client_id: CLIENT.to_string(),
            }),
        )
        .await
        .unwrap()
        .0;

        assert_eq!(response.status, "lose");
        assert!(response.message.contains("The number was 22."));
        let profile = response.profile.expect("profile still exists");
        assert_eq!(profile.total_games, 1);
        assert!(!profile.history[0].won);
        assert_eq!(profile.history[0].difficulty, "extreme");

        // No second forfeit: the round was consumed.
        let err = forfeit(
            State(app.clone()),
            Json(ClientRef {
                client_id: CLIENT.to_string(),
            }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::NoActiveGame));
    }

    #[tokio::test]
    async fn test_forfeit_survives_deleted_profile() {
        let (_dir, app) = test_app([7]);
        create_user(&app, CLIENT, "alice").await;
        start_game(&app, CLIENT, "easy").await;

        // Someone else deletes alice mid-round.
        delete(
            State(app.clone()),
            Json(AccountRequest {
                client_id: "client-2".to_string(),
                username: "alice".to_string(),
            }),
        )
        .await
        .unwrap();

        let response = forfeit(
            State(app.clone()),
            Json(ClientRef {
                client_id: CLIENT.to_string(),
            }),
        )
        .await
        .unwrap()
        .0;

        assert!(response.ok);
        assert!(response.profile.is_none());
    }

    #[tokio::test]
    async fn test_win_after_profile_vanishes_is_internal_error() {
        let (_dir, app) = test_app([7]);
        create_user(&app, CLIENT, "alice").await;
        start_game(&app, CLIENT, "easy").await;

        delete(
            State(app.clone()),
            Json(AccountRequest {
                client_id: "client-2".to_string(),
                username: "alice".to_string(),
            }),
        )
        .await
        .unwrap();

        let err = submit_guess(&app, CLIENT, json!(7)).await.unwrap_err();
        assert!(matches!(err, ApiError::ProfileMissing));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_create_rejects_blank_and_duplicate() {
        let (_dir, app) = test_app([]);
        create_user(&app, CLIENT, "alice").await;

        let err = create(
            State(app.clone()),
            Json(AccountRequest {
                client_id: CLIENT.to_string(),
                username: "   ".to_string(),
            }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::UsernameEmpty));

        let err = create(
            State(app.clone()),
            Json(AccountRequest {
                client_id: "client-2".to_string(),
                username: "alice".to_string(),
            }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::UsernameTaken));
    }

    #[tokio::test]
    async fn test_login_unknown_user_404() {
        let (_dir, app) = test_app([]);

        let err = login(
            State(app.clone()),
            Json(AccountRequest {
                client_id: CLIENT.to_string(),
                username: "ghost".to_string(),
            }),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, ApiError::UnknownLogin));
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_login_discards_round_in_progress() {
        let (_dir, app) = test_app([5]);
        create_user(&app, CLIENT, "alice").await;
        start_game(&app, CLIENT, "easy").await;

        login(
            State(app.clone()),
            Json(AccountRequest {
                client_id: CLIENT.to_string(),
                username: "alice".to_string(),
            }),
        )
        .await
        .unwrap();

        let session = app.sessions.get(CLIENT).await.unwrap();
        assert!(session.active_game.is_none());
    }

    #[tokio::test]
    async fn test_delete_own_account_logs_session_out() {
        let (_dir, app) = test_app([5]);
        create_user(&app, CLIENT, "alice").await;
        start_game(&app, CLIENT, "easy").await;

        delete(
            State(app.clone()),
            Json(AccountRequest {
                client_id: CLIENT.to_string(),
                username: "alice".to_string(),
            }),
        )
        .await
        .unwrap();

        let session = app.sessions.get(CLIENT).await.unwrap();
        assert!(session.username.is_none());
        assert!(session.active_game.is_none());
    }

    #[tokio::test]
    async fn test_delete_other_account_keeps_session() {
        let (_dir, app) = test_app([]);
        create_user(&app, CLIENT, "alice").await;
        create_user(&app, "client-2", "bob").await;

        delete(
            State(app.clone()),
            Json(AccountRequest {
                client_id: CLIENT.to_string(),
                username: "bob".to_string(),
            }),
        )
        .await
        .unwrap();

        let session = app.sessions.get(CLIENT).await.unwrap();
        assert_eq!(session.username.as_deref(), Some("alice"));
    }

    #[tokio::test]
    async fn test_delete_unknown_user_404() {
        let (_dir, app) = test_app([]);

        let err = delete(
            State(app.clone()),
            Json(AccountRequest {
                client_id: CLIENT.to_string(),
                username: "ghost".to_string(),
            }),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, ApiError::UserNotFound));
    }

    #[tokio::test]
    async fn test_missing_client_id_rejected_everywhere() {
        let (_dir, app) = test_app([]);

        let err = logout(
            State(app.clone()),
            Json(ClientRef {
                client_id: String::new(),
            }),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, ApiError::MissingClientId));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_player_history_reflects_outcomes() {
        let (_dir, app) = test_app([17, 30]);
        create_user(&app, CLIENT, "alice").await;

        // One win...
        start_game(&app, CLIENT, "hard").await;
        submit_guess(&app, CLIENT, json!(17)).await.unwrap();
        // ...and one forfeit.
        start_game(&app, CLIENT, "hard").await;
        forfeit(
            State(app.clone()),
            Json(ClientRef {
                client_id: CLIENT.to_string(),
            }),
        )
        .await
        .unwrap();

        let response = player_history(
            State(app.clone()),
            Json(ClientRef {
                client_id: CLIENT.to_string(),
            }),
        )
        .await
        .unwrap()
        .0;

        assert_eq!(response.summary.total_games, 2);
        assert_eq!(response.summary.wins, 1);
        assert_eq!(response.summary.losses, 1);
        assert_eq!(response.summary.win_pct, 50.0);
        assert_eq!(response.history.len(), 2);
    }

    #[tokio::test]
    async fn test_profile_view_requires_login_and_username() {
        let (_dir, app) = test_app([]);

        let err = profile(
            State(app.clone()),
            Json(AccountRequest {
                client_id: CLIENT.to_string(),
                username: "alice".to_string(),
            }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::NotLoggedIn));

        create_user(&app, CLIENT, "alice").await;
        let err = profile(
            State(app.clone()),
            Json(AccountRequest {
                client_id: CLIENT.to_string(),
                username: "  ".to_string(),
            }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::MissingUsername));
    }

    #[tokio::test]
    async fn test_profile_view_recent_is_newest_first() {
        let (_dir, app) = test_app([17, 5]);
        create_user(&app, CLIENT, "alice").await;

        start_game(&app, CLIENT, "hard").await;
        submit_guess(&app, CLIENT, json!(17)).await.unwrap();
        start_game(&app, CLIENT, "easy").await;
        submit_guess(&app, CLIENT, json!(5)).await.unwrap();

        let response = profile(
            State(app.clone()),
            Json(AccountRequest {
                client_id: CLIENT.to_string(),
                username: "alice".to_string(),
            }),
        )
        .await
        .unwrap()
        .0;

        assert_eq!(response.summary.total_games, 2);
        assert_eq!(response.recent.len(), 2);
        // Newest first: the easy round came last.
        assert_eq!(response.recent[0].difficulty, "easy");
        assert_eq!(response.recent[1].difficulty, "hard");
    }

    #[tokio::test]
    async fn test_leaderboard_orders_players() {
        let (_dir, app) = test_app([17, 5]);
        create_user(&app, "client-a", "alice").await;
        create_user(&app, "client-b", "bob").await;

        // alice wins hard first-try (34), bob wins easy first-try (18).
        start_game(&app, "client-a", "hard").await;
        submit_guess(&app, "client-a", json!(17)).await.unwrap();
        start_game(&app, "client-b", "easy").await;
        submit_guess(&app, "client-b", json!(5)).await.unwrap();

        let response = leaderboard(State(app.clone())).await.unwrap().0;

        assert_eq!(response.leaderboard.len(), 2);
        assert_eq!(response.leaderboard[0].username, "alice");
        assert_eq!(response.leaderboard[0].total_score, 34);
        assert_eq!(response.leaderboard[1].username, "bob");
        assert_eq!(response.leaderboard[1].total_score, 18);
    }

    #[tokio::test]
    async fn test_starting_twice_replaces_round_silently() {
        let (_dir, app) = test_app([5, 9]);
        create_user(&app, CLIENT, "alice").await;

        start_game(&app, CLIENT, "easy").await;
        start_game(&app, CLIENT, "easy").await;

        // The first round left no trace in the profile.
        let response = player_history(
            State(app.clone()),
            Json(ClientRef {
                client_id: CLIENT.to_string(),
            }),
        )
        .await
        .unwrap()
        .0;
        assert_eq!(response.summary.total_games, 0);

        // The live round holds the second secret.
        let session = app.sessions.get(CLIENT).await.unwrap();
        assert_eq!(session.active_game.unwrap().secret(), 9);
    }
}
