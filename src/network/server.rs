//! HTTP Server
//!
//! Configuration, shared state, the axum router, and the serve loop.
//! Everything here is plumbing around the game; the rules live in
//! `game/` and `store/`.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::http::{header, Method};
use axum::routing::{get, post};
use axum::Router;
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::core::rng::{SecretSource, ThreadRngSource};
use crate::network::handlers;
use crate::network::session::SessionRegistry;
use crate::store::file::JsonFileStore;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Directory holding the profile record file.
    pub data_dir: PathBuf,
    /// HTTP listen port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            port: 5000,
        }
    }
}

impl ServerConfig {
    /// Create config from environment variables.
    ///
    /// `DATA_DIR` sets the data directory (default `.`), `PORT` the
    /// listen port (default 5000).
    pub fn from_env() -> Self {
        Self {
            data_dir: std::env::var("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".")),
            port: std::env::var("PORT")
                .ok()
                .and_then(|raw| raw.parse().ok())
                .unwrap_or(5000),
        }
    }

    /// Socket address to bind.
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }
}

/// Server errors.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Failed to bind or serve.
    #[error("server i/o failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    /// Durable profile records.
    pub store: Arc<JsonFileStore>,
    /// Ephemeral per-client sessions.
    pub sessions: Arc<SessionRegistry>,
    /// Secret-number source for new rounds.
    pub secrets: Arc<dyn SecretSource>,
}

impl AppState {
    /// Production state: flat-file store under `data_dir`, thread RNG.
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self::with_secrets(data_dir, Arc::new(ThreadRngSource))
    }

    /// State with an injected secret source. Tests use this to make
    /// rounds deterministic.
    pub fn with_secrets(data_dir: impl AsRef<Path>, secrets: Arc<dyn SecretSource>) -> Self {
        Self {
            store: Arc::new(JsonFileStore::new(data_dir)),
            sessions: Arc::new(SessionRegistry::new()),
            secrets,
        }
    }
}

/// Build the router over the given state.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/leaderboard", get(handlers::leaderboard))
        .route("/api/player_history", post(handlers::player_history))
        .route("/api/profile", post(handlers::profile))
        .route("/api/create", post(handlers::create))
        .route("/api/login", post(handlers::login))
        .route("/api/logout", post(handlers::logout))
        .route("/api/start", post(handlers::start))
        .route("/api/guess", post(handlers::guess))
        .route("/api/forfeit", post(handlers::forfeit))
        .route("/api/delete", post(handlers::delete))
        .layer(
            CorsLayer::new()
                .allow_methods([Method::GET, Method::POST])
                .allow_headers([header::CONTENT_TYPE])
                .allow_origin(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and serve until the process is stopped.
pub async fn run(config: ServerConfig) -> Result<(), ServerError> {
    let state = AppState::new(&config.data_dir);
    let app = router(state);

    let addr = config.bind_addr();
    let listener = TcpListener::bind(addr).await?;
    info!("listening on http://{addr}");

    axum::serve(listener, app).await?;
    Ok(())
}
