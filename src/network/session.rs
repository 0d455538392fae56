//! Session Registry
//!
//! Process-wide map from client identifier to ephemeral session state:
//! who is logged in and the round in progress, if any. Sessions are
//! created lazily, never expire, and are lost on restart - only profiles
//! survive in the store.

use std::collections::BTreeMap;

use thiserror::Error;
use tokio::sync::RwLock;

use crate::game::engine::ActiveGame;

/// Ephemeral per-client state.
#[derive(Debug, Clone, Default)]
pub struct Session {
    /// Username this client is logged in as, if any.
    pub username: Option<String>,
    /// The round in progress, if any. At most one per session.
    pub active_game: Option<ActiveGame>,
}

impl Session {
    /// Log in as `username`, discarding any round in progress.
    pub fn login(&mut self, username: &str) {
        self.username = Some(username.to_string());
        self.active_game = None;
    }

    /// Clear login and any round in progress. Idempotent.
    pub fn logout(&mut self) {
        self.username = None;
        self.active_game = None;
    }
}

/// Session lookup failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SessionError {
    /// The request carried no client identifier.
    #[error("Missing client_id")]
    MissingClientId,
}

/// Registry of all sessions, keyed by client identifier.
///
/// Mutation goes through a closure under the registry's write lock, so
/// one client's session transitions apply atomically. Current semantics
/// assume single-process affinity; swapping in a distributed cache means
/// reimplementing this type, not its call sites.
pub struct SessionRegistry {
    sessions: RwLock<BTreeMap<String, Session>>,
}

impl SessionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(BTreeMap::new()),
        }
    }

    /// Run `mutate` against the client's session, creating an empty
    /// session first if this client is new.
    pub async fn mutate<T>(
        &self,
        client_id: &str,
        mutate: impl FnOnce(&mut Session) -> T,
    ) -> Result<T, SessionError> {
        if client_id.is_empty() {
            return Err(SessionError::MissingClientId);
        }

        let mut sessions = self.sessions.write().await;
        let session = sessions.entry(client_id.to_string()).or_default();
        Ok(mutate(session))
    }

    /// Snapshot the client's session, creating it if absent.
    pub async fn get(&self, client_id: &str) -> Result<Session, SessionError> {
        self.mutate(client_id, |session| session.clone()).await
    }

    /// Number of sessions currently held.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// TESTS
// =============================================================================
