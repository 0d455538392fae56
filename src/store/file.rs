//! JSON Flat-File Store
//!
//! The whole profile map lives in one pretty-printed JSON file under the
//! data directory. The file is self-initializing, and an unreadable or
//! corrupted file recovers silently to an empty map - a lost read beats
//! a crashed game server.
//!
//! Read-modify-write cycles go through [`JsonFileStore::update`], which
//! holds an internal mutex across load, mutate, and save so concurrent
//! handlers cannot clobber each other's writes.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::warn;

use crate::store::profile::ProfileMap;

/// File name of the profile record inside the data directory.
pub const STORE_FILE: &str = "user_data.json";

/// Store I/O failures. Fatal for the current request, never retried.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem failure while reading or writing the record.
    #[error("store i/o failed: {0}")]
    Io(#[from] std::io::Error),

    /// The in-memory map failed to serialize.
    #[error("store encoding failed: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Flat-file profile store.
pub struct JsonFileStore {
    path: PathBuf,
    write_guard: Mutex<()>,
}

impl JsonFileStore {
    /// Create a store rooted at `data_dir`. Nothing is touched on disk
    /// until the first read or write.
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            path: data_dir.as_ref().join(STORE_FILE),
            write_guard: Mutex::new(()),
        }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Make sure the data directory and the record file exist.
    async fn ensure_file(&self) -> Result<(), StoreError> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir).await?;
            }
        }

        match fs::metadata(&self.path).await {
            Ok(_) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                fs::write(&self.path, "{}").await?;
                Ok(())
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Load the complete profile map.
    ///
    /// A file that fails to parse is treated as empty; the corruption is
    /// logged and overwritten by the next save.
    pub async fn load(&self) -> Result<ProfileMap, StoreError> {
        self.ensure_file().await?;
        let raw = fs::read_to_string(&self.path).await?;

        match serde_json::from_str(&raw) {
            Ok(profiles) => Ok(profiles),
            Err(err) => {
                warn!(path = %self.path.display(), %err, "profile record unreadable, starting empty");
                Ok(ProfileMap::new())
            }
        }
    }

    /// Persist the complete profile map. No partial updates.
    pub async fn save(&self, profiles: &ProfileMap) -> Result<(), StoreError> {
        self.ensure_file().await?;
        let raw = serde_json::to_string_pretty(profiles)?;
        fs::write(&self.path, raw).await?;
        Ok(())
    }

    /// Run one serialized read-modify-write cycle.
    ///
    /// The mutex is held across load, `mutate`, and save, so cycles from
    /// concurrent requests are applied one at a time.
    pub async fn update<T>(
        &self,
        mutate: impl FnOnce(&mut ProfileMap) -> T,
    ) -> Result<T, StoreError> {
        let _guard = self.write_guard.lock().await;
        let mut profiles = self.load().await?;
        let out = mutate(&mut profiles);
        self.save(&profiles).await?;
        Ok(out)
    }
}

// =============================================================================
// TESTS
// =============================================================================
