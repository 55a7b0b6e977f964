//! Folder state persistence
//!
//! State is stored as one JSON document behind a small byte-oriented
//! backend. Loading never fails: a missing, corrupt, or newer-versioned
//! blob yields fresh empty state. Write failures are the only surfaced
//! errors.

use std::collections::HashMap;
use std::io;
use std::path::PathBuf;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::state::{FolderState, STATE_VERSION};

/// Well-known key the folder document lives under.
pub const STATE_KEY: &str = "folders";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to write folder state: {0}")]
    Write(#[from] io::Error),
    #[error("failed to serialize folder state: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Minimal keyed byte storage the folder store persists through.
#[async_trait]
pub trait StateBackend: Send + Sync {
    async fn get(&self, key: &str) -> io::Result<Option<Vec<u8>>>;
    async fn set(&self, key: &str, value: &[u8]) -> io::Result<()>;
}

/// Backend that keeps each key as a `<key>.json` file under a directory.
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

#[async_trait]
impl StateBackend for FileBackend {
    async fn get(&self, key: &str) -> io::Result<Option<Vec<u8>>> {
        match tokio::fs::read(self.path_for(key)).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn set(&self, key: &str, value: &[u8]) -> io::Result<()> {
        tokio::fs::create_dir_all(&self.dir).await?;
        tokio::fs::write(self.path_for(key), value).await
    }
}

/// In-memory backend for tests and embedders that persist elsewhere.
#[derive(Default)]
pub struct MemoryBackend {
    entries: Mutex<HashMap<String, Vec<u8>>>,
}

#[async_trait]
impl StateBackend for MemoryBackend {
    async fn get(&self, key: &str) -> io::Result<Option<Vec<u8>>> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &[u8]) -> io::Result<()> {
        self.entries
            .lock()
            .await
            .insert(key.to_string(), value.to_vec());
        Ok(())
    }
}

/// Loads and saves the folder document through a [`StateBackend`].
pub struct FolderStore {
    backend: Box<dyn StateBackend>,
}

impl FolderStore {
    pub fn new<B: StateBackend + 'static>(backend: B) -> Self {
        Self {
            backend: Box::new(backend),
        }
    }

    /// Load state, upgrading older versions in place. Anything unreadable
    /// (missing blob, parse failure, a version newer than this build
    /// understands) yields fresh empty state instead of an error.
    pub async fn load(&self) -> FolderState {
        let bytes = match self.backend.get(STATE_KEY).await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                tracing::debug!("no persisted folder state, starting fresh");
                return FolderState::empty();
            }
            Err(e) => {
                tracing::warn!("failed to read folder state, starting fresh: {e}");
                return FolderState::empty();
            }
        };

        let mut state: FolderState = match serde_json::from_slice(&bytes) {
            Ok(state) => state,
            Err(e) => {
                tracing::warn!("corrupt folder state, starting fresh: {e}");
                return FolderState::empty();
            }
        };

        if state.version > STATE_VERSION {
            tracing::warn!(
                version = state.version,
                supported = STATE_VERSION,
                "folder state written by a newer version, starting fresh"
            );
            return FolderState::empty();
        }

        if state.version < STATE_VERSION {
            tracing::info!(
                from = state.version,
                to = STATE_VERSION,
                "migrating folder state"
            );
        }
        state.migrate();
        state
    }

    pub async fn save(&self, state: &FolderState) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(state)?;
        self.backend.set(STATE_KEY, &bytes).await?;
        Ok(())
    }
}
