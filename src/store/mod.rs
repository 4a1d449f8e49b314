//! Persistent key-value store shared by the operator and public roles.
//!
//! The store holds one string per key. `StateStore` is the typed accessor the
//! rest of the crate goes through: it owns the key and the JSON encoding of
//! `SharedState`.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::types::SharedState;
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Storage I/O failed for key '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode state: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("Stored state under '{key}' is malformed: {source}")]
    Decode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Store is unavailable: {0}")]
    Unavailable(String),
}

/// Local string key-value store.
///
/// Reads must observe either nothing or the last fully written value for a
/// key, never a partial write.
pub trait KvStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Typed access to the `SharedState` record under one key
#[derive(Clone)]
pub struct StateStore {
    backend: Arc<dyn KvStore>,
    key: String,
}

impl StateStore {
    pub fn new(backend: Arc<dyn KvStore>, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Read and decode the record, surfacing every failure
    pub fn try_load(&self) -> Result<Option<SharedState>, StoreError> {
        let Some(raw) = self.backend.get(&self.key)? else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| StoreError::Decode {
                key: self.key.clone(),
                source,
            })
    }

    /// Read the record. Absent, unreadable and malformed entries all count
    /// as "no state".
    pub fn load(&self) -> Option<SharedState> {
        match self.try_load() {
            Ok(state) => state,
            Err(e) => {
                tracing::debug!("Ignoring stored state: {}", e);
                None
            }
        }
    }

    /// Overwrite the record with a full snapshot
    pub fn save(&self, state: &SharedState) -> Result<(), StoreError> {
        let json = serde_json::to_string(state).map_err(StoreError::Encode)?;
        self.backend.set(&self.key, &json)
    }

    /// `load` on the blocking pool, for callers running on the runtime
    pub async fn load_async(&self) -> Option<SharedState> {
        let store = self.clone();
        match tokio::task::spawn_blocking(move || store.load()).await {
            Ok(state) => state,
            Err(e) => {
                tracing::warn!("Store read for '{}' failed: {}", self.key, e);
                None
            }
        }
    }

    /// `save` on the blocking pool. The snapshot is encoded before handing
    /// off, so the caller's borrow ends here.
    pub async fn save_async(&self, state: &SharedState) -> Result<(), StoreError> {
        let json = serde_json::to_string(state).map_err(StoreError::Encode)?;
        let store = self.clone();
        tokio::task::spawn_blocking(move || store.backend.set(&store.key, &json))
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::GameState;

    #[tokio::test]
    async fn test_async_access_matches_sync() {
        let backend = Arc::new(MemoryStore::new());
        let store = StateStore::new(backend.clone(), "gameState");
        assert!(store.load_async().await.is_none());

        let mut state = SharedState::new(3);
        state.participants[1].score = 15;
        store.save_async(&state).await.unwrap();
        assert_eq!(store.load(), Some(state.clone()));
        assert_eq!(store.load_async().await, Some(state));

        backend.set("gameState", "[]").unwrap();
        assert!(store.load_async().await.is_none());
    }

    #[test]
    fn test_save_then_load() {
        let store = StateStore::new(Arc::new(MemoryStore::new()), "gameState");
        let mut state = SharedState::new(3);
        state.selected_participant = Some(1);
        state.game_state = GameState::Selected;

        store.save(&state).unwrap();
        assert_eq!(store.load(), Some(state));
    }

    #[test]
    fn test_load_missing_key() {
        let store = StateStore::new(Arc::new(MemoryStore::new()), "gameState");
        assert_eq!(store.load(), None);
        assert!(store.try_load().unwrap().is_none());
    }

    #[test]
    fn test_load_malformed_payload() {
        let backend = Arc::new(MemoryStore::new());
        backend.set("gameState", "{\"currentQuestionIndex\":").unwrap();
        let store = StateStore::new(backend, "gameState");

        assert_eq!(store.load(), None);
        assert!(matches!(
            store.try_load(),
            Err(StoreError::Decode { .. })
        ));
    }

    #[test]
    fn test_keys_are_independent() {
        let backend: Arc<dyn KvStore> = Arc::new(MemoryStore::new());
        let classic = StateStore::new(backend.clone(), "gameState");
        let science = StateStore::new(backend, "gameState8");

        let mut state = SharedState::new(3);
        state.current_question_index = 2;
        science.save(&state).unwrap();

        assert_eq!(classic.load(), None);
        assert_eq!(science.load().unwrap().current_question_index, 2);
    }
}
