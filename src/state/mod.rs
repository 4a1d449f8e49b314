mod game;
mod participant;
mod reset;
mod score;

pub use reset::ResetKind;
pub use score::{award, deduct};

use crate::config::VariantConfig;
use crate::store::{StateStore, StoreError};
use crate::types::*;
use std::sync::atomic::AtomicU64;
use std::sync::{Arc, Mutex};
use tokio::sync::{broadcast, RwLock};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StateError {
    #[error("Participant {0} is not in the roster")]
    UnknownParticipant(ParticipantId),

    #[error("No participant selected")]
    NoSelection,
}

/// Operator-side application state.
///
/// The operator is the only writer of `SharedState`. Every mutation is
/// persisted to the store and published on `snapshots` while the write lock is
/// still held, so observers see snapshots in mutation order.
#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<RwLock<SharedState>>,
    pub config: Arc<VariantConfig>,
    store: StateStore,
    /// Broadcast channel for public screens running in the same process
    pub snapshots: broadcast::Sender<SharedState>,
    pending_reset: Arc<Mutex<Option<reset::PendingReset>>>,
    reset_epoch: Arc<AtomicU64>,
}

impl AppState {
    /// Start a fresh session and overwrite whatever the store holds
    pub fn new(config: VariantConfig, store: StateStore) -> Self {
        let initial = SharedState::new(config.roster_size);
        let state = Self::with_state(config, store, initial.clone());
        state.persist_initial(&initial);
        state
    }

    /// Pick up the session stored under the variant's key, if any.
    ///
    /// The stored record is repaired against the current content before use,
    /// and written back so the public screen sees the repaired version.
    pub fn resume(config: VariantConfig, store: StateStore) -> Self {
        let initial = match store.load() {
            Some(mut stored) => {
                stored.normalize(config.question_count(), config.roster_size);
                tracing::info!(
                    "Resuming stored session at question {}",
                    stored.current_question_index + 1
                );
                stored
            }
            None => SharedState::new(config.roster_size),
        };
        let state = Self::with_state(config, store, initial.clone());
        state.persist_initial(&initial);
        state
    }

    fn with_state(config: VariantConfig, store: StateStore, initial: SharedState) -> Self {
        let (tx, _rx) = broadcast::channel(64);
        Self {
            shared: Arc::new(RwLock::new(initial)),
            config: Arc::new(config),
            store,
            snapshots: tx,
            pending_reset: Arc::new(Mutex::new(None)),
            reset_epoch: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Current state snapshot
    pub async fn snapshot(&self) -> SharedState {
        self.shared.read().await.clone()
    }

    /// Subscribe to every persisted snapshot
    pub fn subscribe(&self) -> broadcast::Receiver<SharedState> {
        self.snapshots.subscribe()
    }

    pub fn store(&self) -> &StateStore {
        &self.store
    }

    /// Write a full snapshot to the store and publish it in-process.
    ///
    /// Callers hold the write lock across this call, so the store sees
    /// snapshots in mutation order. Storage failures leave the in-memory
    /// state authoritative. The public screen keeps showing the last
    /// successful write until the next one.
    async fn persist(&self, state: &SharedState) {
        let result = self.store.save_async(state).await;
        self.publish(state, result);
    }

    // Startup write, before any task can observe the state
    fn persist_initial(&self, state: &SharedState) {
        let result = self.store.save(state);
        self.publish(state, result);
    }

    fn publish(&self, state: &SharedState, result: Result<(), StoreError>) {
        if let Err(e) = result {
            tracing::warn!("Failed to persist state under '{}': {}", self.store.key(), e);
        }
        // No in-process subscribers is fine
        let _ = self.snapshots.send(state.clone());
    }

    /// Stop background work; called when the operator view is torn down
    pub fn shutdown(&self) {
        self.cancel_pending_reset();
    }
}
