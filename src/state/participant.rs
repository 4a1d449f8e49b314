use super::{AppState, StateError};
use crate::types::*;

impl AppState {
    /// Replace a participant's display name. Free-form, applied as typed.
    pub async fn rename_participant(
        &self,
        id: ParticipantId,
        name: String,
    ) -> Result<Participant, StateError> {
        let mut shared = self.shared.write().await;
        let participant = shared
            .participant_mut(id)
            .ok_or(StateError::UnknownParticipant(id))?;
        participant.name = name;
        let updated = participant.clone();

        tracing::info!("Participant {} renamed to '{}'", id, updated.name);
        self.persist(&shared).await;
        Ok(updated)
    }

    /// Current roster in id order
    pub async fn participants(&self) -> Vec<Participant> {
        self.shared.read().await.participants.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::VariantConfig;
    use crate::store::{MemoryStore, StateStore};
    use std::sync::Arc;

    fn new_state() -> (AppState, StateStore) {
        let store = StateStore::new(Arc::new(MemoryStore::new()), "gameState");
        (AppState::new(VariantConfig::default(), store.clone()), store)
    }

    #[tokio::test]
    async fn test_rename_participant() {
        let (state, store) = new_state();

        let renamed = state
            .rename_participant(2, "Dewi".to_string())
            .await
            .unwrap();
        assert_eq!(renamed.name, "Dewi");
        assert_eq!(store.load().unwrap().participants[1].name, "Dewi");
    }

    #[tokio::test]
    async fn test_rename_accepts_anything() {
        let (state, _store) = new_state();

        let renamed = state.rename_participant(1, String::new()).await.unwrap();
        assert_eq!(renamed.name, "");

        let renamed = state
            .rename_participant(1, "  🎉 team rocket  ".to_string())
            .await
            .unwrap();
        assert_eq!(renamed.name, "  🎉 team rocket  ");
    }

    #[tokio::test]
    async fn test_rename_unknown_participant() {
        let (state, _store) = new_state();

        let result = state.rename_participant(4, "Nobody".to_string()).await;
        assert_eq!(result, Err(StateError::UnknownParticipant(4)));
        assert_eq!(state.participants().await.len(), 3);
    }
}
