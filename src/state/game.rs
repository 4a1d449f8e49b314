use super::{score, AppState, ResetKind, StateError};
use crate::types::*;

impl AppState {
    /// Pick the participant who answers. Cancels any pending reset so a
    /// reset scheduled for the previous answer cannot clobber this pick.
    pub async fn select(&self, id: ParticipantId) -> Result<(), StateError> {
        let mut shared = self.shared.write().await;
        if shared.participant(id).is_none() {
            return Err(StateError::UnknownParticipant(id));
        }

        self.cancel_pending_reset();
        shared.selected_participant = Some(id);
        shared.game_state = GameState::Selected;
        shared.show_answer = false;

        tracing::info!("Participant {} selected", id);
        self.persist(&shared).await;
        Ok(())
    }

    /// Award the correct-answer points to the selected participant and
    /// schedule the advance to the next question
    pub async fn mark_correct(&self) -> Result<Participant, StateError> {
        let mut shared = self.shared.write().await;
        let id = shared.selected_participant.ok_or(StateError::NoSelection)?;
        let delta = self.config.correct_delta;
        let participant = shared
            .participant_mut(id)
            .ok_or(StateError::UnknownParticipant(id))?;
        participant.score = score::award(participant.score, delta);
        let updated = participant.clone();

        shared.game_state = GameState::Correct;
        if self.config.reveals_answer {
            shared.show_answer = true;
        }

        tracing::info!(
            "Participant {} correct (+{}), score {}",
            id,
            delta,
            updated.score
        );
        self.persist(&shared).await;
        self.schedule_reset(ResetKind::Advance, self.config.correct_delay);
        Ok(updated)
    }

    /// Deduct the incorrect-answer points from the selected participant and
    /// schedule the return to waiting on the same question
    pub async fn mark_incorrect(&self) -> Result<Participant, StateError> {
        let mut shared = self.shared.write().await;
        let id = shared.selected_participant.ok_or(StateError::NoSelection)?;
        let delta = self.config.incorrect_delta;
        let floor = self.config.floor_at_zero;
        let participant = shared
            .participant_mut(id)
            .ok_or(StateError::UnknownParticipant(id))?;
        participant.score = score::deduct(participant.score, delta, floor);
        let updated = participant.clone();

        shared.game_state = GameState::Incorrect;
        shared.show_answer = false;

        tracing::info!(
            "Participant {} incorrect (-{}), score {}",
            id,
            delta,
            updated.score
        );
        self.persist(&shared).await;
        self.schedule_reset(ResetKind::Stay, self.config.incorrect_delay);
        Ok(updated)
    }

    /// Manual "next question" button. Leaves the judging phase alone.
    pub async fn next_question(&self) -> usize {
        let mut shared = self.shared.write().await;
        let count = self.config.question_count().max(1);
        shared.current_question_index = (shared.current_question_index + 1) % count;
        shared.show_answer = false;

        tracing::info!(
            "Advanced to question {} of {}",
            shared.current_question_index + 1,
            count
        );
        self.persist(&shared).await;
        shared.current_question_index
    }

    /// Start over: scores zeroed, first question, nobody selected.
    /// Participant names are kept.
    pub async fn reset_game(&self) {
        let mut shared = self.shared.write().await;
        self.cancel_pending_reset();

        for participant in shared.participants.iter_mut() {
            participant.score = 0;
        }
        shared.current_question_index = 0;
        shared.selected_participant = None;
        shared.game_state = GameState::Waiting;
        shared.show_answer = false;

        tracing::info!("Game reset");
        self.persist(&shared).await;
    }

    /// The question currently on screen
    pub async fn current_question(&self) -> Option<Question> {
        let index = self.shared.read().await.current_question_index;
        self.config.questions.get(index).cloned()
    }
}
