//! Delayed auto-reset after a judged answer.
//!
//! At most one reset is pending at a time. Each scheduled reset carries the
//! epoch it was scheduled in; cancelling bumps the epoch, so a reset whose
//! task already woke up still refuses to apply.

use super::AppState;
use crate::types::GameState;
use std::sync::atomic::Ordering;
use std::time::Duration;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetKind {
    /// After a correct answer: move on to the next question
    Advance,
    /// After an incorrect answer: same question, open for another pick
    Stay,
}

pub(super) struct PendingReset {
    epoch: u64,
    handle: JoinHandle<()>,
}

impl AppState {
    /// Schedule a reset, replacing any pending one
    pub(super) fn schedule_reset(&self, kind: ResetKind, delay: Duration) {
        let epoch = self.reset_epoch.fetch_add(1, Ordering::SeqCst) + 1;
        let state = self.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            state.fire_reset(epoch, kind).await;
        });

        let previous = match self.pending_reset.lock() {
            Ok(mut slot) => slot.replace(PendingReset { epoch, handle }),
            Err(poisoned) => poisoned
                .into_inner()
                .replace(PendingReset { epoch, handle }),
        };
        if let Some(previous) = previous {
            tracing::debug!("Replacing pending reset from epoch {}", previous.epoch);
            previous.handle.abort();
        }
        tracing::debug!("Scheduled {:?} reset in {:?}", kind, delay);
    }

    /// Cancel the pending reset, if any
    pub(super) fn cancel_pending_reset(&self) {
        self.reset_epoch.fetch_add(1, Ordering::SeqCst);
        let pending = match self.pending_reset.lock() {
            Ok(mut slot) => slot.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        if let Some(pending) = pending {
            tracing::debug!("Cancelled pending reset from epoch {}", pending.epoch);
            pending.handle.abort();
        }
    }

    /// Whether a reset is scheduled and has not fired yet
    pub fn has_pending_reset(&self) -> bool {
        match self.pending_reset.lock() {
            Ok(slot) => slot.as_ref().is_some_and(|p| !p.handle.is_finished()),
            Err(_) => false,
        }
    }

    async fn fire_reset(&self, epoch: u64, kind: ResetKind) {
        let mut shared = self.shared.write().await;
        if self.reset_epoch.load(Ordering::SeqCst) != epoch {
            tracing::debug!("Dropping superseded reset from epoch {}", epoch);
            return;
        }

        shared.selected_participant = None;
        shared.game_state = GameState::Waiting;
        shared.show_answer = false;
        if kind == ResetKind::Advance {
            shared.current_question_index =
                (shared.current_question_index + 1) % self.config.question_count().max(1);
        }

        tracing::info!(
            "Auto reset ({:?}): waiting on question {}",
            kind,
            shared.current_question_index + 1
        );
        self.persist(&shared).await;

        if let Ok(mut slot) = self.pending_reset.lock() {
            if slot.as_ref().is_some_and(|p| p.epoch == epoch) {
                slot.take();
            }
        }
    }
}
