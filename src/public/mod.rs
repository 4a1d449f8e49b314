//! Audience-facing screen.
//!
//! The public role never writes state. It keeps the last snapshot it managed
//! to read, plus the previous game state so cues fire on transitions only.

mod poller;

pub use poller::{run_polling, run_subscribed, spawn_polling, spawn_subscribed, PollerHandle};

use crate::config::TriggerMode;
use crate::protocol::{Cue, PublicEffect};
use crate::types::{GameState, SharedState};
use std::sync::{Arc, Mutex};

/// Where the public screen sends its side effects.
///
/// Implementations must not block: cues are fire-and-forget, and a failing
/// audio device must not hold up the next poll.
pub trait Screen: Send {
    fn effect(&mut self, effect: PublicEffect);

    /// Called after a snapshot changed what the audience should see
    fn redraw(&mut self, _view: &PublicView) {}
}

/// Result of feeding one observation into the view
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Update {
    /// The displayed record differs from the previous one
    pub changed: bool,
    pub effects: Vec<PublicEffect>,
}

#[derive(Debug, Clone, Default)]
pub struct PublicView {
    trigger_mode: TriggerMode,
    /// Question count records are checked against; 0 skips the index check
    question_count: usize,
    display: Option<SharedState>,
    previous_game_state: Option<GameState>,
    show_vignette: bool,
}

impl PublicView {
    pub fn new(trigger_mode: TriggerMode) -> Self {
        Self {
            trigger_mode,
            ..Self::default()
        }
    }

    /// Reject records whose question index is outside `0..count`
    pub fn with_question_count(mut self, count: usize) -> Self {
        self.question_count = count;
        self
    }

    /// Last successfully read record
    pub fn display(&self) -> Option<&SharedState> {
        self.display.as_ref()
    }

    pub fn show_vignette(&self) -> bool {
        self.show_vignette
    }

    pub fn previous_game_state(&self) -> Option<GameState> {
        self.previous_game_state
    }

    /// Apply one read of the store.
    ///
    /// `None` (absent or malformed record) keeps the current display, and so
    /// does a record that breaks the selection or question-index invariants.
    /// A valid record replaces the display wholesale. The first record ever
    /// seen counts as a transition from nothing.
    pub fn observe(&mut self, snapshot: Option<SharedState>) -> Update {
        let Some(snapshot) = snapshot else {
            return Update::default();
        };
        if !snapshot.is_consistent(self.question_count) {
            tracing::debug!(
                "Ignoring inconsistent record (question {}, selected {:?}, {})",
                snapshot.current_question_index,
                snapshot.selected_participant,
                snapshot.game_state
            );
            return Update::default();
        }

        let current = snapshot.game_state;
        let entered = self.previous_game_state != Some(current);
        let changed = self.display.as_ref() != Some(&snapshot);

        let mut effects = Vec::new();
        match (self.trigger_mode, current) {
            (TriggerMode::Level, GameState::Selected) => {
                self.show_vignette = true;
                effects.push(PublicEffect::Overlay { visible: true });
                effects.push(PublicEffect::Play { cue: Cue::Drumroll });
            }
            (TriggerMode::Level, GameState::Correct | GameState::Incorrect) => {
                self.show_vignette = false;
                effects.push(PublicEffect::Overlay { visible: false });
                effects.push(PublicEffect::Play { cue: Cue::Result });
            }
            (TriggerMode::Edge, GameState::Selected) if entered => {
                self.set_vignette(true, &mut effects);
                effects.push(PublicEffect::Play { cue: Cue::Drumroll });
            }
            (TriggerMode::Edge, GameState::Correct | GameState::Incorrect) if entered => {
                self.set_vignette(false, &mut effects);
                effects.push(PublicEffect::Play { cue: Cue::Result });
            }
            // A selection dropped without a verdict (e.g. game reset)
            (TriggerMode::Edge, GameState::Waiting) if entered => {
                self.set_vignette(false, &mut effects);
            }
            _ => {}
        }

        if entered {
            tracing::debug!(
                "Public screen: {:?} -> {}",
                self.previous_game_state,
                current
            );
        }
        self.previous_game_state = Some(current);
        self.display = Some(snapshot);

        Update { changed, effects }
    }

    fn set_vignette(&mut self, visible: bool, effects: &mut Vec<PublicEffect>) {
        if self.show_vignette != visible {
            self.show_vignette = visible;
            effects.push(PublicEffect::Overlay { visible });
        }
    }
}

/// Screen that records effects instead of playing them
#[derive(Debug, Clone, Default)]
pub struct RecordingScreen {
    effects: Arc<Mutex<Vec<PublicEffect>>>,
    redraws: Arc<Mutex<usize>>,
}

impl RecordingScreen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn effects(&self) -> Vec<PublicEffect> {
        self.effects.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// How often a given cue was played
    pub fn plays(&self, cue: Cue) -> usize {
        self.effects()
            .iter()
            .filter(|e| **e == PublicEffect::Play { cue })
            .count()
    }

    pub fn redraws(&self) -> usize {
        self.redraws.lock().map(|r| *r).unwrap_or_default()
    }
}

impl Screen for RecordingScreen {
    fn effect(&mut self, effect: PublicEffect) {
        if let Ok(mut effects) = self.effects.lock() {
            effects.push(effect);
        }
    }

    fn redraw(&mut self, _view: &PublicView) {
        if let Ok(mut redraws) = self.redraws.lock() {
            *redraws += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(game_state: GameState, selected: Option<u32>) -> SharedState {
        let mut state = SharedState::new(3);
        state.game_state = game_state;
        state.selected_participant = selected;
        state
    }

    #[test]
    fn test_selection_fires_drumroll_once() {
        let mut view = PublicView::new(TriggerMode::Edge);
        view.observe(Some(snapshot(GameState::Waiting, None)));

        let first = view.observe(Some(snapshot(GameState::Selected, Some(2))));
        assert_eq!(
            first.effects,
            vec![
                PublicEffect::Overlay { visible: true },
                PublicEffect::Play { cue: Cue::Drumroll },
            ]
        );
        assert!(view.show_vignette());

        let second = view.observe(Some(snapshot(GameState::Selected, Some(2))));
        assert!(second.effects.is_empty());
        assert!(!second.changed);
    }

    #[test]
    fn test_result_ends_overlay() {
        let mut view = PublicView::new(TriggerMode::Edge);
        view.observe(Some(snapshot(GameState::Selected, Some(1))));

        let update = view.observe(Some(snapshot(GameState::Incorrect, Some(1))));
        assert_eq!(
            update.effects,
            vec![
                PublicEffect::Overlay { visible: false },
                PublicEffect::Play { cue: Cue::Result },
            ]
        );
        assert!(!view.show_vignette());

        let again = view.observe(Some(snapshot(GameState::Incorrect, Some(1))));
        assert!(again.effects.is_empty());
    }

    #[test]
    fn test_correct_to_incorrect_replays_result() {
        let mut view = PublicView::new(TriggerMode::Edge);
        view.observe(Some(snapshot(GameState::Correct, Some(1))));
        let update = view.observe(Some(snapshot(GameState::Incorrect, Some(1))));
        assert_eq!(update.effects, vec![PublicEffect::Play { cue: Cue::Result }]);
    }

    #[test]
    fn test_missing_snapshot_keeps_display() {
        let mut view = PublicView::new(TriggerMode::Edge);
        let mut shown = snapshot(GameState::Selected, Some(3));
        shown.participants[2].score = 40;
        view.observe(Some(shown.clone()));

        let update = view.observe(None);
        assert_eq!(update, Update::default());
        assert_eq!(view.display(), Some(&shown));
        assert!(view.show_vignette());
        assert_eq!(view.previous_game_state(), Some(GameState::Selected));
    }

    #[test]
    fn test_score_change_redraws_without_cue() {
        let mut view = PublicView::new(TriggerMode::Edge);
        view.observe(Some(snapshot(GameState::Waiting, None)));

        let mut renamed = snapshot(GameState::Waiting, None);
        renamed.participants[0].name = "Fajar".to_string();
        let update = view.observe(Some(renamed));
        assert!(update.changed);
        assert!(update.effects.is_empty());
    }

    #[test]
    fn test_waiting_after_selection_clears_overlay() {
        let mut view = PublicView::new(TriggerMode::Edge);
        view.observe(Some(snapshot(GameState::Selected, Some(1))));
        let update = view.observe(Some(snapshot(GameState::Waiting, None)));
        assert_eq!(update.effects, vec![PublicEffect::Overlay { visible: false }]);
    }

    #[test]
    fn test_first_observation_counts_as_transition() {
        let mut view = PublicView::new(TriggerMode::Edge);
        let update = view.observe(Some(snapshot(GameState::Selected, Some(1))));
        assert!(update.changed);
        assert!(update
            .effects
            .contains(&PublicEffect::Play { cue: Cue::Drumroll }));
    }

    #[test]
    fn test_inconsistent_record_keeps_display() {
        let mut view = PublicView::new(TriggerMode::Edge).with_question_count(6);
        let shown = snapshot(GameState::Waiting, None);
        view.observe(Some(shown.clone()));

        let mut out_of_range = snapshot(GameState::Selected, Some(1));
        out_of_range.current_question_index = usize::MAX;
        assert_eq!(view.observe(Some(out_of_range)), Update::default());

        let dangling = snapshot(GameState::Selected, Some(7));
        assert_eq!(view.observe(Some(dangling)), Update::default());

        let orphaned = snapshot(GameState::Correct, None);
        assert_eq!(view.observe(Some(orphaned)), Update::default());

        assert_eq!(view.display(), Some(&shown));
        assert!(!view.show_vignette());
        assert_eq!(view.previous_game_state(), Some(GameState::Waiting));
    }

    #[test]
    fn test_level_mode_retriggers_every_poll() {
        let mut view = PublicView::new(TriggerMode::Level);
        for _ in 0..3 {
            let update = view.observe(Some(snapshot(GameState::Selected, Some(2))));
            assert!(update
                .effects
                .contains(&PublicEffect::Play { cue: Cue::Drumroll }));
        }

        let waiting = view.observe(Some(snapshot(GameState::Waiting, None)));
        assert!(waiting.effects.is_empty());
        // Level mode never clears the overlay on waiting
        assert!(view.show_vignette());
    }

    #[test]
    fn test_recording_screen_counts() {
        let mut screen = RecordingScreen::new();
        screen.effect(PublicEffect::Play { cue: Cue::Result });
        screen.effect(PublicEffect::Overlay { visible: true });
        screen.redraw(&PublicView::default());

        assert_eq!(screen.plays(Cue::Result), 1);
        assert_eq!(screen.plays(Cue::Drumroll), 0);
        assert_eq!(screen.redraws(), 1);
    }
}
