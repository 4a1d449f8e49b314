use serde::{Deserialize, Serialize};

/// Participant ids are small stable integers starting at 1
pub type ParticipantId = u32;
pub type QuestionId = u32;

/// Phase of judging the current question
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum GameState {
    #[default]
    Waiting,
    Selected,
    Correct,
    Incorrect,
}

impl GameState {
    /// True for the phases that require a selected participant
    pub fn is_judging(&self) -> bool {
        !matches!(self, GameState::Waiting)
    }

    /// True once the answer has been judged either way
    pub fn is_result(&self) -> bool {
        matches!(self, GameState::Correct | GameState::Incorrect)
    }
}

impl std::fmt::Display for GameState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            GameState::Waiting => "waiting",
            GameState::Selected => "selected",
            GameState::Correct => "correct",
            GameState::Incorrect => "incorrect",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Participant {
    pub id: ParticipantId,
    pub name: String,
    /// Never negative when the variant floors deductions at zero
    pub score: i32,
}

impl Participant {
    pub fn new(id: ParticipantId) -> Self {
        Self {
            id,
            name: format!("Participant {}", id),
            score: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Text,
    Image,
    Video,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    #[serde(rename = "type")]
    pub kind: MediaKind,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: QuestionId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    #[serde(rename = "type")]
    pub kind: MediaKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<Answer>,
}

/// The single record synchronized between the operator and public roles.
///
/// Field names match the stored JSON (`currentQuestionIndex`, ...), so a record
/// written by any compatible operator can be read back here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SharedState {
    pub current_question_index: usize,
    pub participants: Vec<Participant>,
    pub selected_participant: Option<ParticipantId>,
    pub game_state: GameState,
    #[serde(default)]
    pub show_answer: bool,
}

impl SharedState {
    /// Fresh session with `roster_size` participants named "Participant N"
    pub fn new(roster_size: u32) -> Self {
        Self {
            current_question_index: 0,
            participants: (1..=roster_size).map(Participant::new).collect(),
            selected_participant: None,
            game_state: GameState::Waiting,
            show_answer: false,
        }
    }

    pub fn participant(&self, id: ParticipantId) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id == id)
    }

    pub fn participant_mut(&mut self, id: ParticipantId) -> Option<&mut Participant> {
        self.participants.iter_mut().find(|p| p.id == id)
    }

    /// Check the record invariants against a question count
    pub fn is_consistent(&self, question_count: usize) -> bool {
        if question_count > 0 && self.current_question_index >= question_count {
            return false;
        }
        match self.selected_participant {
            Some(id) => self.participant(id).is_some(),
            None => !self.game_state.is_judging(),
        }
    }

    /// Repair a record loaded from storage so the invariants hold again.
    ///
    /// The roster is padded or truncated to `roster_size` keeping existing
    /// names and scores. A selection that no longer points at a participant is
    /// cleared together with the judging phase.
    pub fn normalize(&mut self, question_count: usize, roster_size: u32) {
        if question_count > 0 {
            self.current_question_index %= question_count;
        } else {
            self.current_question_index = 0;
        }

        self.participants.retain(|p| p.id >= 1 && p.id <= roster_size);
        self.participants.sort_by_key(|p| p.id);
        self.participants.dedup_by_key(|p| p.id);
        for id in 1..=roster_size {
            if self.participant(id).is_none() {
                self.participants.push(Participant::new(id));
            }
        }
        self.participants.sort_by_key(|p| p.id);

        let dangling = match self.selected_participant {
            Some(id) => self.participant(id).is_none(),
            None => self.game_state.is_judging(),
        };
        if dangling {
            self.selected_participant = None;
            self.game_state = GameState::Waiting;
            self.show_answer = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_state_roundtrip() {
        let mut state = SharedState::new(3);
        state.current_question_index = 4;
        state.selected_participant = Some(2);
        state.game_state = GameState::Correct;
        state.show_answer = true;
        state.participants[1].score = 15;
        state.participants[0].name = "Ayu".to_string();

        let json = serde_json::to_string(&state).unwrap();
        let parsed: SharedState = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, state);
    }

    #[test]
    fn test_reads_record_without_show_answer() {
        let json = r#"{
            "currentQuestionIndex": 1,
            "participants": [
                {"id": 1, "name": "Participant 1", "score": 5},
                {"id": 2, "name": "Participant 2", "score": 0},
                {"id": 3, "name": "Participant 3", "score": 0}
            ],
            "selectedParticipant": null,
            "gameState": "waiting"
        }"#;

        let state: SharedState = serde_json::from_str(json).unwrap();
        assert_eq!(state.current_question_index, 1);
        assert_eq!(state.participants[0].score, 5);
        assert!(!state.show_answer);
        assert_eq!(state.game_state, GameState::Waiting);
    }

    #[test]
    fn test_serializes_camel_case_keys() {
        let state = SharedState::new(3);
        let value = serde_json::to_value(&state).unwrap();
        assert!(value.get("currentQuestionIndex").is_some());
        assert!(value.get("selectedParticipant").unwrap().is_null());
        assert_eq!(value["gameState"], "waiting");
    }

    #[test]
    fn test_question_type_field() {
        let json = r#"{"id": 3, "imageUrl": "/q3.png", "type": "image"}"#;
        let question: Question = serde_json::from_str(json).unwrap();
        assert_eq!(question.kind, MediaKind::Image);
        assert_eq!(question.image_url.as_deref(), Some("/q3.png"));
        assert!(question.answer.is_none());
    }

    #[test]
    fn test_normalize_wraps_index_and_repairs_roster() {
        let mut state = SharedState::new(2);
        state.current_question_index = 7;
        state.participants[0].score = 9;
        state.normalize(6, 3);

        assert_eq!(state.current_question_index, 1);
        assert_eq!(state.participants.len(), 3);
        assert_eq!(state.participants[0].score, 9);
        assert_eq!(state.participants[2].id, 3);
        assert!(state.is_consistent(6));
    }

    #[test]
    fn test_normalize_clears_dangling_selection() {
        let mut state = SharedState::new(3);
        state.selected_participant = Some(5);
        state.game_state = GameState::Selected;
        state.show_answer = true;
        assert!(!state.is_consistent(6));

        state.normalize(6, 3);
        assert_eq!(state.selected_participant, None);
        assert_eq!(state.game_state, GameState::Waiting);
        assert!(!state.show_answer);
    }

    #[test]
    fn test_normalize_clears_judging_without_selection() {
        let mut state = SharedState::new(3);
        state.game_state = GameState::Incorrect;
        state.normalize(6, 3);
        assert_eq!(state.game_state, GameState::Waiting);
    }
}
