//! Plain-text renditions of the operator and audience screens

use crate::config::VariantConfig;
use crate::protocol::PublicEffect;
use crate::public::{PublicView, Screen};
use crate::types::*;
use std::fmt::Write as _;
use std::io::Write as _;
use std::sync::Arc;

fn media_line(kind: MediaKind, text: Option<&str>, image: Option<&str>, video: Option<&str>) -> String {
    let mut out = String::new();
    if let Some(text) = text {
        let _ = writeln!(out, "  {}", text);
    }
    match kind {
        MediaKind::Text => {}
        MediaKind::Image => {
            let _ = writeln!(out, "  [image] {}", image.unwrap_or("(missing)"));
        }
        MediaKind::Video => {
            let _ = writeln!(out, "  [video] {}", video.unwrap_or("(missing)"));
        }
    }
    out
}

fn render_question(state: &SharedState, questions: &[Question], show_answer: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Question {} of {}",
        state.current_question_index.saturating_add(1),
        questions.len()
    );

    let Some(question) = questions.get(state.current_question_index) else {
        let _ = writeln!(out, "  (no such question)");
        return out;
    };
    out.push_str(&media_line(
        question.kind,
        question.text.as_deref(),
        question.image_url.as_deref(),
        question.video_url.as_deref(),
    ));

    if show_answer {
        if let Some(answer) = &question.answer {
            let _ = writeln!(out, "Answer:");
            out.push_str(&media_line(
                answer.kind,
                answer.text.as_deref(),
                answer.image_url.as_deref(),
                answer.video_url.as_deref(),
            ));
        }
    }
    out
}

fn render_roster(state: &SharedState) -> String {
    let mut out = String::new();
    for p in &state.participants {
        let marker = if state.selected_participant == Some(p.id) {
            '>'
        } else {
            ' '
        };
        let _ = writeln!(out, " {} {}. {:<24} {:>5}", marker, p.id, p.name, p.score);
    }
    out
}

/// Audience-facing status line
pub fn status_line(state: &SharedState) -> String {
    match state.game_state {
        GameState::Waiting => "Waiting for participants...".to_string(),
        // Seat number even after a rename
        GameState::Selected => match state.selected_participant {
            Some(id) => format!("Participant {} selected!", id),
            None => "Participant selected!".to_string(),
        },
        GameState::Correct => "Correct answer!".to_string(),
        GameState::Incorrect => "Incorrect answer!".to_string(),
    }
}

pub fn render_operator(state: &SharedState, config: &VariantConfig) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "=== Operator ({}) ===", config.name);
    out.push_str(&render_question(state, &config.questions, state.show_answer));
    out.push_str(&render_roster(state));

    let selected = state
        .selected_participant
        .map(|id| format!("Participant {}", id))
        .unwrap_or_else(|| "None".to_string());
    let _ = writeln!(out, "Selected: {} | Game state: {}", selected, state.game_state);
    let _ = writeln!(
        out,
        "1-{} select | Enter correct (+{}) | b incorrect (-{}) | n next | name <id> <text> | reset | quit",
        config.roster_size, config.correct_delta, config.incorrect_delta
    );
    out
}

pub fn render_public(view: &PublicView, questions: &[Question]) -> String {
    let Some(state) = view.display() else {
        return "Waiting for the operator...\n".to_string();
    };

    let mut out = String::new();
    if view.show_vignette() {
        out.push_str("**********************************\n");
    }
    out.push_str(&render_question(state, questions, state.show_answer));
    out.push_str(&render_roster(state));
    let _ = writeln!(out, "{}", status_line(state));
    out
}

/// Audience screen on the terminal. Cues ring the bell and are logged.
pub struct TerminalScreen {
    questions: Arc<Vec<Question>>,
    redraw: bool,
}

impl TerminalScreen {
    pub fn new(questions: Arc<Vec<Question>>) -> Self {
        Self {
            questions,
            redraw: true,
        }
    }

    /// Cues only, for a public screen sharing the terminal with the operator
    pub fn cues_only(questions: Arc<Vec<Question>>) -> Self {
        Self {
            questions,
            redraw: false,
        }
    }
}

impl Screen for TerminalScreen {
    fn effect(&mut self, effect: PublicEffect) {
        match effect {
            PublicEffect::Play { cue } => {
                tracing::info!("Playing {}", cue.asset());
                let mut stdout = std::io::stdout();
                // Audio failures never block the screen
                let _ = stdout.write_all(b"\x07").and_then(|_| stdout.flush());
            }
            PublicEffect::Overlay { visible } => {
                tracing::debug!("Overlay {}", if visible { "on" } else { "off" });
            }
        }
    }

    fn redraw(&mut self, view: &PublicView) {
        if !self.redraw {
            return;
        }
        let frame = render_public(view, &self.questions);
        let mut stdout = std::io::stdout();
        let _ = write!(stdout, "\x1b[2J\x1b[H{}", frame).and_then(|_| stdout.flush());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Preset, TriggerMode};

    #[test]
    fn test_status_line() {
        let mut state = SharedState::new(3);
        assert_eq!(status_line(&state), "Waiting for participants...");

        state.participants[1].name = "Gita".to_string();
        state.selected_participant = Some(2);
        state.game_state = GameState::Selected;
        assert_eq!(status_line(&state), "Participant 2 selected!");

        state.game_state = GameState::Correct;
        assert_eq!(status_line(&state), "Correct answer!");
        state.game_state = GameState::Incorrect;
        assert_eq!(status_line(&state), "Incorrect answer!");
    }

    #[test]
    fn test_operator_frame() {
        let config = VariantConfig::preset(Preset::Classic);
        let mut state = SharedState::new(3);
        state.selected_participant = Some(3);
        state.game_state = GameState::Selected;

        let frame = render_operator(&state, &config);
        assert!(frame.contains("Question 1 of 6"));
        assert!(frame.contains("What is 2 + 2?"));
        assert!(frame.contains("Selected: Participant 3 | Game state: selected"));
        assert!(frame.contains("Enter correct (+5)"));
        assert!(frame.contains(" > 3. Participant 3"));
    }

    #[test]
    fn test_public_frame_shows_answer_only_when_revealed() {
        let config = VariantConfig::preset(Preset::Science);
        let mut view = PublicView::new(TriggerMode::Edge);
        let mut state = SharedState::new(3);
        state.current_question_index = 1;
        view.observe(Some(state.clone()));
        assert!(!render_public(&view, &config.questions).contains("5859"));

        state.selected_participant = Some(1);
        state.game_state = GameState::Correct;
        state.show_answer = true;
        view.observe(Some(state));
        let frame = render_public(&view, &config.questions);
        assert!(frame.contains("Answer:"));
        assert!(frame.contains("5859"));
        assert!(frame.contains("Correct answer!"));
    }

    #[test]
    fn test_public_frame_before_first_record() {
        let view = PublicView::new(TriggerMode::Edge);
        assert_eq!(render_public(&view, &[]), "Waiting for the operator...\n");
    }

    #[test]
    fn test_out_of_range_index_renders() {
        let config = VariantConfig::preset(Preset::Classic);
        let mut state = SharedState::new(3);
        state.current_question_index = usize::MAX;

        let frame = render_operator(&state, &config);
        assert!(frame.contains("(no such question)"));

        // An unchecked view still renders whatever it was handed
        let mut view = PublicView::new(TriggerMode::Edge);
        view.observe(Some(state));
        assert!(render_public(&view, &config.questions).contains("(no such question)"));
    }

    #[test]
    fn test_media_questions() {
        let config = VariantConfig::preset(Preset::Classic);
        let mut state = SharedState::new(3);
        state.current_question_index = 3;
        let frame = render_operator(&state, &config);
        assert!(frame.contains("[video] https://example.com/math-video.mp4"));
    }
}
