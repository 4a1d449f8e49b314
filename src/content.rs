//! Static question sets
//!
//! Questions are immutable once loaded. The built-in sets cover the two content
//! variants used on stage; a JSON file with the same shape can replace them.

use crate::types::{Answer, MediaKind, Question};
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("Failed to read question file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse question file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Question file {0} contains no questions")]
    Empty(String),
}

fn text_question(id: u32, text: &str) -> Question {
    Question {
        id,
        text: Some(text.to_string()),
        image_url: None,
        video_url: None,
        kind: MediaKind::Text,
        answer: None,
    }
}

fn text_answer(text: &str) -> Option<Answer> {
    Some(Answer {
        text: Some(text.to_string()),
        image_url: None,
        video_url: None,
        kind: MediaKind::Text,
    })
}

/// Arithmetic warm-up set (no answers attached)
pub fn arithmetic_questions() -> Vec<Question> {
    vec![
        text_question(1, "What is 2 + 2?"),
        text_question(2, "Solve for x: 2x + 3 = 7"),
        Question {
            id: 3,
            text: None,
            image_url: Some("/placeholder.svg?height=300&width=300".to_string()),
            video_url: None,
            kind: MediaKind::Image,
            answer: None,
        },
        Question {
            id: 4,
            text: None,
            image_url: None,
            video_url: Some("https://example.com/math-video.mp4".to_string()),
            kind: MediaKind::Video,
            answer: None,
        },
        text_question(5, "What is the square root of 16?"),
        text_question(
            6,
            "If a triangle has angles 30°, 60°, and 90°, what type of triangle is it?",
        ),
    ]
}

/// Science round, every question carries an answer for the reveal
pub fn science_questions() -> Vec<Question> {
    vec![
        Question {
            id: 1,
            text: Some(
                "Jika cairan kol ungu dicampurkan ke pemutih pakaian, apa yang akan terjadi pada pemutih pakaian tersebut?"
                    .to_string(),
            ),
            image_url: Some("/kol.png".to_string()),
            video_url: None,
            kind: MediaKind::Image,
            answer: Some(Answer {
                text: Some("Tidak Berubah Warna".to_string()),
                image_url: None,
                video_url: Some("/kol.mp4".to_string()),
                kind: MediaKind::Video,
            }),
        },
        Question {
            answer: text_answer("5859"),
            ..text_question(2, "Tentukan hasil dari 651 × 9 = …")
        },
        Question {
            id: 3,
            text: Some(
                "Zat yang berfungsi sebagai desinfektan dan penghilang rasa serta bau pada air, khususnya kolam renang adalah zat …"
                    .to_string(),
            ),
            image_url: Some("/placeholder.svg?height=300&width=300".to_string()),
            video_url: None,
            kind: MediaKind::Image,
            answer: text_answer("Klorin atau Kaporit"),
        },
        Question {
            id: 4,
            text: Some("Lapisan bumi yang berfungsi melindungi kita dari sinar UV adalah...".to_string()),
            image_url: None,
            video_url: None,
            kind: MediaKind::Image,
            answer: text_answer("Ozon"),
        },
        Question {
            id: 5,
            text: Some("Berapa nilai a dan b?".to_string()),
            image_url: Some("/No5.png".to_string()),
            video_url: None,
            kind: MediaKind::Image,
            answer: text_answer("a = 10 dan b = 10"),
        },
        Question {
            answer: text_answer("23"),
            ..text_question(6, "Suku ke-8 dari barisan 2, 5, 8, 11, 14, … adalah …")
        },
    ]
}

/// Load an ordered question list from a JSON array file
pub fn load_questions(path: &Path) -> Result<Vec<Question>, ContentError> {
    let path_str = path.display().to_string();
    let raw = std::fs::read_to_string(path).map_err(|source| ContentError::Io {
        path: path_str.clone(),
        source,
    })?;
    let questions: Vec<Question> =
        serde_json::from_str(&raw).map_err(|source| ContentError::Parse {
            path: path_str.clone(),
            source,
        })?;

    if questions.is_empty() {
        return Err(ContentError::Empty(path_str));
    }

    tracing::info!("Loaded {} questions from {}", questions.len(), path_str);
    Ok(questions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_builtin_sets() {
        assert_eq!(arithmetic_questions().len(), 6);
        assert!(arithmetic_questions().iter().all(|q| q.answer.is_none()));

        let science = science_questions();
        assert_eq!(science.len(), 6);
        assert!(science.iter().all(|q| q.answer.is_some()));
        assert_eq!(science[0].answer.as_ref().unwrap().kind, MediaKind::Video);
    }

    #[test]
    fn test_load_questions_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[
                {{"id": 1, "text": "Capital of France?", "type": "text",
                  "answer": {{"text": "Paris", "type": "text"}}}},
                {{"id": 2, "videoUrl": "/clip.mp4", "type": "video"}}
            ]"#
        )
        .unwrap();

        let questions = load_questions(file.path()).unwrap();
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[1].kind, MediaKind::Video);
        assert_eq!(
            questions[0].answer.as_ref().unwrap().text.as_deref(),
            Some("Paris")
        );
    }

    #[test]
    fn test_load_questions_rejects_empty_list() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[]").unwrap();

        let result = load_questions(file.path());
        assert!(matches!(result, Err(ContentError::Empty(_))));
    }

    #[test]
    fn test_load_questions_reports_parse_errors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{not json").unwrap();

        let err = load_questions(file.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse"));
    }

    #[test]
    fn test_load_questions_missing_file() {
        let err = load_questions(Path::new("/nonexistent/questions.json")).unwrap_err();
        assert!(matches!(err, ContentError::Io { .. }));
    }
}
