//! Messages flowing in and out of the two roles.
//!
//! `OperatorCommand` is what the host's keyboard produces. `PublicEffect` is
//! what the public screen asks its surroundings to do.

use crate::types::ParticipantId;
use serde::{Deserialize, Serialize};

/// A single key press on the operator keyboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Digit(u8),
    Enter,
    Backspace,
    Other,
}

impl Key {
    /// Map a key name as reported by a keyboard event (`"1"`, `"Enter"`, ...)
    pub fn from_name(name: &str) -> Self {
        match name {
            "Enter" => Key::Enter,
            "Backspace" => Key::Backspace,
            _ => {
                let mut chars = name.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) if c.is_ascii_digit() => Key::Digit(c as u8 - b'0'),
                    _ => Key::Other,
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "t", rename_all = "snake_case")]
pub enum OperatorCommand {
    Select { participant: ParticipantId },
    MarkCorrect,
    MarkIncorrect,
    NextQuestion,
    Rename { participant: ParticipantId, name: String },
    ResetGame,
    Quit,
}

impl OperatorCommand {
    /// Translate a key press. Digit `0` and unbound keys produce nothing;
    /// roster bounds are checked by the state machine.
    pub fn from_key(key: Key) -> Option<Self> {
        match key {
            Key::Digit(0) => None,
            Key::Digit(d) => Some(OperatorCommand::Select {
                participant: d as ParticipantId,
            }),
            Key::Enter => Some(OperatorCommand::MarkCorrect),
            Key::Backspace => Some(OperatorCommand::MarkIncorrect),
            Key::Other => None,
        }
    }

    /// Parse one line typed on the operator console.
    ///
    /// An empty line is Enter. `b`/`backspace` is Backspace, `n`/`next` the
    /// next-question button, `name <id> <text>` edits a name.
    pub fn parse_line(line: &str) -> Option<Self> {
        let trimmed = line.trim();
        let (word, rest) = match trimmed.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim_start()),
            None => (trimmed, ""),
        };

        match word.to_ascii_lowercase().as_str() {
            "" | "enter" | "ok" => Some(OperatorCommand::MarkCorrect),
            "b" | "backspace" | "wrong" => Some(OperatorCommand::MarkIncorrect),
            "n" | "next" => Some(OperatorCommand::NextQuestion),
            "reset" => Some(OperatorCommand::ResetGame),
            "q" | "quit" | "exit" => Some(OperatorCommand::Quit),
            "name" => {
                let (id, name) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
                let participant = id.parse().ok()?;
                Some(OperatorCommand::Rename {
                    participant,
                    name: name.to_string(),
                })
            }
            other => Self::from_key(Key::from_name(other)),
        }
    }
}

/// Named audio cues on the public screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cue {
    Drumroll,
    Result,
}

impl Cue {
    pub fn asset(&self) -> &'static str {
        match self {
            Cue::Drumroll => "drumroll.mp3",
            Cue::Result => "result.mp3",
        }
    }
}

/// One-shot side effect requested by the public screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "t", rename_all = "snake_case")]
pub enum PublicEffect {
    /// Full-screen dim overlay on or off
    Overlay { visible: bool },
    Play { cue: Cue },
}
