//! Variant configuration
//!
//! Each content variant (question set, point deltas, reset delays, storage key)
//! is one `VariantConfig`. Presets reproduce the variants used on stage and
//! `from_env` layers `QUIZDASH_*` overrides on top.

use crate::content::{self, ContentError};
use crate::types::Question;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Storage key of the default variant
pub const DEFAULT_STORAGE_KEY: &str = "gameState";

/// Polling cadence of the public screen
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Digit keys select participants, so the roster cannot exceed 9
pub const MAX_ROSTER_SIZE: u32 = 9;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Unknown variant '{0}' (expected classic, science or science-floored)")]
    UnknownVariant(String),

    #[error("Unknown trigger mode '{0}' (expected edge or level)")]
    UnknownTriggerMode(String),

    #[error("Variant '{0}' has no questions")]
    NoQuestions(String),

    #[error("Roster size {0} is outside 1..={max}", max = MAX_ROSTER_SIZE)]
    RosterSize(u32),

    #[error("Poll interval must be greater than zero")]
    ZeroPollInterval,

    #[error("Point deltas must not be negative (correct {correct}, incorrect {incorrect})")]
    NegativePoints { correct: i32, incorrect: i32 },

    #[error(transparent)]
    Content(#[from] ContentError),
}

/// How the public screen decides when to fire a cue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TriggerMode {
    /// Fire only when the observed game state changes
    #[default]
    Edge,
    /// Fire on every observation of a judging state, like the first public
    /// screens did. Only useful to reproduce their behavior.
    Level,
}

impl FromStr for TriggerMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "edge" => Ok(TriggerMode::Edge),
            "level" => Ok(TriggerMode::Level),
            other => Err(ConfigError::UnknownTriggerMode(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// Arithmetic set, +5/-2, 3s resets, floored, no answer reveal
    Classic,
    /// Science set, +10/-5, 5s/3s resets, unfloored, own storage key
    Science,
    /// Science set scored like `Science` but floored at zero
    ScienceFloored,
}

impl FromStr for Preset {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "classic" | "default" => Ok(Preset::Classic),
            "science" => Ok(Preset::Science),
            "science-floored" | "science_floored" => Ok(Preset::ScienceFloored),
            other => Err(ConfigError::UnknownVariant(other.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct VariantConfig {
    pub name: String,
    pub questions: Vec<Question>,
    pub roster_size: u32,
    pub correct_delta: i32,
    pub incorrect_delta: i32,
    pub correct_delay: Duration,
    pub incorrect_delay: Duration,
    pub storage_key: String,
    pub floor_at_zero: bool,
    /// Whether a correct answer flips `showAnswer` on
    pub reveals_answer: bool,
    pub poll_interval: Duration,
    pub trigger_mode: TriggerMode,
}

impl VariantConfig {
    pub fn preset(preset: Preset) -> Self {
        match preset {
            Preset::Classic => Self {
                name: "classic".to_string(),
                questions: content::arithmetic_questions(),
                roster_size: 3,
                correct_delta: 5,
                incorrect_delta: 2,
                correct_delay: Duration::from_secs(3),
                incorrect_delay: Duration::from_secs(3),
                storage_key: DEFAULT_STORAGE_KEY.to_string(),
                floor_at_zero: true,
                reveals_answer: false,
                poll_interval: DEFAULT_POLL_INTERVAL,
                trigger_mode: TriggerMode::Edge,
            },
            Preset::Science => Self {
                name: "science".to_string(),
                questions: content::science_questions(),
                roster_size: 3,
                correct_delta: 10,
                incorrect_delta: 5,
                correct_delay: Duration::from_secs(5),
                incorrect_delay: Duration::from_secs(3),
                storage_key: "gameState8".to_string(),
                floor_at_zero: false,
                reveals_answer: true,
                poll_interval: DEFAULT_POLL_INTERVAL,
                trigger_mode: TriggerMode::Edge,
            },
            Preset::ScienceFloored => Self {
                name: "science-floored".to_string(),
                floor_at_zero: true,
                storage_key: DEFAULT_STORAGE_KEY.to_string(),
                ..Self::preset(Preset::Science)
            },
        }
    }

    /// Number of questions in the content set
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.questions.is_empty() {
            return Err(ConfigError::NoQuestions(self.name.clone()));
        }
        if self.roster_size == 0 || self.roster_size > MAX_ROSTER_SIZE {
            return Err(ConfigError::RosterSize(self.roster_size));
        }
        if self.poll_interval.is_zero() {
            return Err(ConfigError::ZeroPollInterval);
        }
        if self.correct_delta < 0 || self.incorrect_delta < 0 {
            return Err(ConfigError::NegativePoints {
                correct: self.correct_delta,
                incorrect: self.incorrect_delta,
            });
        }
        Ok(())
    }

    /// Apply `QUIZDASH_*` overrides on top of this variant.
    ///
    /// Values that do not parse are logged and the preset value is kept.
    /// Values that parse but are out of range are left for `validate`, and an
    /// unreadable question file is an error.
    pub fn apply_env(mut self) -> Result<Self, ConfigError> {
        if let Some(key) = env_string("QUIZDASH_STORAGE_KEY") {
            self.storage_key = key;
        }
        if let Some(points) = env_parse::<i32>("QUIZDASH_CORRECT_POINTS") {
            self.correct_delta = points;
        }
        if let Some(points) = env_parse::<i32>("QUIZDASH_INCORRECT_POINTS") {
            self.incorrect_delta = points;
        }
        if let Some(ms) = env_parse::<u64>("QUIZDASH_CORRECT_DELAY_MS") {
            self.correct_delay = Duration::from_millis(ms);
        }
        if let Some(ms) = env_parse::<u64>("QUIZDASH_INCORRECT_DELAY_MS") {
            self.incorrect_delay = Duration::from_millis(ms);
        }
        if let Some(floor) = env_parse::<bool>("QUIZDASH_FLOOR_AT_ZERO") {
            self.floor_at_zero = floor;
        }
        if let Some(ms) = env_parse::<u64>("QUIZDASH_POLL_INTERVAL_MS") {
            self.poll_interval = Duration::from_millis(ms);
        }
        if let Some(mode) = env_string("QUIZDASH_TRIGGER_MODE") {
            match mode.parse() {
                Ok(mode) => self.trigger_mode = mode,
                Err(e) => tracing::warn!("Ignoring QUIZDASH_TRIGGER_MODE: {}", e),
            }
        }
        if let Some(path) = env_string("QUIZDASH_QUESTIONS") {
            self.questions = content::load_questions(&PathBuf::from(path))?;
        }
        Ok(self)
    }
}

impl Default for VariantConfig {
    fn default() -> Self {
        Self::preset(Preset::Classic)
    }
}

/// Full runtime configuration for either role
#[derive(Debug, Clone)]
pub struct Config {
    pub variant: VariantConfig,
    /// Directory holding one file per storage key
    pub store_dir: PathBuf,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// QUIZDASH_VARIANT picks the preset (default `classic`), QUIZDASH_STORE_DIR
    /// the store directory (default `./quizdash-store`). Remaining overrides are
    /// documented on `VariantConfig::apply_env`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_with(None)
    }

    /// Same as `from_env`, with an explicit preset taking precedence over
    /// QUIZDASH_VARIANT
    pub fn from_env_with(preset: Option<Preset>) -> Result<Self, ConfigError> {
        let preset = match (preset, env_string("QUIZDASH_VARIANT")) {
            (Some(preset), _) => preset,
            (None, Some(name)) => name.parse().unwrap_or_else(|e| {
                tracing::warn!("Ignoring QUIZDASH_VARIANT: {}", e);
                Preset::Classic
            }),
            (None, None) => Preset::Classic,
        };

        let variant = VariantConfig::preset(preset).apply_env()?;
        variant.validate()?;

        let store_dir = env_string("QUIZDASH_STORE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("quizdash-store"));

        tracing::debug!(
            "Loaded variant '{}' ({} questions, key '{}')",
            variant.name,
            variant.question_count(),
            variant.storage_key
        );

        Ok(Self { variant, store_dir })
    }
}

fn env_string(name: &str) -> Option<String> {
    std::env::var(name).ok().and_then(|value| {
        let trimmed = value.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    })
}

fn env_parse<T: FromStr>(name: &str) -> Option<T> {
    let raw = env_string(name)?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!("Ignoring {}: cannot parse '{}'", name, raw);
            None
        }
    }
}
