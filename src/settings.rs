//! Game settings
//!
//! One preset per game, loaded from a JSON file. Missing fields fall back to
//! the defaults, so a file only needs the values it changes.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::breakout::BreakoutConfig;
use crate::sim::color_memory::{Color, ColorMemoryConfig};
use crate::sim::flappy::FlappyConfig;
use crate::sim::word_search::WordSearchConfig;

/// Smallest word search grid that still fits short words in every direction
pub const MIN_GRID_SIZE: usize = 4;

/// Errors from loading, saving or validating settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid setting {field}: {reason}")]
    Invalid { field: &'static str, reason: String },

    #[error("Unknown word search category: {0}")]
    UnknownCategory(String),
}

/// Finite and above zero (NaN fails)
fn is_positive(v: f32) -> bool {
    v > 0.0 && v.is_finite()
}

fn is_word(word: &str) -> bool {
    let word = word.trim();
    !word.is_empty() && word.chars().all(|c| c.is_ascii_alphabetic())
}

fn invalid(field: &'static str, reason: impl Into<String>) -> SettingsError {
    SettingsError::Invalid {
        field,
        reason: reason.into(),
    }
}

/// Per-game presets
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub breakout: BreakoutConfig,
    pub flappy: FlappyConfig,
    pub word_search: WordSearchConfig,
    pub color_memory: ColorMemoryConfig,
}

impl Settings {
    /// Parse and validate settings from JSON text
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Load settings, falling back to defaults on any error
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Using default settings ({}): {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Validate then write settings as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        self.validate()?;
        let path = path.as_ref();
        fs::write(path, self.to_json()?)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }

    /// Reject values no engine can play with
    pub fn validate(&self) -> Result<(), SettingsError> {
        let b = &self.breakout;
        if b.lives == 0 {
            return Err(invalid("breakout.lives", "must be at least 1"));
        }
        if b.paddle_step.is_nan() || b.paddle_step < 0.0 {
            return Err(invalid("breakout.paddle_step", "must not be negative"));
        }
        if !is_positive(b.ball_speed) {
            return Err(invalid("breakout.ball_speed", "must be positive"));
        }

        let f = &self.flappy;
        if !is_positive(f.gravity) {
            return Err(invalid("flappy.gravity", "must be positive"));
        }
        if !is_positive(-f.flap_velocity) {
            return Err(invalid("flappy.flap_velocity", "must point upward (negative)"));
        }
        if !is_positive(f.scroll_speed) {
            return Err(invalid("flappy.scroll_speed", "must be positive"));
        }
        if !is_positive(f.pipe_gap) {
            return Err(invalid("flappy.pipe_gap", "must be positive"));
        }

        let w = &self.word_search;
        if w.grid_size < MIN_GRID_SIZE {
            return Err(invalid(
                "word_search.grid_size",
                format!("must be at least {}, got {}", MIN_GRID_SIZE, w.grid_size),
            ));
        }
        if let Some(words) = &w.words {
            if words.is_empty() {
                return Err(invalid("word_search.words", "custom list is empty"));
            }
            if let Some(bad) = words.iter().find(|word| !is_word(word)) {
                return Err(invalid("word_search.words", format!("{:?} is not a word", bad)));
            }
        }

        let c = &self.color_memory;
        if c.win_length == 0 {
            return Err(invalid("color_memory.win_length", "must be at least 1"));
        }
        if c.palette_size == 0 || c.palette_size > Color::ALL.len() {
            return Err(invalid(
                "color_memory.palette_size",
                format!("must be between 1 and {}, got {}", Color::ALL.len(), c.palette_size),
            ));
        }
        if c.show_ms == 0 {
            return Err(invalid("color_memory.show_ms", "must be positive"));
        }

        Ok(())
    }
}
