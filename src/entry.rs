//! Lap duration input: typed minutes or preset buttons.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::engine::InvalidDurationError;

pub const DEFAULT_PRESETS: [u32; 4] = [5, 10, 15, 30];

const MS_PER_MINUTE: f64 = 60.0 * 1000.0;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntryError {
    #[error("Please enter a duration")]
    Empty,
    #[error("Please enter a positive duration")]
    Negative,
    #[error("Please enter a number of minutes")]
    NotANumber(String),
    #[error("Please enter a shorter duration")]
    TooLong,
    #[error("Please enter a positive duration")]
    Rejected(#[from] InvalidDurationError),
}

#[derive(
    Debug, Copy, Clone, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize, strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum InputMode {
    /// pick one of the preset durations
    #[default]
    Buttons,
    /// type a number of minutes
    Typed,
}

impl InputMode {
    pub fn toggled(self) -> Self {
        match self {
            InputMode::Buttons => InputMode::Typed,
            InputMode::Typed => InputMode::Buttons,
        }
    }
}

/// Convert minutes to whole milliseconds. Non-finite, negative and
/// unrepresentable values are refused instead of saturating.
pub fn minutes_to_ms(minutes: f64) -> Result<i64, EntryError> {
    if !minutes.is_finite() {
        return Err(EntryError::NotANumber(minutes.to_string()));
    }
    if minutes < 0.0 {
        return Err(EntryError::Negative);
    }
    let ms = (minutes * MS_PER_MINUTE).round();
    if ms >= i64::MAX as f64 {
        return Err(EntryError::TooLong);
    }
    Ok(ms as i64)
}

/// Validate typed minutes and convert them to a lap duration in milliseconds.
///
/// Zero passes this check on purpose; the engine owns the positive-duration rule.
pub fn parse_minutes(text: &str) -> Result<i64, EntryError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(EntryError::Empty);
    }
    let minutes: f64 = text
        .parse()
        .map_err(|_| EntryError::NotANumber(text.to_string()))?;
    minutes_to_ms(minutes).map_err(|e| match e {
        EntryError::NotANumber(_) => EntryError::NotANumber(text.to_string()),
        other => other,
    })
}

/// State of the setup screen shown before a ring is launched
#[derive(Debug, Clone)]
pub struct DurationEntry {
    pub mode: InputMode,
    pub presets: Vec<u32>,
    pub selected: usize,
    pub text: String,
    pub error: Option<String>,
}

impl DurationEntry {
    pub fn new(mode: InputMode, presets: Vec<u32>) -> Self {
        let presets = if presets.is_empty() {
            DEFAULT_PRESETS.to_vec()
        } else {
            presets
        };
        Self {
            mode,
            presets,
            selected: 0,
            text: String::new(),
            error: None,
        }
    }

    pub fn toggle_mode(&mut self) {
        self.mode = self.mode.toggled();
        self.error = None;
    }

    pub fn select_next(&mut self) {
        self.selected = (self.selected + 1) % self.presets.len();
    }

    pub fn select_prev(&mut self) {
        self.selected = (self.selected + self.presets.len() - 1) % self.presets.len();
    }

    /// Digit hotkeys: '1' picks the first preset
    pub fn select_hotkey(&mut self, c: char) -> bool {
        match c.to_digit(10) {
            Some(d) if d >= 1 && (d as usize) <= self.presets.len() => {
                self.selected = d as usize - 1;
                true
            }
            _ => false,
        }
    }

    pub fn push_char(&mut self, c: char) {
        if c.is_ascii_digit() || c == '.' || c == '-' {
            self.text.push(c);
        }
    }

    pub fn pop_char(&mut self) {
        self.text.pop();
    }

    /// Requested lap duration in milliseconds, or an inline error.
    ///
    /// A rejected typed entry clears the field so the user starts over.
    pub fn submit(&mut self) -> Option<i64> {
        let result = match self.mode {
            InputMode::Buttons => minutes_to_ms(f64::from(self.presets[self.selected])),
            InputMode::Typed => parse_minutes(&self.text),
        };
        match result {
            Ok(ms) => {
                self.error = None;
                Some(ms)
            }
            Err(e) => {
                self.reject(e.to_string());
                None
            }
        }
    }

    pub fn reject(&mut self, message: String) {
        self.error = Some(message);
        self.text.clear();
    }

    /// Back to a blank form after the ring was reset
    pub fn clear(&mut self) {
        self.text.clear();
        self.error = None;
    }
}
