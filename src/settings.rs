//! # Settings
//!
//! The display settings snapshot the renderer and the auto-scroll engine are
//! driven by. Settings are persisted by the host application; this crate only
//! reads a snapshot and reports changed values back from its controls.
//!
//! The serde field names follow the host's settings record (`fontSize`,
//! `scrollSpeed`, `showChords`), so a YAML or JSON settings file can be read
//! directly:
//!
//! ```rust
//! use songbook::Settings;
//!
//! let settings = Settings::from_yaml("fontSize: 20\nshowChords: false\n")?;
//! assert_eq!(settings.font_size_px, 20);
//! assert!(!settings.show_chords);
//! assert_eq!(settings.scroll_speed, 0.8);
//! # Ok::<(), songbook::SongbookError>(())
//! ```

use crate::error::SongbookError;
use serde::{Deserialize, Serialize};

pub const MIN_FONT_SIZE: u32 = 10;
pub const MAX_FONT_SIZE: u32 = 30;
pub const DEFAULT_FONT_SIZE: u32 = 16;
pub const FONT_SIZE_STEP: u32 = 1;

pub const MIN_SCROLL_SPEED: f64 = 0.1;
pub const MAX_SCROLL_SPEED: f64 = 3.0;
pub const DEFAULT_SCROLL_SPEED: f64 = 0.8;
pub const SCROLL_SPEED_STEP: f64 = 0.2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    #[serde(rename = "fontSize", alias = "fontSizePx")]
    pub font_size_px: u32,
    pub scroll_speed: f64,
    pub show_chords: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            font_size_px: DEFAULT_FONT_SIZE,
            scroll_speed: DEFAULT_SCROLL_SPEED,
            show_chords: true,
        }
    }
}

impl Settings {
    /// Read and validate settings from YAML. Missing fields take defaults.
    pub fn from_yaml(source: &str) -> Result<Self, SongbookError> {
        let settings: Settings = serde_yaml::from_str(source)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Check that every field is inside its documented range
    pub fn validate(&self) -> Result<(), SongbookError> {
        if !(MIN_FONT_SIZE..=MAX_FONT_SIZE).contains(&self.font_size_px) {
            return Err(SongbookError::SettingsError(format!(
                "fontSize must be between {} and {}, got {}",
                MIN_FONT_SIZE, MAX_FONT_SIZE, self.font_size_px
            )));
        }
        if !(MIN_SCROLL_SPEED..=MAX_SCROLL_SPEED).contains(&self.scroll_speed) {
            return Err(SongbookError::SettingsError(format!(
                "scrollSpeed must be between {} and {}, got {}",
                MIN_SCROLL_SPEED, MAX_SCROLL_SPEED, self.scroll_speed
            )));
        }
        Ok(())
    }

    /// Increase the font size by one step, returning the new size
    pub fn increase_font_size(&mut self) -> u32 {
        self.font_size_px = (self.font_size_px + FONT_SIZE_STEP).min(MAX_FONT_SIZE);
        self.font_size_px
    }

    /// Decrease the font size by one step, returning the new size
    pub fn decrease_font_size(&mut self) -> u32 {
        self.font_size_px = self
            .font_size_px
            .saturating_sub(FONT_SIZE_STEP)
            .max(MIN_FONT_SIZE);
        self.font_size_px
    }

    /// Flip chord visibility, returning the new value
    pub fn toggle_chords(&mut self) -> bool {
        self.show_chords = !self.show_chords;
        self.show_chords
    }
}

/// Clamp a scroll speed into range, rounded to one decimal place.
/// NaN falls back to the default speed.
pub fn clamp_scroll_speed(speed: f64) -> f64 {
    if speed.is_nan() {
        return DEFAULT_SCROLL_SPEED;
    }
    ((speed * 10.0).round() / 10.0).clamp(MIN_SCROLL_SPEED, MAX_SCROLL_SPEED)
}
