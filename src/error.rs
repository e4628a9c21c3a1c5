//! # Error Types
//!
//! Errors raised by the songbook pipeline.
//!
//! Malformed directives and unbalanced chord brackets are never errors: the
//! tokenizer degrades them to inert or literal text. What remains are problems
//! with the song's section structure and with the settings snapshot handed to
//! the renderer.
//!
//! ## Usage
//! ```rust
//! use songbook::{render_song, Settings, SongbookError};
//!
//! match render_song("{end_of_chorus}", &Settings::default()) {
//!     Ok(html) => println!("{}", html),
//!     Err(SongbookError::StructureError { line, message }) => {
//!         eprintln!("line {}: {}", line, message);
//!     }
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SongbookError {
    /// Section markers that do not pair up.
    ///
    /// # Example
    /// ```
    /// # use songbook::SongbookError;
    /// let err = SongbookError::StructureError {
    ///     line: 4,
    ///     message: "end_of_chorus without a matching start_of_chorus".to_string(),
    /// };
    /// assert_eq!(
    ///     err.to_string(),
    ///     "Structure error at line 4: end_of_chorus without a matching start_of_chorus"
    /// );
    /// ```
    #[error("Structure error at line {line}: {message}")]
    StructureError { line: usize, message: String },

    /// Settings that are out of range or could not be deserialized.
    ///
    /// # Example
    /// ```
    /// # use songbook::SongbookError;
    /// let err = SongbookError::SettingsError("fontSize must be between 10 and 30".to_string());
    /// assert_eq!(err.to_string(), "Invalid settings: fontSize must be between 10 and 30");
    /// ```
    #[error("Invalid settings: {0}")]
    SettingsError(String),
}

impl From<serde_yaml::Error> for SongbookError {
    fn from(e: serde_yaml::Error) -> Self {
        SongbookError::SettingsError(e.to_string())
    }
}
