pub mod ast;
pub mod autoscroll;
pub mod chords;
pub mod clock;
pub mod controller;
pub mod debounce;
pub mod error;
pub mod html;
pub mod keyboard;
pub mod layout;
pub mod lexer;
pub mod parser;
pub mod render;
pub mod semantic;
pub mod settings;
pub mod style;

pub use ast::*;
pub use error::*;
pub use html::{error_panel, to_html};
pub use parser::parse;
pub use render::{render, RenderedSong};
pub use semantic::{validate, Diagnostic, Severity};
pub use settings::Settings;
pub use style::apply_styles;

use log::warn;

/// Render ChordPro source to styled HTML.
/// This is the main entry point for the library.
pub fn render_song(source: &str, settings: &Settings) -> Result<String, SongbookError> {
    let song = render_tree(source, settings)?;
    Ok(to_html(&song))
}

/// Render without rejecting section problems; they are logged as warnings.
/// Only invalid settings fail.
pub fn render_song_unchecked(source: &str, settings: &Settings) -> Result<String, SongbookError> {
    settings.validate()?;
    let song = parse(source);
    warn_structure_problems(&song);
    Ok(to_html(&apply_styles(render(&song), settings)))
}

/// Parse, validate and style a song, stopping short of HTML
pub fn render_tree(source: &str, settings: &Settings) -> Result<RenderedSong, SongbookError> {
    settings.validate()?;
    let song = parse(source);
    validate(&song)?;
    Ok(apply_styles(render(&song), settings))
}

/// Render a song for display. Section problems do not stop the song from
/// showing; anything that does fail is replaced by an error panel with the
/// raw source.
pub fn render_song_or_error_panel(source: &str, settings: &Settings) -> String {
    match render_song_unchecked(source, settings) {
        Ok(html) => html,
        Err(e) => {
            warn!("failed to render song: {}", e);
            error_panel(&e.to_string(), source)
        }
    }
}

/// Structure errors and warnings for ChordPro source
pub fn lint(source: &str) -> Vec<Diagnostic> {
    semantic::lint(&parse(source))
}

/// Log the structure errors of a song that is rendered anyway
pub(crate) fn warn_structure_problems(song: &Song) -> Vec<Diagnostic> {
    let diagnostics = semantic::lint(song);
    for diagnostic in &diagnostics {
        if diagnostic.severity == Severity::Error {
            warn!("line {}: {}", diagnostic.line, diagnostic.message);
        }
    }
    diagnostics
}
