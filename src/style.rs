//! # Style Applicator
//!
//! Sets presentation properties on a [`RenderedSong`] from the current
//! [`Settings`]. This is a pure function of the tree and the settings: calling
//! it again with new settings (a font size change, chords toggled) restyles
//! the same tree without re-parsing anything.
//!
//! ## Sizing
//! With a font size of `fs` pixels:
//! - lyrics, chords and comments are `fs`, line height is 1.5
//! - the title is `fs * 1.5`, subtitle and artist headings `fs * 1.125`
//! - every column reserves `fs * 1.2` of top padding for its chord, whether
//!   or not the column has a chord and whether or not chords are shown, so
//!   lyric baselines line up and toggling chords never moves the text
//!
//! Hidden chords get `display: none`; they take no space of their own because
//! they are absolutely positioned inside the reserved padding.

use crate::ast::SectionKind;
use crate::render::{ColumnNode, Heading, HeadingKind, RenderedSong, Row, Section};
use crate::settings::Settings;
use serde::Serialize;

pub const CHORD_COLOR: &str = "#dc3545";
pub const COMMENT_COLOR: &str = "#28a745";
pub const SUBTITLE_COLOR: &str = "#666";
pub const CHORUS_BACKGROUND: &str = "#f3f6fc";

/// Ratio of a chord line's height to the font size
pub const CHORD_LINE_RATIO: f64 = 1.2;

/// Ordered inline style declarations
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct Style {
    declarations: Vec<(&'static str, String)>,
}

impl Style {
    /// Set a property, replacing any earlier value for it
    pub fn set(&mut self, property: &'static str, value: impl Into<String>) -> &mut Self {
        let value = value.into();
        match self.declarations.iter_mut().find(|(p, _)| *p == property) {
            Some(existing) => existing.1 = value,
            None => self.declarations.push((property, value)),
        }
        self
    }

    pub fn get(&self, property: &str) -> Option<&str> {
        self.declarations
            .iter()
            .find(|(p, _)| *p == property)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// Serialize as the value of an HTML `style` attribute
    pub fn to_css(&self) -> String {
        self.declarations
            .iter()
            .map(|(p, v)| format!("{}: {}", p, v))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Format a pixel length, dropping a zero fraction
fn px(value: f64) -> String {
    let rounded = (value * 1000.0).round() / 1000.0;
    format!("{}px", rounded)
}

/// Minimum width for a chord with no lyrics under it
pub fn consecutive_min_width(chord: &str) -> String {
    let em = (chord.chars().count() as f64 * 0.8).max(1.5);
    format!("{}em", (em * 100.0).round() / 100.0)
}

/// Apply every style rule to a rendered song
pub fn apply_styles(mut song: RenderedSong, settings: &Settings) -> RenderedSong {
    let fs = settings.font_size_px as f64;

    let sheet = &mut song.sheet.style;
    sheet.set("font-family", "monospace");
    sheet.set("font-size", px(fs));
    sheet.set("line-height", "1.5");
    sheet.set("padding-bottom", "2rem");

    for heading in &mut song.headings {
        style_heading(heading, fs);
    }

    for section in &mut song.sheet.sections {
        style_section(section);
        for row in &mut section.rows {
            style_row(row, fs, settings.show_chords);
        }
    }

    song
}

fn style_heading(heading: &mut Heading, fs: f64) {
    let style = &mut heading.style;
    match heading.kind {
        HeadingKind::Title => {
            style.set("font-size", px(fs * 1.5));
            style.set("font-weight", "bold");
            style.set("margin-bottom", "0.5rem");
        }
        HeadingKind::Subtitle => {
            style.set("font-size", px(fs * 1.125));
            style.set("font-weight", "normal");
            style.set("margin-bottom", "1.5rem");
            style.set("color", SUBTITLE_COLOR);
        }
    }
}

fn style_section(section: &mut Section) {
    section.style.set("margin-bottom", "1.5rem");
    if section.kind == Some(SectionKind::Chorus) {
        section
            .style
            .set("background", CHORUS_BACKGROUND)
            .set("padding", "1rem")
            .set("border-radius", "4px")
            .set("margin-left", "0");
    }
}

fn style_row(row: &mut Row, fs: f64, show_chords: bool) {
    match row {
        Row::Spacer { style } => {
            style.set("min-height", "1.5em");
        }
        Row::Comment { style, .. } => {
            style
                .set("color", COMMENT_COLOR)
                .set("font-style", "italic")
                .set("margin", "0.5em 0")
                .set("width", "100%")
                .set("font-size", px(fs));
        }
        Row::Lyrics { columns, style } => {
            style
                .set("position", "relative")
                .set("margin", "0")
                .set("padding", "0")
                .set("min-height", "1.5em")
                .set("display", "flex")
                .set("flex-wrap", "wrap")
                .set("align-items", "flex-end")
                .set("width", "100%");
            for column in columns {
                style_column(column, fs, show_chords);
            }
        }
    }
}

fn style_column(column: &mut ColumnNode, fs: f64, show_chords: bool) {
    let chord_height = px(fs * CHORD_LINE_RATIO);

    column
        .style
        .set("display", "inline-block")
        .set("position", "relative")
        .set("padding", format!("{} 0 0", chord_height))
        .set("margin", "0")
        .set("min-height", "1.5em");

    if let Some(chord) = &mut column.chord {
        chord
            .style
            .set("font-size", px(fs))
            .set("color", CHORD_COLOR)
            .set("font-weight", "bold")
            .set("position", "absolute")
            .set("top", "0")
            .set("left", "0")
            .set("height", chord_height)
            .set("white-space", "pre")
            .set("display", if show_chords { "block" } else { "none" });

        if column.consecutive {
            column
                .style
                .set("min-width", consecutive_min_width(&chord.name))
                .set("margin-right", "0.5em");
        }
    }

    column
        .lyrics
        .style
        .set("position", "relative")
        .set("white-space", "pre")
        .set("min-height", "1em")
        .set("font-size", px(fs))
        .set("padding", "0 0.1em");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;
    use crate::render::render;

    fn styled(source: &str, settings: &Settings) -> RenderedSong {
        apply_styles(render(&parse(source)), settings)
    }

    fn settings(font_size_px: u32, show_chords: bool) -> Settings {
        Settings {
            font_size_px,
            show_chords,
            ..Settings::default()
        }
    }

    #[test]
    fn test_style_set_replaces() {
        let mut style = Style::default();
        style.set("color", "red").set("margin", "0").set("color", "blue");
        assert_eq!(style.to_css(), "color: blue; margin: 0");
        assert_eq!(style.get("color"), Some("blue"));
        assert_eq!(style.get("padding"), None);
    }

    #[test]
    fn test_px_formatting() {
        assert_eq!(px(16.0), "16px");
        assert_eq!(px(24.0), "24px");
        assert_eq!(px(16.0 * 1.2), "19.2px");
        assert_eq!(px(15.0 * 1.125), "16.875px");
    }

    #[test]
    fn test_heading_sizes_scale_with_font() {
        let song = styled("{title: T}\n{artist: A}", &settings(20, true));
        assert_eq!(song.headings[0].style.get("font-size"), Some("30px"));
        assert_eq!(song.headings[1].style.get("font-size"), Some("22.5px"));
        assert_eq!(song.headings[1].style.get("color"), Some(SUBTITLE_COLOR));
    }

    #[test]
    fn test_chord_style() {
        let song = styled("[C]Hello", &settings(16, true));
        let column = song.columns().next().unwrap();
        let chord = column.chord.as_ref().unwrap();
        assert_eq!(chord.style.get("font-size"), Some("16px"));
        assert_eq!(chord.style.get("color"), Some(CHORD_COLOR));
        assert_eq!(chord.style.get("position"), Some("absolute"));
        assert_eq!(chord.style.get("display"), Some("block"));
        assert_eq!(column.lyrics.style.get("font-size"), Some("16px"));
    }

    #[test]
    fn test_hidden_chords_keep_column_padding() {
        let source = "plain [C]Hello";
        let shown = styled(source, &settings(16, true));
        let hidden = styled(source, &settings(16, false));

        let shown_columns: Vec<&ColumnNode> = shown.columns().collect();
        let hidden_columns: Vec<&ColumnNode> = hidden.columns().collect();

        for (a, b) in shown_columns.iter().zip(&hidden_columns) {
            assert_eq!(a.style, b.style);
            assert_eq!(a.style.get("padding"), Some("19.2px 0 0"));
        }
        let chord = hidden_columns[1].chord.as_ref().unwrap();
        assert_eq!(chord.style.get("display"), Some("none"));
    }

    #[test]
    fn test_chordless_column_reserves_chord_space() {
        let song = styled("no chords at all", &settings(10, true));
        let column = song.columns().next().unwrap();
        assert_eq!(column.style.get("padding"), Some("12px 0 0"));
    }

    #[test]
    fn test_consecutive_chords_get_min_width() {
        let song = styled("[C][Gsus4]lyrics", &settings(16, true));
        let columns: Vec<&ColumnNode> = song.columns().collect();
        assert_eq!(columns[0].style.get("min-width"), Some("1.5em"));
        assert_eq!(columns[1].style.get("min-width"), None);

        let song = styled("[Cmaj7/G][D]x", &settings(16, true));
        let first = song.columns().next().unwrap();
        assert_eq!(first.style.get("min-width"), Some("5.6em"));
    }

    #[test]
    fn test_comment_and_chorus_styles() {
        let song = styled("{soc}\n{c: Repeat}\n{eoc}", &settings(18, true));
        let section = &song.sheet.sections[0];
        assert_eq!(section.style.get("background"), Some(CHORUS_BACKGROUND));
        match &section.rows[0] {
            Row::Comment { style, .. } => {
                assert_eq!(style.get("color"), Some(COMMENT_COLOR));
                assert_eq!(style.get("width"), Some("100%"));
                assert_eq!(style.get("font-size"), Some("18px"));
            }
            other => panic!("Expected comment row, got {:?}", other),
        }
    }

    #[test]
    fn test_restyling_is_pure() {
        let base = render(&parse("{t: T}\n[C]a [G]b"));
        let once = apply_styles(base.clone(), &settings(20, false));
        let twice = apply_styles(apply_styles(base, &settings(12, true)), &settings(20, false));
        assert_eq!(once, twice);
    }
}
