//! # Renderer
//!
//! Builds a typed render tree from a parsed [`Song`]. The tree is what the
//! style pass decorates and what [`html`](crate::html) finally serializes, so
//! nothing downstream ever has to re-read markup.
//!
//! ## Tree shape
//! ```text
//! RenderedSong
//!   ├── metadata: Metadata           (title, artist, ... from directives)
//!   ├── headings: Vec<Heading>       (title, subtitle/artist)
//!   └── sheet: Sheet                 (.chord-sheet)
//!         └── Vec<Section>           (.paragraph [.chorus|.verse|.bridge])
//!               └── Vec<Row>
//!                     ├── Spacer     (.row, from a blank line)
//!                     ├── Comment    (.comment, from {c: ...})
//!                     └── Lyrics     (.row)
//!                           └── Vec<ColumnNode>  (.column)
//!                                 ├── Option<ChordNode>  (.chord)
//!                                 └── LyricsNode         (.lyrics)
//! ```
//!
//! Metadata directives and `#` comment lines produce no rows. Section markers
//! start and end sections; rows outside any marker pair go into plain
//! sections.

use crate::ast::{Directive, Line, Metadata, SectionKind, Song};
use crate::chords::normalize_chord_name;
use crate::layout::build_columns;
use crate::style::Style;
use serde::Serialize;

/// Level of a heading derived from metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HeadingKind {
    Title,
    Subtitle,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Heading {
    pub kind: HeadingKind,
    pub text: String,
    pub style: Style,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChordNode {
    /// Normalized chord name
    pub name: String,
    pub style: Style,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LyricsNode {
    /// Display text with `\#` already unescaped
    pub text: String,
    pub style: Style,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnNode {
    pub chord: Option<ChordNode>,
    pub lyrics: LyricsNode,
    /// A chord with no lyric text under it before the next chord
    pub consecutive: bool,
    pub style: Style,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Row {
    Spacer { style: Style },
    Comment { text: String, style: Style },
    Lyrics { columns: Vec<ColumnNode>, style: Style },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    pub kind: Option<SectionKind>,
    pub rows: Vec<Row>,
    pub style: Style,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Sheet {
    pub sections: Vec<Section>,
    pub style: Style,
}

/// The full render of one song
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct RenderedSong {
    pub metadata: Metadata,
    pub headings: Vec<Heading>,
    pub sheet: Sheet,
}

impl RenderedSong {
    /// All rows of the sheet in source order
    pub fn rows(&self) -> impl Iterator<Item = &Row> {
        self.sheet.sections.iter().flat_map(|s| s.rows.iter())
    }

    /// All columns of the sheet in source order
    pub fn columns(&self) -> impl Iterator<Item = &ColumnNode> {
        self.rows().flat_map(|row| match row {
            Row::Lyrics { columns, .. } => columns.as_slice(),
            _ => &[][..],
        })
    }
}

/// Replace `\#` escapes with a literal `#`
pub fn unescape_sharps(text: &str) -> String {
    text.replace("\\#", "#")
}

/// Render a parsed song into an unstyled tree
pub fn render(song: &Song) -> RenderedSong {
    let mut sections = Vec::new();
    let mut current = Section::new(None);

    for located in &song.lines {
        match &located.line {
            Line::Blank => current.rows.push(Row::Spacer {
                style: Style::default(),
            }),
            Line::Comment(_) => {}
            Line::Content { text, chords } => current.rows.push(Row::Lyrics {
                columns: build_columns(text, chords)
                    .into_iter()
                    .map(|column| column_node(&column.chord, &column.lyrics))
                    .collect(),
                style: Style::default(),
            }),
            Line::Directive(Directive::Comment(text)) => current.rows.push(Row::Comment {
                text: text.clone(),
                style: Style::default(),
            }),
            Line::Directive(Directive::StartOfSection(kind)) => {
                finish_section(&mut sections, &mut current, Some(*kind));
            }
            Line::Directive(Directive::EndOfSection(_)) => {
                finish_section(&mut sections, &mut current, None);
            }
            Line::Directive(_) => {}
        }
    }
    finish_section(&mut sections, &mut current, None);

    RenderedSong {
        metadata: song.metadata.clone(),
        headings: headings_for(&song.metadata),
        sheet: Sheet {
            sections,
            style: Style::default(),
        },
    }
}

impl Section {
    fn new(kind: Option<SectionKind>) -> Self {
        Self {
            kind,
            rows: Vec::new(),
            style: Style::default(),
        }
    }
}

fn finish_section(sections: &mut Vec<Section>, current: &mut Section, next: Option<SectionKind>) {
    let finished = std::mem::replace(current, Section::new(next));
    if !finished.rows.is_empty() {
        sections.push(finished);
    }
}

fn column_node(chord: &str, lyrics: &str) -> ColumnNode {
    let chord = (!chord.is_empty()).then(|| ChordNode {
        name: normalize_chord_name(chord),
        style: Style::default(),
    });
    ColumnNode {
        consecutive: chord.is_some() && lyrics.trim().is_empty(),
        chord,
        lyrics: LyricsNode {
            text: unescape_sharps(lyrics),
            style: Style::default(),
        },
        style: Style::default(),
    }
}

fn headings_for(metadata: &Metadata) -> Vec<Heading> {
    let mut headings = Vec::new();
    if let Some(title) = &metadata.title {
        headings.push(Heading {
            kind: HeadingKind::Title,
            text: title.clone(),
            style: Style::default(),
        });
    }
    for text in [&metadata.subtitle, &metadata.artist].into_iter().flatten() {
        headings.push(Heading {
            kind: HeadingKind::Subtitle,
            text: text.clone(),
            style: Style::default(),
        });
    }
    headings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    fn chord_names(rendered: &RenderedSong) -> Vec<String> {
        rendered
            .columns()
            .filter_map(|c| c.chord.as_ref().map(|ch| ch.name.clone()))
            .collect()
    }

    #[test]
    fn test_metadata_is_not_inlined() {
        let rendered = render(&parse("{title: Amazing Grace}\n{artist: Unknown}\n[G]A[C]mazing"));
        assert_eq!(rendered.metadata.title.as_deref(), Some("Amazing Grace"));
        assert_eq!(rendered.rows().count(), 1);
        assert_eq!(rendered.headings.len(), 2);
        assert_eq!(rendered.headings[0].kind, HeadingKind::Title);
        assert_eq!(rendered.headings[1].text, "Unknown");
    }

    #[test]
    fn test_one_row_per_rendered_line() {
        let rendered = render(&parse("[C]one\n\n{c: Softly}\n# skipped\ntwo"));
        let rows: Vec<&Row> = rendered.rows().collect();
        assert_eq!(rows.len(), 4);
        assert!(matches!(rows[0], Row::Lyrics { .. }));
        assert!(matches!(rows[1], Row::Spacer { .. }));
        assert!(matches!(rows[2], Row::Comment { text, .. } if text == "Softly"));
        assert!(matches!(rows[3], Row::Lyrics { columns, .. } if columns.len() == 1));
    }

    #[test]
    fn test_chord_names_are_normalized() {
        let rendered = render(&parse("[Asus]la [Cma7]la [Dm]la"));
        assert_eq!(chord_names(&rendered), vec!["Asus4", "Cmaj7", "Dm"]);
    }

    #[test]
    fn test_escaped_sharps_unescaped_in_lyrics() {
        let rendered = render(&parse("Track \\#1 [C]is \\#2"));
        let texts: Vec<&str> = rendered.columns().map(|c| c.lyrics.text.as_str()).collect();
        assert_eq!(texts, vec!["Track #1 ", "is #2"]);
    }

    #[test]
    fn test_consecutive_chords_flagged() {
        let rendered = render(&parse("[C][G]lyrics"));
        let flags: Vec<bool> = rendered.columns().map(|c| c.consecutive).collect();
        assert_eq!(flags, vec![true, false]);
    }

    #[test]
    fn test_sections_group_rows() {
        let rendered = render(&parse("intro\n{soc}\n[C]chorus\n{eoc}\noutro"));
        let kinds: Vec<Option<SectionKind>> =
            rendered.sheet.sections.iter().map(|s| s.kind).collect();
        assert_eq!(kinds, vec![None, Some(SectionKind::Chorus), None]);
        assert!(rendered.sheet.sections.iter().all(|s| s.rows.len() == 1));
    }

    #[test]
    fn test_empty_sections_are_dropped() {
        let rendered = render(&parse("{soc}\n{eoc}\n{title: Only}"));
        assert!(rendered.sheet.sections.is_empty());
    }

    #[test]
    fn test_malformed_and_unknown_directives_are_inert() {
        let rendered = render(&parse("{}\n{tempo: 90}\n{bad key: x}"));
        assert_eq!(rendered.rows().count(), 0);
    }
}
