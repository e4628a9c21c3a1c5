//! # Song Types
//!
//! Type structures produced by the tokenizer and parser.
//!
//! ## Type Hierarchy
//! ```text
//! Song
//!   ├── Metadata (title, subtitle, artist, key, capo)
//!   └── Vec<LocatedLine>
//!         ├── number: 1-based source line
//!         └── Line
//!               ├── Directive(Directive)
//!               ├── Comment(String)      (suppressed from output)
//!               ├── Blank                (spacer row)
//!               └── Content { text, chords: Vec<ChordToken> }
//!
//! Directive (enum)
//!   ├── Title / Subtitle / Artist / Key / Capo (metadata)
//!   ├── Comment(String)                  (inline comment row)
//!   ├── StartOfSection / EndOfSection    (chorus, verse, bridge)
//!   ├── Other { key, value }             (ignored)
//!   └── Malformed(String)                (inert)
//! ```
//!
//! ## Key Concepts
//!
//! ### Line classification
//! Every source line is exactly one of Directive, Comment, Blank or Content.
//!
//! ### Chord offsets
//! `ChordToken::offset` and `ChordToken::len` are byte positions in the
//! untrimmed content line, bracket-inclusive, so `&text[offset..offset + len]`
//! is always `"[name]"`.
//!
//! ### Columns
//! A `Column` is a chord (possibly empty) plus the lyric fragment printed under
//! it. Joining every fragment of a line gives the line with its chord brackets
//! removed.

use serde::Serialize;

/// Song metadata collected from directives
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Metadata {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub artist: Option<String>,
    pub key: Option<String>,
    pub capo: Option<String>,
}

impl Metadata {
    pub fn is_empty(&self) -> bool {
        *self == Metadata::default()
    }
}

/// Kinds of ChordPro sections that group rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    Chorus,
    Verse,
    Bridge,
}

impl SectionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SectionKind::Chorus => "chorus",
            SectionKind::Verse => "verse",
            SectionKind::Bridge => "bridge",
        }
    }
}

/// A parsed `{key: value}` or `{key}` line
#[derive(Debug, Clone, PartialEq)]
pub enum Directive {
    Title(String),
    Subtitle(String),
    Artist(String),
    Key(String),
    Capo(String),
    Comment(String),
    StartOfSection(SectionKind),
    EndOfSection(SectionKind),
    /// A well-formed directive this renderer does not act on
    Other { key: String, value: Option<String> },
    /// Body of a directive with an empty or invalid key
    Malformed(String),
}

/// A bracketed chord found in a content line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChordToken {
    pub name: String,
    pub offset: usize,
    pub len: usize,
}

impl ChordToken {
    /// Byte offset just past the closing bracket
    pub fn end(&self) -> usize {
        self.offset + self.len
    }
}

/// Classification of a single source line
#[derive(Debug, Clone, PartialEq)]
pub enum Line {
    Directive(Directive),
    Comment(String),
    Blank,
    Content { text: String, chords: Vec<ChordToken> },
}

/// A line with its 1-based line number in the source
#[derive(Debug, Clone, PartialEq)]
pub struct LocatedLine {
    pub line: Line,
    pub number: usize,
}

/// A chord (possibly empty) and the lyric fragment under it
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Column {
    pub chord: String,
    pub lyrics: String,
}

impl Column {
    pub fn new(chord: impl Into<String>, lyrics: impl Into<String>) -> Self {
        Self {
            chord: chord.into(),
            lyrics: lyrics.into(),
        }
    }

    pub fn has_chord(&self) -> bool {
        !self.chord.is_empty()
    }
}

/// A parsed song
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Song {
    pub metadata: Metadata,
    pub lines: Vec<LocatedLine>,
}
