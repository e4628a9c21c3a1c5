//! # Lexer
//!
//! Splits ChordPro source into classified lines and extracts bracketed chords
//! from content lines.
//!
//! ## Line classes
//! - `{key: value}` / `{key}` → [`Line::Directive`]
//! - `# ...` → [`Line::Comment`]
//! - empty after trimming → [`Line::Blank`]
//! - everything else → [`Line::Content`], scanned for `[chord]` tokens
//!
//! Nothing here fails. A directive with an empty or invalid key becomes
//! [`Directive::Malformed`], an unclosed `[` stays in the lyrics, and a line
//! that opens with `{` but never closes it is ordinary content.
//!
//! ## Chord scanning
//! The [`ChordScanner`] trait is the seam between classification and chord
//! matching. [`RegexScanner`] is what [`Lexer::new`] uses; [`BracketScanner`]
//! is a hand-written scanner with the same contract.
//!
//! ## Highlighting
//! [`highlight`] marks up one editor line with byte ranges: chords, the
//! `{key:` and `}` of a directive, its value, and comment lines.

use crate::ast::{ChordToken, Directive, Line, LocatedLine, SectionKind};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::ops::Range;

/// `[name]` where name is non-empty and holds no brackets
static CHORD_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\[\]]+)\]").expect("chord pattern is valid"));

static DIRECTIVE_KEY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z][a-z0-9_-]*$").expect("directive key pattern is valid"));

/// Finds chord tokens in a content line
pub trait ChordScanner {
    /// Return every chord token in `line`, in increasing offset order
    fn scan(&self, line: &str) -> Vec<ChordToken>;
}

/// Regex-based chord scanner
#[derive(Debug, Clone, Copy, Default)]
pub struct RegexScanner;

impl ChordScanner for RegexScanner {
    fn scan(&self, line: &str) -> Vec<ChordToken> {
        CHORD_PATTERN
            .captures_iter(line)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                let name = caps.get(1)?;
                Some(ChordToken {
                    name: name.as_str().to_string(),
                    offset: whole.start(),
                    len: whole.len(),
                })
            })
            .collect()
    }
}

/// Byte-walking chord scanner, equivalent to [`RegexScanner`]
#[derive(Debug, Clone, Copy, Default)]
pub struct BracketScanner;

impl ChordScanner for BracketScanner {
    fn scan(&self, line: &str) -> Vec<ChordToken> {
        let bytes = line.as_bytes();
        let mut tokens = Vec::new();
        let mut i = 0;

        while i < bytes.len() {
            if bytes[i] != b'[' {
                i += 1;
                continue;
            }

            // Find the next bracket of either kind after the opener
            let next = bytes[i + 1..]
                .iter()
                .position(|&b| b == b'[' || b == b']')
                .map(|p| p + i + 1);

            match next {
                Some(j) if bytes[j] == b']' => {
                    if j > i + 1 {
                        tokens.push(ChordToken {
                            name: line[i + 1..j].to_string(),
                            offset: i,
                            len: j + 1 - i,
                        });
                    }
                    i = j + 1;
                }
                // Another opener first: this one stays literal
                Some(j) => i = j,
                None => break,
            }
        }

        tokens
    }
}

/// Extract chord tokens with the default scanner
pub fn extract_chords(line: &str) -> Vec<ChordToken> {
    RegexScanner.scan(line)
}

/// Line classifier for ChordPro source
pub struct Lexer<'a> {
    input: &'a str,
    scanner: &'a dyn ChordScanner,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            scanner: &RegexScanner,
        }
    }

    pub fn with_scanner(input: &'a str, scanner: &'a dyn ChordScanner) -> Self {
        Self { input, scanner }
    }

    /// Classify every line of the input, numbering lines from 1
    pub fn tokenize(&self) -> Vec<LocatedLine> {
        self.input
            .lines()
            .enumerate()
            .map(|(i, raw)| LocatedLine {
                line: classify_line(raw, self.scanner),
                number: i + 1,
            })
            .collect()
    }
}

/// Classify one raw line (without its line terminator)
pub fn classify_line(raw: &str, scanner: &dyn ChordScanner) -> Line {
    let trimmed = raw.trim();

    if trimmed.is_empty() {
        return Line::Blank;
    }

    if trimmed.starts_with('{') {
        if let Some(close) = trimmed.rfind('}') {
            return Line::Directive(parse_directive(&trimmed[1..close]));
        }
    }

    if let Some(comment) = trimmed.strip_prefix('#') {
        return Line::Comment(comment.trim().to_string());
    }

    Line::Content {
        text: raw.to_string(),
        chords: scanner.scan(raw),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TokenKind {
    Chord,
    Directive,
    DirectiveValue,
    Comment,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HighlightSpan {
    pub range: Range<usize>,
    pub kind: TokenKind,
}

impl HighlightSpan {
    fn new(range: Range<usize>, kind: TokenKind) -> Self {
        Self { range, kind }
    }
}

/// Highlight spans for one editor line with the default scanner
pub fn highlight(line: &str) -> Vec<HighlightSpan> {
    highlight_with_scanner(line, &RegexScanner)
}

/// Highlight spans for one editor line, in order. Ranges are byte offsets
/// into `line` and follow the same line classes as [`classify_line`].
pub fn highlight_with_scanner(line: &str, scanner: &dyn ChordScanner) -> Vec<HighlightSpan> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }
    let lead = line.len() - line.trim_start().len();

    if trimmed.starts_with('{') {
        if let Some(close) = trimmed.rfind('}') {
            let close = lead + close;
            let colon = trimmed[..close - lead].find(':').map(|c| lead + c);
            return match colon {
                None => vec![HighlightSpan::new(lead..close + 1, TokenKind::Directive)],
                Some(colon) => {
                    let mut spans = vec![HighlightSpan::new(lead..colon + 1, TokenKind::Directive)];
                    let value = &line[colon + 1..close];
                    if !value.trim().is_empty() {
                        let start = colon + 1 + (value.len() - value.trim_start().len());
                        let end = colon + 1 + value.trim_end().len();
                        spans.push(HighlightSpan::new(start..end, TokenKind::DirectiveValue));
                    }
                    spans.push(HighlightSpan::new(close..close + 1, TokenKind::Directive));
                    spans
                }
            };
        }
    }

    if trimmed.starts_with('#') {
        return vec![HighlightSpan::new(lead..lead + trimmed.len(), TokenKind::Comment)];
    }

    scanner
        .scan(line)
        .into_iter()
        .map(|token| HighlightSpan::new(token.offset..token.end(), TokenKind::Chord))
        .collect()
}

/// Parse the text between a directive's braces
pub fn parse_directive(body: &str) -> Directive {
    let (key, value) = match body.split_once(':') {
        Some((key, value)) => (key, Some(value.trim().to_string())),
        None => (body, None),
    };
    let key = key.trim().to_lowercase();

    if !DIRECTIVE_KEY.is_match(&key) {
        return Directive::Malformed(body.trim().to_string());
    }

    let with_value = |make: fn(String) -> Directive| match &value {
        Some(v) if !v.is_empty() => make(v.clone()),
        _ => Directive::Other {
            key: key.clone(),
            value: value.clone(),
        },
    };

    match key.as_str() {
        "title" | "t" => with_value(Directive::Title),
        "subtitle" | "st" => with_value(Directive::Subtitle),
        "artist" | "a" => with_value(Directive::Artist),
        "key" => with_value(Directive::Key),
        "capo" => with_value(Directive::Capo),
        "comment" | "c" | "comment_italic" | "ci" | "comment_box" | "cb" => {
            with_value(Directive::Comment)
        }
        "start_of_chorus" | "soc" => Directive::StartOfSection(SectionKind::Chorus),
        "end_of_chorus" | "eoc" => Directive::EndOfSection(SectionKind::Chorus),
        "start_of_verse" | "sov" => Directive::StartOfSection(SectionKind::Verse),
        "end_of_verse" | "eov" => Directive::EndOfSection(SectionKind::Verse),
        "start_of_bridge" | "sob" => Directive::StartOfSection(SectionKind::Bridge),
        "end_of_bridge" | "eob" => Directive::EndOfSection(SectionKind::Bridge),
        _ => Directive::Other {
            key: key.clone(),
            value: value.clone(),
        },
    }
}
