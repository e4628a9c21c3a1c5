//! # Parser
//!
//! Turns ChordPro source into a [`Song`]: classified lines in source order
//! plus the metadata gathered from `title`, `subtitle`, `artist`, `key` and
//! `capo` directives. When a metadata directive appears more than once the
//! last one wins.
//!
//! ## Example
//! ```rust
//! use songbook::parse;
//!
//! let song = parse("{title: Amazing Grace}\n{a: Unknown}\n[G]Amazing [C]grace");
//! assert_eq!(song.metadata.title.as_deref(), Some("Amazing Grace"));
//! assert_eq!(song.metadata.artist.as_deref(), Some("Unknown"));
//! assert_eq!(song.lines.len(), 3);
//! ```

use crate::ast::{Directive, Line, LocatedLine, Metadata, Song};
use crate::lexer::{ChordScanner, Lexer};
use log::debug;

/// Parse ChordPro source with the default chord scanner
pub fn parse(source: &str) -> Song {
    from_lines(Lexer::new(source).tokenize())
}

/// Parse ChordPro source with a specific chord scanner
pub fn parse_with_scanner(source: &str, scanner: &dyn ChordScanner) -> Song {
    from_lines(Lexer::with_scanner(source, scanner).tokenize())
}

fn from_lines(lines: Vec<LocatedLine>) -> Song {
    let mut metadata = Metadata::default();

    for located in &lines {
        let Line::Directive(directive) = &located.line else {
            continue;
        };
        match directive {
            Directive::Title(v) => metadata.title = Some(v.clone()),
            Directive::Subtitle(v) => metadata.subtitle = Some(v.clone()),
            Directive::Artist(v) => metadata.artist = Some(v.clone()),
            Directive::Key(v) => metadata.key = Some(v.clone()),
            Directive::Capo(v) => metadata.capo = Some(v.clone()),
            Directive::Other { key, .. } => {
                debug!("line {}: ignoring directive '{}'", located.number, key);
            }
            Directive::Malformed(body) => {
                debug!("line {}: skipping malformed directive '{{{}}}'", located.number, body);
            }
            Directive::Comment(_) | Directive::StartOfSection(_) | Directive::EndOfSection(_) => {}
        }
    }

    Song { metadata, lines }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::BracketScanner;

    #[test]
    fn test_title_and_artist_round_trip() {
        let song = parse("{title: Amazing Grace}\n{a: Unknown}");
        assert_eq!(song.metadata.title, Some("Amazing Grace".to_string()));
        assert_eq!(song.metadata.artist, Some("Unknown".to_string()));
    }

    #[test]
    fn test_short_and_long_keys() {
        let song = parse("{t: Short}\n{st: Sub}\n{KEY: G}\n{capo: 2}");
        assert_eq!(song.metadata.title.as_deref(), Some("Short"));
        assert_eq!(song.metadata.subtitle.as_deref(), Some("Sub"));
        assert_eq!(song.metadata.key.as_deref(), Some("G"));
        assert_eq!(song.metadata.capo.as_deref(), Some("2"));
        assert_eq!(song.metadata.artist, None);
    }

    #[test]
    fn test_last_metadata_directive_wins() {
        let song = parse("{title: First}\n{title: Second}");
        assert_eq!(song.metadata.title.as_deref(), Some("Second"));
    }

    #[test]
    fn test_every_line_is_kept_in_order() {
        let song = parse("{title: T}\n# hidden\n\n[C]la la\n{bogus directive}");
        let kinds: Vec<&str> = song
            .lines
            .iter()
            .map(|l| match l.line {
                Line::Directive(_) => "directive",
                Line::Comment(_) => "comment",
                Line::Blank => "blank",
                Line::Content { .. } => "content",
            })
            .collect();
        assert_eq!(kinds, vec!["directive", "comment", "blank", "content", "directive"]);
    }

    #[test]
    fn test_empty_source() {
        let song = parse("");
        assert!(song.lines.is_empty());
        assert!(song.metadata.is_empty());
    }

    #[test]
    fn test_parse_with_scanner_matches_default() {
        let source = "{t: X}\n[C]Hello [G]world\n[D stray [E]x";
        assert_eq!(parse(source), parse_with_scanner(source, &BracketScanner));
    }
}
