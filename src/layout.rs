//! # Layout Builder
//!
//! Splits a content line into [`Column`]s at chord boundaries so that every
//! chord sits above the first character of the text that follows its bracket.
//!
//! ```text
//! "[C]Hello [G]world"
//!   → {chord: "C", lyrics: "Hello "}
//!     {chord: "G", lyrics: "world"}
//!
//! "Oh [D]say"
//!   → {chord: "",  lyrics: "Oh "}
//!     {chord: "D", lyrics: "say"}
//! ```
//!
//! Escaped sharps (`\#`) are kept as written here; the renderer unescapes
//! them when it produces display text.

use crate::ast::{ChordToken, Column};

/// Build the columns for one content line.
///
/// `chords` must be in increasing offset order and non-overlapping, as
/// returned by any [`ChordScanner`](crate::lexer::ChordScanner).
pub fn build_columns(line: &str, chords: &[ChordToken]) -> Vec<Column> {
    let Some(first) = chords.first() else {
        return vec![Column::new("", line)];
    };

    let mut columns = Vec::with_capacity(chords.len() + 1);

    let leading = &line[..first.offset];
    if !leading.is_empty() {
        columns.push(Column::new("", leading));
    }

    for (i, chord) in chords.iter().enumerate() {
        let end = chords.get(i + 1).map_or(line.len(), |next| next.offset);
        columns.push(Column::new(chord.name.as_str(), &line[chord.end()..end]));
    }

    columns
}

/// Lyric text of a row with the chords dropped
pub fn lyrics_of(columns: &[Column]) -> String {
    columns.iter().map(|c| c.lyrics.as_str()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::extract_chords;

    fn layout(line: &str) -> Vec<Column> {
        build_columns(line, &extract_chords(line))
    }

    #[test]
    fn test_chords_above_following_text() {
        assert_eq!(
            layout("[C]Hello [G]world"),
            vec![Column::new("C", "Hello "), Column::new("G", "world")]
        );
    }

    #[test]
    fn test_leading_text_gets_chordless_column() {
        assert_eq!(
            layout("Oh [D]say can you [A7]see"),
            vec![
                Column::new("", "Oh "),
                Column::new("D", "say can you "),
                Column::new("A7", "see"),
            ]
        );
    }

    #[test]
    fn test_line_without_chords_is_single_column() {
        let line = "  Plain words, \\# kept";
        assert_eq!(layout(line), vec![Column::new("", line)]);
    }

    #[test]
    fn test_consecutive_chords_have_empty_fragment() {
        assert_eq!(
            layout("[C][G]lyrics"),
            vec![Column::new("C", ""), Column::new("G", "lyrics")]
        );
    }

    #[test]
    fn test_trailing_chord() {
        assert_eq!(
            layout("end on [C]"),
            vec![Column::new("", "end on "), Column::new("C", "")]
        );
    }

    #[test]
    fn test_fragments_reproduce_line_without_brackets() {
        let lines = [
            "[C]Hello [G]world",
            "Oh [D]say can you [A7]see",
            "[C][G][Am]",
            "a [stray bracket [F]here",
            "ünï[Em]cödé [G]tëxt",
            "",
        ];
        for line in lines {
            let chords = extract_chords(line);
            let mut stripped = line.to_string();
            for chord in chords.iter().rev() {
                stripped.replace_range(chord.offset..chord.end(), "");
            }
            assert_eq!(lyrics_of(&build_columns(line, &chords)), stripped, "line: {}", line);
        }
    }
}
