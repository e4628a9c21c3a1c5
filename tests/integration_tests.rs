//! Integration tests for the songbook pipeline
//!
//! Tests full rendering from ChordPro source to styled HTML, plus the layout
//! and normalization guarantees the view depends on.

use pretty_assertions::assert_eq;
use songbook::chords::normalize_chord_name;
use songbook::layout::{build_columns, lyrics_of};
use songbook::lexer::{extract_chords, BracketScanner, ChordScanner, RegexScanner};
use songbook::render::Row;
use songbook::{
    lint, parse, render_song, render_song_or_error_panel, render_song_unchecked, render_tree,
    Column, Settings, Severity, SongbookError,
};

const AMAZING_GRACE: &str = r#"{title: Amazing Grace}
{artist: John Newton}
# traditional hymn, 3/4

{start_of_verse}
[G]Amazing [G7]grace, how [C]sweet the [G]sound
That [G]saved a wretch like [D]me
{end_of_verse}

{start_of_chorus}
{c: Repeat twice}
[G][D/F#]I once was [Em]lost
{end_of_chorus}
"#;

fn strip_brackets(line: &str) -> String {
    let mut out = String::new();
    let mut rest = line;
    for token in extract_chords(line) {
        let consumed = line.len() - rest.len();
        out.push_str(&rest[..token.offset - consumed]);
        rest = &line[token.end()..];
    }
    out.push_str(rest);
    out
}

#[test]
fn test_render_full_song() {
    let html = render_song(AMAZING_GRACE, &Settings::default()).unwrap();
    assert!(html.contains("<h1 class=\"title\""));
    assert!(html.contains(">Amazing Grace</h1>"));
    assert!(html.contains(">John Newton</h2>"));
    assert!(html.contains("<div class=\"paragraph verse\""));
    assert!(html.contains("<div class=\"paragraph chorus\""));
    assert!(html.contains(">Repeat twice</div>"));
    assert!(!html.contains("traditional hymn"));
    assert!(html.contains(">D/F#</div>"));
}

#[test]
fn test_render_tree_metadata_and_rows() {
    let song = render_tree(AMAZING_GRACE, &Settings::default()).unwrap();
    assert_eq!(song.metadata.title.as_deref(), Some("Amazing Grace"));
    assert_eq!(song.metadata.artist.as_deref(), Some("John Newton"));

    let kinds: Vec<&str> = song
        .rows()
        .map(|row| match row {
            Row::Spacer { .. } => "spacer",
            Row::Comment { .. } => "comment",
            Row::Lyrics { .. } => "lyrics",
        })
        .collect();
    assert_eq!(
        kinds,
        vec!["spacer", "lyrics", "lyrics", "spacer", "comment", "lyrics"]
    );
}

#[test]
fn test_consecutive_chords_render_separately() {
    let song = render_tree("[G][D/F#]I once was lost", &Settings::default()).unwrap();
    let columns: Vec<_> = song.columns().collect();
    assert!(columns[0].consecutive);
    assert_eq!(columns[0].lyrics.text, "");
    assert!(columns[0].style.get("min-width").is_some());
    assert!(!columns[1].consecutive);
}

#[test]
fn test_title_and_artist_round_trip() {
    let song = parse("{title: Amazing Grace}");
    assert_eq!(song.metadata.title.as_deref(), Some("Amazing Grace"));
    let song = parse("{a: Unknown}");
    assert_eq!(song.metadata.artist.as_deref(), Some("Unknown"));
}

#[test]
fn test_hello_world_columns() {
    let line = "[C]Hello [G]world";
    assert_eq!(
        build_columns(line, &extract_chords(line)),
        vec![Column::new("C", "Hello "), Column::new("G", "world")]
    );
}

#[test]
fn test_chordless_lines_are_one_verbatim_column() {
    for line in ["just words", "  indented  ", "price: $5 [unclosed", "a ] b", "\\#1 hit"] {
        let columns = build_columns(line, &extract_chords(line));
        assert_eq!(columns, vec![Column::new("", line)], "line {:?}", line);
    }

    let song = render_tree("\\#1 hit", &Settings::default()).unwrap();
    assert_eq!(song.columns().next().unwrap().lyrics.text, "#1 hit");
}

#[test]
fn test_lyrics_reproduce_line_without_brackets() {
    let lines = [
        "[C]Hello [G]world",
        "Oh [D]say can you [A7]see",
        "[C][G][Am]",
        "trailing [F]",
        "[Cmaj7/G]x[D]y[Em]z",
        "Ünïcödé [G]wörds [C]ok",
        "[bad [C]nested",
    ];
    for line in lines {
        let columns = build_columns(line, &extract_chords(line));
        assert_eq!(lyrics_of(&columns), strip_brackets(line), "line {:?}", line);
    }
}

#[test]
fn test_scanners_agree() {
    let lines = [
        "[C]Hello [G]world",
        "[C][G]lyrics",
        "[] empty [ [x] ] [[D]]",
        "no chords",
        "[unclosed",
    ];
    for line in lines {
        assert_eq!(RegexScanner.scan(line), BracketScanner.scan(line), "line {:?}", line);
    }
}

#[test]
fn test_normalizer_examples_and_idempotence() {
    assert_eq!(normalize_chord_name("Asus"), "Asus4");
    assert_eq!(normalize_chord_name("Cma7"), "Cmaj7");
    assert_eq!(normalize_chord_name("Dm"), "Dm");

    for name in ["Asus", "A2", "Cma7", "cma7", "F#mma7", "Bbma7", "Dm", "", "G/B", "Asus4"] {
        let once = normalize_chord_name(name);
        assert_eq!(normalize_chord_name(&once), once, "name {:?}", name);
    }
}

#[test]
fn test_normalized_names_reach_html() {
    let html = render_song("[Cma7]one [Asus]two", &Settings::default()).unwrap();
    assert!(html.contains(">Cmaj7</div>"));
    assert!(html.contains(">Asus4</div>"));
}

#[test]
fn test_hidden_chords_stay_in_markup() {
    let settings = Settings {
        show_chords: false,
        ..Settings::default()
    };
    let html = render_song("[C]Hello", &settings).unwrap();
    assert!(html.contains("display: none"));
    assert!(html.contains(">C</div>"));
}

#[test]
fn test_structure_errors() {
    let result = render_song("{soc}\nla\n{eov}", &Settings::default());
    assert_eq!(
        result,
        Err(SongbookError::StructureError {
            line: 3,
            message: "end_of_verse does not match the chorus opened at line 1".to_string(),
        })
    );
    assert!(render_song_unchecked("{soc}\nla\n{eov}", &Settings::default()).is_ok());
}

#[test]
fn test_invalid_settings_are_rejected() {
    let settings = Settings {
        font_size_px: 64,
        ..Settings::default()
    };
    assert!(matches!(
        render_song("x", &settings),
        Err(SongbookError::SettingsError(_))
    ));
}

#[test]
fn test_error_panel_shows_escaped_source() {
    let settings = Settings {
        font_size_px: 64,
        ..Settings::default()
    };
    let source = "{t: Draft}\n<b>bold</b>";
    let html = render_song_or_error_panel(source, &settings);
    assert!(html.contains("class=\"render-error\""));
    assert!(html.contains("Invalid settings"));
    assert!(html.contains("&lt;b&gt;bold&lt;/b&gt;"));
}

#[test]
fn test_display_render_survives_stray_section_end() {
    let source = "{title: Hymn}\n[G]Amazing [C]grace\n{end_of_chorus}\n[D]how sweet";
    assert!(render_song(source, &Settings::default()).is_err());

    let html = render_song_or_error_panel(source, &Settings::default());
    assert!(!html.contains("render-error"));
    assert!(html.contains(">Hymn</h1>"));
    assert!(html.contains(">G</div>"));
    assert!(html.contains(">D</div>"));
    assert!(html.contains(">how sweet</div>"));
}

#[test]
fn test_malformed_input_never_fails() {
    let source = "{}\n{: value}\n{unclosed\n[unclosed chord\n]]][[\n{bad key: x}";
    assert!(render_song(source, &Settings::default()).is_ok());

    let warnings: Vec<usize> = lint(source)
        .iter()
        .filter(|d| d.severity == Severity::Warning)
        .map(|d| d.line)
        .collect();
    assert_eq!(warnings, vec![1, 2, 6]);
}

#[test]
fn test_settings_file_drives_render() {
    let settings = Settings::from_yaml("fontSize: 24\nscrollSpeed: 1.4\nshowChords: true\n").unwrap();
    let html = render_song("{t: Big}\n[C]la", &settings).unwrap();
    assert!(html.contains("font-size: 36px"));
    assert!(html.contains("padding: 28.8px 0 0"));
}
