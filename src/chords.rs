//! Chord name normalization
//!
//! Rewrites common shorthand chord spellings into their canonical form before
//! display. Two passes run in order:
//!
//! 1. `<root><accidental?><m?>ma7` (any case) becomes `...maj7`
//! 2. an exact match in [`CHORD_ALIASES`] is replaced by its canonical name
//!
//! # Examples
//! ```
//! use songbook::chords::normalize_chord_name;
//!
//! assert_eq!(normalize_chord_name("Asus"), "Asus4");
//! assert_eq!(normalize_chord_name("Cma7"), "Cmaj7");
//! assert_eq!(normalize_chord_name("Dm"), "Dm");
//! ```

use once_cell::sync::Lazy;
use regex::Regex;

static MAJ7_SHORTHAND: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^([A-G](?:#|b)?m?)ma7$").expect("maj7 pattern is valid"));

/// Shorthand spellings and the names they are displayed as
pub const CHORD_ALIASES: &[(&str, &str)] = &[
    ("Asus", "Asus4"),
    ("Esus", "Esus4"),
    ("Dsus", "Dsus4"),
    ("A2", "Asus2"),
    ("E2", "Esus2"),
    ("D2", "Dsus2"),
];

/// Normalize a chord name. Applying it twice gives the same result as once.
pub fn normalize_chord_name(name: &str) -> String {
    let rewritten = match MAJ7_SHORTHAND.captures(name) {
        Some(caps) => format!("{}maj7", &caps[1]),
        None => name.to_string(),
    };

    CHORD_ALIASES
        .iter()
        .find(|(alias, _)| *alias == rewritten)
        .map(|(_, canonical)| canonical.to_string())
        .unwrap_or(rewritten)
}
