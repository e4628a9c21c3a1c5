//! # Structure Validation
//!
//! Checks that section markers in a parsed [`Song`] pair up:
//! - `end_of_*` must close the section that is currently open
//! - a `start_of_*` may not open while another section is still open
//!
//! A section left open at the end of the song is closed implicitly; the
//! renderer does the same, so this is not reported.
//!
//! ## Example
//! ```rust
//! use songbook::{parse, validate};
//!
//! let song = parse("{soc}\n[C]Chorus line\n{eoc}");
//! assert!(validate(&song).is_ok());
//!
//! let song = parse("{eoc}");
//! assert!(validate(&song).is_err());
//! ```
//!
//! [`lint`] reports everything the pipeline silently tolerates as well:
//! malformed and unrecognized directives, and sections left open.

use crate::ast::{Directive, Line, SectionKind, Song};
use crate::error::SongbookError;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// A problem found in a song's source
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub line: usize,
    pub severity: Severity,
    pub message: String,
}

/// Validate the section structure of a song
pub fn validate(song: &Song) -> Result<(), SongbookError> {
    let mut open: Option<(SectionKind, usize)> = None;

    for located in &song.lines {
        let line = located.number;
        match &located.line {
            Line::Directive(Directive::StartOfSection(kind)) => {
                if let Some((current, started)) = open {
                    return Err(SongbookError::StructureError {
                        line,
                        message: format!(
                            "start_of_{} while the {} opened at line {} is still open",
                            kind.as_str(),
                            current.as_str(),
                            started
                        ),
                    });
                }
                open = Some((*kind, line));
            }
            Line::Directive(Directive::EndOfSection(kind)) => match open {
                Some((current, _)) if current == *kind => open = None,
                Some((current, started)) => {
                    return Err(SongbookError::StructureError {
                        line,
                        message: format!(
                            "end_of_{} does not match the {} opened at line {}",
                            kind.as_str(),
                            current.as_str(),
                            started
                        ),
                    });
                }
                None => {
                    return Err(SongbookError::StructureError {
                        line,
                        message: format!(
                            "end_of_{} without a matching start_of_{}",
                            kind.as_str(),
                            kind.as_str()
                        ),
                    });
                }
            },
            _ => {}
        }
    }

    Ok(())
}

/// Collect every structure error and warning in a song
pub fn lint(song: &Song) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    let mut open: Option<(SectionKind, usize)> = None;

    for located in &song.lines {
        let line = located.number;
        let Line::Directive(directive) = &located.line else {
            continue;
        };
        match directive {
            Directive::Malformed(body) => diagnostics.push(Diagnostic {
                line,
                severity: Severity::Warning,
                message: format!("malformed directive '{{{}}}' is ignored", body),
            }),
            Directive::Other { key, .. } => diagnostics.push(Diagnostic {
                line,
                severity: Severity::Warning,
                message: format!("unrecognized directive '{}' is ignored", key),
            }),
            Directive::StartOfSection(kind) => {
                if let Some((current, started)) = open {
                    diagnostics.push(Diagnostic {
                        line,
                        severity: Severity::Error,
                        message: format!(
                            "start_of_{} while the {} opened at line {} is still open",
                            kind.as_str(),
                            current.as_str(),
                            started
                        ),
                    });
                }
                open = Some((*kind, line));
            }
            Directive::EndOfSection(kind) => {
                if open.map(|(current, _)| current) != Some(*kind) {
                    diagnostics.push(Diagnostic {
                        line,
                        severity: Severity::Error,
                        message: format!(
                            "end_of_{} does not close an open {}",
                            kind.as_str(),
                            kind.as_str()
                        ),
                    });
                }
                open = None;
            }
            _ => {}
        }
    }

    if let Some((kind, started)) = open {
        diagnostics.push(Diagnostic {
            line: started,
            severity: Severity::Warning,
            message: format!("{} opened here is never closed", kind.as_str()),
        });
    }

    diagnostics
}
