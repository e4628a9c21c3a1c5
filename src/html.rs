//! # HTML Output
//!
//! Serializes a (styled) [`RenderedSong`] to HTML. This is the last step of
//! the pipeline; every element carries the class marker of its node kind:
//!
//! | Node      | Element                                   |
//! |-----------|-------------------------------------------|
//! | headings  | `<div class="song-header">` with `h1.title` / `h2.subtitle` |
//! | sheet     | `<div class="chord-sheet">`               |
//! | section   | `<div class="paragraph">` (+ `chorus`, `verse`, `bridge`) |
//! | row       | `<div class="row">` (`row spacer` for blank lines) |
//! | comment   | `<div class="comment">`                   |
//! | column    | `<div class="column">`                    |
//! | chord     | `<div class="chord">`                     |
//! | lyrics    | `<div class="lyrics">`                    |
//!
//! All text goes through `quick_xml::escape::escape`.

use crate::render::{ColumnNode, Heading, HeadingKind, RenderedSong, Row, Section, Sheet};
use crate::style::Style;
use quick_xml::escape::escape;

/// Full HTML for a rendered song: headings followed by the chord sheet
pub fn to_html(song: &RenderedSong) -> String {
    let mut html = String::new();

    if !song.headings.is_empty() {
        html.push_str("<div class=\"song-header\">");
        for heading in &song.headings {
            push_heading(&mut html, heading);
        }
        html.push_str("</div>\n");
    }

    html.push_str(&sheet_html(&song.sheet));
    html
}

/// HTML for the chord sheet alone, without headings
pub fn sheet_html(sheet: &Sheet) -> String {
    let mut html = String::new();
    open_div(&mut html, "chord-sheet", &sheet.style);
    html.push('\n');
    for section in &sheet.sections {
        push_section(&mut html, section);
    }
    html.push_str("</div>\n");
    html
}

/// Panel shown in place of a song that failed to render
pub fn error_panel(message: &str, raw_content: &str) -> String {
    format!(
        "<div class=\"render-error\">\n  <p class=\"render-error-title\">Failed to parse song content</p>\n  <p class=\"render-error-message\">{}</p>\n  <pre class=\"render-error-source\">{}</pre>\n</div>\n",
        escape(message),
        escape(raw_content)
    )
}

fn open_div(html: &mut String, class: &str, style: &Style) {
    html.push_str("<div class=\"");
    html.push_str(class);
    html.push('"');
    push_style_attr(html, style);
    html.push('>');
}

fn push_style_attr(html: &mut String, style: &Style) {
    if !style.is_empty() {
        html.push_str(" style=\"");
        html.push_str(&escape(&style.to_css()));
        html.push('"');
    }
}

fn push_heading(html: &mut String, heading: &Heading) {
    let (tag, class) = match heading.kind {
        HeadingKind::Title => ("h1", "title"),
        HeadingKind::Subtitle => ("h2", "subtitle"),
    };
    html.push_str(&format!("<{} class=\"{}\"", tag, class));
    push_style_attr(html, &heading.style);
    html.push('>');
    html.push_str(&escape(heading.text.as_str()));
    html.push_str(&format!("</{}>", tag));
}

fn push_section(html: &mut String, section: &Section) {
    let class = match section.kind {
        Some(kind) => format!("paragraph {}", kind.as_str()),
        None => "paragraph".to_string(),
    };
    open_div(html, &class, &section.style);
    html.push('\n');
    for row in &section.rows {
        push_row(html, row);
        html.push('\n');
    }
    html.push_str("</div>\n");
}

fn push_row(html: &mut String, row: &Row) {
    match row {
        Row::Spacer { style } => {
            open_div(html, "row spacer", style);
            html.push_str("</div>");
        }
        Row::Comment { text, style } => {
            open_div(html, "comment", style);
            html.push_str(&escape(text.as_str()));
            html.push_str("</div>");
        }
        Row::Lyrics { columns, style } => {
            open_div(html, "row", style);
            for column in columns {
                push_column(html, column);
            }
            html.push_str("</div>");
        }
    }
}

fn push_column(html: &mut String, column: &ColumnNode) {
    open_div(html, "column", &column.style);
    if let Some(chord) = &column.chord {
        open_div(html, "chord", &chord.style);
        html.push_str(&escape(chord.name.as_str()));
        html.push_str("</div>");
    }
    open_div(html, "lyrics", &column.lyrics.style);
    if column.lyrics.text.is_empty() {
        html.push_str("&nbsp;");
    } else {
        html.push_str(&escape(column.lyrics.text.as_str()));
    }
    html.push_str("</div></div>");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;
    use crate::render::render;

    #[test]
    fn test_unstyled_markup() {
        let html = to_html(&render(&parse("[C]Hello [G]world")));
        assert!(html.contains(
            "<div class=\"row\"><div class=\"column\"><div class=\"chord\">C</div><div class=\"lyrics\">Hello </div></div>"
        ));
        assert!(html.starts_with("<div class=\"chord-sheet\">"));
        assert!(!html.contains("style="));
    }

    #[test]
    fn test_headings_and_sections() {
        let html = to_html(&render(&parse("{t: Song}\n{a: Band}\n{soc}\nla\n{eoc}")));
        assert!(html.contains("<h1 class=\"title\">Song</h1>"));
        assert!(html.contains("<h2 class=\"subtitle\">Band</h2>"));
        assert!(html.contains("<div class=\"paragraph chorus\">"));
    }

    #[test]
    fn test_text_is_escaped() {
        let html = to_html(&render(&parse("{c: <b>loud</b>}\n[C]rock & roll")));
        assert!(html.contains("&lt;b&gt;loud&lt;/b&gt;"));
        assert!(html.contains("rock &amp; roll"));
    }

    #[test]
    fn test_empty_lyrics_render_nbsp() {
        let html = to_html(&render(&parse("[C][G]x")));
        assert!(html.contains("<div class=\"chord\">C</div><div class=\"lyrics\">&nbsp;</div>"));
    }

    #[test]
    fn test_error_panel_escapes_source() {
        let panel = error_panel("bad", "<script>x</script>");
        assert!(panel.contains("&lt;script&gt;"));
        assert!(!panel.contains("<script>"));
    }
}
