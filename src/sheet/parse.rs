//! Row tokenizing and record building for the sheet's CSV export.
//!
//! The tokenizer is deliberately lightweight and works on one physical line
//! at a time. It accepts double-quoted spans and bare runs of characters,
//! each of which must be followed by a comma or the end of the line. It does
//! not understand doubled quotes (`""`) inside quoted fields, and quoted
//! fields cannot span several lines.

use crate::models::NewsItem;
use once_cell::sync::Lazy;
use regex::Regex;

/// Whatever follows a cell: optional whitespace, then a comma or end of line.
///
/// The whitespace class is the web one (includes U+FEFF, excludes U+0085),
/// not the regex crate's Unicode `\s`.
static CELL_TERMINATOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[\t\n\x0B\x0C\r \u{A0}\u{1680}\u{2000}-\u{200A}\u{2028}\u{2029}\u{202F}\u{205F}\u{3000}\u{FEFF}]*(?:,|$)",
    )
    .unwrap()
});

/// Whitespace as trimmed by web pages: the same set as [`CELL_TERMINATOR`].
pub fn is_web_whitespace(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n'
            | '\u{0B}'
            | '\u{0C}'
            | '\r'
            | ' '
            | '\u{A0}'
            | '\u{1680}'
            | '\u{2000}'..='\u{200A}'
            | '\u{2028}'
            | '\u{2029}'
            | '\u{202F}'
            | '\u{205F}'
            | '\u{3000}'
            | '\u{FEFF}'
    )
}

/// Split one line into its raw cells.
///
/// Cells keep their surrounding quotes; run them through [`sanitize_cell`]
/// before use. Characters that cannot start a well-terminated cell are
/// skipped, so a line with no recognizable cells yields an empty vector.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(parse_csv_line(r#"A,"b, c",img"#), vec!["A", "\"b, c\"", "img"]);
/// assert!(parse_csv_line("").is_empty());
/// ```
pub fn parse_csv_line(line: &str) -> Vec<&str> {
    let mut cells = Vec::new();
    let mut pos = 0;

    while pos < line.len() {
        let rest = &line[pos..];
        match match_cell(rest) {
            Some(len) => {
                cells.push(&rest[..len]);
                pos += len;
            }
            None => pos += rest.chars().next().map_or(1, char::len_utf8),
        }
    }

    cells
}

/// Length in bytes of the cell starting at the beginning of `rest`, if any.
fn match_cell(rest: &str) -> Option<usize> {
    if rest.starts_with('"') {
        quoted_cell(rest)
    } else {
        bare_cell(rest)
    }
}

/// A quoted span ends at the first closing quote that is followed by a
/// terminator. Later quotes are tried when an earlier one is not.
fn quoted_cell(rest: &str) -> Option<usize> {
    for (i, c) in rest.char_indices().skip(1) {
        if c == '"' {
            let end = i + 1;
            if is_terminated(&rest[end..]) {
                return Some(end);
            }
        } else if is_line_terminator(c) {
            return None;
        }
    }
    None
}

fn bare_cell(rest: &str) -> Option<usize> {
    let end = rest
        .find(|c: char| matches!(c, '"' | ',' | '\r' | '\n'))
        .unwrap_or(rest.len());

    (end > 0 && is_terminated(&rest[end..])).then_some(end)
}

fn is_terminated(after: &str) -> bool {
    CELL_TERMINATOR.is_match(after)
}

fn is_line_terminator(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

/// Unquote and trim one raw cell.
///
/// Strips a single leading and a single trailing double quote, then every
/// remaining double quote, then surrounding whitespace (including a stray
/// byte-order mark). Literal quotes inside a field are lost.
pub fn sanitize_cell(value: &str) -> String {
    let value = value.strip_prefix('"').unwrap_or(value);
    let value = value.strip_suffix('"').unwrap_or(value);

    value
        .replace('"', "")
        .trim_matches(is_web_whitespace)
        .to_string()
}

/// Build a [`NewsItem`] from the raw cells of one row.
///
/// Returns `None` for rows with fewer than three cells or an empty title.
/// Cells past the third are ignored.
pub fn build_news_item(cells: &[&str]) -> Option<NewsItem> {
    let [title, body, image_url, ..] = cells else {
        return None;
    };

    let title = sanitize_cell(title);
    if title.is_empty() {
        return None;
    }

    Some(NewsItem {
        title,
        body: sanitize_cell(body),
        image_url: sanitize_cell(image_url),
    })
}
