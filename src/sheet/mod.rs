//! Everything that deals with the published sheet: fetching the CSV export
//! and turning it into [`NewsItem`]s.
//!
//! - [`fetch`]: [`SheetSource`](fetch::SheetSource) and the HTTP implementation
//! - [`parse`]: Line tokenizer, cell sanitizer and item builder

pub mod fetch;
pub mod parse;

use crate::models::NewsItem;
use parse::{build_news_item, parse_csv_line};
use tracing::{debug, instrument};

/// Turn the raw CSV text into items, in sheet order.
///
/// The first line is the header row and is always skipped. Lines are split
/// on `\n` with an optional preceding `\r`. Rows that do not yield a valid
/// item are dropped without error.
#[instrument(level = "debug", skip_all, fields(bytes = csv.len()))]
pub fn parse_items(csv: &str) -> Vec<NewsItem> {
    let rows: Vec<&str> = csv
        .split('\n')
        .skip(1)
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect();

    let items: Vec<NewsItem> = rows
        .iter()
        .filter_map(|line| build_news_item(&parse_csv_line(line)))
        .collect();

    debug!(
        rows = rows.len(),
        items = items.len(),
        dropped = rows.len() - items.len(),
        "Parsed sheet rows"
    );
    items
}
