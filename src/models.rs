//! Data models for news items and the JSON feed.
//!
//! - [`NewsItem`]: One title/body/image triple taken from a spreadsheet row
//! - [`NewsFeed`]: The displayed item list as written to the JSON output
//!
//! Items have no identity across runs. Every invocation rebuilds the full
//! list from the sheet, so there is nothing to merge or diff.

use serde::{Deserialize, Serialize};

/// A single news entry built from one valid data row of the sheet.
///
/// The sheet columns are positional: title, body, image URL. Columns past
/// the third are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct NewsItem {
    /// Card heading. Never empty.
    pub title: String,
    /// Card text.
    pub body: String,
    /// Source of the card image. May be empty; the page falls back to a
    /// placeholder when the image fails to load.
    pub image_url: String,
}

/// The item list as displayed (newest first), written by
/// [`crate::outputs::json::write_feed`].
#[derive(Debug, Deserialize, Serialize)]
pub struct NewsFeed {
    /// Local time of generation, RFC 3339.
    pub generated_at: String,
    /// The sheet URL the items were fetched from.
    pub source: String,
    pub items: Vec<NewsItem>,
}
