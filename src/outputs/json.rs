//! JSON feed output.
//!
//! Other parts of a site (a start-page teaser, an app) can read the same
//! items the page shows without parsing the sheet themselves. The feed
//! holds the full displayed list, newest first, without any container's
//! limit applied.

use crate::models::{NewsFeed, NewsItem};
use crate::utils::ensure_parent_dir;
use chrono::Local;
use std::error::Error;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};
use url::Url;

/// Build the feed for `items` fetched from `source`, stamped with the
/// current local time.
pub fn build_feed(items: &[NewsItem], source: &Url) -> NewsFeed {
    NewsFeed {
        generated_at: Local::now().to_rfc3339(),
        source: source.to_string(),
        items: items.to_vec(),
    }
}

/// Write `feed` as pretty-printed JSON, creating parent directories.
#[instrument(level = "info", skip_all, fields(path = %path.display(), items = feed.items.len()))]
pub async fn write_feed(feed: &NewsFeed, path: &Path) -> Result<(), Box<dyn Error>> {
    let json = serde_json::to_string_pretty(feed)?;
    ensure_parent_dir(path).await?;
    fs::write(path, json).await?;
    info!("Wrote JSON feed");
    Ok(())
}
