//! # Sheet News
//!
//! Publishes news from a shared spreadsheet on a static website. Editors add
//! rows (title, text, image URL) to a published Google Sheet; this tool
//! fetches the sheet's CSV export and writes the news as cards into every
//! element of an HTML page marked with `data-news-grid`.
//!
//! ## Usage
//!
//! ```sh
//! sheet_news -p site/index.html -o public/index.html
//! ```
//!
//! ## Pipeline
//!
//! 1. **Discover**: Find the news containers in the page
//! 2. **Fetch**: Download the CSV export once, bypassing caches
//! 3. **Parse**: Split rows into cells and build items, dropping bad rows
//! 4. **Order**: Newest row first, then cut to each container's `data-limit`
//! 5. **Render**: Replace each container's content and write the page

use clap::Parser;
use std::error::Error;
use std::path::Path;
use std::time::Instant;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod config;
mod loader;
mod models;
mod outputs;
mod page;
mod render;
mod sheet;
mod utils;

use cli::Cli;
use config::{FileConfig, NewsConfig};
use loader::{LoadOutcome, load_news};
use models::NewsFeed;
use outputs::json;
use page::NewsPage;
use sheet::fetch::HttpSheetSource;
use utils::ensure_parent_dir;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    // Logs go to stderr so the page can be written to stdout.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .with_writer(std::io::stderr)
        .init();

    let start_time = Instant::now();
    info!("sheet_news starting up");

    let args = Cli::parse();
    debug!(?args.page, ?args.output, ?args.config, "Parsed CLI arguments");

    // ---- Configuration ----
    let file_config = match &args.config {
        Some(path) => FileConfig::load(path).await.inspect_err(|e| {
            error!(error = %e, "Failed to load configuration file");
        })?,
        None => FileConfig::default(),
    };
    let config = NewsConfig::resolve(&args, file_config)?;
    info!(
        sheet_url = %config.sheet_url,
        page_url = %config.page_url,
        raw_markup = config.render.raw_markup,
        "Resolved configuration"
    );

    // ---- Page ----
    let html = fs::read_to_string(&args.page).await.inspect_err(|e| {
        error!(path = %args.page.display(), error = %e, "Failed to read page");
    })?;
    let mut page = NewsPage::parse(&html);
    info!(grids = page.grids().len(), "Parsed page");

    // ---- Load ----
    let source = HttpSheetSource::new(config.sheet_url.clone());
    let outcome = load_news(page.grids_mut(), &config.page_url, &source, &config.render).await;

    match &outcome {
        LoadOutcome::NoContainers => {
            warn!(path = %args.page.display(), "Page has no data-news-grid containers");
        }
        LoadOutcome::EnvironmentBlocked => {
            warn!("Rendered the local-server notice into every container");
        }
        LoadOutcome::TransportFailure(e) => {
            warn!(error = %e, "Rendered the load failure notice into every container");
        }
        LoadOutcome::Success(items) => {
            info!(items = items.len(), "Rendered news");
        }
    }

    // ---- Output ----
    let replaced = page
        .grids()
        .iter()
        .filter(|grid| grid.content().is_some())
        .count();
    let feed = match (&outcome, &args.json_output) {
        (LoadOutcome::Success(items), Some(path)) => Some((json::build_feed(items, source.url()), path)),
        _ => None,
    };

    write_outputs(
        page.into_html(),
        args.output.as_deref(),
        feed.as_ref().map(|(feed, path)| (feed, path.as_path())),
    )
    .await?;
    info!(replaced, "Wrote outputs");

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );

    Ok(())
}

/// Write the rendered page, then the JSON feed if there is one.
///
/// The page always goes out first; a feed failure is still returned.
async fn write_outputs(
    rendered: String,
    output: Option<&Path>,
    feed: Option<(&NewsFeed, &Path)>,
) -> Result<(), Box<dyn Error>> {
    match output {
        Some(path) => {
            ensure_parent_dir(path).await?;
            fs::write(path, rendered).await.inspect_err(|e| {
                error!(path = %path.display(), error = %e, "Failed to write page");
            })?;
            info!(path = %path.display(), "Wrote page");
        }
        None => {
            let mut stdout = tokio::io::stdout();
            stdout.write_all(rendered.as_bytes()).await?;
            stdout.flush().await?;
        }
    }

    if let Some((feed, path)) = feed {
        json::write_feed(feed, path).await.inspect_err(|e| {
            error!(path = %path.display(), error = %e, "Failed to write JSON feed");
        })?;
    }
    Ok(())
}
