//! Command-line interface definitions.
//!
//! Every option except the input page can also come from the YAML config
//! file (see [`crate::config`]); values given here win.

use clap::Parser;
use std::path::PathBuf;

/// Inject news cards from a published spreadsheet into an HTML page.
///
/// # Examples
///
/// ```sh
/// # Render into a copy of the page
/// sheet_news -p site/index.html -o public/index.html
///
/// # Different sheet, plus a JSON feed of the displayed items
/// sheet_news -p index.html --sheet-url "https://…/pub?output=csv" -j public/news.json
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// HTML page containing `data-news-grid` containers
    #[arg(short, long)]
    pub page: PathBuf,

    /// Where to write the rendered page (stdout when omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Optional path to a YAML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Published CSV export of the news sheet
    #[arg(long, env = "NEWS_SHEET_URL")]
    pub sheet_url: Option<String>,

    /// URL the page is served from; a `file:` URL blocks the import
    #[arg(long, env = "NEWS_PAGE_URL")]
    pub page_url: Option<String>,

    /// Image shown when a news image fails to load
    #[arg(long)]
    pub placeholder_image: Option<String>,

    /// Insert title and text as raw HTML instead of escaping them
    #[arg(long)]
    pub raw_markup: bool,

    /// Also write the displayed items as JSON to this file
    #[arg(short, long)]
    pub json_output: Option<PathBuf>,
}
