//! The load routine: fetch the sheet once, then fill every news container.
//!
//! Containers are abstracted behind [`NewsGrid`] so any host can drive the
//! routine. The HTML page host lives in [`crate::page`]; tests use plain
//! in-memory containers.
//!
//! # Outcomes
//!
//! | Outcome | Containers show |
//! |---------|-----------------|
//! | [`LoadOutcome::NoContainers`] | nothing, no request is made |
//! | [`LoadOutcome::EnvironmentBlocked`] | [`LOCAL_FILE_MESSAGE`], no request is made |
//! | [`LoadOutcome::TransportFailure`] | [`LOAD_FAILED_MESSAGE`] |
//! | [`LoadOutcome::Success`] | cards, newest first, cut to each container's limit |

use crate::models::NewsItem;
use crate::render::{
    LOAD_FAILED_MESSAGE, LOCAL_FILE_MESSAGE, RenderOptions, render_message, render_news,
};
use crate::sheet::fetch::{FetchError, SheetSource};
use crate::sheet::parse::is_web_whitespace;
use crate::sheet::parse_items;
use tracing::{debug, error, info, instrument, warn};
use url::Url;

/// A page element that receives news markup.
pub trait NewsGrid {
    /// Raw value of the container's `data-limit` attribute, if present.
    fn limit(&self) -> Option<&str>;

    /// Replace the container's entire content.
    fn replace_content(&mut self, html: String);
}

/// What a single run of [`load_news`] ended with.
#[derive(Debug)]
pub enum LoadOutcome {
    NoContainers,
    /// The page is opened from the file system; no request was attempted.
    EnvironmentBlocked,
    TransportFailure(FetchError),
    /// Items as displayed: newest sheet row first, before any limit.
    Success(Vec<NewsItem>),
}

/// Pages opened straight from disk cannot fetch the sheet.
pub fn is_local_file(page_url: &Url) -> bool {
    page_url.scheme() == "file"
}

/// Run the load routine over `grids`.
///
/// Exactly one request is made, and only when there is at least one
/// container and the page is not a local file. Every container's content is
/// replaced whatever the outcome, except for [`LoadOutcome::NoContainers`].
#[instrument(level = "info", skip_all, fields(grids = grids.len(), %page_url))]
pub async fn load_news<G, S>(
    grids: &mut [G],
    page_url: &Url,
    source: &S,
    options: &RenderOptions,
) -> LoadOutcome
where
    G: NewsGrid,
    S: SheetSource,
{
    if grids.is_empty() {
        info!("No news containers on the page; nothing to do");
        return LoadOutcome::NoContainers;
    }

    if is_local_file(page_url) {
        warn!("Page is opened from the file system; skipping sheet request");
        fill_all(grids, LOCAL_FILE_MESSAGE);
        return LoadOutcome::EnvironmentBlocked;
    }

    let csv = match source.fetch_csv().await {
        Ok(csv) => csv,
        Err(e) => {
            error!(error = %e, "Failed to load news from the sheet");
            fill_all(grids, LOAD_FAILED_MESSAGE);
            return LoadOutcome::TransportFailure(e);
        }
    };

    let mut items = parse_items(&csv);
    items.reverse();
    info!(items = items.len(), "Loaded news items");

    for (index, grid) in grids.iter_mut().enumerate() {
        let limit = parse_limit(grid.limit());
        let shown = apply_limit(&items, limit);
        debug!(index, ?limit, shown = shown.len(), "Rendering container");
        grid.replace_content(render_news(shown, options));
    }

    LoadOutcome::Success(items)
}

fn fill_all<G: NewsGrid>(grids: &mut [G], message: &str) {
    let html = render_message(message);
    for grid in grids.iter_mut() {
        grid.replace_content(html.clone());
    }
}

/// Parse a `data-limit` value.
///
/// Leading whitespace and an optional sign are accepted, then as many
/// decimal digits as follow; anything after them is ignored, so `"2abc"` is
/// 2. A missing or empty value, or one without leading digits, means no
/// limit.
pub fn parse_limit(raw: Option<&str>) -> Option<i64> {
    let s = raw?.trim_start_matches(is_web_whitespace);

    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let digits: &str = &digits[..digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len())];
    if digits.is_empty() {
        return None;
    }

    let magnitude = digits.bytes().fold(0i64, |acc, b| {
        acc.saturating_mul(10).saturating_add(i64::from(b - b'0'))
    });
    Some(if negative { -magnitude } else { magnitude })
}

/// Cut `items` to `limit`.
///
/// A non-negative limit keeps that many items from the front. A negative
/// limit drops that many from the back.
pub fn apply_limit(items: &[NewsItem], limit: Option<i64>) -> &[NewsItem] {
    let len = items.len();
    let end = match limit {
        None => len,
        Some(n) if n >= 0 => usize::try_from(n).map_or(len, |n| n.min(len)),
        Some(n) => usize::try_from(n.unsigned_abs()).map_or(0, |drop| len.saturating_sub(drop)),
    };
    &items[..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::NO_NEWS_MESSAGE;
    use std::cell::Cell;

    #[derive(Debug, Default)]
    struct MemoryGrid {
        limit: Option<String>,
        content: Option<String>,
    }

    impl MemoryGrid {
        fn with_limit(limit: &str) -> Self {
            Self {
                limit: Some(limit.to_string()),
                content: None,
            }
        }

        fn titles(&self) -> Vec<String> {
            let content = self.content.as_deref().unwrap_or_default();
            content
                .split("<h3>")
                .skip(1)
                .filter_map(|rest| rest.split("</h3>").next())
                .map(str::to_string)
                .collect()
        }
    }

    impl NewsGrid for MemoryGrid {
        fn limit(&self) -> Option<&str> {
            self.limit.as_deref()
        }

        fn replace_content(&mut self, html: String) {
            self.content = Some(html);
        }
    }

    /// Serves a fixed CSV body and counts requests.
    struct StaticSource {
        csv: &'static str,
        calls: Cell<usize>,
    }

    impl StaticSource {
        fn new(csv: &'static str) -> Self {
            Self {
                csv,
                calls: Cell::new(0),
            }
        }
    }

    impl SheetSource for StaticSource {
        async fn fetch_csv(&self) -> Result<String, FetchError> {
            self.calls.set(self.calls.get() + 1);
            Ok(self.csv.to_string())
        }
    }

    const FIVE_ROWS: &str = "Titel,Inhalt,Bild\nA,a,imgA\nB,b,imgB\nC,c,imgC\nD,d,imgD\nE,e,imgE\n";

    fn served() -> Url {
        Url::parse("https://verein.example/news.html").unwrap()
    }

    #[tokio::test]
    async fn test_no_containers_makes_no_request() {
        let source = StaticSource::new(FIVE_ROWS);
        let mut grids: Vec<MemoryGrid> = Vec::new();

        let outcome = load_news(&mut grids, &served(), &source, &RenderOptions::default()).await;

        assert!(matches!(outcome, LoadOutcome::NoContainers));
        assert_eq!(source.calls.get(), 0);
    }

    #[tokio::test]
    async fn test_local_file_blocks_every_container() {
        let source = StaticSource::new(FIVE_ROWS);
        let mut grids = vec![MemoryGrid::default(), MemoryGrid::with_limit("2")];
        let page = Url::parse("file:///home/editor/site/index.html").unwrap();

        let outcome = load_news(&mut grids, &page, &source, &RenderOptions::default()).await;

        assert!(matches!(outcome, LoadOutcome::EnvironmentBlocked));
        assert_eq!(source.calls.get(), 0);
        for grid in &grids {
            assert_eq!(grid.content.as_deref(), Some(render_message(LOCAL_FILE_MESSAGE).as_str()));
        }
    }

    #[tokio::test]
    async fn test_success_reverses_sheet_order() {
        let source = StaticSource::new("Titel,Inhalt,Bild\nA,a,imgA\nB,b,imgB\nC,c,imgC");
        let mut grids = vec![MemoryGrid::default()];

        let outcome = load_news(&mut grids, &served(), &source, &RenderOptions::default()).await;

        let items = match outcome {
            LoadOutcome::Success(items) => items,
            other => panic!("expected success, got {other:?}"),
        };
        let titles: Vec<&str> = items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["C", "B", "A"]);
        assert_eq!(grids[0].titles(), vec!["C", "B", "A"]);
        assert_eq!(source.calls.get(), 1);
    }

    #[tokio::test]
    async fn test_limits_apply_per_container() {
        let source = StaticSource::new(FIVE_ROWS);
        let mut grids = vec![
            MemoryGrid::with_limit("2"),
            MemoryGrid::default(),
            MemoryGrid::with_limit("abc"),
            MemoryGrid::with_limit(""),
        ];

        load_news(&mut grids, &served(), &source, &RenderOptions::default()).await;

        assert_eq!(grids[0].titles(), vec!["E", "D"]);
        assert_eq!(grids[1].titles(), vec!["E", "D", "C", "B", "A"]);
        assert_eq!(grids[2].titles(), vec!["E", "D", "C", "B", "A"]);
        assert_eq!(grids[3].titles(), vec!["E", "D", "C", "B", "A"]);
        // one request regardless of container count
        assert_eq!(source.calls.get(), 1);
    }

    #[tokio::test]
    async fn test_zero_limit_renders_no_news_message() {
        let source = StaticSource::new(FIVE_ROWS);
        let mut grids = vec![MemoryGrid::with_limit("0")];

        load_news(&mut grids, &served(), &source, &RenderOptions::default()).await;

        assert_eq!(grids[0].content.as_deref(), Some(render_message(NO_NEWS_MESSAGE).as_str()));
    }

    #[tokio::test]
    async fn test_empty_sheet_renders_no_news_message() {
        let source = StaticSource::new("Titel,Inhalt,Bild\n,ohne Titel,img\n");
        let mut grids = vec![MemoryGrid::default()];

        let outcome = load_news(&mut grids, &served(), &source, &RenderOptions::default()).await;

        assert!(matches!(outcome, LoadOutcome::Success(ref items) if items.is_empty()));
        assert_eq!(grids[0].content.as_deref(), Some(render_message(NO_NEWS_MESSAGE).as_str()));
    }

    #[tokio::test]
    async fn test_http_error_fills_failure_message() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/pub")
            .with_status(500)
            .expect(1)
            .create_async()
            .await;
        let source = crate::sheet::fetch::HttpSheetSource::new(
            Url::parse(&format!("{}/pub", server.url())).unwrap(),
        );
        let mut grids = vec![MemoryGrid::default(), MemoryGrid::with_limit("3")];

        let outcome = load_news(&mut grids, &served(), &source, &RenderOptions::default()).await;

        assert!(matches!(outcome, LoadOutcome::TransportFailure(FetchError::Status(_))));
        for grid in &grids {
            assert_eq!(grid.content.as_deref(), Some(render_message(LOAD_FAILED_MESSAGE).as_str()));
        }
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_local_file_sends_no_http_request() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", mockito::Matcher::Any)
            .expect(0)
            .create_async()
            .await;
        let source = crate::sheet::fetch::HttpSheetSource::new(Url::parse(&server.url()).unwrap());
        let mut grids = vec![MemoryGrid::default()];
        let page = Url::parse("file:///C:/Users/verein/index.html").unwrap();

        load_news(&mut grids, &page, &source, &RenderOptions::default()).await;

        mock.assert_async().await;
    }

    #[test]
    fn test_parse_limit() {
        assert_eq!(parse_limit(None), None);
        assert_eq!(parse_limit(Some("")), None);
        assert_eq!(parse_limit(Some("abc")), None);
        assert_eq!(parse_limit(Some("-")), None);
        assert_eq!(parse_limit(Some("2")), Some(2));
        assert_eq!(parse_limit(Some("  3 ")), Some(3));
        assert_eq!(parse_limit(Some("2abc")), Some(2));
        assert_eq!(parse_limit(Some("+4")), Some(4));
        assert_eq!(parse_limit(Some("-1")), Some(-1));
        assert_eq!(parse_limit(Some("1.9")), Some(1));
        assert_eq!(parse_limit(Some("\u{feff}\u{3000}5")), Some(5));
        assert_eq!(parse_limit(Some("\u{85}5")), None);
        assert_eq!(parse_limit(Some("99999999999999999999999")), Some(i64::MAX));
    }

    #[test]
    fn test_apply_limit() {
        let items: Vec<NewsItem> = ["E", "D", "C", "B", "A"]
            .iter()
            .map(|t| NewsItem {
                title: t.to_string(),
                body: String::new(),
                image_url: String::new(),
            })
            .collect();

        assert_eq!(apply_limit(&items, None).len(), 5);
        assert_eq!(apply_limit(&items, Some(2))[1].title, "D");
        assert_eq!(apply_limit(&items, Some(0)).len(), 0);
        assert_eq!(apply_limit(&items, Some(50)).len(), 5);
        assert_eq!(apply_limit(&items, Some(-1)).len(), 4);
        assert_eq!(apply_limit(&items, Some(-9)).len(), 0);
        assert_eq!(apply_limit(&items, Some(i64::MIN)).len(), 0);
    }
}
