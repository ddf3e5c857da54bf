//! Static HTML page host for the load routine.
//!
//! A page marks its news containers with the `data-news-grid` attribute and
//! may cap each one with `data-limit`:
//!
//! ```html
//! <section class="news-grid" data-news-grid data-limit="3">
//!     <p>News werden geladen…</p>
//! </section>
//! ```
//!
//! [`NewsPage`] finds the containers in document order, hands them to
//! [`crate::loader::load_news`] as [`NewsGrid`]s, and serializes the page
//! with the replaced contents afterwards.

use crate::loader::NewsGrid;
use once_cell::sync::Lazy;
use scraper::node::{Node, Text};
use scraper::{Html, Selector};
use tracing::{debug, instrument};

static GRID_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("[data-news-grid]").unwrap());

/// One `data-news-grid` element of a [`NewsPage`].
#[derive(Debug, Clone, Default)]
pub struct PageGrid {
    limit: Option<String>,
    content: Option<String>,
}

impl PageGrid {
    /// The markup this container will hold once the page is serialized.
    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }
}

impl NewsGrid for PageGrid {
    fn limit(&self) -> Option<&str> {
        self.limit.as_deref()
    }

    fn replace_content(&mut self, html: String) {
        self.content = Some(html);
    }
}

/// A parsed HTML document and its news containers.
pub struct NewsPage {
    document: Html,
    grids: Vec<PageGrid>,
}

impl NewsPage {
    /// Parse a full HTML document and discover its containers.
    #[instrument(level = "debug", skip_all, fields(bytes = html.len()))]
    pub fn parse(html: &str) -> Self {
        let document = Html::parse_document(html);
        let grids: Vec<PageGrid> = document
            .select(&GRID_SELECTOR)
            .map(|el| PageGrid {
                limit: el.value().attr("data-limit").map(str::to_string),
                content: None,
            })
            .collect();

        debug!(grids = grids.len(), "Discovered news containers");
        Self { document, grids }
    }

    pub fn grids(&self) -> &[PageGrid] {
        &self.grids
    }

    pub fn grids_mut(&mut self) -> &mut [PageGrid] {
        &mut self.grids
    }

    /// Serialize the document, swapping the children of every replaced
    /// container for its new markup.
    ///
    /// The new markup is spliced in as-is after serialization so it is not
    /// re-parsed or normalized. Each container is marked with a text node
    /// whose prefix occurs neither in the page nor in any new markup, so a
    /// marker can only match its own container.
    pub fn into_html(self) -> String {
        let Self {
            mut document,
            grids,
        } = self;

        let prefix = marker_prefix(&document.html(), &grids);
        let ids: Vec<_> = document.select(&GRID_SELECTOR).map(|el| el.id()).collect();
        let mut splices = Vec::new();

        for (index, (id, grid)) in ids.into_iter().zip(grids).enumerate() {
            let Some(content) = grid.content else {
                continue;
            };
            let Some(mut node) = document.tree.get_mut(id) else {
                continue;
            };
            while let Some(mut child) = node.first_child() {
                child.detach();
            }

            let marker = format!("{prefix}{index}@@");
            node.append(Node::Text(Text {
                text: marker.as_str().into(),
            }));
            splices.push((marker, content));
        }

        let mut html = document.html();
        for (marker, content) in splices {
            html = html.replacen(&marker, &content, 1);
        }
        html
    }
}

/// First `@@news-grid-N-` that appears neither in `page` nor in any grid's
/// new content.
fn marker_prefix(page: &str, grids: &[PageGrid]) -> String {
    (0u64..)
        .map(|nonce| format!("@@news-grid-{nonce}-"))
        .find(|prefix| {
            !page.contains(prefix.as_str())
                && grids
                    .iter()
                    .filter_map(PageGrid::content)
                    .all(|content| !content.contains(prefix.as_str()))
        })
        .unwrap_or_default()
}
