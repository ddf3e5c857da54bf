//! Markup generation for news containers.
//!
//! Every function here returns the complete inner markup of one container;
//! the caller replaces whatever the container held before. Text is escaped
//! unless [`RenderOptions::raw_markup`] is set.

use crate::models::NewsItem;
use crate::utils::escape_html;
use std::fmt::Write;

/// Shown when there are no items to display.
pub const NO_NEWS_MESSAGE: &str = "Aktuell sind keine News verfügbar.";

/// Shown when the page is opened from the file system instead of a server.
pub const LOCAL_FILE_MESSAGE: &str = "Blog-Import blockiert: Bitte die Seite über einen lokalen Server öffnen (z. B. Live Server in VS Code).";

/// Shown when the sheet could not be fetched.
pub const LOAD_FAILED_MESSAGE: &str = "Fehler beim Laden der News aus der Tabelle. Prüfe, ob das Google-Sheet veröffentlicht ist und der Link stimmt.";

pub const DEFAULT_PLACEHOLDER_IMAGE: &str =
    "https://via.placeholder.com/500x300?text=SG+Handball+News";

/// How cards are rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Image shown by the browser when an item's image fails to load.
    pub placeholder_image: String,
    /// Interpolate title, body and image URL verbatim instead of escaping.
    pub raw_markup: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            placeholder_image: DEFAULT_PLACEHOLDER_IMAGE.to_string(),
            raw_markup: false,
        }
    }
}

/// A single informational paragraph.
pub fn render_message(message: &str) -> String {
    format!("<p>{message}</p>")
}

/// Render the cards for `items`, in order.
///
/// An empty slice renders [`NO_NEWS_MESSAGE`] and no cards.
pub fn render_news(items: &[NewsItem], options: &RenderOptions) -> String {
    if items.is_empty() {
        return render_message(NO_NEWS_MESSAGE);
    }

    let mut html = String::new();
    for item in items {
        render_card(&mut html, item, options);
    }
    html
}

fn render_card(html: &mut String, item: &NewsItem, options: &RenderOptions) {
    let text = |s: &str| {
        if options.raw_markup {
            s.to_string()
        } else {
            escape_html(s)
        }
    };
    // Single quotes delimit the JS string inside the onerror attribute.
    let fallback = escape_html(&options.placeholder_image.replace('\'', "%27"));

    write!(
        html,
        r#"
            <article class="news-card">
                <div class="news-image-box">
                    <img src="{src}" onerror="this.src='{fallback}'" alt="News Bild">
                </div>
                <div class="news-body">
                    <h3>{title}</h3>
                    <p>{body}</p>
                </div>
            </article>"#,
        src = text(&item.image_url),
        title = text(&item.title),
        body = text(&item.body),
    )
    .unwrap();
}
