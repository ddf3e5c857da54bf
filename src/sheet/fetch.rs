//! Retrieval of the published sheet's CSV export.
//!
//! # Architecture
//!
//! - [`SheetSource`]: Trait for anything that can hand back the raw CSV text
//! - [`HttpSheetSource`]: Fetches the export over HTTP with `reqwest`
//!
//! There is exactly one request per run, with caching disabled. Failures are
//! not retried; the caller renders a fixed message instead.

use reqwest::header::{CACHE_CONTROL, PRAGMA};
use reqwest::{Client, StatusCode};
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};
use url::Url;

/// Why the CSV text could not be retrieved.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The server answered with a non-success status.
    #[error("sheet request returned HTTP {0}")]
    Status(StatusCode),
    /// The request never produced a complete response.
    #[error("sheet request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Source of the raw CSV export.
pub trait SheetSource {
    /// Retrieve the complete CSV text.
    async fn fetch_csv(&self) -> Result<String, FetchError>;
}

/// Reads the CSV export from a published spreadsheet URL.
#[derive(Debug, Clone)]
pub struct HttpSheetSource {
    client: Client,
    url: Url,
}

impl HttpSheetSource {
    pub fn new(url: Url) -> Self {
        Self {
            client: Client::new(),
            url,
        }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

impl SheetSource for HttpSheetSource {
    #[instrument(level = "info", skip_all, fields(url = %self.url))]
    async fn fetch_csv(&self) -> Result<String, FetchError> {
        let t0 = Instant::now();
        let response = self
            .client
            .get(self.url.clone())
            .header(CACHE_CONTROL, "no-cache, no-store")
            .header(PRAGMA, "no-cache")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, "Sheet request was not successful");
            return Err(FetchError::Status(status));
        }

        let body = response.text().await?;
        info!(
            bytes = body.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Fetched sheet CSV"
        );
        debug!(preview = %crate::utils::truncate_for_log(&body, 200), "Sheet CSV");
        Ok(body)
    }
}
