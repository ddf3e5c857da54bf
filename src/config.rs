//! Run configuration: built-in defaults, an optional YAML file, and CLI
//! overrides, merged in that order of increasing priority.
//!
//! # File format
//!
//! ```yaml
//! sheet_url: "https://docs.google.com/spreadsheets/d/e/…/pub?gid=0&single=true&output=csv"
//! page_url: "https://sg-handball.example/"
//! placeholder_image: "https://sg-handball.example/img/news-fallback.jpg"
//! raw_markup: false
//! ```
//!
//! Every key is optional.

use crate::cli::Cli;
use crate::render::{DEFAULT_PLACEHOLDER_IMAGE, RenderOptions};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tracing::{info, instrument};
use url::Url;

/// The sheet the site was built around.
pub const DEFAULT_SHEET_URL: &str = "https://docs.google.com/spreadsheets/d/e/2PACX-1vTPM_9oyH0PEX4xw8FbgN2zfh1V0STLzToet8YGQc90ZH-29L8tDgYIiDADmjEaNQh0rY1g-9v8SM1E/pub?gid=0&single=true&output=csv";

pub const DEFAULT_PAGE_URL: &str = "http://localhost/";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config file: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid {key} {value:?}: {source}")]
    InvalidUrl {
        key: &'static str,
        value: String,
        source: url::ParseError,
    },
}

/// Contents of the YAML config file.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub sheet_url: Option<String>,
    pub page_url: Option<String>,
    pub placeholder_image: Option<String>,
    pub raw_markup: Option<bool>,
}

impl FileConfig {
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str::<Option<Self>>(yaml)?.unwrap_or_default())
    }

    #[instrument(level = "info", skip_all, fields(path = %path.display()))]
    pub async fn load(path: &Path) -> Result<Self, ConfigError> {
        let yaml = fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;
        let config = Self::from_yaml(&yaml)?;
        info!("Loaded configuration file");
        Ok(config)
    }
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone)]
pub struct NewsConfig {
    pub sheet_url: Url,
    pub page_url: Url,
    pub render: RenderOptions,
}

impl NewsConfig {
    /// Merge CLI values over file values over defaults.
    pub fn resolve(cli: &Cli, file: FileConfig) -> Result<Self, ConfigError> {
        let sheet_url = cli
            .sheet_url
            .clone()
            .or(file.sheet_url)
            .unwrap_or_else(|| DEFAULT_SHEET_URL.to_string());
        let page_url = cli
            .page_url
            .clone()
            .or(file.page_url)
            .unwrap_or_else(|| DEFAULT_PAGE_URL.to_string());

        Ok(Self {
            sheet_url: parse_url("sheet_url", sheet_url)?,
            page_url: parse_url("page_url", page_url)?,
            render: RenderOptions {
                placeholder_image: cli
                    .placeholder_image
                    .clone()
                    .or(file.placeholder_image)
                    .unwrap_or_else(|| DEFAULT_PLACEHOLDER_IMAGE.to_string()),
                raw_markup: cli.raw_markup || file.raw_markup.unwrap_or(false),
            },
        })
    }
}

fn parse_url(key: &'static str, value: String) -> Result<Url, ConfigError> {
    Url::parse(&value).map_err(|source| ConfigError::InvalidUrl { key, value, source })
}
