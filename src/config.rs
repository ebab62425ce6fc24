//! Purpose: Injectable configuration for one fetch-and-dump run.
//! Exports: `DumpConfig`, `ListingsQuery`, `WriteMode`, default constants.
//! Role: Replaces baked-in URL/path constants so tests can point elsewhere.
//! Invariants: `DumpConfig::default()` targets the first listings page and `data.json`.
//! Invariants: Only http and https URLs are accepted.
use std::path::PathBuf;

use url::Url;

use crate::error::{Error, ErrorKind};

pub const API_BASE_URL: &str = "https://services.baxus.co/api";
pub const LISTINGS_ENDPOINT: &[&str] = &["search", "listings"];
pub const DEFAULT_FROM: u64 = 0;
pub const DEFAULT_SIZE: u64 = 10_000;
pub const DEFAULT_OUTPUT: &str = "data.json";
pub const DEFAULT_INDENT: usize = 4;
pub const DEFAULT_URL: &str = "https://services.baxus.co/api/search/listings?from=0&size=10000";

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum WriteMode {
    /// Truncate and rewrite the destination in place.
    #[default]
    Direct,
    /// Write a sibling temp file, then rename it over the destination.
    Atomic,
}

/// Paging window for the listings search endpoint.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ListingsQuery {
    pub from: u64,
    pub size: u64,
}

impl Default for ListingsQuery {
    fn default() -> Self {
        Self {
            from: DEFAULT_FROM,
            size: DEFAULT_SIZE,
        }
    }
}

impl ListingsQuery {
    pub fn url(&self) -> Result<Url, Error> {
        self.url_with_base(API_BASE_URL)
    }

    /// Build `<base>/search/listings?from=..&size=..`, keeping any path already on `base`.
    pub fn url_with_base(&self, base: &str) -> Result<Url, Error> {
        let mut url = parse_http_url(base)?;
        {
            let mut path = url.path_segments_mut().map_err(|_| {
                Error::new(ErrorKind::Usage).with_message("api base url cannot be a base")
            })?;
            path.pop_if_empty();
            for segment in LISTINGS_ENDPOINT {
                path.push(segment);
            }
        }
        url.set_query(Some(&format!("from={}&size={}", self.from, self.size)));
        url.set_fragment(None);
        Ok(url)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DumpConfig {
    pub url: Url,
    pub output: PathBuf,
    pub indent: usize,
    pub write_mode: WriteMode,
}

impl Default for DumpConfig {
    fn default() -> Self {
        Self {
            url: Url::parse(DEFAULT_URL).expect("default listings url"),
            output: PathBuf::from(DEFAULT_OUTPUT),
            indent: DEFAULT_INDENT,
            write_mode: WriteMode::Direct,
        }
    }
}

impl DumpConfig {
    pub fn new(url: Url, output: impl Into<PathBuf>) -> Self {
        Self {
            url,
            output: output.into(),
            ..Self::default()
        }
    }

    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    pub fn with_write_mode(mut self, write_mode: WriteMode) -> Self {
        self.write_mode = write_mode;
        self
    }
}

pub fn parse_http_url(raw: &str) -> Result<Url, Error> {
    let url = Url::parse(raw).map_err(|err| {
        Error::new(ErrorKind::Usage)
            .with_message(format!("invalid url: {raw}"))
            .with_source(err)
    })?;
    let scheme = url.scheme();
    if scheme != "http" && scheme != "https" {
        return Err(Error::new(ErrorKind::Usage)
            .with_message("url must use http or https scheme")
            .with_hint("Pass a full URL such as `https://host/path`."));
    }
    Ok(url)
}
