//! Page scanning: turn a page URL into the identifiers it references.
//!
//! Failures never abort a scan. A page that cannot be fetched yields no
//! identifiers; an image that cannot be probed counts as broken.

use reqwest::Url;
use shelfcheck_core::asin::identifiers_from_urls;
use shelfcheck_core::{parse_asin_list, Asin};

use crate::client::PageClient;
use crate::extract::{image_sources, link_identifiers};

/// Which tags of the scanned page identifiers are taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanMode {
    /// `<a href>` links pointing at the marketplace.
    Links,
    /// `<img src>` images that fail to load.
    Images,
}

/// Where a run's identifiers come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Content<'a> {
    /// Comma-separated identifier list. No URL parsing is involved.
    Explicit(&'a str),
    /// A page scanned in the given mode.
    Page { url: &'a str, mode: ScanMode },
}

impl Content<'_> {
    /// The raw input text, used to name the report file.
    #[must_use]
    pub fn source_text(&self) -> &str {
        match self {
            Content::Explicit(list) => list,
            Content::Page { url, .. } => url,
        }
    }
}

impl PageClient {
    /// Resolves `content` to an ordered, duplicate-free identifier list.
    pub async fn extract(&self, content: Content<'_>, marketplace_domain: &str) -> Vec<Asin> {
        match content {
            Content::Explicit(list) => parse_asin_list(list),
            Content::Page { url, mode } => self.scan(url, mode, marketplace_domain).await,
        }
    }

    /// Scans `page_url` in the given mode.
    pub async fn scan(&self, page_url: &str, mode: ScanMode, marketplace_domain: &str) -> Vec<Asin> {
        let Some((base, html)) = self.fetch_for_scan(page_url).await else {
            return Vec::new();
        };

        match mode {
            ScanMode::Links => link_identifiers(&base, &html, marketplace_domain),
            ScanMode::Images => {
                let broken = self.broken_images(&base, &html).await;
                identifiers_from_urls(broken.iter().map(String::as_str))
            }
        }
    }

    async fn fetch_for_scan(&self, page_url: &str) -> Option<(Url, String)> {
        match self.fetch_page(page_url).await {
            Ok(page) => Some(page),
            Err(e) => {
                tracing::warn!(url = page_url, error = %e, "page fetch failed; no identifiers found");
                None
            }
        }
    }

    /// Probes every image on the page one at a time and returns the URLs of
    /// those that did not answer with a 2xx status.
    pub async fn broken_images(&self, base: &Url, html: &str) -> Vec<String> {
        let mut broken = Vec::new();
        for url in image_sources(base, html) {
            match self.probe(&url).await {
                Ok(()) => {}
                Err(crate::ScraperError::UnexpectedStatus { status, .. }) => {
                    tracing::info!(url = %url, status, "broken image");
                    broken.push(url);
                }
                Err(e) => {
                    tracing::warn!(url = %url, error = %e, "image probe failed; treating as broken");
                    broken.push(url);
                }
            }
        }
        broken
    }
}
