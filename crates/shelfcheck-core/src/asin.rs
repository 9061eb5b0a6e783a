//! Amazon Standard Identification Numbers and how they are recovered from
//! free-form input.
//!
//! Identifiers are treated as opaque: the only invariant enforced here is
//! that they are non-empty after trimming. Anything that looks like an ASIN
//! to the pattern rules below is passed upstream as-is.

use std::collections::HashSet;
use std::fmt;

use reqwest::Url;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Query parameter carrying the identifier on ad-widget and image URLs.
const ASIN_QUERY_PARAM: &str = "ASIN";

/// Path segment that precedes the identifier on product detail URLs
/// (`/Some-Title/dp/B00EXAMPLE/ref=...`).
const DETAIL_PATH_MARKER: &str = "dp";

#[derive(Debug, Error)]
#[error("identifier must be non-empty")]
pub struct EmptyAsin;

/// A catalog identifier, guaranteed non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Asin(String);

impl Asin {
    /// Trims `raw` and wraps it. Returns `None` for blank input.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_owned()))
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Asin {
    type Error = EmptyAsin;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or(EmptyAsin)
    }
}

impl From<Asin> for String {
    fn from(value: Asin) -> Self {
        value.0
    }
}

impl fmt::Display for Asin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Collapses repeated identifiers, keeping the position of the first
/// occurrence.
pub fn dedupe<I>(candidates: I) -> Vec<Asin>
where
    I: IntoIterator<Item = Asin>,
{
    let mut seen = HashSet::new();
    let mut ordered = Vec::new();
    for asin in candidates {
        if seen.insert(asin.clone()) {
            ordered.push(asin);
        }
    }
    ordered
}

/// Parses an explicit comma-separated identifier list (`"B01,B02, B03"`).
///
/// Blank entries are dropped and repeats collapse to their first position.
#[must_use]
pub fn parse_asin_list(text: &str) -> Vec<Asin> {
    dedupe(text.split(',').filter_map(Asin::parse))
}

/// Derives an identifier from an absolute URL.
///
/// An `ASIN` query parameter wins. Otherwise the path segment directly after
/// a `dp` segment is used. URLs matching neither pattern, and URLs that do
/// not parse, yield `None`.
#[must_use]
pub fn derive_identifier(url: &str) -> Option<Asin> {
    let parsed = Url::parse(url).ok()?;

    let from_query = parsed
        .query_pairs()
        .find(|(key, _)| key == ASIN_QUERY_PARAM)
        .and_then(|(_, value)| Asin::parse(&value));
    if from_query.is_some() {
        return from_query;
    }

    let mut segments = parsed.path_segments()?;
    segments.by_ref().find(|segment| *segment == DETAIL_PATH_MARKER)?;
    segments.next().and_then(Asin::parse)
}

/// Derives identifiers from a sequence of absolute URLs, skipping URLs that
/// carry none and collapsing repeats.
pub fn identifiers_from_urls<'a, I>(urls: I) -> Vec<Asin>
where
    I: IntoIterator<Item = &'a str>,
{
    dedupe(urls.into_iter().filter_map(derive_identifier))
}
