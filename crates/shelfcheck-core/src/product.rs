//! Product records as the rest of the pipeline sees them.
//!
//! Upstream data is routinely partial: a product may come back without
//! offers, without images, or with listings missing individual fields. Every
//! field that can be missing is an `Option` or an empty `Vec` here, and
//! accessors supply the placeholder used when rendering.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::asin::Asin;

/// Condition value that qualifies a listing as in stock.
const NEW_CONDITION: &str = "New";

/// Joined availability text that qualifies a listing as in stock.
const IN_STOCK_TEXT: &str = "In Stock Now";

const UNTITLED: &str = "(untitled)";

/// One fetched catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub asin: Asin,
    #[serde(default)]
    pub title: Option<String>,
    /// Canonical detail page URL as reported upstream.
    #[serde(default)]
    pub detail_page_url: Option<String>,
    #[serde(default)]
    pub listings: Vec<Listing>,
    #[serde(default)]
    pub images: Vec<ImageVariant>,
}

impl ProductRecord {
    /// A record with nothing but its identifier.
    #[must_use]
    pub fn new(asin: Asin) -> Self {
        Self {
            asin,
            title: None,
            detail_page_url: None,
            listings: Vec::new(),
            images: Vec::new(),
        }
    }

    /// Title for display, or a placeholder when upstream sent none.
    #[must_use]
    pub fn display_title(&self) -> &str {
        self.title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(UNTITLED)
    }

    #[must_use]
    pub fn status(&self) -> Status {
        Status::classify(self)
    }
}

/// One merchant offer for a product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    #[serde(default)]
    pub merchant_name: Option<String>,
    #[serde(default)]
    pub condition: Option<String>,
    #[serde(default)]
    pub availability_message: Option<String>,
    #[serde(default)]
    pub availability_type: Option<String>,
}

impl Listing {
    /// Message and type joined by a single space, skipping absent or empty
    /// parts. Upstream splits "In Stock Now" as `"In Stock"` + `"Now"`.
    #[must_use]
    pub fn availability_text(&self) -> String {
        [&self.availability_message, &self.availability_type]
            .into_iter()
            .filter_map(|part| part.as_deref())
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// `true` for a new-condition offer that ships now. Both comparisons are
    /// exact and case-sensitive.
    #[must_use]
    pub fn is_new_in_stock(&self) -> bool {
        self.condition.as_deref() == Some(NEW_CONDITION) && self.availability_text() == IN_STOCK_TEXT
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ImageSize {
    Small,
    Medium,
    Large,
}

impl fmt::Display for ImageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageSize::Small => write!(f, "small"),
            ImageSize::Medium => write!(f, "medium"),
            ImageSize::Large => write!(f, "large"),
        }
    }
}

/// One size rendition of a product's primary image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageVariant {
    pub size: ImageSize,
    pub url: String,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

/// Derived availability of a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Available,
    Borked,
}

impl Status {
    /// `Available` as soon as any listing is new and in stock; `Borked`
    /// otherwise, including for products with no listings at all. A later
    /// non-matching listing never downgrades an earlier match.
    #[must_use]
    pub fn classify(product: &ProductRecord) -> Status {
        let mut status = Status::Borked;
        for listing in &product.listings {
            if listing.is_new_in_stock() {
                status = Status::Available;
            }
        }
        status
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Available => write!(f, "AVAILABLE"),
            Status::Borked => write!(f, "BORKED"),
        }
    }
}
