//! Assembles the per-identifier sections of a report.
//!
//! Compilation is pure: it takes already-fetched records and produces a
//! display-ready structure with every placeholder applied, so the HTML
//! renderer never has to reason about missing upstream data.

use std::collections::HashMap;

use shelfcheck_core::{Asin, ImageVariant, Listing, ProductRecord, ReplacementLookup, Status};

const NO_DATA_TITLE: &str = "(no product data)";
const UNKNOWN_MERCHANT: &str = "(unknown merchant)";
const UNKNOWN_VALUE: &str = "(unknown)";

/// Builds tagged detail-page links for the configured marketplace.
#[derive(Debug, Clone)]
pub struct AffiliateLinks {
    marketplace: String,
    tag: String,
}

impl AffiliateLinks {
    #[must_use]
    pub fn new(marketplace: &str, tag: &str) -> Self {
        Self {
            marketplace: marketplace.to_owned(),
            tag: tag.to_owned(),
        }
    }

    /// `https://{marketplace}/dp/{asin}/?tag={tag}`
    #[must_use]
    pub fn link(&self, asin: &Asin) -> String {
        format!("https://{}/dp/{asin}/?tag={}", self.marketplace, self.tag)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingView {
    pub merchant: String,
    pub condition: String,
    pub availability: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductView {
    pub asin: Asin,
    pub title: String,
    /// Canonical detail page reported upstream, or `link` when none was.
    pub detail_url: String,
    /// Tagged link offered through the copy button.
    pub link: String,
    pub listings: Vec<ListingView>,
    pub images: Vec<ImageVariant>,
    pub status: Status,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replacement {
    /// Banner text explaining the relation to the primary product.
    pub note: String,
    pub product: ProductView,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub primary: ProductView,
    pub replacement: Option<Replacement>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    pub sections: Vec<Section>,
}

/// One section per identifier, in the given order.
///
/// Identifiers missing from `primary` still get a section, with a
/// placeholder title and a `BORKED` status.
#[must_use]
pub fn compile(
    identifiers: &[Asin],
    primary: &HashMap<Asin, ProductRecord>,
    replacements: &ReplacementLookup,
    links: &AffiliateLinks,
) -> Report {
    let sections = identifiers
        .iter()
        .map(|asin| {
            let primary_view = match primary.get(asin) {
                Some(record) => product_view(record, links),
                None => missing_view(asin, links),
            };
            let replacement = replacements.get(asin).map(|record| Replacement {
                note: format!("{asin} has been replaced by {}", record.asin),
                product: product_view(record, links),
            });
            Section {
                primary: primary_view,
                replacement,
            }
        })
        .collect();

    Report { sections }
}

fn product_view(record: &ProductRecord, links: &AffiliateLinks) -> ProductView {
    let link = links.link(&record.asin);
    let detail_url = record
        .detail_page_url
        .as_deref()
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .map_or_else(|| link.clone(), str::to_owned);
    ProductView {
        asin: record.asin.clone(),
        title: record.display_title().to_owned(),
        detail_url,
        link,
        listings: record.listings.iter().map(listing_view).collect(),
        images: record.images.clone(),
        status: record.status(),
    }
}

fn missing_view(asin: &Asin, links: &AffiliateLinks) -> ProductView {
    let link = links.link(asin);
    ProductView {
        asin: asin.clone(),
        title: NO_DATA_TITLE.to_owned(),
        detail_url: link.clone(),
        link,
        listings: Vec::new(),
        images: Vec::new(),
        status: Status::Borked,
    }
}

fn listing_view(listing: &Listing) -> ListingView {
    let availability = listing.availability_text();
    ListingView {
        merchant: listing
            .merchant_name
            .clone()
            .unwrap_or_else(|| UNKNOWN_MERCHANT.to_owned()),
        condition: listing
            .condition
            .clone()
            .unwrap_or_else(|| UNKNOWN_VALUE.to_owned()),
        availability: if availability.is_empty() {
            UNKNOWN_VALUE.to_owned()
        } else {
            availability
        },
    }
}
