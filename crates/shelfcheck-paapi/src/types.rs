//! Product Advertising API 5 `GetItems` wire types.
//!
//! ## Observed shape
//!
//! Every object in the response is sparse: a resource that was requested but
//! has no data for an item is omitted, not `null`. An item without offers
//! has no `Offers` key at all; a listing may lack `MerchantInfo`. All nested
//! fields are therefore `Option` or defaulted `Vec`.
//!
//! Availability is split across two fields: `Message` (`"In Stock"`) and
//! `Type` (`"Now"`).
//!
//! Item-level problems (an unknown or inaccessible ASIN) arrive as entries
//! in the top-level `Errors` array of an HTTP 200 response, next to the
//! items that did resolve. Request-level problems (signature, throttling)
//! arrive with a 4xx status and an `Errors` array only.

use serde::{Deserialize, Serialize};
use shelfcheck_core::{Asin, ImageSize, ImageVariant, Listing, ProductRecord};

/// Resources requested for every item.
pub(crate) const RESOURCES: &[&str] = &[
    "ItemInfo.Title",
    "Images.Primary.Small",
    "Images.Primary.Medium",
    "Images.Primary.Large",
    "Offers.Listings.Availability.Message",
    "Offers.Listings.Availability.Type",
    "Offers.Listings.Condition",
    "Offers.Listings.MerchantInfo",
];

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct GetItemsRequest<'a> {
    pub item_ids: Vec<&'a str>,
    pub item_id_type: &'static str,
    pub partner_tag: &'a str,
    pub partner_type: &'static str,
    pub marketplace: &'a str,
    pub resources: &'static [&'static str],
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetItemsResponse {
    #[serde(default)]
    pub items_result: Option<ItemsResult>,
    #[serde(default)]
    pub errors: Vec<ApiErrorDetail>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ItemsResult {
    #[serde(default)]
    pub items: Vec<Item>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Item {
    #[serde(rename = "ASIN")]
    pub asin: String,
    #[serde(rename = "DetailPageURL", default)]
    pub detail_page_url: Option<String>,
    #[serde(default)]
    pub item_info: Option<ItemInfo>,
    #[serde(default)]
    pub images: Option<Images>,
    #[serde(default)]
    pub offers: Option<Offers>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ItemInfo {
    #[serde(default)]
    pub title: Option<DisplayValue>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DisplayValue {
    #[serde(default)]
    pub display_value: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Images {
    #[serde(default)]
    pub primary: Option<ImageSet>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ImageSet {
    #[serde(default)]
    pub small: Option<ImageInfo>,
    #[serde(default)]
    pub medium: Option<ImageInfo>,
    #[serde(default)]
    pub large: Option<ImageInfo>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ImageInfo {
    #[serde(rename = "URL", default)]
    pub url: Option<String>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Offers {
    #[serde(default)]
    pub listings: Vec<OfferListing>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OfferListing {
    #[serde(default)]
    pub availability: Option<Availability>,
    #[serde(default)]
    pub condition: Option<Condition>,
    #[serde(default)]
    pub merchant_info: Option<MerchantInfo>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Availability {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(rename = "Type", default)]
    pub kind: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Condition {
    #[serde(default)]
    pub value: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MerchantInfo {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ApiErrorDetail {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Error-only body returned alongside non-2xx statuses.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct ErrorEnvelope {
    #[serde(default)]
    pub errors: Vec<ApiErrorDetail>,
}

impl Item {
    /// Converts to the pipeline's record. Items with a blank ASIN are
    /// dropped since nothing downstream could refer to them.
    #[must_use]
    pub fn into_record(self) -> Option<ProductRecord> {
        let asin = Asin::parse(&self.asin)?;

        let title = self
            .item_info
            .and_then(|info| info.title)
            .and_then(|title| title.display_value);

        let listings = self
            .offers
            .map(|offers| offers.listings)
            .unwrap_or_default()
            .into_iter()
            .map(OfferListing::into_listing)
            .collect();

        let images = self
            .images
            .and_then(|images| images.primary)
            .map(ImageSet::into_variants)
            .unwrap_or_default();

        Some(ProductRecord {
            asin,
            title,
            detail_page_url: self.detail_page_url,
            listings,
            images,
        })
    }
}

impl OfferListing {
    fn into_listing(self) -> Listing {
        let (availability_message, availability_type) = self
            .availability
            .map(|a| (a.message, a.kind))
            .unwrap_or_default();
        Listing {
            merchant_name: self.merchant_info.and_then(|m| m.name),
            condition: self.condition.and_then(|c| c.value),
            availability_message,
            availability_type,
        }
    }
}

impl ImageSet {
    fn into_variants(self) -> Vec<ImageVariant> {
        [
            (ImageSize::Small, self.small),
            (ImageSize::Medium, self.medium),
            (ImageSize::Large, self.large),
        ]
        .into_iter()
        .filter_map(|(size, info)| {
            let info = info?;
            let url = info.url.filter(|u| !u.trim().is_empty())?;
            Some(ImageVariant {
                size,
                url,
                width: info.width,
                height: info.height,
            })
        })
        .collect()
    }
}

impl ApiErrorDetail {
    pub(crate) fn code_or_unknown(&self) -> &str {
        self.code.as_deref().unwrap_or("Unknown")
    }

    pub(crate) fn message_or_empty(&self) -> &str {
        self.message.as_deref().unwrap_or("")
    }
}
