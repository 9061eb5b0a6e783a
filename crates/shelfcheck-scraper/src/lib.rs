pub mod client;
pub mod error;
pub mod extract;
pub mod scan;

pub use client::PageClient;
pub use error::ScraperError;
pub use extract::{image_sources, link_identifiers, marketplace_links};
pub use scan::{Content, ScanMode};
