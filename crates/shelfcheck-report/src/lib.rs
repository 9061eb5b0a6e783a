pub mod compile;
pub mod html;
pub mod slug;

pub use compile::{compile, AffiliateLinks, ListingView, ProductView, Replacement, Report, Section};
pub use html::render_html;
pub use slug::{report_file_name, slug};
