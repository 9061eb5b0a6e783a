pub mod app_config;
pub mod asin;
pub mod config;
pub mod error;
pub mod product;
pub mod replacements;
pub mod source;

pub use app_config::AppConfig;
pub use asin::{dedupe, derive_identifier, parse_asin_list, Asin};
pub use config::{load_app_config, load_app_config_from_env};
pub use error::{ConfigError, ResolveError};
pub use product::{ImageSize, ImageVariant, Listing, ProductRecord, Status};
pub use replacements::{load_replacements, resolve_replacements, ReplacementLookup, ReplacementMap};
pub use source::{index_by_asin, ProductSource};
