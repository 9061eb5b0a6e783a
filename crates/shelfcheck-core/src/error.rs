use thiserror::Error;

use crate::asin::Asin;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

/// Errors raised while resolving the replacement mapping into product records.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The batched product fetch for the replacement identifiers failed.
    #[error("failed to fetch replacement products: {0}")]
    Fetch(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The upstream returned no record for a configured replacement. This
    /// means the replacements file points at an identifier the catalog does
    /// not know about.
    #[error("no product data returned for replacement {replacement} (configured for {original})")]
    MissingReplacement { original: Asin, replacement: Asin },
}
