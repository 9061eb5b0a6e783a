use thiserror::Error;

/// Errors returned by the Product Advertising API client.
#[derive(Debug, Error)]
pub enum PaapiError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API rejected the request and said why (bad credentials,
    /// throttling, unknown partner tag).
    #[error("Product Advertising API error {code} (HTTP {status}): {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    /// Non-2xx response without a recognisable error envelope.
    #[error("unexpected HTTP status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid API endpoint \"{url}\": {reason}")]
    InvalidEndpoint { url: String, reason: String },
}
