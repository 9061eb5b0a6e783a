use std::path::PathBuf;

/// Process-wide settings, built once at startup and passed by reference.
#[derive(Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub access_key: String,
    pub secret_key: String,
    /// Associates partner tag, sent with API requests and appended to links.
    pub associate_tag: String,
    /// Marketplace host, e.g. `www.amazon.com`.
    pub marketplace: String,
    pub paapi_host: String,
    pub paapi_region: String,
    /// Identifiers per `GetItems` request (the API accepts at most 10).
    pub paapi_batch_size: usize,
    pub replacements_path: PathBuf,
    pub output_dir: PathBuf,
    pub request_timeout_secs: u64,
    pub user_agent: String,
}

impl AppConfig {
    /// Domain used to decide which scanned links point at the marketplace:
    /// the marketplace host without a leading `www.`.
    #[must_use]
    pub fn marketplace_domain(&self) -> &str {
        self.marketplace
            .strip_prefix("www.")
            .unwrap_or(&self.marketplace)
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("log_level", &self.log_level)
            .field("access_key", &self.access_key)
            .field("secret_key", &"[redacted]")
            .field("associate_tag", &self.associate_tag)
            .field("marketplace", &self.marketplace)
            .field("paapi_host", &self.paapi_host)
            .field("paapi_region", &self.paapi_region)
            .field("paapi_batch_size", &self.paapi_batch_size)
            .field("replacements_path", &self.replacements_path)
            .field("output_dir", &self.output_dir)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}
