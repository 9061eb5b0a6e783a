//! HTTP access to the page being scanned and to the images it references.

use std::time::Duration;

use reqwest::{Client, Url};

use crate::error::ScraperError;

/// Fetches pages and probes image URLs. Every call is a single attempt.
pub struct PageClient {
    client: Client,
}

impl PageClient {
    /// Creates a `PageClient` with the given request timeout and `User-Agent`.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }

    /// Fetches `url` and returns the final URL (after redirects) with the
    /// response body.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::InvalidUrl`] if `url` is not an absolute URL.
    /// - [`ScraperError::UnexpectedStatus`] for any non-2xx response.
    /// - [`ScraperError::Http`] on network failure or an undecodable body.
    pub async fn fetch_page(&self, url: &str) -> Result<(Url, String), ScraperError> {
        let parsed = Url::parse(url).map_err(|e| ScraperError::InvalidUrl {
            url: url.to_owned(),
            reason: e.to_string(),
        })?;

        let response = self
            .client
            .get(parsed)
            .header(reqwest::header::ACCEPT, "text/html,application/xhtml+xml")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScraperError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }

        let final_url = response.url().clone();
        let body = response.text().await?;
        Ok((final_url, body))
    }

    /// Sends a HEAD request for `url`, following redirects.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::UnexpectedStatus`] for any non-2xx final response.
    /// - [`ScraperError::Http`] on network failure.
    pub async fn probe(&self, url: &str) -> Result<(), ScraperError> {
        let response = self.client.head(url).send().await?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(ScraperError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            })
        }
    }
}
