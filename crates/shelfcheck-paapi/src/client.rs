//! HTTP client for the Product Advertising API 5 `GetItems` operation.
//!
//! Identifiers are sent in batches of up to the configured batch size (the
//! API caps `ItemIds` at 10), so a typical run is a single round trip. There
//! is no retry: a failed batch fails the whole call.

use std::time::Duration;

use chrono::Utc;
use reqwest::{Client, Url};
use shelfcheck_core::{AppConfig, Asin, ProductRecord, ProductSource};

use crate::error::PaapiError;
use crate::signing::{self, SigningInput};
use crate::types::{ErrorEnvelope, GetItemsRequest, GetItemsResponse, RESOURCES};

const GET_ITEMS_PATH: &str = "/paapi5/getitems";
const GET_ITEMS_TARGET: &str = "com.amazon.paapi5.v1.ProductAdvertisingAPIv1.GetItems";

/// Signed client for `GetItems`.
///
/// Use [`PaapiClient::new`] for the configured endpoint or
/// [`PaapiClient::with_base_url`] to point at a mock server in tests.
pub struct PaapiClient {
    client: Client,
    access_key: String,
    secret_key: String,
    partner_tag: String,
    marketplace: String,
    region: String,
    endpoint: Url,
    /// `Host` header value the signature covers.
    host: String,
    batch_size: usize,
}

impl PaapiClient {
    /// Creates a client for `https://{paapi_host}`.
    ///
    /// # Errors
    ///
    /// Returns [`PaapiError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`PaapiError::InvalidEndpoint`] if the
    /// configured host does not form a valid URL.
    pub fn new(config: &AppConfig) -> Result<Self, PaapiError> {
        Self::with_base_url(config, &format!("https://{}", config.paapi_host))
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`PaapiError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`PaapiError::InvalidEndpoint`] if
    /// `base_url` is not a valid absolute URL with a host.
    pub fn with_base_url(config: &AppConfig, base_url: &str) -> Result<Self, PaapiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        let invalid = |reason: String| PaapiError::InvalidEndpoint {
            url: base_url.to_owned(),
            reason,
        };

        let base = Url::parse(base_url).map_err(|e| invalid(e.to_string()))?;
        let endpoint = base
            .join(GET_ITEMS_PATH)
            .map_err(|e| invalid(e.to_string()))?;
        let host_name = endpoint
            .host_str()
            .ok_or_else(|| invalid("URL has no host".to_string()))?;
        let host = match endpoint.port() {
            Some(port) => format!("{host_name}:{port}"),
            None => host_name.to_owned(),
        };

        Ok(Self {
            client,
            access_key: config.access_key.clone(),
            secret_key: config.secret_key.clone(),
            partner_tag: config.associate_tag.clone(),
            marketplace: config.marketplace.clone(),
            region: config.paapi_region.clone(),
            endpoint,
            host,
            batch_size: config.paapi_batch_size.max(1),
        })
    }

    /// Fetches product data for `asins`, batch by batch.
    ///
    /// Identifiers the API has no data for are logged and left out of the
    /// result.
    ///
    /// # Errors
    ///
    /// - [`PaapiError::Api`] if the API rejects a request outright.
    /// - [`PaapiError::UnexpectedStatus`] for other non-2xx responses.
    /// - [`PaapiError::Http`] on network failure.
    /// - [`PaapiError::Deserialize`] if a response does not match the
    ///   expected shape.
    pub async fn fetch_items(&self, asins: &[Asin]) -> Result<Vec<ProductRecord>, PaapiError> {
        let mut records = Vec::with_capacity(asins.len());
        for batch in asins.chunks(self.batch_size) {
            records.extend(self.fetch_batch(batch).await?);
        }
        Ok(records)
    }

    async fn fetch_batch(&self, asins: &[Asin]) -> Result<Vec<ProductRecord>, PaapiError> {
        let request = GetItemsRequest {
            item_ids: asins.iter().map(Asin::as_str).collect(),
            item_id_type: "ASIN",
            partner_tag: &self.partner_tag,
            partner_type: "Associates",
            marketplace: &self.marketplace,
            resources: RESOURCES,
        };
        let payload = serde_json::to_string(&request).map_err(|e| PaapiError::Deserialize {
            context: "GetItems request body".to_string(),
            source: e,
        })?;

        let signature = signing::sign(&SigningInput {
            access_key: &self.access_key,
            secret_key: &self.secret_key,
            region: &self.region,
            host: &self.host,
            path: self.endpoint.path(),
            target: GET_ITEMS_TARGET,
            payload: &payload,
            now: Utc::now(),
        });

        tracing::debug!(count = asins.len(), "sending GetItems request");

        let response = self
            .client
            .post(self.endpoint.clone())
            .header(reqwest::header::CONTENT_ENCODING, signing::CONTENT_ENCODING)
            .header(reqwest::header::CONTENT_TYPE, signing::CONTENT_TYPE)
            .header("x-amz-date", &signature.amz_date)
            .header("x-amz-target", GET_ITEMS_TARGET)
            .header(reqwest::header::AUTHORIZATION, &signature.authorization)
            .body(payload)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(Self::status_error(status.as_u16(), body));
        }

        let parsed: GetItemsResponse =
            serde_json::from_str(&body).map_err(|e| PaapiError::Deserialize {
                context: format!("GetItems response for {} items", asins.len()),
                source: e,
            })?;

        for error in &parsed.errors {
            tracing::warn!(
                code = error.code_or_unknown(),
                message = error.message_or_empty(),
                "GetItems item-level error"
            );
        }

        Ok(parsed
            .items_result
            .map(|result| result.items)
            .unwrap_or_default()
            .into_iter()
            .filter_map(crate::types::Item::into_record)
            .collect())
    }

    fn status_error(status: u16, body: String) -> PaapiError {
        let first = serde_json::from_str::<ErrorEnvelope>(&body)
            .ok()
            .and_then(|envelope| envelope.errors.into_iter().next());
        match first {
            Some(detail) => PaapiError::Api {
                status,
                code: detail.code_or_unknown().to_owned(),
                message: detail.message_or_empty().to_owned(),
            },
            None => PaapiError::UnexpectedStatus { status, body },
        }
    }
}

impl ProductSource for PaapiClient {
    type Error = PaapiError;

    async fn get_items(&self, asins: &[Asin]) -> Result<Vec<ProductRecord>, Self::Error> {
        self.fetch_items(asins).await
    }
}
