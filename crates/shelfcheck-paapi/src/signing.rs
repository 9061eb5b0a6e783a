//! AWS Signature Version 4 for Product Advertising API requests.
//!
//! PA-API 5 signs a JSON `POST` with five headers; the canonical request has
//! no query string.

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

type HmacSha256 = Hmac<Sha256>;

pub(crate) const SERVICE: &str = "ProductAdvertisingAPI";
pub(crate) const CONTENT_ENCODING: &str = "amz-1.0";
pub(crate) const CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Everything that goes into one request signature.
pub(crate) struct SigningInput<'a> {
    pub access_key: &'a str,
    pub secret_key: &'a str,
    pub region: &'a str,
    /// `host` or `host:port`, exactly as sent in the `Host` header.
    pub host: &'a str,
    pub path: &'a str,
    /// Value of the `x-amz-target` header.
    pub target: &'a str,
    pub payload: &'a str,
    pub now: DateTime<Utc>,
}

/// Header values produced by [`sign`].
#[derive(Debug)]
pub(crate) struct Signature {
    pub amz_date: String,
    pub authorization: String,
}

pub(crate) fn sign(input: &SigningInput<'_>) -> Signature {
    let date_stamp = input.now.format("%Y%m%d").to_string();
    let amz_date = input.now.format("%Y%m%dT%H%M%SZ").to_string();

    // Sorted by name, as SigV4 requires.
    let headers = [
        ("content-encoding", CONTENT_ENCODING),
        ("content-type", CONTENT_TYPE),
        ("host", input.host),
        ("x-amz-date", amz_date.as_str()),
        ("x-amz-target", input.target),
    ];

    let signed_headers = headers
        .iter()
        .map(|(k, _)| *k)
        .collect::<Vec<_>>()
        .join(";");
    let canonical_headers: String = headers
        .iter()
        .map(|(k, v)| format!("{k}:{}\n", v.trim()))
        .collect();

    let canonical_request = format!(
        "POST\n{}\n\n{canonical_headers}\n{signed_headers}\n{}",
        input.path,
        hex_sha256(input.payload.as_bytes())
    );

    let credential_scope = format!("{date_stamp}/{}/{SERVICE}/aws4_request", input.region);
    let string_to_sign = format!(
        "AWS4-HMAC-SHA256\n{amz_date}\n{credential_scope}\n{}",
        hex_sha256(canonical_request.as_bytes())
    );

    let signing_key = derive_signing_key(input.secret_key, &date_stamp, input.region, SERVICE);
    let signature = hex::encode(hmac_sha256(&signing_key, string_to_sign.as_bytes()));

    let authorization = format!(
        "AWS4-HMAC-SHA256 Credential={}/{credential_scope}, SignedHeaders={signed_headers}, Signature={signature}",
        input.access_key
    );

    Signature {
        amz_date,
        authorization,
    }
}

fn hex_sha256(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can take key of any size");
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}

/// ```text
/// kDate    = HMAC("AWS4" + secret, dateStamp)
/// kRegion  = HMAC(kDate, region)
/// kService = HMAC(kRegion, service)
/// kSigning = HMAC(kService, "aws4_request")
/// ```
fn derive_signing_key(secret_key: &str, date_stamp: &str, region: &str, service: &str) -> Vec<u8> {
    let k_date = hmac_sha256(format!("AWS4{secret_key}").as_bytes(), date_stamp.as_bytes());
    let k_region = hmac_sha256(&k_date, region.as_bytes());
    let k_service = hmac_sha256(&k_region, service.as_bytes());
    hmac_sha256(&k_service, b"aws4_request")
}
