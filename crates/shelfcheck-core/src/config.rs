use crate::app_config::AppConfig;
use crate::ConfigError;

/// Largest `ItemIds` list a single `GetItems` request accepts.
const MAX_PAAPI_BATCH_SIZE: usize = 10;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let access_key = require("AMAZON_ACCESS_KEY")?;
    let secret_key = require("AMAZON_SECRET_KEY")?;
    let associate_tag = require("AMAZON_ASSOCIATE_TAG")?;

    let log_level = or_default("SHELFCHECK_LOG_LEVEL", "info");

    let marketplace = or_default("SHELFCHECK_MARKETPLACE", "www.amazon.com");
    let paapi_host = or_default("SHELFCHECK_PAAPI_HOST", "webservices.amazon.com");
    let paapi_region = or_default("SHELFCHECK_PAAPI_REGION", "us-east-1");

    let paapi_batch_size = parse_usize("SHELFCHECK_PAAPI_BATCH_SIZE", "10")?;
    if paapi_batch_size == 0 || paapi_batch_size > MAX_PAAPI_BATCH_SIZE {
        return Err(ConfigError::InvalidEnvVar {
            var: "SHELFCHECK_PAAPI_BATCH_SIZE".to_string(),
            reason: format!("must be between 1 and {MAX_PAAPI_BATCH_SIZE}, got {paapi_batch_size}"),
        });
    }

    let replacements_path = PathBuf::from(or_default(
        "SHELFCHECK_REPLACEMENTS_PATH",
        "./replacements.json",
    ));
    let output_dir = PathBuf::from(or_default("SHELFCHECK_OUTPUT_DIR", "."));

    let request_timeout_secs = parse_u64("SHELFCHECK_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("SHELFCHECK_USER_AGENT", "shelfcheck/0.1 (product-report)");

    Ok(AppConfig {
        log_level,
        access_key,
        secret_key,
        associate_tag,
        marketplace,
        paapi_host,
        paapi_region,
        paapi_batch_size,
        replacements_path,
        output_dir,
        request_timeout_secs,
        user_agent,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
