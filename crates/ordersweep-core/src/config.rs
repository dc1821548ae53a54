use crate::app_config::{AppConfig, MAX_PAGE_SIZE};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
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
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Store credentials are optional here: commands that never talk to the API
/// (file conversion) must still start without them. [`AppConfig::admin_endpoint`]
/// enforces their presence.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let store = optional("SHOPIFY_STORE");
    let access_token = optional("SHOPIFY_API_ACCESS_TOKEN");
    let api_version = or_default("SHOPIFY_API_VERSION", "2023-01");
    let api_base_url = optional("ORDERSWEEP_API_BASE_URL");
    let log_level = or_default("ORDERSWEEP_LOG_LEVEL", "info");
    let profiles_path = PathBuf::from(or_default(
        "ORDERSWEEP_PROFILES_PATH",
        "./config/reissue.yaml",
    ));

    let request_timeout_secs = parse_u64("ORDERSWEEP_REQUEST_TIMEOUT_SECS", "30")?;
    let max_retries = parse_u32("ORDERSWEEP_MAX_RETRIES", "0")?;
    let retry_backoff_base_secs = parse_u64("ORDERSWEEP_RETRY_BACKOFF_BASE_SECS", "2")?;
    let inter_request_delay_ms = parse_u64("ORDERSWEEP_INTER_REQUEST_DELAY_MS", "0")?;
    let page_size = parse_u32("ORDERSWEEP_PAGE_SIZE", "250")?;

    if page_size == 0 || page_size > MAX_PAGE_SIZE {
        return Err(ConfigError::InvalidEnvVar {
            var: "ORDERSWEEP_PAGE_SIZE".to_string(),
            reason: format!("must be between 1 and {MAX_PAGE_SIZE}, got {page_size}"),
        });
    }

    if api_version.trim().is_empty() {
        return Err(ConfigError::InvalidEnvVar {
            var: "SHOPIFY_API_VERSION".to_string(),
            reason: "must be non-empty".to_string(),
        });
    }

    Ok(AppConfig {
        store,
        access_token,
        api_version,
        api_base_url,
        log_level,
        request_timeout_secs,
        max_retries,
        retry_backoff_base_secs,
        inter_request_delay_ms,
        page_size,
        profiles_path,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
