use std::path::PathBuf;

use crate::ConfigError;

/// Largest page size the Admin API accepts on list endpoints.
pub const MAX_PAGE_SIZE: u32 = 250;

/// Where and how to reach the Admin API: fully-qualified base URL plus the
/// access token sent in `X-Shopify-Access-Token`.
#[derive(Clone)]
pub struct AdminEndpoint {
    pub base_url: String,
    pub access_token: String,
}

impl std::fmt::Debug for AdminEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminEndpoint")
            .field("base_url", &self.base_url)
            .field("access_token", &"[redacted]")
            .finish()
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub store: Option<String>,
    pub access_token: Option<String>,
    pub api_version: String,
    pub api_base_url: Option<String>,
    pub log_level: String,
    pub request_timeout_secs: u64,
    pub max_retries: u32,
    pub retry_backoff_base_secs: u64,
    pub inter_request_delay_ms: u64,
    pub page_size: u32,
    pub profiles_path: PathBuf,
}

impl AppConfig {
    /// Resolves the Admin API endpoint.
    ///
    /// `ORDERSWEEP_API_BASE_URL` wins when set; otherwise the URL is built from
    /// the store subdomain and API version.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnvVar`] when the access token is unset,
    /// or when neither a base URL override nor `SHOPIFY_STORE` is available.
    pub fn admin_endpoint(&self) -> Result<AdminEndpoint, ConfigError> {
        let access_token = self
            .access_token
            .clone()
            .ok_or_else(|| ConfigError::MissingEnvVar("SHOPIFY_API_ACCESS_TOKEN".to_string()))?;

        let base_url = match (&self.api_base_url, &self.store) {
            (Some(url), _) => url.clone(),
            (None, Some(store)) => format!(
                "https://{store}.myshopify.com/admin/api/{}",
                self.api_version
            ),
            (None, None) => return Err(ConfigError::MissingEnvVar("SHOPIFY_STORE".to_string())),
        };

        Ok(AdminEndpoint {
            base_url,
            access_token,
        })
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("store", &self.store)
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "[redacted]"),
            )
            .field("api_version", &self.api_version)
            .field("api_base_url", &self.api_base_url)
            .field("log_level", &self.log_level)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_base_secs", &self.retry_backoff_base_secs)
            .field("inter_request_delay_ms", &self.inter_request_delay_ms)
            .field("page_size", &self.page_size)
            .field("profiles_path", &self.profiles_path)
            .finish()
    }
}
