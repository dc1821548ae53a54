//! HTTP client for the Shopify Admin REST API.

mod draft_orders;
mod orders;
mod payments;
mod response;

use std::time::Duration;

use ordersweep_core::AdminEndpoint;
use reqwest::{Client, Method, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::AdminError;
use crate::rate_limit::{retry_with_backoff, RetryPolicy};

pub use orders::OrderPage;

/// Maximum number of pages to follow before giving up.
/// Prevents infinite loops on cycling cursors.
pub const MAX_PAGES: usize = 400;

const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Access-Token";

/// Authenticated client for one store's Admin API.
///
/// Maps 429, 404, and other non-2xx responses to typed errors and retries
/// transient failures up to `max_retries` additional attempts.
pub struct AdminClient {
    client: Client,
    base_url: Url,
    access_token: String,
    max_retries: u32,
    backoff_base_secs: u64,
}

impl std::fmt::Debug for AdminClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminClient")
            .field("base_url", &self.base_url.as_str())
            .field("max_retries", &self.max_retries)
            .finish_non_exhaustive()
    }
}

impl AdminClient {
    /// Creates a client for `endpoint` with the given timeout and retry policy.
    ///
    /// `max_retries` is the number of additional attempts after the first
    /// failure for retriable errors (429, network errors, 5xx). `0` disables
    /// retries.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`AdminError::InvalidUrl`] if the endpoint's
    /// base URL does not parse.
    pub fn new(
        endpoint: &AdminEndpoint,
        timeout_secs: u64,
        max_retries: u32,
        backoff_base_secs: u64,
    ) -> Result<Self, AdminError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(concat!("ordersweep/", env!("CARGO_PKG_VERSION")))
            .build()?;

        // Exactly one trailing slash, so `join("orders.json")` appends to the
        // versioned path instead of replacing its last segment.
        let normalised = format!("{}/", endpoint.base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| AdminError::InvalidUrl {
            url: endpoint.base_url.clone(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            base_url,
            access_token: endpoint.access_token.clone(),
            max_retries,
            backoff_base_secs,
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolves a resource path such as `orders/123.json` against the base URL.
    pub(crate) fn endpoint(&self, path: &str) -> Result<Url, AdminError> {
        self.base_url.join(path).map_err(|e| AdminError::InvalidUrl {
            url: path.to_owned(),
            reason: e.to_string(),
        })
    }

    /// Parses a server-supplied URL (a pagination cursor) and refuses any that
    /// point away from the configured store, so the access token never leaves
    /// that origin.
    pub(crate) fn same_origin_url(&self, raw: &str) -> Result<Url, AdminError> {
        let url = Url::parse(raw).map_err(|e| AdminError::InvalidUrl {
            url: raw.to_owned(),
            reason: e.to_string(),
        })?;
        if url.origin() != self.base_url.origin() {
            return Err(AdminError::InvalidUrl {
                url: raw.to_owned(),
                reason: format!(
                    "origin differs from configured store {}",
                    self.base_url.origin().ascii_serialization()
                ),
            });
        }
        Ok(url)
    }

    /// Sends one request with retry and returns the raw body plus the `Link`
    /// header, if any. `POST` is only resent after a 429.
    async fn execute(
        &self,
        method: Method,
        url: Url,
        body: Option<&Value>,
    ) -> Result<(String, Option<String>), AdminError> {
        let policy = RetryPolicy::for_method(&method);
        retry_with_backoff(self.max_retries, self.backoff_base_secs, policy, || {
            let method = method.clone();
            let url = url.clone();
            async move {
                tracing::debug!(%method, url = %url, "admin api request");

                let mut request = self
                    .client
                    .request(method, url.clone())
                    .header(ACCESS_TOKEN_HEADER, &self.access_token)
                    .header(reqwest::header::ACCEPT, "application/json");
                if let Some(body) = body {
                    request = request.json(body);
                }

                let response = request.send().await?;
                response::check(response, &url).await
            }
        })
        .await
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        context: &str,
    ) -> Result<(T, Option<String>), AdminError> {
        let (body, link) = self.execute(Method::GET, url, None).await?;
        Ok((response::decode(&body, context)?, link))
    }

    pub(crate) async fn send_json<T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        body: &Value,
        context: &str,
    ) -> Result<T, AdminError> {
        let (text, _) = self.execute(method, url, Some(body)).await?;
        response::decode(&text, context)
    }

    /// Like [`Self::send_json`] but ignores the response body.
    pub(crate) async fn send_discard(
        &self,
        method: Method,
        url: Url,
        body: &Value,
    ) -> Result<(), AdminError> {
        self.execute(method, url, Some(body)).await.map(|_| ())
    }
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
