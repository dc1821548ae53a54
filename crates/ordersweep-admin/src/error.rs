use thiserror::Error;

#[derive(Debug, Error)]
pub enum AdminError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("rate limited by Admin API (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("resource not found: {url}")]
    NotFound { url: String },

    /// Any other non-2xx response. `detail` is the body's `errors` field when
    /// the API sent one, otherwise the raw body text.
    #[error("Admin API returned {status} for {url}: {detail}")]
    Api {
        status: u16,
        url: String,
        detail: String,
    },

    #[error("pagination limit reached: exceeded {max_pages} pages")]
    PaginationLimit { max_pages: usize },

    #[error("invalid URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },
}

impl AdminError {
    /// HTTP status carried by the error, when it came from a response.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            AdminError::RateLimited { .. } => Some(429),
            AdminError::NotFound { .. } => Some(404),
            AdminError::Api { status, .. } => Some(*status),
            AdminError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
