//! Status mapping and body decoding for Admin API responses.

use reqwest::{Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::AdminError;

/// Used when a 429 carries no parseable `Retry-After` header. Admin API
/// leaky buckets refill at two calls per second, so a short pause suffices.
const DEFAULT_RETRY_AFTER_SECS: u64 = 2;

/// Maps a non-2xx status to a typed error; on success returns the body text
/// and the `Link` header.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(super) async fn check(
    response: Response,
    url: &Url,
) -> Result<(String, Option<String>), AdminError> {
    let status = response.status();

    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after_secs = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.trim().parse::<f64>().ok())
            .filter(|secs| secs.is_finite() && *secs >= 0.0)
            .map_or(DEFAULT_RETRY_AFTER_SECS, |secs| secs.ceil() as u64);
        return Err(AdminError::RateLimited { retry_after_secs });
    }

    if status == StatusCode::NOT_FOUND {
        return Err(AdminError::NotFound {
            url: url.to_string(),
        });
    }

    // Extract the Link header before consuming the response body.
    let link_header = response
        .headers()
        .get(reqwest::header::LINK)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);

    let body = response.text().await?;

    if !status.is_success() {
        return Err(AdminError::Api {
            status: status.as_u16(),
            url: url.to_string(),
            detail: error_detail(&body),
        });
    }

    Ok((body, link_header))
}

pub(super) fn decode<T: DeserializeOwned>(body: &str, context: &str) -> Result<T, AdminError> {
    serde_json::from_str(body).map_err(|source| AdminError::Deserialize {
        context: context.to_owned(),
        source,
    })
}

/// The `errors` member of an error body rendered as compact JSON (or as-is
/// when it is a plain string); the trimmed raw body otherwise.
fn error_detail(body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(mut map)) => match map.remove("errors") {
            Some(Value::String(s)) => s,
            Some(other) => other.to_string(),
            None => body.trim().to_owned(),
        },
        _ => body.trim().to_owned(),
    }
}
