//! Bounded retry with exponential backoff for Admin API calls.
//!
//! Only transient conditions are retried. With the default configuration
//! (`max_retries = 0`) every call is attempted exactly once and failures go
//! straight back to the caller.

use std::future::Future;
use std::time::Duration;

use reqwest::Method;

use crate::error::AdminError;

/// Which failures a call may be retried on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RetryPolicy {
    /// 429, transport errors, and 5xx. For requests that can be repeated
    /// without side effects.
    Transient,
    /// 429 only. A 5xx or a dropped connection may come after the store has
    /// already created the refund or order, so resending could duplicate it.
    RateLimitOnly,
}

impl RetryPolicy {
    /// `POST` creates resources on this API; `GET` and `PUT` are safe to repeat.
    pub(crate) fn for_method(method: &Method) -> Self {
        if *method == Method::POST {
            Self::RateLimitOnly
        } else {
            Self::Transient
        }
    }

    /// Returns `true` if `err` should be retried after a backoff delay.
    ///
    /// Everything outside the policy (404, 4xx validation errors, bad JSON)
    /// is returned immediately.
    fn allows(self, err: &AdminError) -> bool {
        match (self, err) {
            (_, AdminError::RateLimited { .. })
            | (Self::Transient, AdminError::Http(_)) => true,
            (Self::Transient, AdminError::Api { status, .. }) => *status >= 500,
            _ => false,
        }
    }
}

/// Seconds to wait before the retry that follows attempt number `attempt`.
///
/// `backoff_base_secs * 2^attempt`, but never shorter than the server's
/// `Retry-After` hint on a 429.
fn delay_secs(err: &AdminError, attempt: u32, backoff_base_secs: u64) -> u64 {
    let backoff = backoff_base_secs.saturating_mul(1u64 << attempt.min(62));
    match err {
        AdminError::RateLimited { retry_after_secs } => backoff.max(*retry_after_secs),
        _ => backoff,
    }
}

/// Executes `operation`, retrying failures that `policy` allows up to
/// `max_retries` additional times. With `max_retries = 3` the operation runs
/// at most 4 times.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_secs: u64,
    policy: RetryPolicy,
    mut operation: F,
) -> Result<T, AdminError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, AdminError>>,
{
    let mut attempt = 0u32;

    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };

        if !policy.allows(&err) || attempt >= max_retries {
            return Err(err);
        }

        let delay = delay_secs(&err, attempt, backoff_base_secs);
        tracing::warn!(
            attempt,
            max_retries,
            delay_secs = delay,
            error = %err,
            "transient Admin API error, retrying after backoff"
        );
        tokio::time::sleep(Duration::from_secs(delay)).await;
        attempt += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn rate_limited(retry_after_secs: u64) -> AdminError {
        AdminError::RateLimited { retry_after_secs }
    }

    fn api(status: u16) -> AdminError {
        AdminError::Api {
            status,
            url: "https://example.myshopify.com/admin/api/2023-01/orders.json".to_owned(),
            detail: "boom".to_owned(),
        }
    }

    #[tokio::test]
    async fn succeeds_immediately_on_first_try() {
        let call_count = Arc::new(AtomicU32::new(0));
        let cc = Arc::clone(&call_count);
        let result = retry_with_backoff(3, 0, RetryPolicy::Transient, || {
            let cc = Arc::clone(&cc);
            async move {
                cc.fetch_add(1, Ordering::SeqCst);
                Ok::<u32, AdminError>(42)
            }
        })
        .await;
        assert_eq!(result.unwrap(), 42);
        assert_eq!(call_count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retries_on_rate_limited_then_succeeds() {
        let call_count = Arc::new(AtomicU32::new(0));
        let cc = Arc::clone(&call_count);
        let result = retry_with_backoff(3, 0, RetryPolicy::Transient, || {
            let cc = Arc::clone(&cc);
            async move {
                let n = cc.fetch_add(1, Ordering::SeqCst);
                if n < 2 {
                    Err(rate_limited(0))
                } else {
                    Ok::<u32, AdminError>(99)
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), 99);
        assert_eq!(call_count.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn zero_retries_means_single_attempt() {
        let call_count = Arc::new(AtomicU32::new(0));
        let cc = Arc::clone(&call_count);
        let result = retry_with_backoff(0, 0, RetryPolicy::Transient, || {
            let cc = Arc::clone(&cc);
            async move {
                cc.fetch_add(1, Ordering::SeqCst);
                Err::<u32, AdminError>(rate_limited(0))
            }
        })
        .await;
        assert_eq!(call_count.load(Ordering::SeqCst), 1);
        assert!(matches!(result, Err(AdminError::RateLimited { .. })));
    }

    #[tokio::test]
    async fn propagates_last_error_after_exhausting_retries() {
        let call_count = Arc::new(AtomicU32::new(0));
        let cc = Arc::clone(&call_count);
        let result = retry_with_backoff(2, 0, RetryPolicy::Transient, || {
            let cc = Arc::clone(&cc);
            async move {
                cc.fetch_add(1, Ordering::SeqCst);
                Err::<u32, AdminError>(api(502))
            }
        })
        .await;
        assert_eq!(call_count.load(Ordering::SeqCst), 3);
        assert!(matches!(result, Err(AdminError::Api { status: 502, .. })));
    }

    #[tokio::test]
    async fn does_not_retry_client_errors() {
        let call_count = Arc::new(AtomicU32::new(0));
        let cc = Arc::clone(&call_count);
        let result = retry_with_backoff(3, 0, RetryPolicy::Transient, || {
            let cc = Arc::clone(&cc);
            async move {
                cc.fetch_add(1, Ordering::SeqCst);
                Err::<u32, AdminError>(api(422))
            }
        })
        .await;
        assert_eq!(call_count.load(Ordering::SeqCst), 1);
        assert!(matches!(result, Err(AdminError::Api { status: 422, .. })));
    }

    #[tokio::test]
    async fn does_not_retry_not_found() {
        let call_count = Arc::new(AtomicU32::new(0));
        let cc = Arc::clone(&call_count);
        let result = retry_with_backoff(3, 0, RetryPolicy::Transient, || {
            let cc = Arc::clone(&cc);
            async move {
                cc.fetch_add(1, Ordering::SeqCst);
                Err::<u32, AdminError>(AdminError::NotFound {
                    url: "https://example.myshopify.com/orders/1.json".to_owned(),
                })
            }
        })
        .await;
        assert_eq!(call_count.load(Ordering::SeqCst), 1);
        assert!(matches!(result, Err(AdminError::NotFound { .. })));
    }

    #[tokio::test]
    async fn rate_limit_only_does_not_retry_server_errors() {
        let call_count = Arc::new(AtomicU32::new(0));
        let cc = Arc::clone(&call_count);
        let result = retry_with_backoff(3, 0, RetryPolicy::RateLimitOnly, || {
            let cc = Arc::clone(&cc);
            async move {
                cc.fetch_add(1, Ordering::SeqCst);
                Err::<u32, AdminError>(api(502))
            }
        })
        .await;
        assert_eq!(call_count.load(Ordering::SeqCst), 1);
        assert!(matches!(result, Err(AdminError::Api { status: 502, .. })));
    }

    #[tokio::test]
    async fn rate_limit_only_still_retries_429() {
        let call_count = Arc::new(AtomicU32::new(0));
        let cc = Arc::clone(&call_count);
        let result = retry_with_backoff(3, 0, RetryPolicy::RateLimitOnly, || {
            let cc = Arc::clone(&cc);
            async move {
                if cc.fetch_add(1, Ordering::SeqCst) == 0 {
                    Err(rate_limited(0))
                } else {
                    Ok::<u32, AdminError>(7)
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), 7);
        assert_eq!(call_count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn only_post_is_limited_to_429_retries() {
        assert_eq!(RetryPolicy::for_method(&Method::POST), RetryPolicy::RateLimitOnly);
        assert_eq!(RetryPolicy::for_method(&Method::GET), RetryPolicy::Transient);
        assert_eq!(RetryPolicy::for_method(&Method::PUT), RetryPolicy::Transient);
    }

    #[test]
    fn delay_honours_retry_after_floor() {
        assert_eq!(delay_secs(&rate_limited(10), 0, 2), 10);
        assert_eq!(delay_secs(&rate_limited(1), 2, 2), 8);
        assert_eq!(delay_secs(&api(503), 1, 3), 6);
    }
}
