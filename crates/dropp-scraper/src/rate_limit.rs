//! Retry with exponential backoff for the source fetch client.
//!
//! Transient failures (429, network errors, 5xx) are retried; everything else
//! is returned to the caller on the first attempt.

use std::future::Future;
use std::time::Duration;

use crate::error::ScraperError;

/// Upper bound on a single backoff sleep.
const MAX_DELAY_SECS: u64 = 300;

/// Returns `true` if `err` is worth another attempt.
///
/// - [`ScraperError::RateLimited`] and [`ScraperError::Http`] are retried.
/// - [`ScraperError::UnexpectedStatus`] is retried for 5xx only.
/// - [`ScraperError::NotFound`] and [`ScraperError::InvalidUrl`] never are.
fn is_retriable(err: &ScraperError) -> bool {
    match err {
        ScraperError::RateLimited { .. } | ScraperError::Http(_) => true,
        ScraperError::UnexpectedStatus { status, .. } => *status >= 500,
        ScraperError::NotFound { .. } | ScraperError::InvalidUrl { .. } => false,
    }
}

/// Delay before retry number `attempt` (1-based), in milliseconds.
///
/// `backoff_base_secs * 2^(attempt-1)`, raised to `retry_after_secs`, with
/// ±25 % jitter. The jittered value never exceeds [`MAX_DELAY_SECS`].
fn backoff_delay_ms(attempt: u32, backoff_base_secs: u64, retry_after_secs: u64) -> u64 {
    let computed = backoff_base_secs
        .saturating_mul(1u64 << attempt.saturating_sub(1).min(20))
        .max(retry_after_secs)
        .min(MAX_DELAY_SECS);
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    let jittered =
        (computed.saturating_mul(1000) as f64 * (rand::random::<f64>() * 0.5 + 0.75)) as u64;
    jittered.min(MAX_DELAY_SECS * 1000)
}

/// Executes `operation`, retrying transient errors up to `max_retries` times.
///
/// The wait before the n-th retry is `backoff_base_secs * 2^(n-1)` seconds,
/// with ±25 % jitter so items sharing a host do not retry in lockstep, and
/// never longer than five minutes. A `Retry-After` from a 429 raises the
/// wait to at least that many seconds.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_secs: u64,
    mut operation: F,
) -> Result<T, ScraperError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ScraperError>>,
{
    let mut attempt = 0u32;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || attempt >= max_retries {
                    return Err(err);
                }
                attempt += 1;

                let retry_after_secs = match &err {
                    ScraperError::RateLimited {
                        retry_after_secs, ..
                    } => *retry_after_secs,
                    _ => 0,
                };
                let delay_ms = backoff_delay_ms(attempt, backoff_base_secs, retry_after_secs);
                tracing::warn!(
                    attempt,
                    max_retries,
                    delay_ms,
                    error = %err,
                    "transient fetch error, retrying after backoff"
                );
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn rate_limited() -> ScraperError {
        ScraperError::RateLimited {
            domain: "shop.example.com".to_owned(),
            retry_after_secs: 0,
        }
    }

    #[test]
    fn backoff_delay_never_exceeds_cap() {
        for _ in 0..200 {
            assert!(backoff_delay_ms(10, 60, 0) <= MAX_DELAY_SECS * 1000);
            assert!(backoff_delay_ms(1, 0, 10_000) <= MAX_DELAY_SECS * 1000);
        }
    }

    #[test]
    fn backoff_delay_grows_and_honours_retry_after() {
        for _ in 0..200 {
            let first = backoff_delay_ms(1, 4, 0);
            assert!((3_000..=5_000).contains(&first), "first retry {first}");
            let third = backoff_delay_ms(3, 4, 0);
            assert!((12_000..=20_000).contains(&third), "third retry {third}");
            let floored = backoff_delay_ms(1, 1, 40);
            assert!((30_000..=50_000).contains(&floored), "retry-after {floored}");
        }
        assert_eq!(backoff_delay_ms(1, 0, 0), 0);
    }

    #[test]
    fn server_errors_are_retriable_client_errors_are_not() {
        let server = ScraperError::UnexpectedStatus {
            status: 503,
            url: "https://shop.example.com".to_owned(),
        };
        let client = ScraperError::UnexpectedStatus {
            status: 403,
            url: "https://shop.example.com".to_owned(),
        };
        assert!(is_retriable(&server));
        assert!(!is_retriable(&client));
        assert!(is_retriable(&rate_limited()));
        assert!(!is_retriable(&ScraperError::NotFound {
            url: "https://shop.example.com/gone".to_owned()
        }));
    }

    #[tokio::test]
    async fn succeeds_immediately_on_first_try() {
        let call_count = Arc::new(AtomicU32::new(0));
        let cc = Arc::clone(&call_count);
        let result = retry_with_backoff(3, 0, || {
            let cc = Arc::clone(&cc);
            async move {
                cc.fetch_add(1, Ordering::SeqCst);
                Ok::<u32, ScraperError>(42)
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
        let result = retry_with_backoff(3, 0, || {
            let cc = Arc::clone(&cc);
            async move {
                let n = cc.fetch_add(1, Ordering::SeqCst);
                if n < 2 {
                    Err(rate_limited())
                } else {
                    Ok::<u32, ScraperError>(99)
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), 99);
        assert_eq!(call_count.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn propagates_last_error_after_exhausting_retries() {
        let call_count = Arc::new(AtomicU32::new(0));
        let cc = Arc::clone(&call_count);
        let result = retry_with_backoff(2, 0, || {
            let cc = Arc::clone(&cc);
            async move {
                cc.fetch_add(1, Ordering::SeqCst);
                Err::<u32, ScraperError>(rate_limited())
            }
        })
        .await;
        // max_retries=2 → 3 total attempts
        assert_eq!(call_count.load(Ordering::SeqCst), 3);
        assert!(matches!(result, Err(ScraperError::RateLimited { .. })));
    }

    #[tokio::test]
    async fn does_not_retry_not_found() {
        let call_count = Arc::new(AtomicU32::new(0));
        let cc = Arc::clone(&call_count);
        let result = retry_with_backoff(3, 0, || {
            let cc = Arc::clone(&cc);
            async move {
                cc.fetch_add(1, Ordering::SeqCst);
                Err::<u32, ScraperError>(ScraperError::NotFound {
                    url: "https://shop.example.com/api/items/1.json".to_owned(),
                })
            }
        })
        .await;
        assert_eq!(call_count.load(Ordering::SeqCst), 1);
        assert!(matches!(result, Err(ScraperError::NotFound { .. })));
    }
}
