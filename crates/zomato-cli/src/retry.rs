//! Caller-side retry policy for scraper calls.
//!
//! The scraper library never retries. The CLI wraps individual calls here:
//! transient errors ([`ScraperError::is_transient`]) are retried with
//! exponential backoff, everything else is returned immediately. Retrying
//! `next_page` is safe because a failed call does not advance the cursor.

use std::future::Future;
use std::time::Duration;

use zomato_core::AppConfig;
use zomato_scraper::{RestaurantRecord, ScraperError, SessionContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RetryPolicy {
    /// Additional attempts after the first failure.
    pub max_retries: u32,
    /// Wait before retry `n` (0-based) is `backoff_base_secs * 2^n`.
    pub backoff_base_secs: u64,
}

impl RetryPolicy {
    pub(crate) fn from_config(config: &AppConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            backoff_base_secs: config.retry_backoff_base_secs,
        }
    }

    /// Delay before the next attempt, or `None` when `err` should be returned.
    pub(crate) fn backoff(&self, attempt: u32, err: &ScraperError) -> Option<Duration> {
        if !err.is_transient() || attempt >= self.max_retries {
            return None;
        }
        let delay_secs = self
            .backoff_base_secs
            .saturating_mul(1u64 << attempt.min(62));
        Some(Duration::from_secs(delay_secs))
    }
}

/// Runs `operation`, retrying transient failures according to `policy`.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    policy: RetryPolicy,
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
                let Some(delay) = policy.backoff(attempt, &err) else {
                    return Err(err);
                };
                tracing::warn!(
                    attempt,
                    max_retries = policy.max_retries,
                    delay_secs = delay.as_secs(),
                    error = %err,
                    "transient scraper error; retrying after backoff"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}

/// [`SessionContext::next_page`] with retries.
///
/// Written as an explicit loop because the call needs `&mut` access to the
/// session on every attempt.
pub(crate) async fn next_page_with_retry(
    session: &mut SessionContext,
    policy: RetryPolicy,
) -> Result<Vec<RestaurantRecord>, ScraperError> {
    let mut attempt = 0u32;
    loop {
        match session.next_page().await {
            Ok(page) => return Ok(page),
            Err(err) => {
                let Some(delay) = policy.backoff(attempt, &err) else {
                    return Err(err);
                };
                tracing::warn!(
                    attempt,
                    page = session.page_number() + 1,
                    delay_secs = delay.as_secs(),
                    error = %err,
                    "listing page failed; retrying same cursor after backoff"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    use zomato_scraper::FetchFailure;

    const NO_WAIT: RetryPolicy = RetryPolicy {
        max_retries: 3,
        backoff_base_secs: 0,
    };

    fn unavailable() -> ScraperError {
        ScraperError::MenuFetch {
            url: "https://example.com/r/order".to_owned(),
            cause: FetchFailure::Status(503),
        }
    }

    #[test]
    fn backoff_doubles_per_attempt() {
        let policy = RetryPolicy {
            max_retries: 3,
            backoff_base_secs: 2,
        };
        let err = unavailable();
        assert_eq!(policy.backoff(0, &err), Some(Duration::from_secs(2)));
        assert_eq!(policy.backoff(1, &err), Some(Duration::from_secs(4)));
        assert_eq!(policy.backoff(2, &err), Some(Duration::from_secs(8)));
        assert_eq!(policy.backoff(3, &err), None);
    }

    #[test]
    fn backoff_refuses_permanent_errors() {
        let err = ScraperError::InvalidRestaurantRecord {
            reason: "no link".to_owned(),
        };
        assert_eq!(NO_WAIT.backoff(0, &err), None);
    }

    #[tokio::test]
    async fn succeeds_immediately_on_first_try() {
        let call_count = Arc::new(AtomicU32::new(0));
        let cc = Arc::clone(&call_count);
        let result = retry_with_backoff(NO_WAIT, || {
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
    async fn retries_transient_error_then_succeeds() {
        let call_count = Arc::new(AtomicU32::new(0));
        let cc = Arc::clone(&call_count);
        let result = retry_with_backoff(NO_WAIT, || {
            let cc = Arc::clone(&cc);
            async move {
                let n = cc.fetch_add(1, Ordering::SeqCst);
                if n < 2 {
                    Err(unavailable())
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
        let policy = RetryPolicy {
            max_retries: 2,
            backoff_base_secs: 0,
        };
        let result = retry_with_backoff(policy, || {
            let cc = Arc::clone(&cc);
            async move {
                cc.fetch_add(1, Ordering::SeqCst);
                Err::<u32, ScraperError>(unavailable())
            }
        })
        .await;
        // max_retries=2 → 3 total attempts
        assert_eq!(call_count.load(Ordering::SeqCst), 3);
        assert!(matches!(result, Err(ScraperError::MenuFetch { .. })));
    }

    #[tokio::test]
    async fn does_not_retry_parse_errors() {
        let call_count = Arc::new(AtomicU32::new(0));
        let cc = Arc::clone(&call_count);
        let result = retry_with_backoff(NO_WAIT, || {
            let cc = Arc::clone(&cc);
            async move {
                cc.fetch_add(1, Ordering::SeqCst);
                Err::<u32, ScraperError>(ScraperError::MenuParse {
                    url: "https://example.com/r/order".to_owned(),
                    reason: "marker not found".to_owned(),
                })
            }
        })
        .await;
        assert_eq!(call_count.load(Ordering::SeqCst), 1);
        assert!(matches!(result, Err(ScraperError::MenuParse { .. })));
    }
}
