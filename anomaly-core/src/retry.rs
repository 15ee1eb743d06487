//! Retry loop for outbound weather API calls.
//!
//! Transport failures, non-2xx statuses and bodies flagged by the error predicate
//! are retried after a fixed delay. Decode and URL errors are permanent.

use std::future::Future;
use std::time::Duration;

use serde_json::Value;

use crate::error::FetchError;

pub const DEFAULT_RETRIES: u32 = 3;
pub const DEFAULT_RETRY_DELAY_MS: u64 = 1000;

/// Decides whether a decoded response body signals an upstream error.
pub type ErrorPredicate = fn(&Value) -> bool;

/// Default predicate: the API reports failures as `{"Response": "Error", ...}`.
pub fn response_is_error(body: &Value) -> bool {
    body.get("Response").and_then(Value::as_str) == Some("Error")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Attempts made after the first one.
    pub retries: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retries: DEFAULT_RETRIES,
            delay: Duration::from_millis(DEFAULT_RETRY_DELAY_MS),
        }
    }
}

impl RetryPolicy {
    pub fn new(retries: u32, delay_ms: u64) -> Self {
        Self {
            retries,
            delay: Duration::from_millis(delay_ms),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    Retry,
    NoRetry,
}

impl FetchError {
    pub fn retry_decision(&self) -> RetryDecision {
        match self {
            Self::Transport(_) | Self::Status { .. } | Self::Custom(_) => RetryDecision::Retry,
            Self::Decode(_) | Self::Url(_) => RetryDecision::NoRetry,
        }
    }
}

/// Run `operation` until it succeeds, fails permanently, or the policy is exhausted.
///
/// The error of the last attempt is returned.
pub async fn with_retry<T, F, Fut>(policy: RetryPolicy, mut operation: F) -> Result<T, FetchError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, FetchError>>,
{
    let mut attempt = 0;

    loop {
        match operation().await {
            Ok(v) => {
                if attempt > 0 {
                    tracing::info!(message = "request succeeded after retries", retries = attempt);
                }
                return Ok(v);
            }
            Err(e) if e.retry_decision() == RetryDecision::NoRetry => {
                tracing::debug!(message = "non-retryable error", error = %e);
                return Err(e);
            }
            Err(e) if attempt >= policy.retries => {
                tracing::error!(message = "all retry attempts exhausted", attempts = attempt + 1, error = %e);
                return Err(e);
            }
            Err(e) => {
                attempt += 1;
                tracing::warn!(
                    message = "retryable error",
                    attempt = attempt,
                    retries = policy.retries,
                    error = %e,
                );
                tokio::time::sleep(policy.delay).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.retries, 3);
        assert_eq!(policy.delay, Duration::from_millis(1000));
    }

    #[test]
    fn error_predicate() {
        assert!(response_is_error(&json!({ "Response": "Error", "Message": "bad" })));
        assert!(!response_is_error(&json!({ "Response": "Success" })));
        assert!(!response_is_error(&json!({ "hourly": [] })));
        assert!(!response_is_error(&json!([1, 2, 3])));
    }

    #[tokio::test]
    async fn retries_until_success() {
        let calls = &AtomicU32::new(0);
        let res = with_retry(RetryPolicy::new(3, 0), move || async move {
            if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                Err(FetchError::Custom("Error".into()))
            } else {
                Ok(7)
            }
        })
        .await;

        assert_eq!(res.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn gives_up_after_retries() {
        let calls = &AtomicU32::new(0);
        let res: Result<(), _> = with_retry(RetryPolicy::new(2, 0), move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(FetchError::Custom("Error".into()))
        })
        .await;

        assert!(matches!(res, Err(FetchError::Custom(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn permanent_errors_are_not_retried() {
        let calls = &AtomicU32::new(0);
        let res: Result<(), _> = with_retry(RetryPolicy::new(5, 0), move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(FetchError::Url("cannot be a base".into()))
        })
        .await;

        assert!(matches!(res, Err(FetchError::Url(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
