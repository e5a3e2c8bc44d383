//! Bounds on the rate-limit retry loop.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How far the send loop goes when the server keeps answering 429.
///
/// The default is unbounded: every 429 is waited out and retried until a
/// different status arrives. Set `max_retries` to give up with a
/// `RateLimitError` instead, and `max_wait_ms` to clamp any single wait
/// the server asks for.
///
/// # Examples
///
/// ```
/// use matrix_api_core::RetryPolicy;
/// use std::time::Duration;
///
/// let policy = RetryPolicy::default();
/// assert!(policy.allows_retry(1_000_000));
///
/// let bounded = RetryPolicy::bounded(2).with_max_wait_ms(1000);
/// assert!(bounded.allows_retry(2));
/// assert!(!bounded.allows_retry(3));
/// assert_eq!(bounded.cap(Duration::from_secs(30)), Duration::from_secs(1));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Retries allowed after the first attempt (`None` = unbounded)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_retries: Option<u32>,

    /// Upper bound for a single rate-limit wait, in milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_wait_ms: Option<u64>,
}

impl RetryPolicy {
    /// Unbounded retries, uncapped waits.
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Give up after `max_retries` retries.
    pub fn bounded(max_retries: u32) -> Self {
        Self {
            max_retries: Some(max_retries),
            max_wait_ms: None,
        }
    }

    /// Clamp every wait to at most `max_wait_ms`.
    pub fn with_max_wait_ms(mut self, max_wait_ms: u64) -> Self {
        self.max_wait_ms = Some(max_wait_ms);
        self
    }

    /// Whether a call that has already been rate limited `attempts` times
    /// may try again.
    pub fn allows_retry(&self, attempts: u32) -> bool {
        self.max_retries.is_none_or(|max| attempts <= max)
    }

    /// Apply `max_wait_ms` to a computed wait.
    pub fn cap(&self, wait: Duration) -> Duration {
        match self.max_wait_ms {
            Some(max) => wait.min(Duration::from_millis(max)),
            None => wait,
        }
    }
}
