//! Wait-time resolution for rate-limited (429) responses.
//!
//! Homeservers report how long to back off in `retry_after_ms`, but not
//! always in the same place. The lookup tries, in order:
//! 1. `retry_after_ms` at the top level of the body
//! 2. `retry_after_ms` inside the `error` field, which may be a mapping or a
//!    JSON-encoded string holding one
//! 3. the session's configured default
//!
//! A missing key, a non-numeric value, or an `error` field that is neither a
//! mapping nor parseable JSON simply moves on to the next step. Resolution
//! never fails.

use serde_json::Value as JsonValue;
use std::time::Duration;
use tracing::{debug, instrument};

/// How long the server asked us to wait before retrying.
///
/// Derived from a single 429 body and discarded after the wait.
///
/// # Examples
///
/// ```
/// use matrix_api_core::RateLimitSignal;
/// use serde_json::json;
///
/// let signal = RateLimitSignal::from_response(&json!({"retry_after_ms": 10}), 5000);
/// assert_eq!(signal.wait_secs(), 0.01);
///
/// let signal = RateLimitSignal::from_response(&json!({}), 5000);
/// assert_eq!(signal.wait_secs(), 5.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct RateLimitSignal {
    wait_secs: f64,
}

impl RateLimitSignal {
    /// Resolve the wait from a 429 body, falling back to `default_wait_ms`.
    #[instrument(skip(body))]
    pub fn from_response(body: &JsonValue, default_wait_ms: u64) -> Self {
        let wait_secs = retry_after_secs(body)
            .or_else(|| nested_retry_after_secs(body))
            .unwrap_or_else(|| {
                debug!("No usable retry_after_ms in 429 body, using default wait");
                default_wait_ms as f64 / 1000.0
            });
        Self { wait_secs }
    }

    /// Wait in seconds. Always finite and non-negative.
    pub fn wait_secs(&self) -> f64 {
        self.wait_secs
    }

    /// Wait as a [`Duration`], saturating at [`Duration::MAX`].
    pub fn wait(&self) -> Duration {
        Duration::try_from_secs_f64(self.wait_secs).unwrap_or(Duration::MAX)
    }
}

/// `retry_after_ms` of a JSON object, in seconds.
fn retry_after_secs(value: &JsonValue) -> Option<f64> {
    value
        .get("retry_after_ms")?
        .as_f64()
        .filter(|ms| ms.is_finite() && *ms >= 0.0)
        .map(|ms| ms / 1000.0)
}

/// `retry_after_ms` carried inside the `error` field.
fn nested_retry_after_secs(body: &JsonValue) -> Option<f64> {
    match body.get("error")? {
        JsonValue::String(encoded) => {
            let decoded: JsonValue = serde_json::from_str(encoded).ok()?;
            retry_after_secs(&decoded)
        }
        nested @ JsonValue::Object(_) => retry_after_secs(nested),
        _ => None,
    }
}
