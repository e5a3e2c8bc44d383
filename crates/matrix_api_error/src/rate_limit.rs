//! Rate limit exhaustion.

use std::time::Duration;

/// Sustained rate limiting outlasted a bounded retry policy.
///
/// Only produced when the session's retry policy sets a maximum retry count.
/// With the default unbounded policy a 429 is retried until it clears.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display(
    "Rate Limit Error: still rate limited after {} attempts (last wait {:?}) at line {} in {}",
    attempts,
    last_wait,
    line,
    file
)]
pub struct RateLimitError {
    /// Number of requests issued, all answered with 429
    pub attempts: u32,
    /// Wait the server asked for on the final 429
    pub last_wait: Duration,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl RateLimitError {
    /// Create a new RateLimitError at the current location.
    #[track_caller]
    pub fn new(attempts: u32, last_wait: Duration) -> Self {
        let location = std::panic::Location::caller();
        Self {
            attempts,
            last_wait,
            line: location.line(),
            file: location.file(),
        }
    }
}
