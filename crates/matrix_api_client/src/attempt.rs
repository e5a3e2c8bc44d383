//! What one attempt of a call means for the send loop.
//!
//! Both send loops feed every transport response through [`evaluate`] and
//! only differ in how they wait.

use crate::TransportResponse;
use matrix_api_core::ApiSession;
use matrix_api_error::{MatrixApiResult, RateLimitError, RequestError};
use serde_json::Value as JsonValue;
use std::time::Duration;
use tracing::{error, warn};

/// Next step after a response arrived.
#[derive(Debug)]
pub(crate) enum Outcome {
    /// 2xx: the call is done
    Done(JsonValue),
    /// 429: wait this long, then resend the identical request
    RetryAfter(Duration),
}

/// Classify a response for a call that has now made `attempts` requests.
///
/// - 429: the body must be JSON; the wait comes from the rate-limit policy,
///   unless the retry policy is exhausted
/// - any other status outside `[200, 300)`: protocol error, no retry
/// - otherwise the parsed body
pub(crate) fn evaluate(
    session: &ApiSession,
    response: TransportResponse,
    attempts: u32,
) -> MatrixApiResult<Outcome> {
    if response.is_rate_limited() {
        let body = response.json()?;
        let wait = session.rate_limit_wait(&body);
        if !session.retry().allows_retry(attempts) {
            error!(attempts, wait_ms = wait.as_millis() as u64, "Rate limit retries exhausted");
            return Err(RateLimitError::new(attempts, wait).into());
        }
        warn!(attempts, wait_ms = wait.as_millis() as u64, "Rate limited, waiting before retry");
        return Ok(Outcome::RetryAfter(wait));
    }

    if !response.is_success() {
        error!(status = response.status, body = %response.body, "Homeserver returned error");
        return Err(RequestError::new(response.status, response.body).into());
    }

    Ok(Outcome::Done(response.json()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use matrix_api_core::RetryPolicy;
    use matrix_api_error::MatrixApiErrorKind;
    use serde_json::json;

    fn session(retry: RetryPolicy) -> ApiSession {
        ApiSession::builder()
            .base_url("https://matrix.example.org")
            .token("1234")
            .retry(retry)
            .build()
            .unwrap()
    }

    #[test]
    fn test_success_returns_body() {
        let outcome = evaluate(
            &session(RetryPolicy::default()),
            TransportResponse::new(200, r#"{"room_id":"!a:b"}"#),
            1,
        )
        .unwrap();
        match outcome {
            Outcome::Done(body) => assert_eq!(body, json!({"room_id": "!a:b"})),
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_rate_limited_returns_wait() {
        let outcome = evaluate(
            &session(RetryPolicy::default()),
            TransportResponse::new(429, r#"{"retry_after_ms": 10}"#),
            1,
        )
        .unwrap();
        match outcome {
            Outcome::RetryAfter(wait) => assert_eq!(wait, Duration::from_millis(10)),
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_rate_limited_body_must_be_json() {
        let err = evaluate(
            &session(RetryPolicy::default()),
            TransportResponse::new(429, "Too Many Requests"),
            1,
        )
        .unwrap_err();
        assert!(matches!(err.kind(), MatrixApiErrorKind::Json(_)));
    }

    #[test]
    fn test_exhausted_retry_policy() {
        let err = evaluate(
            &session(RetryPolicy::bounded(1)),
            TransportResponse::new(429, r#"{"retry_after_ms": 10}"#),
            2,
        )
        .unwrap_err();
        match err.kind() {
            MatrixApiErrorKind::RateLimit(e) => {
                assert_eq!(e.attempts, 2);
                assert_eq!(e.last_wait, Duration::from_millis(10));
            }
            other => panic!("unexpected error kind: {:?}", other),
        }
    }

    #[test]
    fn test_non_success_is_protocol_error() {
        for status in [199, 300, 400, 401, 403, 404, 500, 503] {
            let err = evaluate(
                &session(RetryPolicy::default()),
                TransportResponse::new(status, "hello"),
                1,
            )
            .unwrap_err();
            assert!(err.is_protocol());
            assert_eq!(err.status(), Some(status));
        }
    }

    #[test]
    fn test_success_body_must_be_json() {
        let err = evaluate(
            &session(RetryPolicy::default()),
            TransportResponse::new(200, "<html>"),
            1,
        )
        .unwrap_err();
        assert!(matches!(err.kind(), MatrixApiErrorKind::Json(_)));
    }
}
