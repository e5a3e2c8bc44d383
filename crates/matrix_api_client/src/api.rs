//! Suspension-capable send loop.

use crate::attempt::{Outcome, evaluate};
use crate::{ReqwestTransport, Transport};
use matrix_api_core::{ApiRequest, ApiSession};
use matrix_api_error::{MatrixApiError, MatrixApiResult, RateLimitError};
use serde_json::Value as JsonValue;
use std::sync::atomic::{AtomicU32, Ordering};
use tokio_retry2::strategy::FixedInterval;
use tokio_retry2::{Retry, RetryError};
use tracing::{debug, instrument};

/// Async Matrix client-server API client.
///
/// Calls take `&self` and share nothing mutable, so one client can serve
/// any number of concurrent calls (wrap it in an `Arc` to share it across
/// tasks). Each call runs its own attempts strictly in sequence.
///
/// Dropping a call's future cancels it: the in-flight request or the
/// pending rate-limit timer is dropped with it and nothing is left running.
///
/// # Example
///
/// ```no_run
/// use matrix_api_client::AsyncHttpApi;
/// use matrix_api_core::{ApiRequest, ApiSession};
/// use serde_json::json;
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let session = ApiSession::builder()
///     .base_url("https://matrix.example.org")
///     .token("syt_secret")
///     .build()?;
/// let api = AsyncHttpApi::new(session)?;
///
/// let room = api
///     .send(ApiRequest::post("/createRoom").with_json(json!({"name": "Ops"})))
///     .await?;
/// println!("created {}", room["room_id"]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct AsyncHttpApi<T = ReqwestTransport> {
    session: ApiSession,
    transport: T,
}

impl AsyncHttpApi<ReqwestTransport> {
    /// Create a client that talks to the homeserver through reqwest.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialised.
    pub fn new(session: ApiSession) -> MatrixApiResult<Self> {
        let transport = ReqwestTransport::new(*session.validate_cert())?;
        Ok(Self::with_transport(session, transport))
    }
}

impl<T: Transport> AsyncHttpApi<T> {
    /// Create a client over a caller-supplied transport.
    pub fn with_transport(session: ApiSession, transport: T) -> Self {
        debug!(base_url = %session.base_url(), "Creating async Matrix API client");
        Self { session, transport }
    }

    /// Session settings this client was built with.
    pub fn session(&self) -> &ApiSession {
        &self.session
    }

    /// The underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Send a request and return the parsed JSON response.
    ///
    /// Rate-limited responses are waited out and the identical request is
    /// sent again, indefinitely unless the session's retry policy says
    /// otherwise. The wait suspends only this call.
    ///
    /// # Errors
    ///
    /// - configuration error for an unsupported method (nothing is sent)
    /// - transport error when no response arrives (not retried)
    /// - request error for any non-2xx status other than 429 (not retried)
    /// - JSON error when a 429 or 2xx body is not valid JSON
    /// - rate limit error when a bounded retry policy runs out
    #[instrument(skip(self, request), fields(method = %request.method(), path = %request.path()))]
    pub async fn send(&self, request: ApiRequest) -> MatrixApiResult<JsonValue> {
        let descriptor = self.session.prepare(&request)?;

        // The server dictates every wait through `retry_after`; the strategy
        // only bounds how many retries are allowed.
        let limit = self
            .session
            .retry()
            .max_retries
            .map_or(usize::MAX, |max| max as usize);
        let retry_strategy = FixedInterval::from_millis(0).take(limit);

        let attempts = AtomicU32::new(0);
        Retry::spawn(retry_strategy, || async {
            let attempt = attempts.fetch_add(1, Ordering::Relaxed).saturating_add(1);
            debug!(attempt, "Sending request");

            let response = match self.transport.execute(&descriptor).await {
                Ok(response) => response,
                Err(e) => return Err(RetryError::Permanent(MatrixApiError::from(e))),
            };

            match evaluate(&self.session, response, attempt) {
                Ok(Outcome::Done(body)) => Ok(body),
                Ok(Outcome::RetryAfter(wait)) => Err(RetryError::Transient {
                    err: MatrixApiError::from(RateLimitError::new(attempt, wait)),
                    retry_after: Some(wait),
                }),
                Err(e) => Err(RetryError::Permanent(e)),
            }
        })
        .await
    }
}
