//! Blocking send loop.

use crate::attempt::{Outcome, evaluate};
use crate::{BlockingReqwestTransport, BlockingTransport};
use matrix_api_core::{ApiRequest, ApiSession};
use matrix_api_error::MatrixApiResult;
use serde_json::Value as JsonValue;
use tracing::{debug, instrument};

/// Blocking Matrix client-server API client.
///
/// Same request shaping, rate-limit handling and error classification as
/// [`AsyncHttpApi`](crate::AsyncHttpApi), but rate-limit waits and network
/// I/O block the calling thread.
#[derive(Debug, Clone)]
pub struct HttpApi<T = BlockingReqwestTransport> {
    session: ApiSession,
    transport: T,
}

impl HttpApi<BlockingReqwestTransport> {
    /// Create a client that talks to the homeserver through reqwest.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialised.
    pub fn new(session: ApiSession) -> MatrixApiResult<Self> {
        let transport = BlockingReqwestTransport::new(*session.validate_cert())?;
        Ok(Self::with_transport(session, transport))
    }
}

impl<T: BlockingTransport> HttpApi<T> {
    /// Create a client over a caller-supplied transport.
    pub fn with_transport(session: ApiSession, transport: T) -> Self {
        debug!(base_url = %session.base_url(), "Creating blocking Matrix API client");
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
    /// See [`AsyncHttpApi::send`](crate::AsyncHttpApi::send) for the retry
    /// and error semantics.
    #[instrument(skip(self, request), fields(method = %request.method(), path = %request.path()))]
    pub fn send(&self, request: ApiRequest) -> MatrixApiResult<JsonValue> {
        let descriptor = self.session.prepare(&request)?;

        let mut attempts = 0u32;
        loop {
            attempts = attempts.saturating_add(1);
            debug!(attempts, "Sending request");
            let response = self.transport.execute(&descriptor)?;

            match evaluate(&self.session, response, attempts)? {
                Outcome::Done(body) => return Ok(body),
                Outcome::RetryAfter(wait) => std::thread::sleep(wait),
            }
        }
    }
}
