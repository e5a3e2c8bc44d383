//! The seam between the send loops and an HTTP client.

use async_trait::async_trait;
use matrix_api_core::RequestDescriptor;
use matrix_api_error::{JsonError, TransportError};
use serde_json::Value as JsonValue;

/// Status and body of one HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTP status code
    pub status: u16,
    /// Raw response body
    pub body: String,
}

impl TransportResponse {
    /// Create a response.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// True for statuses in `[200, 300)`.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// True for 429 Too Many Requests.
    pub fn is_rate_limited(&self) -> bool {
        self.status == 429
    }

    /// Parse the body as JSON.
    #[track_caller]
    pub fn json(&self) -> Result<JsonValue, JsonError> {
        serde_json::from_str(&self.body).map_err(|e| JsonError::in_response(self.status, e))
    }
}

/// An HTTP client the async send loop can drive.
///
/// Implementations must be usable from many concurrent calls at once and
/// must send the descriptor exactly as given: method, endpoint, query
/// parameters, headers and body bytes. A request that yields no HTTP
/// response at all is reported as a [`TransportError`]; any status,
/// including errors, is a successful exchange at this level.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform one request/response exchange.
    async fn execute(&self, request: &RequestDescriptor) -> Result<TransportResponse, TransportError>;
}

/// Blocking counterpart of [`Transport`].
pub trait BlockingTransport: Send + Sync {
    /// Perform one request/response exchange, blocking the calling thread.
    fn execute(&self, request: &RequestDescriptor) -> Result<TransportResponse, TransportError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    async fn execute(&self, request: &RequestDescriptor) -> Result<TransportResponse, TransportError> {
        (**self).execute(request).await
    }
}

impl<T: BlockingTransport + ?Sized> BlockingTransport for std::sync::Arc<T> {
    fn execute(&self, request: &RequestDescriptor) -> Result<TransportResponse, TransportError> {
        (**self).execute(request)
    }
}
