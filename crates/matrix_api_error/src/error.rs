//! Top-level error wrapper types.

use crate::{ConfigError, JsonError, RateLimitError, RequestError, TransportError};

/// Every failure kind a matrix_api call can surface.
///
/// # Examples
///
/// ```
/// use matrix_api_error::{MatrixApiError, TransportError};
///
/// let err: MatrixApiError = TransportError::new("GET", "https://hs", "timed out").into();
/// assert!(err.is_transport());
/// assert!(format!("{}", err).contains("Transport Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum MatrixApiErrorKind {
    /// Invalid request shape or session configuration
    #[from(ConfigError)]
    Config(ConfigError),
    /// Network-level failure
    #[from(TransportError)]
    Transport(TransportError),
    /// Non-2xx, non-429 response
    #[from(RequestError)]
    Request(RequestError),
    /// JSON serialization/deserialization error
    #[from(JsonError)]
    Json(JsonError),
    /// Bounded retry policy exhausted
    #[from(RateLimitError)]
    RateLimit(RateLimitError),
}

/// matrix_api error with kind discrimination.
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Matrix API Error: {}", _0)]
pub struct MatrixApiError(Box<MatrixApiErrorKind>);

impl MatrixApiError {
    /// Create a new error from a kind.
    pub fn new(kind: MatrixApiErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &MatrixApiErrorKind {
        &self.0
    }

    /// HTTP status of a protocol error, if this is one.
    pub fn status(&self) -> Option<u16> {
        match self.kind() {
            MatrixApiErrorKind::Request(e) => Some(e.status),
            _ => None,
        }
    }

    /// True for network-level failures.
    pub fn is_transport(&self) -> bool {
        matches!(self.kind(), MatrixApiErrorKind::Transport(_))
    }

    /// True for non-2xx responses from the homeserver.
    pub fn is_protocol(&self) -> bool {
        matches!(self.kind(), MatrixApiErrorKind::Request(_))
    }

    /// True for caller mistakes caught before any I/O.
    pub fn is_configuration(&self) -> bool {
        matches!(self.kind(), MatrixApiErrorKind::Config(_))
    }
}

// Generic From implementation for any type that converts to MatrixApiErrorKind
impl<T> From<T> for MatrixApiError
where
    T: Into<MatrixApiErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for matrix_api operations.
pub type MatrixApiResult<T> = std::result::Result<T, MatrixApiError>;
