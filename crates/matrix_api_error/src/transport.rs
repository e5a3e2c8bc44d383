//! Transport error types.

/// A request that never produced an HTTP response.
///
/// Wraps DNS failures, refused connections, TLS problems and timeouts
/// reported by the underlying HTTP client. The send loop surfaces these
/// immediately and never retries them.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display(
    "Transport Error: {} {} failed: {} at line {} in {}",
    method,
    endpoint,
    message,
    line,
    file
)]
pub struct TransportError {
    /// HTTP method of the failed request
    pub method: String,
    /// Endpoint URL of the failed request (without query parameters)
    pub endpoint: String,
    /// The underlying error message
    pub message: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl TransportError {
    /// Create a new TransportError at the current location.
    ///
    /// # Examples
    ///
    /// ```
    /// use matrix_api_error::TransportError;
    ///
    /// let err = TransportError::new("GET", "https://hs/_matrix/client/r0/sync", "Connection refused");
    /// assert_eq!(err.method, "GET");
    /// assert!(err.message.contains("refused"));
    /// ```
    #[track_caller]
    pub fn new(
        method: impl Into<String>,
        endpoint: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        let location = std::panic::Location::caller();
        Self {
            method: method.into(),
            endpoint: endpoint.into(),
            message: message.into(),
            line: location.line(),
            file: location.file(),
        }
    }
}
