//! Protocol-level error types.

/// The homeserver answered with a status outside `[200, 300)` other than 429.
///
/// Carries the status code and the raw response text so callers can inspect
/// the Matrix `errcode` themselves.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Request Error: HTTP {}: {} at line {} in {}", status, content, line, file)]
pub struct RequestError {
    /// HTTP status code
    pub status: u16,
    /// Raw response body
    pub content: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl RequestError {
    /// Create a new RequestError at the current location.
    #[track_caller]
    pub fn new(status: u16, content: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            status,
            content: content.into(),
            line: location.line(),
            file: location.file(),
        }
    }
}
