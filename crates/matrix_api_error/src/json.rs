//! JSON encoding and decoding failures.

/// A request body could not be serialised or a response body could not be
/// parsed.
///
/// `status` is set when the body came from a homeserver response, so a
/// 429 with an HTML body can be told apart from a bad request body.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("JSON Error: {} at line {} in {}", message, line, file)]
pub struct JsonError {
    /// What went wrong
    pub message: String,
    /// HTTP status of the response whose body failed to parse
    pub status: Option<u16>,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl JsonError {
    /// Create a JsonError not tied to any response.
    ///
    /// # Examples
    ///
    /// ```
    /// use matrix_api_error::JsonError;
    ///
    /// let err = JsonError::new("Failed to serialize request body");
    /// assert_eq!(err.status, None);
    /// ```
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message: message.into(),
            status: None,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Create a JsonError for a response body that did not parse.
    ///
    /// # Examples
    ///
    /// ```
    /// use matrix_api_error::JsonError;
    ///
    /// let err = JsonError::in_response(429, "expected value at line 1 column 1");
    /// assert_eq!(err.status, Some(429));
    /// assert!(err.to_string().contains("HTTP 429"));
    /// ```
    #[track_caller]
    pub fn in_response(status: u16, message: impl std::fmt::Display) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message: format!("Failed to parse HTTP {} response body: {}", status, message),
            status: Some(status),
            line: location.line(),
            file: location.file(),
        }
    }
}
