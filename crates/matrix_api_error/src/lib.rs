//! Error types for the matrix_api client runtime.
//!
//! Every failure a call can surface falls into one of a handful of kinds:
//! - [`ConfigError`]: the caller asked for something the client cannot do
//!   (an unsupported HTTP method, a missing session field)
//! - [`TransportError`]: the request never produced an HTTP response
//! - [`RequestError`]: the homeserver answered with a non-2xx, non-429 status
//! - [`JsonError`]: a body could not be serialised or parsed
//! - [`RateLimitError`]: a bounded retry policy ran out of attempts
//!
//! Rate limiting itself is not an error. A 429 is waited out and retried by
//! the send loop and is only visible here when the caller opted into a cap.
//!
//! All structs capture the creating source location with `#[track_caller]`.
//!
//! # Examples
//!
//! ```
//! use matrix_api_error::{MatrixApiResult, RequestError};
//!
//! fn lookup() -> MatrixApiResult<String> {
//!     Err(RequestError::new(404, "{\"errcode\":\"M_NOT_FOUND\"}"))?
//! }
//!
//! let err = lookup().unwrap_err();
//! assert_eq!(err.status(), Some(404));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod json;
mod rate_limit;
mod request;
mod transport;

pub use config::{ConfigError, ConfigErrorKind};
pub use error::{MatrixApiError, MatrixApiErrorKind, MatrixApiResult};
pub use json::JsonError;
pub use rate_limit::RateLimitError;
pub use request::RequestError;
pub use transport::TransportError;
