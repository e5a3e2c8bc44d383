//! Pure request-shaping logic for the Matrix client-server API.
//!
//! Nothing in this crate performs I/O. It turns a caller's
//! [`ApiRequest`] into a fully formed [`RequestDescriptor`] (auth token
//! injected, body serialized), and it decides how long to wait after a
//! 429 with [`RateLimitSignal`]. Both the blocking and the async send loops
//! in `matrix_api_client` are built on top of it.
//!
//! # Examples
//!
//! ```
//! use matrix_api_core::{ApiRequest, ApiSession};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let session = ApiSession::builder()
//!     .base_url("https://matrix.example.org")
//!     .token("1234")
//!     .build()?;
//!
//! let request = session.prepare(&ApiRequest::get("/createRoom"))?;
//! assert_eq!(request.endpoint(), "https://matrix.example.org/_matrix/client/r0/createRoom");
//! assert_eq!(request.body_text(), Some("{}"));
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod method;
mod rate_limit;
mod request;
mod retry;
mod session;

pub use config::MatrixApiConfig;
pub use method::HttpMethod;
pub use rate_limit::RateLimitSignal;
pub use request::{ApiRequest, Content, RequestDescriptor};
pub use retry::RetryPolicy;
pub use session::{ApiSession, ApiSessionBuilder};

/// Versioned client-server API prefix used when a request does not override it.
pub const MATRIX_V2_API_PATH: &str = "/_matrix/client/r0";

/// Wait applied to a 429 whose body carries no usable `retry_after_ms`.
pub const DEFAULT_429_WAIT_MS: u64 = 5000;
