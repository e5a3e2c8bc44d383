//! Rate-limit aware HTTP client runtime for the Matrix client-server API.
//!
//! This crate re-exports the pieces most callers need:
//! - [`ApiSession`] and [`MatrixApiConfig`] for connection settings
//! - [`ApiRequest`] to describe a call
//! - [`AsyncHttpApi`] / [`HttpApi`] to send it
//! - the [`MatrixApiError`] taxonomy
//!
//! # Example
//!
//! ```no_run
//! use matrix_api::{ApiRequest, AsyncHttpApi, MatrixApiConfig};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let session = MatrixApiConfig::load()?.into_session()?;
//! let api = AsyncHttpApi::new(session)?;
//! let name = api.get_display_name("@alice:example.org").await?;
//! println!("{}", name);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod logging;

pub use logging::{LoggingConfig, init_logging};

pub use matrix_api_client::{
    AsyncHttpApi, BlockingReqwestTransport, BlockingTransport, HttpApi, ReqwestTransport,
    Transport, TransportResponse,
};
pub use matrix_api_core::{
    ApiRequest, ApiSession, ApiSessionBuilder, Content, DEFAULT_429_WAIT_MS, HttpMethod,
    MATRIX_V2_API_PATH, MatrixApiConfig, RateLimitSignal, RequestDescriptor, RetryPolicy,
};
pub use matrix_api_error::{
    ConfigError, ConfigErrorKind, JsonError, MatrixApiError, MatrixApiErrorKind, MatrixApiResult,
    RateLimitError, RequestError, TransportError,
};
