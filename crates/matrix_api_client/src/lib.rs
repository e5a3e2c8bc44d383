//! Send loops for the Matrix client-server API.
//!
//! Two clients share the pure request shaping and rate-limit policy from
//! `matrix_api_core`:
//! - [`AsyncHttpApi`] suspends on network I/O and on rate-limit waits, so
//!   many calls can be in flight on one runtime thread
//! - [`HttpApi`] blocks the calling thread instead
//!
//! Both retry a 429 after the wait the server asks for, surface transport
//! failures and other non-2xx statuses immediately, and return the parsed
//! JSON body on success. The HTTP client itself sits behind the
//! [`Transport`] / [`BlockingTransport`] traits; reqwest implementations
//! are provided.
//!
//! # Example
//!
//! ```no_run
//! use matrix_api_client::AsyncHttpApi;
//! use matrix_api_core::{ApiRequest, ApiSession};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let session = ApiSession::builder()
//!     .base_url("https://matrix.example.org")
//!     .token("syt_secret")
//!     .build()?;
//! let api = AsyncHttpApi::new(session)?;
//!
//! let whoami = api.send(ApiRequest::get("/account/whoami")).await?;
//! println!("{}", whoami["user_id"]);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod api;
mod attempt;
mod blocking;
mod endpoints;
mod reqwest_transport;
mod transport;

pub use api::AsyncHttpApi;
pub use blocking::HttpApi;
pub use reqwest_transport::{BlockingReqwestTransport, ReqwestTransport};
pub use transport::{BlockingTransport, Transport, TransportResponse};
