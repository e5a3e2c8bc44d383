//! reqwest-backed transports.

use crate::{BlockingTransport, Transport, TransportResponse};
use async_trait::async_trait;
use matrix_api_core::{HttpMethod, RequestDescriptor};
use matrix_api_error::{ConfigError, ConfigErrorKind, TransportError};
use reqwest::Method;
use tracing::{debug, error, instrument};

fn to_reqwest_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Delete => Method::DELETE,
        HttpMethod::Post => Method::POST,
    }
}

#[track_caller]
fn transport_error(request: &RequestDescriptor, err: reqwest::Error) -> TransportError {
    TransportError::new(
        request.method().to_string(),
        request.endpoint().clone(),
        err.to_string(),
    )
}

/// Async transport over a shared [`reqwest::Client`].
///
/// The client pools connections and is safe to use from many calls at once.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Create a transport, optionally skipping TLS certificate verification.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialised.
    pub fn new(validate_cert: bool) -> Result<Self, ConfigError> {
        let client = reqwest::Client::builder()
            .danger_accept_invalid_certs(!validate_cert)
            .build()
            .map_err(|e| {
                ConfigError::new(ConfigErrorKind::InvalidValue {
                    field: "transport".to_string(),
                    reason: e.to_string(),
                })
            })?;
        Ok(Self { client })
    }

    /// Wrap an existing client (timeouts, proxies and the like are its concern).
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    #[instrument(skip(self, request), fields(method = %request.method(), endpoint = %request.endpoint()))]
    async fn execute(&self, request: &RequestDescriptor) -> Result<TransportResponse, TransportError> {
        let mut builder = self
            .client
            .request(to_reqwest_method(*request.method()), request.endpoint())
            .query(request.query_params())
            .body(request.body().clone());
        for (name, value) in request.headers() {
            builder = builder.header(name, value);
        }

        let response = builder.send().await.map_err(|e| {
            error!(error = %e, "Request failed before a response arrived");
            transport_error(request, e)
        })?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| {
            error!(error = %e, status, "Failed to read response body");
            transport_error(request, e)
        })?;

        debug!(status, body_len = body.len(), "Received response");
        Ok(TransportResponse { status, body })
    }
}

/// Blocking transport over [`reqwest::blocking::Client`].
///
/// Must not be created or used from inside an async runtime.
#[derive(Debug, Clone)]
pub struct BlockingReqwestTransport {
    client: reqwest::blocking::Client,
}

impl BlockingReqwestTransport {
    /// Create a transport, optionally skipping TLS certificate verification.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialised.
    pub fn new(validate_cert: bool) -> Result<Self, ConfigError> {
        let client = reqwest::blocking::Client::builder()
            .danger_accept_invalid_certs(!validate_cert)
            .build()
            .map_err(|e| {
                ConfigError::new(ConfigErrorKind::InvalidValue {
                    field: "transport".to_string(),
                    reason: e.to_string(),
                })
            })?;
        Ok(Self { client })
    }

    /// Wrap an existing blocking client.
    pub fn from_client(client: reqwest::blocking::Client) -> Self {
        Self { client }
    }
}

impl BlockingTransport for BlockingReqwestTransport {
    #[instrument(skip(self, request), fields(method = %request.method(), endpoint = %request.endpoint()))]
    fn execute(&self, request: &RequestDescriptor) -> Result<TransportResponse, TransportError> {
        let mut builder = self
            .client
            .request(to_reqwest_method(*request.method()), request.endpoint())
            .query(request.query_params())
            .body(request.body().clone());
        for (name, value) in request.headers() {
            builder = builder.header(name, value);
        }

        let response = builder.send().map_err(|e| {
            error!(error = %e, "Request failed before a response arrived");
            transport_error(request, e)
        })?;

        let status = response.status().as_u16();
        let body = response.text().map_err(|e| {
            error!(error = %e, status, "Failed to read response body");
            transport_error(request, e)
        })?;

        debug!(status, body_len = body.len(), "Received response");
        Ok(TransportResponse { status, body })
    }
}
