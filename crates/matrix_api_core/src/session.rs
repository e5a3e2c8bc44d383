//! Long-lived session state shared by every call.

use crate::{
    ApiRequest, Content, DEFAULT_429_WAIT_MS, HttpMethod, MATRIX_V2_API_PATH, RateLimitSignal,
    RequestDescriptor, RetryPolicy,
};
use derive_getters::Getters;
use matrix_api_error::{ConfigError, JsonError, MatrixApiResult};
use serde_json::Value as JsonValue;
use std::fmt;
use tracing::{debug, instrument};

const CONTENT_TYPE: &str = "Content-Type";
const APPLICATION_JSON: &str = "application/json";

/// Connection settings for one homeserver account.
///
/// Built once at startup and shared read-only across concurrent calls;
/// nothing in here changes after construction.
///
/// # Examples
///
/// ```
/// use matrix_api_core::{ApiSession, RetryPolicy};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let session = ApiSession::builder()
///     .base_url("https://matrix.example.org")
///     .token("syt_secret")
///     .identity("@bridge_bot:example.org")
///     .default_429_wait_ms(2000u64)
///     .retry(RetryPolicy::bounded(10))
///     .build()?;
///
/// assert_eq!(session.identity().as_deref(), Some("@bridge_bot:example.org"));
/// assert_eq!(*session.default_429_wait_ms(), 2000);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, PartialEq, Getters, derive_builder::Builder)]
#[builder(build_fn(error = "ConfigError", validate = "Self::validate"))]
pub struct ApiSession {
    /// Homeserver base URL, e.g. `https://matrix.example.org`
    #[builder(setter(into))]
    base_url: String,

    /// Access token sent as the `access_token` query parameter
    #[builder(setter(into))]
    token: String,

    /// User id to act as (application services), sent as `user_id`
    #[builder(default, setter(into, strip_option))]
    identity: Option<String>,

    /// Wait used when a 429 body carries no `retry_after_ms`
    #[builder(default = "DEFAULT_429_WAIT_MS")]
    default_429_wait_ms: u64,

    /// API prefix used when a request does not override it
    #[builder(default = "MATRIX_V2_API_PATH.to_string()", setter(into))]
    api_path: String,

    /// Verify the homeserver's TLS certificate
    #[builder(default = "true")]
    validate_cert: bool,

    /// Limits on retrying rate-limited calls
    #[builder(default)]
    retry: RetryPolicy,
}

impl ApiSessionBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(base_url) = &self.base_url {
            url::Url::parse(base_url)
                .map_err(|e| format!("base_url '{}' is not a valid URL: {}", base_url, e))?;
        }
        if let Some(api_path) = &self.api_path {
            if !api_path.is_empty() && !api_path.starts_with('/') {
                return Err(format!("api_path '{}' must start with '/'", api_path));
            }
        }
        Ok(())
    }
}

impl ApiSession {
    /// Start building a session.
    pub fn builder() -> ApiSessionBuilder {
        ApiSessionBuilder::default()
    }

    /// Turn a caller's request into a transport-ready descriptor.
    ///
    /// - the method is upper-cased and must be GET, PUT, DELETE or POST
    /// - an absent or empty body becomes `{}`
    /// - `Content-Type: application/json` is added unless the caller set one
    /// - `access_token` (and `user_id` when an identity is configured) are
    ///   written into the query parameters, replacing caller values
    /// - the endpoint is `base_url + api_path + path`, except that trailing
    ///   `/` characters on `base_url` are dropped first, so
    ///   `https://hs/` and `https://hs` give the same endpoint
    /// - JSON bodies are serialized when the content type is JSON; raw
    ///   bodies pass through untouched
    ///
    /// Performs no I/O and is deterministic: the same inputs always give
    /// byte-identical descriptors.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for an unsupported method.
    #[instrument(skip(self, request), fields(method = %request.method(), path = %request.path()))]
    pub fn prepare(&self, request: &ApiRequest) -> MatrixApiResult<RequestDescriptor> {
        let method = HttpMethod::parse(request.method())?;

        let mut headers = request.headers().clone();
        if !headers
            .keys()
            .any(|name| name.eq_ignore_ascii_case(CONTENT_TYPE))
        {
            headers.insert(CONTENT_TYPE.to_string(), APPLICATION_JSON.to_string());
        }

        let mut query_params = request.query_params().clone();
        query_params.insert("access_token".to_string(), self.token.clone());
        if let Some(identity) = &self.identity {
            query_params.insert("user_id".to_string(), identity.clone());
        }

        let api_path = request
            .api_path()
            .as_deref()
            .unwrap_or(self.api_path.as_str());
        let endpoint = format!(
            "{}{}{}",
            self.base_url.trim_end_matches('/'),
            api_path,
            request.path()
        );

        let is_json = headers
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(CONTENT_TYPE))
            .is_some_and(|(_, value)| is_json_media_type(value));
        let body = encode_body(request.content_or_empty(), is_json)?;

        debug!(endpoint = %endpoint, body_len = body.len(), "Prepared request");
        Ok(RequestDescriptor::new(
            method,
            endpoint,
            query_params,
            headers,
            body,
        ))
    }

    /// Resolve the wait for a 429 body, honouring this session's default and
    /// retry policy cap.
    pub fn rate_limit_wait(&self, body: &JsonValue) -> std::time::Duration {
        let signal = RateLimitSignal::from_response(body, self.default_429_wait_ms);
        self.retry.cap(signal.wait())
    }
}

impl fmt::Debug for ApiSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiSession")
            .field("base_url", &self.base_url)
            .field("token", &"<redacted>")
            .field("identity", &self.identity)
            .field("default_429_wait_ms", &self.default_429_wait_ms)
            .field("api_path", &self.api_path)
            .field("validate_cert", &self.validate_cert)
            .field("retry", &self.retry)
            .finish()
    }
}

/// `application/json`, with or without parameters such as `charset`.
fn is_json_media_type(value: &str) -> bool {
    value
        .split(';')
        .next()
        .is_some_and(|essence| essence.trim().eq_ignore_ascii_case(APPLICATION_JSON))
}

fn encode_body(content: Content, is_json: bool) -> MatrixApiResult<Vec<u8>> {
    match content {
        Content::Raw(bytes) => Ok(bytes),
        Content::Json(value) if is_json => serde_json::to_vec(&value)
            .map_err(|e| JsonError::new(format!("Failed to serialize request body: {}", e)).into()),
        // Non-JSON content type: strings go out verbatim, an empty mapping
        // means no body at all.
        Content::Json(JsonValue::String(text)) => Ok(text.into_bytes()),
        Content::Json(JsonValue::Object(map)) if map.is_empty() => Ok(Vec::new()),
        Content::Json(value) => serde_json::to_vec(&value)
            .map_err(|e| JsonError::new(format!("Failed to serialize request body: {}", e)).into()),
    }
}
