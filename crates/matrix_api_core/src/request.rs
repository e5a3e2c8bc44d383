//! Request shapes before and after preparation.

use crate::HttpMethod;
use derive_getters::Getters;
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use std::fmt;

/// Request body as supplied by the caller.
///
/// JSON content is serialized when the effective `Content-Type` is
/// `application/json`. Raw bytes are always sent as-is, which is how
/// media uploads with a non-JSON content type go through.
#[derive(Debug, Clone, PartialEq, derive_more::From)]
pub enum Content {
    /// Structured JSON body
    Json(JsonValue),
    /// Pre-encoded body sent verbatim
    Raw(Vec<u8>),
}

impl Content {
    /// True when the body carries nothing worth sending.
    ///
    /// `null`, an empty object and an empty byte buffer all count as absent
    /// and are replaced by an empty JSON object during preparation.
    fn is_empty(&self) -> bool {
        match self {
            Content::Json(JsonValue::Null) => true,
            Content::Json(JsonValue::Object(map)) => map.is_empty(),
            Content::Json(_) => false,
            Content::Raw(bytes) => bytes.is_empty(),
        }
    }
}

/// A call to the client-server API as the caller describes it.
///
/// Only `method` and `path` are required. Everything else falls back to the
/// session's defaults during [`ApiSession::prepare`](crate::ApiSession::prepare).
///
/// # Examples
///
/// ```
/// use matrix_api_core::ApiRequest;
/// use serde_json::json;
///
/// let request = ApiRequest::new("PUT", "/profile/@alice:example.org/displayname")
///     .with_json(json!({"displayname": "Alice"}))
///     .with_query("ts", "1700000000");
///
/// assert_eq!(request.method(), "PUT");
/// assert_eq!(request.query_params().get("ts").map(String::as_str), Some("1700000000"));
/// ```
#[derive(Debug, Clone, PartialEq, Getters)]
pub struct ApiRequest {
    method: String,
    path: String,
    content: Option<Content>,
    query_params: BTreeMap<String, String>,
    headers: BTreeMap<String, String>,
    api_path: Option<String>,
}

impl ApiRequest {
    /// Create a request for `method` on `path` (relative to the API prefix).
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            content: None,
            query_params: BTreeMap::new(),
            headers: BTreeMap::new(),
            api_path: None,
        }
    }

    /// Shorthand for a GET request.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new("GET", path)
    }

    /// Shorthand for a PUT request.
    pub fn put(path: impl Into<String>) -> Self {
        Self::new("PUT", path)
    }

    /// Shorthand for a POST request.
    pub fn post(path: impl Into<String>) -> Self {
        Self::new("POST", path)
    }

    /// Shorthand for a DELETE request.
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new("DELETE", path)
    }

    /// Set the request body.
    pub fn with_content(mut self, content: impl Into<Content>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Set a JSON request body.
    pub fn with_json(self, body: JsonValue) -> Self {
        self.with_content(Content::Json(body))
    }

    /// Add a query parameter. Later values replace earlier ones.
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_params.insert(key.into(), value.into());
        self
    }

    /// Add a header. Later values replace earlier ones.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Override the API prefix (defaults to the session's `api_path`).
    pub fn with_api_path(mut self, api_path: impl Into<String>) -> Self {
        self.api_path = Some(api_path.into());
        self
    }

    pub(crate) fn content_or_empty(&self) -> Content {
        match &self.content {
            Some(content) if !content.is_empty() => content.clone(),
            _ => Content::Json(JsonValue::Object(Default::default())),
        }
    }
}

/// A fully formed request, ready for the transport.
///
/// Built by [`ApiSession::prepare`](crate::ApiSession::prepare). The send
/// loop reuses the same descriptor for every attempt of a call.
#[derive(Clone, PartialEq, Eq, Getters)]
pub struct RequestDescriptor {
    method: HttpMethod,
    endpoint: String,
    query_params: BTreeMap<String, String>,
    headers: BTreeMap<String, String>,
    body: Vec<u8>,
}

impl RequestDescriptor {
    pub(crate) fn new(
        method: HttpMethod,
        endpoint: String,
        query_params: BTreeMap<String, String>,
        headers: BTreeMap<String, String>,
        body: Vec<u8>,
    ) -> Self {
        Self {
            method,
            endpoint,
            query_params,
            headers,
            body,
        }
    }

    /// The body as UTF-8 text, if it is valid UTF-8.
    pub fn body_text(&self) -> Option<&str> {
        std::str::from_utf8(&self.body).ok()
    }

    /// Look up a header by name, ignoring ASCII case.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

impl fmt::Debug for RequestDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let query: BTreeMap<&str, &str> = self
            .query_params
            .iter()
            .map(|(key, value)| {
                if key == "access_token" {
                    (key.as_str(), "<redacted>")
                } else {
                    (key.as_str(), value.as_str())
                }
            })
            .collect();

        f.debug_struct("RequestDescriptor")
            .field("method", &self.method)
            .field("endpoint", &self.endpoint)
            .field("query_params", &query)
            .field("headers", &self.headers)
            .field("body_len", &self.body.len())
            .finish()
    }
}
