//! Recording mock transport for testing the send loops.

use async_trait::async_trait;
use matrix_api_client::{BlockingTransport, Transport, TransportResponse};
use matrix_api_core::RequestDescriptor;
use matrix_api_error::TransportError;
use serde_json::Value as JsonValue;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// A single scripted exchange.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Answer with this status and body
    Reply { status: u16, body: String },
    /// Fail before any response, like a refused connection
    Fail(String),
}

impl MockResponse {
    /// Reply with a JSON body.
    pub fn json(status: u16, body: JsonValue) -> Self {
        Self::Reply {
            status,
            body: body.to_string(),
        }
    }

    /// Reply with a raw text body.
    #[allow(dead_code)]
    pub fn text(status: u16, body: impl Into<String>) -> Self {
        Self::Reply {
            status,
            body: body.into(),
        }
    }
}

/// Mock transport that replays scripted responses and records every request.
///
/// Responses are consumed in order; once only one is left it is repeated
/// for every further call. Clones share the script and the recording.
#[derive(Debug, Clone)]
pub struct MockTransport {
    responses: Arc<Mutex<VecDeque<MockResponse>>>,
    requests: Arc<Mutex<Vec<RequestDescriptor>>>,
}

impl MockTransport {
    /// Always answer 200 with the given JSON.
    pub fn new_success(body: JsonValue) -> Self {
        Self::new_sequence(vec![MockResponse::json(200, body)])
    }

    /// Answer `status` once, then 200 with the same body. A 429 script
    /// therefore clears on the second attempt.
    pub fn new_status_then_success(status: u16, body: JsonValue) -> Self {
        Self::new_sequence(vec![
            MockResponse::json(status, body.clone()),
            MockResponse::json(200, body),
        ])
    }

    /// Replay `responses` in order, repeating the last one.
    pub fn new_sequence(responses: Vec<MockResponse>) -> Self {
        assert!(!responses.is_empty(), "mock needs at least one response");
        Self {
            responses: Arc::new(Mutex::new(responses.into())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Number of requests issued so far.
    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Every request issued so far, in order.
    pub fn requests(&self) -> Vec<RequestDescriptor> {
        self.requests.lock().unwrap().clone()
    }

    fn next_response(&self, request: &RequestDescriptor) -> Result<TransportResponse, TransportError> {
        self.requests.lock().unwrap().push(request.clone());

        let mut responses = self.responses.lock().unwrap();
        let next = if responses.len() > 1 {
            responses.pop_front().unwrap()
        } else {
            responses.front().cloned().unwrap()
        };

        match next {
            MockResponse::Reply { status, body } => Ok(TransportResponse::new(status, body)),
            MockResponse::Fail(message) => Err(TransportError::new(
                request.method().to_string(),
                request.endpoint().clone(),
                message,
            )),
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn execute(&self, request: &RequestDescriptor) -> Result<TransportResponse, TransportError> {
        self.next_response(request)
    }
}

impl BlockingTransport for MockTransport {
    fn execute(&self, request: &RequestDescriptor) -> Result<TransportResponse, TransportError> {
        self.next_response(request)
    }
}
