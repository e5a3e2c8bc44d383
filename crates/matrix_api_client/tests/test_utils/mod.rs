//! Shared test helpers.

mod mock_transport;

pub use mock_transport::{MockResponse, MockTransport};

use matrix_api_core::ApiSession;

/// Session pointing at a fake homeserver with token `1234`.
#[allow(dead_code)]
pub fn session() -> ApiSession {
    ApiSession::builder()
        .base_url("https://matrix.example.org")
        .token("1234")
        .build()
        .expect("valid test session")
}
