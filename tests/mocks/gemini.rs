//! Mock Gemini API for testing
//!
//! Provides wiremock-based mocks for `POST /models/{model}:generateContent`.
//!
//! # Example
//!
//! ```rust,ignore
//! let gemini = MockGemini::start().await;
//! gemini.mock_generate_success("Hello!").await;
//! // Use gemini.uri() as GEMINI_API_URL
//! ```

use serde_json::{json, Value};
use wiremock::{
    matchers::{header, method, path},
    Mock, MockServer, ResponseTemplate,
};

use crate::common::constants::{TEST_API_KEY, TEST_MODEL};

/// Mock Gemini server wrapper
pub struct MockGemini {
    server: MockServer,
}

impl MockGemini {
    /// Start a new mock Gemini server
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        Self { server }
    }

    /// Base URL to configure as `GEMINI_API_URL`
    pub fn uri(&self) -> String {
        self.server.uri()
    }

    fn generate_path() -> String {
        format!("/models/{}:generateContent", TEST_MODEL)
    }

    /// Reply with `text` to requests carrying the test credential
    pub async fn mock_generate_success(&self, text: &str) {
        Mock::given(method("POST"))
            .and(path(Self::generate_path()))
            .and(header("x-goog-api-key", TEST_API_KEY))
            .respond_with(ResponseTemplate::new(200).set_body_json(success_body(text)))
            .mount(&self.server)
            .await;
    }

    /// Reply with `text` exactly once, so later mocks take over
    pub async fn mock_generate_success_once(&self, text: &str) {
        Mock::given(method("POST"))
            .and(path(Self::generate_path()))
            .respond_with(ResponseTemplate::new(200).set_body_json(success_body(text)))
            .up_to_n_times(1)
            .mount(&self.server)
            .await;
    }

    /// Reject every request the way Gemini rejects a bad API key
    pub async fn mock_invalid_api_key(&self) {
        self.mock_generate_error(
            400,
            "INVALID_ARGUMENT",
            "API key not valid. Please pass a valid API key.",
        )
        .await;
    }

    /// Reply with a Gemini error envelope
    pub async fn mock_generate_error(&self, status: u16, status_text: &str, message: &str) {
        Mock::given(method("POST"))
            .and(path(Self::generate_path()))
            .respond_with(ResponseTemplate::new(status).set_body_json(json!({
                "error": {
                    "code": status,
                    "message": message,
                    "status": status_text
                }
            })))
            .mount(&self.server)
            .await;
    }

    /// Reply with a prompt blocked by safety filters
    pub async fn mock_generate_blocked(&self, reason: &str) {
        Mock::given(method("POST"))
            .and(path(Self::generate_path()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "promptFeedback": {"blockReason": reason}
            })))
            .mount(&self.server)
            .await;
    }

    /// Fail the test if the provider is called at all
    pub async fn expect_no_calls(&self) {
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&self.server)
            .await;
    }

    /// JSON bodies of every generate request received so far
    pub async fn received_bodies(&self) -> Vec<Value> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter_map(|request| request.body_json::<Value>().ok())
            .collect()
    }
}

/// Successful `generateContent` body with one candidate
pub fn success_body(text: &str) -> Value {
    json!({
        "candidates": [{
            "content": {
                "role": "model",
                "parts": [{"text": text}]
            },
            "finishReason": "STOP",
            "index": 0
        }],
        "usageMetadata": {
            "promptTokenCount": 12,
            "candidatesTokenCount": 8,
            "totalTokenCount": 20
        }
    })
}

/// Roles of the `contents` array of a recorded request
pub fn content_roles(body: &Value) -> Vec<String> {
    body["contents"]
        .as_array()
        .map(|contents| {
            contents
                .iter()
                .filter_map(|c| c["role"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

/// Text of the last turn of a recorded request
pub fn last_turn_text(body: &Value) -> String {
    body["contents"]
        .as_array()
        .and_then(|contents| contents.last())
        .and_then(|turn| turn["parts"][0]["text"].as_str())
        .unwrap_or_default()
        .to_string()
}
