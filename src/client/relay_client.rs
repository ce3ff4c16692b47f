//! HTTP client for the relay's generate endpoint

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, instrument};

use super::ClientError;
use crate::{config::ClientConfig, types::GenerateRequest};

/// Fallback text when the relay reports neither a response nor an error
const UNKNOWN_ERROR: &str = "An unknown error occurred.";

/// Anything that can answer a generate request
#[async_trait]
pub trait Relay: Send + Sync {
    /// Return the generated text, or the reason there is none
    async fn generate(&self, request: &GenerateRequest) -> Result<String, ClientError>;
}

/// Relay reached over HTTP
pub struct RelayClient {
    client: reqwest::Client,
    url: String,
}

/// Reply as received; either field may be missing
#[derive(Debug, Deserialize)]
struct RawReply {
    response: Option<String>,
    error: Option<String>,
}

impl RelayClient {
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            client,
            url: config.relay_url.clone(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl Relay for RelayClient {
    #[instrument(skip_all, fields(url = %self.url, history = request.history.len()))]
    async fn generate(&self, request: &GenerateRequest) -> Result<String, ClientError> {
        let response = self
            .client
            .post(&self.url)
            .json(request)
            .send()
            .await?
            .error_for_status()?;

        let body = response.text().await?;
        debug!(body_len = body.len(), "Relay response received");

        let reply: RawReply =
            serde_json::from_str(&body).map_err(|e| ClientError::Malformed(e.to_string()))?;

        match reply.response {
            Some(text) => Ok(text),
            None => Err(ClientError::Backend(
                reply.error.unwrap_or_else(|| UNKNOWN_ERROR.to_string()),
            )),
        }
    }
}
