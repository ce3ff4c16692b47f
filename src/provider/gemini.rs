//! Gemini provider
//!
//! Talks to the Gemini `generateContent` REST endpoint. A [`GeminiClient`] is
//! bound to one credential and lives for one call; [`GeminiProvider`] only
//! holds the endpoint settings and builds a client per request.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::{AiProvider, Conversation, ProviderError, RequestContext, Turn};
use crate::{config::Config, types::Credential};

/// Header Gemini reads the API key from
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Endpoint settings shared by every call
#[derive(Debug, Clone)]
pub struct GeminiSettings {
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
}

impl GeminiSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            base_url: config.gemini_api_url.clone(),
            model: config.gemini_model.clone(),
            timeout: config.provider_timeout,
        }
    }

    fn generate_url(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

/// Gemini client scoped to a single credential
pub struct GeminiClient {
    client: reqwest::Client,
    url: String,
}

impl GeminiClient {
    /// Build a client for `credential`
    ///
    /// Idle connections are not pooled, so nothing bound to the credential
    /// survives once the client is dropped.
    pub fn connect(
        settings: &GeminiSettings,
        credential: &Credential,
    ) -> Result<Self, ProviderError> {
        if credential.is_blank() {
            return Err(ProviderError::MissingCredential);
        }

        let mut api_key = HeaderValue::from_str(credential.expose())
            .map_err(|_| ProviderError::InvalidCredential)?;
        api_key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(API_KEY_HEADER, api_key);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(settings.timeout)
            .pool_max_idle_per_host(0)
            .build()
            .map_err(ProviderError::Client)?;

        Ok(Self {
            client,
            url: settings.generate_url(),
        })
    }

    /// Send the conversation and return the reply text
    pub async fn send(&self, conversation: &Conversation) -> Result<String, ProviderError> {
        let body = GenerateContentRequest::from_conversation(conversation);

        let response = self.client.post(&self.url).json(&body).send().await?;
        let status = response.status();
        debug!(status = %status, "Gemini response status");

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(map_http_error(status.as_u16(), &text));
        }

        let text = response.text().await?;
        let parsed: GenerateContentResponse = serde_json::from_str(&text)
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;

        extract_text_response(parsed)
    }
}

/// Gemini-backed [`AiProvider`]
pub struct GeminiProvider {
    settings: GeminiSettings,
}

impl GeminiProvider {
    pub fn new(settings: GeminiSettings) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl AiProvider for GeminiProvider {
    fn name(&self) -> &'static str {
        "gemini"
    }

    fn model(&self) -> &str {
        &self.settings.model
    }

    #[instrument(
        skip_all,
        fields(model = %self.settings.model, turns = conversation.history.len())
    )]
    async fn generate_text(
        &self,
        credential: &Credential,
        conversation: &Conversation,
    ) -> Result<String, ProviderError> {
        let ctx = RequestContext::new(self.name(), &self.settings.model)
            .with_credential(credential)
            .with_turns(conversation.history.len());
        ctx.log_request_start();

        let result = match GeminiClient::connect(&self.settings, credential) {
            Ok(client) => client.send(conversation).await,
            Err(e) => Err(e),
        };

        match &result {
            Ok(text) => ctx.log_request_complete(text.len()),
            Err(e) => ctx.log_request_error(e),
        }

        result
    }
}

/// Gemini names the assistant side of a chat "model"
fn provider_role(role: &str) -> &str {
    match role {
        "assistant" => "model",
        other => other,
    }
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

impl GenerateContentRequest {
    fn from_conversation(conversation: &Conversation) -> Self {
        let mut contents: Vec<Content> = conversation.history.iter().map(Content::from).collect();
        contents.push(Content {
            role: "user".to_string(),
            parts: vec![Part {
                text: conversation.message.clone(),
            }],
        });
        Self { contents }
    }
}

#[derive(Debug, Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

impl From<&Turn> for Content {
    fn from(turn: &Turn) -> Self {
        Self {
            role: provider_role(&turn.role).to_string(),
            parts: turn
                .parts
                .iter()
                .map(|text| Part { text: text.clone() })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<PartResponse>,
}

#[derive(Debug, Deserialize)]
struct PartResponse {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

fn extract_text_response(response: GenerateContentResponse) -> Result<String, ProviderError> {
    let block_reason = response.prompt_feedback.and_then(|f| f.block_reason);

    let Some(candidate) = response.candidates.into_iter().next() else {
        return Err(match block_reason {
            Some(reason) => ProviderError::Blocked(reason),
            None => ProviderError::EmptyResponse("no candidates".to_string()),
        });
    };

    let texts: Vec<String> = candidate
        .content
        .map(|content| content.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if texts.is_empty() {
        return Err(ProviderError::EmptyResponse(
            candidate.finish_reason.unwrap_or_else(|| "unknown".to_string()),
        ));
    }

    Ok(texts.concat())
}

fn map_http_error(status: u16, body: &str) -> ProviderError {
    let message = serde_json::from_str::<ErrorWrapper>(body)
        .ok()
        .and_then(|wrapper| wrapper.error.message)
        .unwrap_or_else(|| body.trim().to_string());

    ProviderError::Rejected { status, message }
}
