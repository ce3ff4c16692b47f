//! Model provider abstraction layer
//!
//! Defines the interface the relay uses to reach a text-generation backend,
//! together with the provider-neutral conversation it hands over.

pub mod gemini;
pub mod logging;

use async_trait::async_trait;
use thiserror::Error;

use crate::types::{Credential, HistoryEntry};

pub use gemini::{GeminiClient, GeminiProvider, GeminiSettings};
pub use logging::RequestContext;

/// One role-tagged turn handed to the provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub role: String,
    pub parts: Vec<String>,
}

impl From<HistoryEntry> for Turn {
    fn from(entry: HistoryEntry) -> Self {
        Self {
            role: entry.role,
            parts: entry.parts,
        }
    }
}

/// Conversation sent to the provider on a single call
///
/// Built fresh per request and never reused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversation {
    /// Prior turns, oldest first
    pub history: Vec<Turn>,
    /// Text of the new user turn
    pub message: String,
}

/// Failures raised while talking to a provider
///
/// The `Display` text is what ends up after "An error occurred: " in the reply.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("API key is missing")]
    MissingCredential,

    #[error("API key contains characters that cannot be sent in a header")]
    InvalidCredential,

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("request to provider failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{message}")]
    Rejected { status: u16, message: String },

    #[error("response was blocked: {0}")]
    Blocked(String),

    #[error("response contained no text (finish reason: {0})")]
    EmptyResponse(String),

    #[error("failed to parse provider response: {0}")]
    InvalidResponse(String),
}

impl ProviderError {
    /// HTTP status returned by the provider, when it answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            ProviderError::Rejected { status, .. } => Some(*status),
            ProviderError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Trait implemented by every text-generation backend
///
/// Implementations receive the credential with each call and must not keep
/// it, or any client bound to it, beyond that call.
#[async_trait]
pub trait AiProvider: Send + Sync {
    /// Provider name for logging and metrics
    fn name(&self) -> &'static str;

    /// Model identifier requests are sent to
    fn model(&self) -> &str;

    /// Generate the reply text for one conversation
    async fn generate_text(
        &self,
        credential: &Credential,
        conversation: &Conversation,
    ) -> Result<String, ProviderError>;
}
