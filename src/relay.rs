//! Relay service
//!
//! Turns one generate request into one reply. Stateless: every call builds
//! its own conversation and its own provider client, and every failure is
//! folded into the reply instead of being returned as an error.

use std::sync::Arc;

use tracing::{info, warn};

use crate::{
    prompt::compose_initial_turn,
    provider::{AiProvider, Conversation, Turn},
    types::{GenerateReply, GenerateRequest},
};

/// Prefix of every in-band error message
pub const ERROR_PREFIX: &str = "An error occurred: ";

/// Relay between generate requests and a model provider
#[derive(Clone)]
pub struct RelayService {
    provider: Arc<dyn AiProvider>,
}

impl RelayService {
    pub fn new(provider: Arc<dyn AiProvider>) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &Arc<dyn AiProvider> {
        &self.provider
    }

    /// Handle one generate request
    pub async fn generate(&self, request: GenerateRequest) -> GenerateReply {
        let GenerateRequest {
            api_key,
            prompt,
            history,
        } = request;

        let message = compose_initial_turn(&history, &prompt);
        let conversation = Conversation {
            history: history.into_iter().map(Turn::from).collect(),
            message,
        };

        match self.provider.generate_text(&api_key, &conversation).await {
            Ok(text) => {
                info!(provider = self.provider.name(), "Generated reply");
                GenerateReply::text(text)
            }
            Err(e) => {
                warn!(provider = self.provider.name(), error = %e, "Generation failed");
                GenerateReply::error(format!("{}{}", ERROR_PREFIX, e))
            }
        }
    }
}
