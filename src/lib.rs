//! CodeMaster - chat relay for the Gemini text-generation API
//!
//! The relay server receives a prompt plus conversation history, places the
//! CodeMaster persona, calls the model provider and answers with the
//! generated text or an in-band error. The `client` module holds the chat
//! front end's conversation store.

pub mod client;
pub mod config;
pub mod docs;
pub mod error;
pub mod prompt;
pub mod provider;
pub mod relay;
pub mod routes;
pub mod types;

use std::sync::Arc;
use std::time::Instant;

pub use crate::config::{ClientConfig, Config};
pub use crate::provider::{AiProvider, GeminiProvider, GeminiSettings};
pub use crate::relay::RelayService;

/// Application state shared across all request handlers
///
/// Holds no credential and no provider connection; both are per request.
pub struct AppState {
    pub config: Config,
    pub start_time: Instant,
    /// Relay forwarding generate requests to the model provider
    pub relay: RelayService,
}

impl AppState {
    /// Create a new application state backed by Gemini
    pub fn new(config: Config) -> Self {
        let provider: Arc<dyn AiProvider> =
            Arc::new(GeminiProvider::new(GeminiSettings::from_config(&config)));
        Self::with_provider(config, provider)
    }

    /// Create a new application state with an explicit provider
    pub fn with_provider(config: Config, provider: Arc<dyn AiProvider>) -> Self {
        Self {
            config,
            start_time: Instant::now(),
            relay: RelayService::new(provider),
        }
    }
}
