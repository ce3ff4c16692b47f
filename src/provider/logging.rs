//! Request logging for provider calls
//!
//! Structured log lines with a short correlation ID so one generate call can
//! be followed from start to finish. The credential only ever appears as a
//! fingerprint.

use std::time::Instant;
use tracing::{error, info};
use uuid::Uuid;

use super::ProviderError;
use crate::types::Credential;

/// Context for tracking one provider call
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Unique identifier for this call (for log correlation)
    pub trace_id: String,
    /// When the call started
    pub start_time: Instant,
    /// Provider handling this call
    pub provider: String,
    /// Model the call is sent to
    pub model: String,
    /// Fingerprint of the credential used
    pub credential_fingerprint: Option<String>,
    /// Number of prior turns in the conversation
    pub turns: usize,
}

impl RequestContext {
    /// Create a new request context
    pub fn new(provider: &str, model: &str) -> Self {
        Self {
            trace_id: Uuid::new_v4().to_string()[..8].to_string(), // Short ID for readability
            start_time: Instant::now(),
            provider: provider.to_string(),
            model: model.to_string(),
            credential_fingerprint: None,
            turns: 0,
        }
    }

    /// Record which credential the call uses
    pub fn with_credential(mut self, credential: &Credential) -> Self {
        self.credential_fingerprint = Some(credential.fingerprint());
        self
    }

    /// Record the size of the prior history
    pub fn with_turns(mut self, turns: usize) -> Self {
        self.turns = turns;
        self
    }

    /// Get elapsed time in milliseconds
    pub fn elapsed_ms(&self) -> u128 {
        self.start_time.elapsed().as_millis()
    }

    pub fn log_request_start(&self) {
        info!(
            trace_id = %self.trace_id,
            provider = %self.provider,
            model = %self.model,
            credential = ?self.credential_fingerprint,
            turns = %self.turns,
            "Provider request started"
        );
    }

    pub fn log_request_complete(&self, response_chars: usize) {
        info!(
            trace_id = %self.trace_id,
            provider = %self.provider,
            model = %self.model,
            response_chars = %response_chars,
            elapsed_ms = %self.elapsed_ms(),
            "Provider request completed"
        );
    }

    pub fn log_request_error(&self, err: &ProviderError) {
        error!(
            trace_id = %self.trace_id,
            provider = %self.provider,
            model = %self.model,
            credential = ?self.credential_fingerprint,
            status = ?err.status(),
            elapsed_ms = %self.elapsed_ms(),
            error = %err,
            "Provider request failed"
        );
    }
}
