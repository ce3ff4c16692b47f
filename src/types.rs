//! Wire types for the generate endpoint
//!
//! Shared by the relay server and the chat front end so both sides agree on
//! the JSON shape.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use utoipa::ToSchema;

/// Secret credential authorizing calls to the model provider
///
/// `Debug` never prints the secret. Use [`Credential::fingerprint`] when a
/// log line needs to correlate requests made with the same key.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Credential(String);

impl Credential {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// Raw secret, for building the provider request only
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// First 12 hex characters of the SHA-256 of the secret
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.0.as_bytes());
        let mut digest = hex::encode(hasher.finalize());
        digest.truncate(12);
        digest
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// One prior turn as sent over the wire
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HistoryEntry {
    /// Speaker of the turn, normally "user" or "assistant"
    pub role: String,
    /// Text fragments of the turn
    pub parts: Vec<String>,
}

impl HistoryEntry {
    pub fn new(role: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            parts: vec![text.into()],
        }
    }
}

/// Body of `POST /generate`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GenerateRequest {
    /// Provider credential, used for this request only
    #[schema(value_type = String)]
    pub api_key: Credential,
    /// The new user prompt
    pub prompt: String,
    /// Prior turns, oldest first, excluding the new prompt
    pub history: Vec<HistoryEntry>,
}

/// Reply of `POST /generate`
///
/// Always sent with HTTP 200; failures travel in-band.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum GenerateReply {
    /// Generated text
    Text { response: String },
    /// Human-readable failure description
    Error { error: String },
}

impl GenerateReply {
    pub fn text(response: impl Into<String>) -> Self {
        GenerateReply::Text {
            response: response.into(),
        }
    }

    pub fn error(error: impl Into<String>) -> Self {
        GenerateReply::Error {
            error: error.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, GenerateReply::Error { .. })
    }
}
