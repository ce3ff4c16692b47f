//! Chat front end support
//!
//! The conversation store keeps the session history, composes generate
//! requests and hands every change to a [`ChatView`]. The relay client is the
//! HTTP side of the store.

pub mod relay_client;
pub mod store;
pub mod view;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use relay_client::{Relay, RelayClient};
pub use store::{ConversationStore, PendingTurn, StoreState};
pub use view::ChatView;

/// Speaker of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// One message of the session history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Failures visible to the chat user
///
/// None of them end the session; the store stays ready for the next input.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Please enter your Gemini API key to start the chat.")]
    MissingCredential,

    #[error("Message is empty")]
    EmptyMessage,

    #[error("A request is already in flight")]
    Busy,

    #[error("Reply arrived for a turn that is no longer pending")]
    StaleTurn,

    #[error("Failed to connect to the backend: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Error from backend: {0}")]
    Backend(String),

    #[error("An unexpected error occurred: {0}")]
    Malformed(String),
}
