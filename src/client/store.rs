//! Conversation store
//!
//! Owns the session history and drives one request/response cycle at a time.
//! A turn is either run end to end with [`ConversationStore::submit`], or in
//! two steps with [`ConversationStore::begin_turn`] and
//! [`ConversationStore::finish_turn`] when the UI wants to keep handling
//! events while the relay is working.

use std::sync::Arc;

use tracing::debug;

use super::{ChatView, ClientError, Message, Relay, Role};
use crate::types::{Credential, GenerateRequest, HistoryEntry};

/// Whether a turn is waiting on the relay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreState {
    Idle,
    Awaiting,
}

/// A turn whose user message is in the history and whose reply is pending
///
/// Only the store that issued it, and only until the turn is finished,
/// cancelled or the session is reset, accepts it back.
#[derive(Debug)]
pub struct PendingTurn {
    turn: u64,
    request: GenerateRequest,
}

impl PendingTurn {
    /// Request to send to the relay
    pub fn request(&self) -> &GenerateRequest {
        &self.request
    }
}

/// Session history plus the machinery to extend it
pub struct ConversationStore<V> {
    relay: Arc<dyn Relay>,
    view: V,
    credential: Credential,
    history: Vec<Message>,
    state: StoreState,
    /// Id of the newest turn; bumped by every `begin_turn` and `reset`
    turn: u64,
}

impl<V: ChatView> ConversationStore<V> {
    /// Create a store for one session
    ///
    /// Fails with [`ClientError::MissingCredential`] when the credential is
    /// blank, which keeps the chat inert until one is supplied.
    pub fn new(
        relay: Arc<dyn Relay>,
        view: V,
        credential: Credential,
    ) -> Result<Self, ClientError> {
        if credential.is_blank() {
            return Err(ClientError::MissingCredential);
        }

        Ok(Self {
            relay,
            view,
            credential,
            history: Vec::new(),
            state: StoreState::Idle,
            turn: 0,
        })
    }

    pub fn history(&self) -> &[Message] {
        &self.history
    }

    pub fn state(&self) -> StoreState {
        self.state
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    /// Append a user message and render it
    pub fn append_user_message(&mut self, content: impl Into<String>) -> Result<(), ClientError> {
        let content = content.into();
        if content.trim().is_empty() {
            return Err(ClientError::EmptyMessage);
        }

        self.history.push(Message::user(content));
        if let Some(message) = self.history.last() {
            self.view.show_message(message);
        }
        Ok(())
    }

    /// History as sent to the relay
    ///
    /// Leaves out the newest message when it is the user message of the turn
    /// being composed.
    pub fn history_view(&self) -> Vec<HistoryEntry> {
        let prior = match self.history.last() {
            Some(last) if last.role == Role::User => &self.history[..self.history.len() - 1],
            _ => &self.history[..],
        };

        prior
            .iter()
            .map(|message| HistoryEntry::new(message.role.as_str(), message.content.clone()))
            .collect()
    }

    /// Append the user message and compose the request for it
    ///
    /// Rejected with [`ClientError::Busy`] while another turn is pending; the
    /// history is not touched in that case.
    pub fn begin_turn(&mut self, prompt: impl Into<String>) -> Result<PendingTurn, ClientError> {
        if self.state == StoreState::Awaiting {
            return Err(ClientError::Busy);
        }

        let prompt = prompt.into();
        self.append_user_message(prompt.clone())?;

        let request = GenerateRequest {
            api_key: self.credential.clone(),
            prompt,
            history: self.history_view(),
        };
        self.turn += 1;
        self.state = StoreState::Awaiting;
        debug!(turn = self.turn, history = request.history.len(), "Turn started");

        Ok(PendingTurn {
            turn: self.turn,
            request,
        })
    }

    fn is_current(&self, pending: &PendingTurn) -> bool {
        self.state == StoreState::Awaiting && pending.turn == self.turn
    }

    /// Record the relay's answer to a pending turn
    ///
    /// On success the assistant message is appended and rendered. On failure
    /// the error is rendered, handed back, and the history stays as it was.
    /// A turn that was cancelled or reset away is refused with
    /// [`ClientError::StaleTurn`] and changes nothing.
    pub fn finish_turn(
        &mut self,
        pending: PendingTurn,
        outcome: Result<String, ClientError>,
    ) -> Result<(), ClientError> {
        if !self.is_current(&pending) {
            debug!(turn = pending.turn, current = self.turn, "Dropped reply to stale turn");
            return Err(ClientError::StaleTurn);
        }
        self.state = StoreState::Idle;

        match outcome {
            Ok(text) => {
                self.history.push(Message::assistant(text));
                if let Some(message) = self.history.last() {
                    self.view.show_message(message);
                }
                Ok(())
            }
            Err(e) => {
                self.view.show_error(&e);
                Err(e)
            }
        }
    }

    /// Give up on the pending turn without a reply
    ///
    /// The user message stays in the history, as after a failed call.
    pub fn cancel_turn(&mut self, pending: PendingTurn) -> Result<(), ClientError> {
        if !self.is_current(&pending) {
            return Err(ClientError::StaleTurn);
        }
        self.turn += 1;
        self.state = StoreState::Idle;
        Ok(())
    }

    /// Run one full turn against the relay
    pub async fn submit(&mut self, prompt: impl Into<String>) -> Result<(), ClientError> {
        let pending = match self.begin_turn(prompt) {
            Ok(pending) => pending,
            Err(e) => {
                self.view.show_error(&e);
                return Err(e);
            }
        };

        let outcome = self.relay.generate(pending.request()).await;
        self.finish_turn(pending, outcome)
    }

    /// Start a fresh session with the same credential
    pub fn reset(&mut self) {
        self.history.clear();
        self.turn += 1;
        self.state = StoreState::Idle;
    }
}
