//! Rendering seam between the conversation store and a UI shell

use super::{ClientError, Message};

/// Receives everything the user should see
pub trait ChatView {
    /// A message was added to the history
    fn show_message(&mut self, message: &Message);

    /// A turn failed; the history is unchanged
    fn show_error(&mut self, error: &ClientError);
}
