//! Conversation transcript for one session.

use crate::types::ModelMessage;

/// Ordered, append-only message history.
///
/// Messages are never edited or removed individually; the only mutation
/// besides append is a wholesale reset.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    messages: Vec<ModelMessage>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message to the end.
    pub fn append(&mut self, message: ModelMessage) {
        self.messages.push(message);
    }

    /// Full ordered history.
    pub fn messages(&self) -> &[ModelMessage] {
        &self.messages
    }

    /// Clear the whole history.
    pub fn reset(&mut self) {
        self.messages.clear();
    }

    /// Number of messages.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
