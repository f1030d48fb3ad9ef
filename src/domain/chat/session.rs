//! The chat transcript.

use serde::Serialize;

use super::message::{ChatMessage, ChatRole};
use crate::domain::foundation::{MessageId, ValidationError};

/// Ordered, append-only chat transcript.
///
/// The only in-place mutation allowed is rewriting the content of the most
/// recently appended message when it is an assistant reply; that is what the
/// reveal does. Messages are addressed by id, so a stale id (for example
/// after [`ChatSession::clear`]) is rejected instead of touching a different
/// message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ChatSession {
    messages: Vec<ChatMessage>,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a message and returns its id.
    pub fn append(&mut self, message: ChatMessage) -> MessageId {
        let id = message.id;
        self.messages.push(message);
        id
    }

    pub fn append_user(&mut self, content: impl Into<String>) -> MessageId {
        self.append(ChatMessage::user(content))
    }

    pub fn append_assistant(&mut self, content: impl Into<String>) -> MessageId {
        self.append(ChatMessage::assistant(content))
    }

    /// Replaces the content of the reply currently being revealed.
    ///
    /// # Errors
    ///
    /// `id` must name the last message and that message must be an
    /// assistant reply.
    pub fn set_reply_content(
        &mut self,
        id: MessageId,
        content: impl Into<String>,
    ) -> Result<(), ValidationError> {
        match self.messages.last_mut() {
            Some(last) if last.id == id && last.role == ChatRole::Assistant => {
                last.content = content.into();
                Ok(())
            }
            Some(last) if last.id == id => Err(ValidationError::invalid_format(
                "message_id",
                format!("message {} is not an assistant reply", id),
            )),
            _ => Err(ValidationError::invalid_format(
                "message_id",
                format!("message {} is not the latest message", id),
            )),
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn get(&self, id: MessageId) -> Option<&ChatMessage> {
        self.messages.iter().find(|m| m.id == id)
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Drops the whole transcript.
    pub fn clear(&mut self) {
        self.messages.clear();
    }
}
