//! Chat messages.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{MessageId, Timestamp};

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// A single message in the chat transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: MessageId,
    pub role: ChatRole,
    /// For assistant replies this grows while the reveal runs.
    pub content: String,
    pub created_at: Timestamp,
}

impl ChatMessage {
    pub fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            id: MessageId::new(),
            role,
            content: content.into(),
            created_at: Timestamp::now(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(ChatRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(ChatRole::Assistant, content)
    }

    pub fn is_user(&self) -> bool {
        self.role == ChatRole::User
    }

    pub fn is_assistant(&self) -> bool {
        self.role == ChatRole::Assistant
    }
}

/// Shown in place of an empty assistant reply.
pub const NO_RESPONSE_NOTICE: &str = "No response from server";

/// User-visible description of a failed chat request.
pub fn error_reply(reason: impl std::fmt::Display) -> String {
    format!("Error: {}", reason)
}

/// Canned prompts offered while the transcript is empty.
pub const SUGGESTED_QUESTIONS: [&str; 4] = [
    "Which port has the best potential?",
    "SWOT analysis for PAC",
    "Compare all 5 ports",
    "Strategy for 2025-2026",
];
