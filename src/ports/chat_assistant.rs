//! Chat assistant port - the remote conversational model.
//!
//! The assistant is stateless from the client's point of view: each call
//! carries one user message and returns the complete reply text.

use async_trait::async_trait;

use super::ApiError;

/// Port for asking the backend assistant a question.
#[async_trait]
pub trait ChatAssistant: Send + Sync {
    /// Sends `message` (`POST /groq/chat`) and returns the full reply.
    ///
    /// An empty string means the backend answered without a reply.
    async fn ask(&self, message: &str) -> Result<String, ApiError>;
}
