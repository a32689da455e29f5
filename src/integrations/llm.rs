//! Language model provider seam.
//!
//! The assistant only needs plain chat completion: a list of role-tagged
//! messages in, one text reply out. Implementations live next to this module
//! (`openai.rs`); tests use a scripted double.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::ChatMessage;

#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Sends the conversation and returns the assistant reply text.
    async fn chat(&self, messages: Vec<ChatMessage>) -> Result<String>;

    /// Short provider name for logs.
    fn name(&self) -> &'static str;
}
