use std::pin::Pin;

use async_trait::async_trait;
use futures::Stream;
use serde::{Deserialize, Serialize};

/// Finite, single-use sequence of reply fragments.
pub type FragmentStream = Pin<Box<dyn Stream<Item = Result<String, AssistantError>> + Send>>;

/// Who wrote a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Model,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub role: ChatRole,
    pub text: String,
}

/// A completed exchange turn sent back to the provider as context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub text: String,
}

/// Generative-text backend behind the housing assistant.
#[async_trait]
pub trait AssistantProvider: Send + Sync {
    /// Start a streamed reply to `message`, given the prior turns of the chat.
    async fn stream_reply(
        &self,
        history: &[ChatTurn],
        message: &str,
    ) -> Result<FragmentStream, AssistantError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AssistantError {
    #[error("assistant is not configured: GEMINI_API_KEY is not set")]
    NotConfigured,
    #[error("assistant authentication failed")]
    AuthenticationFailed,
    #[error("assistant service responded with {status}: {message}")]
    Status { status: u16, message: String },
    #[error("assistant network error: {0}")]
    Network(String),
    #[error("assistant returned an unreadable chunk: {0}")]
    Parse(String),
}

/// Stand-in used when no API key is configured; every request fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredProvider;

#[async_trait]
impl AssistantProvider for UnconfiguredProvider {
    async fn stream_reply(
        &self,
        _history: &[ChatTurn],
        _message: &str,
    ) -> Result<FragmentStream, AssistantError> {
        Err(AssistantError::NotConfigured)
    }
}
