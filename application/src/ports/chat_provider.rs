//! Chat provider port
//!
//! Defines the raw boundary to a chat-completion provider. The structured
//! completion client sits on top of this port and turns provider responses
//! into validated values or typed failures.

use agentm_domain::{AgentError, FinishReason, Message, ResponseFormat, TokenUsage};
use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur while talking to a provider
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Request failed with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Could not decode provider response: {0}")]
    Decode(String),

    #[error("Timeout")]
    Timeout,

    #[error("Missing credentials: {0}")]
    MissingCredentials(String),
}

impl From<ProviderError> for AgentError {
    fn from(err: ProviderError) -> Self {
        AgentError::Transport(err.to_string())
    }
}

/// One request to the provider.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub temperature: f32,
    pub max_tokens: u32,
    pub response_format: ResponseFormat,
}

/// The provider's answer to a [`ChatRequest`].
#[derive(Debug, Clone, PartialEq)]
pub struct ChatResponse {
    pub finish_reason: FinishReason,
    pub content: Option<String>,
    pub refusal: Option<String>,
    pub usage: Option<TokenUsage>,
}

impl ChatResponse {
    /// A normally finished response with the given content
    pub fn stop(content: impl Into<String>) -> Self {
        Self {
            finish_reason: FinishReason::Stop,
            content: Some(content.into()),
            refusal: None,
            usage: None,
        }
    }

    pub fn with_usage(mut self, usage: TokenUsage) -> Self {
        self.usage = Some(usage);
        self
    }
}

/// Gateway to a chat-completion provider
///
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Whether `model` supports schema-constrained decoding natively.
    fn supports_structured_output(&self, model: &str) -> bool;

    /// Send one chat request.
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, ProviderError>;
}
