//! Structured completion port
//!
//! The single seam every agent talks through. One call is one model round
//! trip (plus at most one retry when the implementation is configured for
//! it) that yields a validated value or a typed failure.

use agentm_domain::{CompletionOutcome, Message, OutputSchema, ResponseFormat};
use async_trait::async_trait;
use std::sync::Arc;

/// Default sampling temperature for every agent
pub const DEFAULT_TEMPERATURE: f32 = 0.0;

/// Default output token budget for every agent
pub const DEFAULT_MAX_TOKENS: u32 = 1000;

/// Everything needed for one structured completion.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub system: Option<Message>,
    /// Earlier turns, oldest first
    pub history: Vec<Message>,
    pub prompt: Message,
    pub format: ResponseFormat,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl CompletionRequest {
    pub fn new(prompt: Message) -> Self {
        Self {
            system: None,
            history: Vec::new(),
            prompt,
            format: ResponseFormat::Text,
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    pub fn with_system(mut self, system: Message) -> Self {
        self.system = Some(system);
        self
    }

    pub fn with_history(mut self, history: Vec<Message>) -> Self {
        self.history = history;
        self
    }

    pub fn with_schema(mut self, schema: OutputSchema) -> Self {
        self.format = ResponseFormat::JsonSchema(schema);
        self
    }

    pub fn with_format(mut self, format: ResponseFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

/// Client that returns validated structured output or a typed failure
#[async_trait]
pub trait StructuredCompletionClient: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> CompletionOutcome;
}

#[async_trait]
impl<C: StructuredCompletionClient + ?Sized> StructuredCompletionClient for Arc<C> {
    async fn complete(&self, request: CompletionRequest) -> CompletionOutcome {
        (**self).complete(request).await
    }
}
