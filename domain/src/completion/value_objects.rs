//! Completion value objects

use crate::core::error::AgentError;
use crate::schema::OutputSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Outcome of one structured completion attempt: `Ok` is *success*,
/// `Err` is *failure*.
pub type CompletionOutcome = Result<Completion, AgentError>;

/// Reason the provider stopped generating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    /// Natural end of response
    Stop,
    /// Hit the token or context limit
    Length,
    /// Output was withheld by the provider's content filter
    ContentFilter,
    /// The model asked to call a tool or function
    ToolCall,
    /// Anything else the provider reports
    Unknown,
}

impl FinishReason {
    /// Map a provider wire value onto the finish reason taxonomy.
    pub fn from_wire(value: Option<&str>) -> Self {
        match value {
            Some("stop") => FinishReason::Stop,
            Some("length") => FinishReason::Length,
            Some("content_filter") => FinishReason::ContentFilter,
            Some("tool_calls") | Some("function_call") => FinishReason::ToolCall,
            _ => FinishReason::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FinishReason::Stop => "stop",
            FinishReason::Length => "length",
            FinishReason::ContentFilter => "content_filter",
            FinishReason::ToolCall => "tool_call",
            FinishReason::Unknown => "unknown",
        }
    }
}

impl fmt::Display for FinishReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Token counts reported by a provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,
}

impl TokenUsage {
    pub fn new(prompt_tokens: u64, completion_tokens: u64) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        }
    }
}

/// Usage details reported alongside a successful completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageDetails {
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub finish_reason: FinishReason,
}

/// A successful completion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Completion {
    /// Parsed and validated model output
    pub value: Value,
    /// Token usage, when the provider reported it
    pub usage: Option<UsageDetails>,
}

impl Completion {
    pub fn new(value: Value) -> Self {
        Self { value, usage: None }
    }

    pub fn with_usage(mut self, usage: UsageDetails) -> Self {
        self.usage = Some(usage);
        self
    }
}

/// How the model output should be constrained and parsed.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", content = "schema", rename_all = "snake_case")]
pub enum ResponseFormat {
    /// Free text, returned as a JSON string value
    #[default]
    Text,
    /// Any JSON object
    JsonObject,
    /// A JSON object conforming to the schema
    JsonSchema(OutputSchema),
}

impl ResponseFormat {
    pub fn schema(&self) -> Option<&OutputSchema> {
        match self {
            ResponseFormat::JsonSchema(schema) => Some(schema),
            _ => None,
        }
    }

    pub fn expects_json(&self) -> bool {
        !matches!(self, ResponseFormat::Text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finish_reason_from_wire() {
        assert_eq!(FinishReason::from_wire(Some("stop")), FinishReason::Stop);
        assert_eq!(FinishReason::from_wire(Some("length")), FinishReason::Length);
        assert_eq!(
            FinishReason::from_wire(Some("content_filter")),
            FinishReason::ContentFilter
        );
        assert_eq!(
            FinishReason::from_wire(Some("function_call")),
            FinishReason::ToolCall
        );
        assert_eq!(FinishReason::from_wire(Some("eos")), FinishReason::Unknown);
        assert_eq!(FinishReason::from_wire(None), FinishReason::Unknown);
    }

    #[test]
    fn test_token_usage_total() {
        let usage = TokenUsage::new(120, 30);
        assert_eq!(usage.total_tokens, 150);
    }

    #[test]
    fn test_response_format_schema_accessor() {
        let schema = crate::schema::catalog::filter_decision();
        let format = ResponseFormat::JsonSchema(schema.clone());
        assert_eq!(format.schema(), Some(&schema));
        assert!(format.expects_json());
        assert!(!ResponseFormat::Text.expects_json());
        assert!(ResponseFormat::JsonObject.schema().is_none());
    }
}
