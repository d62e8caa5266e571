//! Wire types for the OpenAI chat completions API and their conversions
//!
//! Converts `ChatRequest` into the request body and the response body back
//! into a `ChatResponse`.

use agentm_application::{ChatRequest, ChatResponse};
use agentm_domain::{FinishReason, Message, OutputSchema, ResponseFormat, TokenUsage};
use serde::{Deserialize, Serialize};
use serde_json::Value;

// ─── Request ─────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct WireRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<WireMessage<'a>>,
    pub temperature: f32,
    pub max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<WireResponseFormat<'a>>,
}

#[derive(Debug, Serialize)]
pub struct WireMessage<'a> {
    pub role: &'static str,
    pub content: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WireResponseFormat<'a> {
    JsonObject,
    JsonSchema { json_schema: WireJsonSchema<'a> },
}

#[derive(Debug, Serialize)]
pub struct WireJsonSchema<'a> {
    pub name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'a str>,
    pub schema: &'a Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strict: Option<bool>,
}

impl<'a> From<&'a Message> for WireMessage<'a> {
    fn from(message: &'a Message) -> Self {
        Self {
            role: message.role.as_str(),
            content: &message.content,
        }
    }
}

impl<'a> From<&'a OutputSchema> for WireJsonSchema<'a> {
    fn from(schema: &'a OutputSchema) -> Self {
        Self {
            name: &schema.name,
            description: schema.description.as_deref(),
            schema: &schema.schema,
            strict: schema.strict,
        }
    }
}

/// Convert a port request into the wire body.
pub fn to_wire_request(request: &ChatRequest) -> WireRequest<'_> {
    let response_format = match &request.response_format {
        ResponseFormat::Text => None,
        ResponseFormat::JsonObject => Some(WireResponseFormat::JsonObject),
        ResponseFormat::JsonSchema(schema) => Some(WireResponseFormat::JsonSchema {
            json_schema: schema.into(),
        }),
    };

    WireRequest {
        model: &request.model,
        messages: request.messages.iter().map(WireMessage::from).collect(),
        temperature: request.temperature,
        max_tokens: request.max_tokens,
        response_format,
    }
}

// ─── Response ────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct WireResponse {
    #[serde(default)]
    pub choices: Vec<WireChoice>,
    pub usage: Option<WireUsage>,
}

#[derive(Debug, Deserialize)]
pub struct WireChoice {
    pub message: WireResponseMessage,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct WireResponseMessage {
    pub content: Option<String>,
    pub refusal: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct WireUsage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: Option<u64>,
}

impl From<WireUsage> for TokenUsage {
    fn from(usage: WireUsage) -> Self {
        let mut converted = TokenUsage::new(usage.prompt_tokens, usage.completion_tokens);
        if let Some(total) = usage.total_tokens {
            converted.total_tokens = total;
        }
        converted
    }
}

/// Convert the wire body into a port response.
///
/// Only the first choice is read. A body without choices becomes an
/// `Unknown` finish with no content.
pub fn from_wire_response(response: WireResponse) -> ChatResponse {
    let usage = response.usage.map(TokenUsage::from);
    match response.choices.into_iter().next() {
        Some(choice) => ChatResponse {
            finish_reason: FinishReason::from_wire(choice.finish_reason.as_deref()),
            content: choice.message.content,
            refusal: choice.message.refusal,
            usage,
        },
        None => ChatResponse {
            finish_reason: FinishReason::Unknown,
            content: None,
            refusal: None,
            usage,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(format: ResponseFormat) -> ChatRequest {
        ChatRequest {
            model: "gpt-4o-mini".to_string(),
            messages: vec![Message::system("be brief"), Message::user("hi")],
            temperature: 0.0,
            max_tokens: 1000,
            response_format: format,
        }
    }

    #[test]
    fn test_json_schema_request_body() {
        let schema = OutputSchema::strict_object("answer", json!({"answer": {"type": "string"}}));
        let req = request(ResponseFormat::JsonSchema(schema));
        let body = serde_json::to_value(to_wire_request(&req)).unwrap();

        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["messages"][0], json!({"role": "system", "content": "be brief"}));
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(body["response_format"]["type"], "json_schema");
        assert_eq!(body["response_format"]["json_schema"]["name"], "answer");
        assert_eq!(body["response_format"]["json_schema"]["strict"], true);
        assert!(body["response_format"]["json_schema"].get("description").is_none());
    }

    #[test]
    fn test_json_object_and_text_request_bodies() {
        let body = serde_json::to_value(to_wire_request(&request(ResponseFormat::JsonObject)))
            .unwrap();
        assert_eq!(body["response_format"], json!({"type": "json_object"}));

        let body = serde_json::to_value(to_wire_request(&request(ResponseFormat::Text))).unwrap();
        assert!(body.get("response_format").is_none());
    }

    #[test]
    fn test_response_conversion() {
        let wire: WireResponse = serde_json::from_value(json!({
            "id": "chatcmpl-1",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": "{\"a\":1}", "refusal": null},
                "finish_reason": "stop"
            }],
            "usage": {"prompt_tokens": 12, "completion_tokens": 3, "total_tokens": 15}
        }))
        .unwrap();

        let response = from_wire_response(wire);
        assert_eq!(response.finish_reason, FinishReason::Stop);
        assert_eq!(response.content.as_deref(), Some("{\"a\":1}"));
        assert!(response.refusal.is_none());
        assert_eq!(response.usage, Some(TokenUsage::new(12, 3)));
    }

    #[test]
    fn test_refusal_and_length_conversion() {
        let wire: WireResponse = serde_json::from_value(json!({
            "choices": [{
                "message": {"content": null, "refusal": "I can't help with that."},
                "finish_reason": "length"
            }]
        }))
        .unwrap();

        let response = from_wire_response(wire);
        assert_eq!(response.finish_reason, FinishReason::Length);
        assert_eq!(response.refusal.as_deref(), Some("I can't help with that."));
        assert!(response.usage.is_none());
    }

    #[test]
    fn test_empty_choices() {
        let wire: WireResponse = serde_json::from_value(json!({"choices": []})).unwrap();
        let response = from_wire_response(wire);
        assert_eq!(response.finish_reason, FinishReason::Unknown);
        assert!(response.content.is_none());
    }
}
