//! Structured completion client over a [`ChatProvider`].
//!
//! Builds the message sequence, asks for schema-constrained output when the
//! model supports it (plain JSON mode otherwise), maps finish reasons onto
//! the failure taxonomy, validates the parsed output locally and reports
//! token usage.

use crate::ports::chat_provider::{ChatProvider, ChatRequest, ChatResponse};
use crate::ports::completion_client::{CompletionRequest, StructuredCompletionClient};
use crate::ports::usage_recorder::{NoUsageRecorder, UsageRecorder};
use agentm_domain::core::error::INCOMPLETE_MESSAGE;
use agentm_domain::{
    AgentError, Completion, CompletionOutcome, FinishReason, ModelPricing, OutputSchema,
    ResponseFormat, TokenUsage, UsageDetails, UsageRecord, assemble_messages,
};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// [`StructuredCompletionClient`] backed by a chat provider
pub struct ProviderCompletionClient<P: ChatProvider + ?Sized> {
    provider: Arc<P>,
    model: String,
    retry_malformed_output: bool,
    usage: Arc<dyn UsageRecorder>,
    session_id: String,
    pricing: Option<ModelPricing>,
}

impl<P: ChatProvider + ?Sized> ProviderCompletionClient<P> {
    pub fn new(provider: Arc<P>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            retry_malformed_output: false,
            usage: Arc::new(NoUsageRecorder),
            session_id: String::new(),
            pricing: None,
        }
    }

    /// Retry once when the model output fails to parse or validate
    pub fn with_retry_malformed_output(mut self, retry: bool) -> Self {
        self.retry_malformed_output = retry;
        self
    }

    pub fn with_usage_recorder(
        mut self,
        recorder: Arc<dyn UsageRecorder>,
        session_id: impl Into<String>,
    ) -> Self {
        self.usage = recorder;
        self.session_id = session_id.into();
        self
    }

    pub fn with_pricing(mut self, pricing: Option<ModelPricing>) -> Self {
        self.pricing = pricing;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn chat_request(&self, request: &CompletionRequest) -> ChatRequest {
        // Without native schema support the provider only gets JSON mode and
        // the schema is enforced locally.
        let response_format = match &request.format {
            ResponseFormat::JsonSchema(schema)
                if !self.provider.supports_structured_output(&self.model) =>
            {
                debug!(
                    "Model {} lacks structured output; validating schema '{}' locally",
                    self.model, schema.name
                );
                ResponseFormat::JsonObject
            }
            other => other.clone(),
        };

        ChatRequest {
            model: self.model.clone(),
            messages: assemble_messages(
                request.system.as_ref(),
                &request.history,
                &request.prompt,
            ),
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            response_format,
        }
    }

    async fn attempt(&self, request: &CompletionRequest) -> CompletionOutcome {
        let response = self.provider.chat(self.chat_request(request)).await?;
        let usage = response.usage;
        let outcome = interpret_response(response, &request.format);
        if outcome.is_ok() {
            self.record_usage(usage);
        }
        outcome
    }

    fn record_usage(&self, usage: Option<TokenUsage>) {
        if let Some(usage) = usage {
            let record = UsageRecord::new(
                self.session_id.clone(),
                self.model.clone(),
                usage,
                self.pricing.as_ref(),
            );
            self.usage.record_usage(&record);
        }
    }
}

#[async_trait]
impl<P: ChatProvider + ?Sized> StructuredCompletionClient for ProviderCompletionClient<P> {
    async fn complete(&self, request: CompletionRequest) -> CompletionOutcome {
        let outcome = match self.attempt(&request).await {
            Err(err) if err.is_retryable() && self.retry_malformed_output => {
                debug!("Retrying malformed completion once: {}", err);
                self.attempt(&request).await
            }
            other => other,
        };

        if let Err(err) = &outcome {
            warn!("Completion with {} failed ({}): {}", self.model, err.kind(), err);
        }
        outcome
    }
}

/// Map a provider response onto a completion outcome.
pub fn interpret_response(response: ChatResponse, format: &ResponseFormat) -> CompletionOutcome {
    if let Some(refusal) = response.refusal.filter(|r| !r.is_empty()) {
        return Err(AgentError::ModelRefusal(refusal));
    }

    match response.finish_reason {
        FinishReason::Stop => {}
        FinishReason::Length => return Err(AgentError::too_long()),
        FinishReason::ContentFilter => return Err(AgentError::content_filtered()),
        FinishReason::ToolCall | FinishReason::Unknown => {
            return Err(AgentError::MalformedOutput(INCOMPLETE_MESSAGE.to_string()));
        }
    }

    let content = response.content.unwrap_or_default();
    let value = parse_output(&content, format)?;

    let completion = Completion::new(value);
    Ok(match response.usage {
        Some(usage) => completion.with_usage(UsageDetails {
            input_tokens: usage.prompt_tokens,
            output_tokens: usage.completion_tokens,
            finish_reason: response.finish_reason,
        }),
        None => completion,
    })
}

/// Parse raw model content according to the requested format.
pub fn parse_output(content: &str, format: &ResponseFormat) -> Result<Value, AgentError> {
    match format {
        ResponseFormat::Text => Ok(Value::String(content.to_string())),
        ResponseFormat::JsonObject => parse_json_object(content),
        ResponseFormat::JsonSchema(schema) => {
            let value = parse_json_object(content)?;
            validate_against(&value, schema)?;
            Ok(value)
        }
    }
}

fn parse_json_object(content: &str) -> Result<Value, AgentError> {
    let value: Value = serde_json::from_str(strip_code_fence(content))
        .map_err(|e| AgentError::MalformedOutput(format!("invalid JSON: {}", e)))?;
    if !value.is_object() {
        return Err(AgentError::MalformedOutput(
            "expected a JSON object".to_string(),
        ));
    }
    Ok(value)
}

/// Models in JSON mode occasionally wrap the object in a markdown fence.
fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.strip_suffix("```"))
        .map(str::trim)
        .unwrap_or(trimmed)
}

/// Validate `value` against the schema body of `schema`.
pub fn validate_against(value: &Value, schema: &OutputSchema) -> Result<(), AgentError> {
    let validator = jsonschema::validator_for(&schema.schema).map_err(|e| {
        AgentError::InvalidRequest(format!("schema '{}' is invalid: {}", schema.name, e))
    })?;
    validator.validate(value).map_err(|e| {
        AgentError::MalformedOutput(format!(
            "output does not match schema '{}': {}",
            schema.name, e
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::chat_provider::ProviderError;
    use agentm_domain::schema::catalog;
    use agentm_domain::{ErrorKind, Message, Role};
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    // === Mock implementations ===

    struct ScriptedProvider {
        structured: bool,
        responses: Mutex<VecDeque<Result<ChatResponse, ProviderError>>>,
        requests: Mutex<Vec<ChatRequest>>,
    }

    impl ScriptedProvider {
        fn new(structured: bool, responses: Vec<Result<ChatResponse, ProviderError>>) -> Self {
            Self {
                structured,
                responses: Mutex::new(VecDeque::from(responses)),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn request_count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl ChatProvider for ScriptedProvider {
        fn supports_structured_output(&self, _model: &str) -> bool {
            self.structured
        }

        async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, ProviderError> {
            self.requests.lock().unwrap().push(request);
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Err(ProviderError::ConnectionError("script exhausted".into())))
        }
    }

    #[derive(Default)]
    struct RecordingUsage {
        records: Mutex<Vec<UsageRecord>>,
    }

    impl UsageRecorder for RecordingUsage {
        fn record_usage(&self, record: &UsageRecord) {
            self.records.lock().unwrap().push(record.clone());
        }
    }

    fn decision_request() -> CompletionRequest {
        CompletionRequest::new(Message::user("<ITEM>\nApple"))
            .with_system(Message::system("filter"))
            .with_history(vec![Message::user("h1"), Message::assistant("h2")])
            .with_schema(catalog::filter_decision())
    }

    #[tokio::test]
    async fn test_success_parses_and_validates() {
        let provider = Arc::new(ScriptedProvider::new(
            true,
            vec![Ok(ChatResponse::stop(
                r#"{"explanation": "healthy", "remove_item": false}"#,
            )
            .with_usage(TokenUsage::new(40, 12)))],
        ));
        let client = ProviderCompletionClient::new(provider.clone(), "gpt-4o-mini");

        let completion = client.complete(decision_request()).await.unwrap();
        assert_eq!(completion.value["remove_item"], json!(false));
        let usage = completion.usage.unwrap();
        assert_eq!(usage.input_tokens, 40);
        assert_eq!(usage.output_tokens, 12);
        assert_eq!(usage.finish_reason, FinishReason::Stop);
    }

    #[tokio::test]
    async fn test_message_order_and_native_schema() {
        let provider = Arc::new(ScriptedProvider::new(
            true,
            vec![Ok(ChatResponse::stop(
                r#"{"explanation": "x", "remove_item": true}"#,
            ))],
        ));
        let client = ProviderCompletionClient::new(provider.clone(), "gpt-4o-mini");
        client.complete(decision_request()).await.unwrap();

        let requests = provider.requests.lock().unwrap();
        let roles: Vec<Role> = requests[0].messages.iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![Role::System, Role::User, Role::Assistant, Role::User]
        );
        assert!(matches!(
            requests[0].response_format,
            ResponseFormat::JsonSchema(_)
        ));
    }

    #[tokio::test]
    async fn test_falls_back_to_json_mode_and_validates_locally() {
        let provider = Arc::new(ScriptedProvider::new(
            false,
            vec![Ok(ChatResponse::stop(r#"{"explanation": "x"}"#))],
        ));
        let client = ProviderCompletionClient::new(provider.clone(), "llama3");

        let err = client.complete(decision_request()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedOutput);
        assert_eq!(
            provider.requests.lock().unwrap()[0].response_format,
            ResponseFormat::JsonObject
        );
    }

    #[test]
    fn test_finish_reasons_map_to_taxonomy() {
        let cases = vec![
            (FinishReason::Length, ErrorKind::TooLong),
            (FinishReason::ContentFilter, ErrorKind::ContentFiltered),
            (FinishReason::ToolCall, ErrorKind::MalformedOutput),
            (FinishReason::Unknown, ErrorKind::MalformedOutput),
        ];
        for (reason, kind) in cases {
            let response = ChatResponse {
                finish_reason: reason,
                content: Some("{}".into()),
                refusal: None,
                usage: None,
            };
            let err = interpret_response(response, &ResponseFormat::JsonObject).unwrap_err();
            assert_eq!(err.kind(), kind, "{:?}", reason);
        }
    }

    #[test]
    fn test_refusal_takes_precedence() {
        let response = ChatResponse {
            finish_reason: FinishReason::Stop,
            content: None,
            refusal: Some("I can't help with that.".into()),
            usage: None,
        };
        let err = interpret_response(response, &ResponseFormat::JsonObject).unwrap_err();
        assert_eq!(err, AgentError::ModelRefusal("I can't help with that.".into()));
    }

    #[tokio::test]
    async fn test_transport_error() {
        let provider = Arc::new(ScriptedProvider::new(
            true,
            vec![Err(ProviderError::Timeout)],
        ));
        let client = ProviderCompletionClient::new(provider, "gpt-4o-mini");
        let err = client.complete(decision_request()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TransportError);
    }

    #[tokio::test]
    async fn test_malformed_output_retried_once_when_configured() {
        let provider = Arc::new(ScriptedProvider::new(
            true,
            vec![
                Ok(ChatResponse::stop("not json")),
                Ok(ChatResponse::stop(
                    r#"{"explanation": "x", "remove_item": true}"#,
                )),
            ],
        ));
        let client = ProviderCompletionClient::new(provider.clone(), "gpt-4o-mini")
            .with_retry_malformed_output(true);

        let completion = client.complete(decision_request()).await.unwrap();
        assert_eq!(completion.value["remove_item"], json!(true));
        assert_eq!(provider.request_count(), 2);
    }

    #[tokio::test]
    async fn test_malformed_output_retried_at_most_once() {
        let provider = Arc::new(ScriptedProvider::new(
            true,
            vec![
                Ok(ChatResponse::stop("nope")),
                Ok(ChatResponse::stop("still nope")),
                Ok(ChatResponse::stop(
                    r#"{"explanation": "x", "remove_item": true}"#,
                )),
            ],
        ));
        let client = ProviderCompletionClient::new(provider.clone(), "gpt-4o-mini")
            .with_retry_malformed_output(true);

        let err = client.complete(decision_request()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedOutput);
        assert_eq!(provider.request_count(), 2);
    }

    #[tokio::test]
    async fn test_no_retry_by_default_or_for_other_errors() {
        let provider = Arc::new(ScriptedProvider::new(
            true,
            vec![Ok(ChatResponse::stop("nope"))],
        ));
        let client = ProviderCompletionClient::new(provider.clone(), "gpt-4o-mini");
        assert!(client.complete(decision_request()).await.is_err());
        assert_eq!(provider.request_count(), 1);

        let provider = Arc::new(ScriptedProvider::new(
            true,
            vec![Err(ProviderError::Timeout), Ok(ChatResponse::stop("{}"))],
        ));
        let client = ProviderCompletionClient::new(provider.clone(), "gpt-4o-mini")
            .with_retry_malformed_output(true);
        assert!(client.complete(decision_request()).await.is_err());
        assert_eq!(provider.request_count(), 1);
    }

    #[tokio::test]
    async fn test_usage_is_recorded_with_pricing() {
        let provider = Arc::new(ScriptedProvider::new(
            true,
            vec![Ok(ChatResponse::stop(
                r#"{"explanation": "x", "remove_item": true}"#,
            )
            .with_usage(TokenUsage::new(100, 50)))],
        ));
        let recorder = Arc::new(RecordingUsage::default());
        let client = ProviderCompletionClient::new(provider, "gpt-4o-mini")
            .with_usage_recorder(recorder.clone(), "session-1")
            .with_pricing(Some(ModelPricing::new("gpt-4o-mini", 0.001, 0.002)));

        client.complete(decision_request()).await.unwrap();

        let records = recorder.records.lock().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].session_id, "session-1");
        assert_eq!(records[0].total_tokens, 150);
        assert!((records[0].total_cost - 0.2).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_failed_completions_record_no_usage() {
        let cut_off = ChatResponse {
            finish_reason: FinishReason::Length,
            content: Some("{\"explanation\": \"trunc".into()),
            refusal: None,
            usage: Some(TokenUsage::new(900, 100)),
        };
        let provider = Arc::new(ScriptedProvider::new(
            true,
            vec![
                Ok(cut_off),
                Ok(ChatResponse::stop("not json").with_usage(TokenUsage::new(10, 5))),
            ],
        ));
        let recorder = Arc::new(RecordingUsage::default());
        let client = ProviderCompletionClient::new(provider, "gpt-4o-mini")
            .with_usage_recorder(recorder.clone(), "session-1");

        let err = client.complete(decision_request()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TooLong);
        let err = client.complete(decision_request()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedOutput);

        assert!(recorder.records.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_retried_completion_records_only_the_success() {
        let provider = Arc::new(ScriptedProvider::new(
            true,
            vec![
                Ok(ChatResponse::stop("nope").with_usage(TokenUsage::new(10, 5))),
                Ok(ChatResponse::stop(r#"{"explanation": "x", "remove_item": false}"#)
                    .with_usage(TokenUsage::new(20, 8))),
            ],
        ));
        let recorder = Arc::new(RecordingUsage::default());
        let client = ProviderCompletionClient::new(provider, "gpt-4o-mini")
            .with_retry_malformed_output(true)
            .with_usage_recorder(recorder.clone(), "session-1");

        client.complete(decision_request()).await.unwrap();

        let records = recorder.records.lock().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].total_tokens, 28);
    }

    #[test]
    fn test_text_format_returns_string() {
        let value = parse_output("plain answer", &ResponseFormat::Text).unwrap();
        assert_eq!(value, json!("plain answer"));
    }

    #[test]
    fn test_code_fenced_json_is_accepted() {
        let value = parse_output(
            "```json\n{\"answer\": 1}\n```",
            &ResponseFormat::JsonObject,
        )
        .unwrap();
        assert_eq!(value, json!({"answer": 1}));
    }

    #[test]
    fn test_json_array_is_rejected() {
        let err = parse_output("[1, 2]", &ResponseFormat::JsonObject).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedOutput);
    }

    #[test]
    fn test_enum_violation_is_malformed() {
        let err = parse_output(
            r#"{"explanation": "x", "sort_item_a": "SIDEWAYS"}"#,
            &ResponseFormat::JsonSchema(catalog::sort_decision()),
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedOutput);
    }
}
