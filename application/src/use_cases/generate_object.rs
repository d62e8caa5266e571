//! Generate object use case
//!
//! Produces one JSON object that conforms to a caller schema.

use super::shared::system_message;
use crate::config::AgentOptions;
use crate::ports::completion_client::{CompletionRequest, StructuredCompletionClient};
use agentm_domain::{AgentError, AgentResult, Message, OutputSchema, PromptTemplate, PromptVariables};
use serde_json::Value;
use std::sync::Arc;

/// Input for the GenerateObject use case
#[derive(Debug, Clone)]
pub struct GenerateObjectInput {
    /// What to generate
    pub goal: String,
    pub schema: OutputSchema,
    /// Optional reference material placed ahead of the instructions
    pub context: Option<String>,
    pub options: AgentOptions,
}

impl GenerateObjectInput {
    pub fn new(goal: impl Into<String>, schema: OutputSchema) -> Self {
        Self {
            goal: goal.into(),
            schema,
            context: None,
            options: AgentOptions::default(),
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_options(mut self, options: AgentOptions) -> Self {
        self.options = options;
        self
    }
}

/// Use case for generating a schema-conformant object
pub struct GenerateObjectUseCase<C: StructuredCompletionClient + ?Sized> {
    client: Arc<C>,
}

impl<C: StructuredCompletionClient + ?Sized> GenerateObjectUseCase<C> {
    pub fn new(client: Arc<C>) -> Self {
        Self { client }
    }

    pub async fn execute(&self, input: GenerateObjectInput) -> AgentResult<Value> {
        if !input.schema.schema.is_object() {
            return Err(AgentError::InvalidRequest(format!(
                "schema '{}' is not a JSON object",
                input.schema.name
            )));
        }
        if !input.options.should_continue.check() {
            return Err(AgentError::Cancelled);
        }

        let context = input
            .context
            .as_deref()
            .filter(|c| !c.is_empty())
            .map(|c| format!("<CONTEXT>\n{}\n\n", c))
            .unwrap_or_default();
        let variables = PromptVariables::new()
            .with("context", context)
            .with("instructions", input.options.instructions_block());
        let system = system_message(PromptTemplate::generate_object_system(), &variables);

        let request = CompletionRequest::new(Message::user(input.goal))
            .with_system(system)
            .with_schema(input.schema)
            .with_temperature(input.options.temperature)
            .with_max_tokens(input.options.max_tokens);
        Ok(self.client.complete(request).await?.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::test_support::ScriptedClient;
    use serde_json::json;

    fn person_schema() -> OutputSchema {
        OutputSchema::strict_object(
            "person",
            json!({"name": {"type": "string"}, "age": {"type": "integer"}}),
        )
    }

    #[tokio::test]
    async fn test_returns_generated_object() {
        let client = Arc::new(ScriptedClient::constant(json!({"name": "Ada", "age": 36})));
        let use_case = GenerateObjectUseCase::new(client.clone());

        let value = use_case
            .execute(GenerateObjectInput::new("a famous mathematician", person_schema()))
            .await
            .unwrap();

        assert_eq!(value, json!({"name": "Ada", "age": 36}));
        let request = &client.calls()[0];
        assert_eq!(request.prompt.content, "a famous mathematician");
        assert_eq!(request.format.schema().unwrap().name, "person");
        assert!(request.system.as_ref().unwrap().content.starts_with("<INSTRUCTIONS>"));
    }

    #[tokio::test]
    async fn test_context_prefixes_system_prompt() {
        let client = Arc::new(ScriptedClient::constant(json!({"name": "Grace", "age": 85})));
        let use_case = GenerateObjectUseCase::new(client.clone());

        use_case
            .execute(
                GenerateObjectInput::new("the person described", person_schema())
                    .with_context("Grace Hopper, 1906-1992"),
            )
            .await
            .unwrap();

        let calls = client.calls();
        let system = &calls[0].system.as_ref().unwrap().content;
        assert!(system.starts_with("<CONTEXT>\nGrace Hopper, 1906-1992\n\n<INSTRUCTIONS>"));
    }

    #[tokio::test]
    async fn test_non_object_schema_rejected() {
        let client = Arc::new(ScriptedClient::constant(json!({})));
        let use_case = GenerateObjectUseCase::new(client.clone());

        let result = use_case
            .execute(GenerateObjectInput::new("x", OutputSchema::new("bad", json!("string"))))
            .await;

        assert!(matches!(result, Err(AgentError::InvalidRequest(_))));
        assert_eq!(client.call_count(), 0);
    }
}
