//! Chain of thought use case
//!
//! Answers a single question, keeping the model's explanation.

use super::shared::{string_field, structured_request, system_message};
use crate::config::AgentOptions;
use crate::ports::completion_client::StructuredCompletionClient;
use agentm_domain::schema::catalog;
use agentm_domain::{AgentError, AgentResult, ExplainedAnswer, Message, PromptTemplate, PromptVariables};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// Input for the ChainOfThought use case
#[derive(Debug, Clone)]
pub struct ChainOfThoughtInput {
    pub question: String,
    pub options: AgentOptions,
}

impl ChainOfThoughtInput {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            options: AgentOptions::default(),
        }
    }

    pub fn with_options(mut self, options: AgentOptions) -> Self {
        self.options = options;
        self
    }
}

/// Use case for answering a question with an explanation
pub struct ChainOfThoughtUseCase<C: StructuredCompletionClient + ?Sized> {
    client: Arc<C>,
}

impl<C: StructuredCompletionClient + ?Sized> ChainOfThoughtUseCase<C> {
    pub fn new(client: Arc<C>) -> Self {
        Self { client }
    }

    pub async fn execute(&self, input: ChainOfThoughtInput) -> AgentResult<ExplainedAnswer> {
        let variables =
            PromptVariables::new().with("instructions", input.options.instructions_block());
        let system = system_message(PromptTemplate::chain_of_thought_system(), &variables);
        complete_explained(
            self.client.as_ref(),
            &system,
            Message::user(input.question),
            &input.options,
        )
        .await
    }
}

/// One explained-answer completion, shared with the grounded answer agent.
pub(crate) async fn complete_explained<C: StructuredCompletionClient + ?Sized>(
    client: &C,
    system: &Message,
    prompt: Message,
    options: &AgentOptions,
) -> AgentResult<ExplainedAnswer> {
    if !options.should_continue.check() {
        return Err(AgentError::Cancelled);
    }
    let request = structured_request(system, prompt, &catalog::explained_answer(), options);
    let output: Value = client.complete(request).await?.value;
    debug!("Explained answer received");
    Ok(ExplainedAnswer {
        explanation: string_field(&output, "explanation")?,
        answer: string_field(&output, "answer")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::concurrency::ShouldContinue;
    use crate::use_cases::test_support::ScriptedClient;
    use serde_json::json;

    #[tokio::test]
    async fn test_keeps_explanation() {
        let client = Arc::new(ScriptedClient::constant(
            json!({"explanation": "17 * 3 = 51", "answer": "51"}),
        ));
        let use_case = ChainOfThoughtUseCase::new(client.clone());

        let answer = use_case
            .execute(ChainOfThoughtInput::new("What is 17 times 3?"))
            .await
            .unwrap();

        assert_eq!(
            answer,
            ExplainedAnswer {
                explanation: "17 * 3 = 51".to_string(),
                answer: "51".to_string(),
            }
        );
        let request = &client.calls()[0];
        assert_eq!(request.prompt.content, "What is 17 times 3?");
        assert!(request.history.is_empty());
    }

    #[tokio::test]
    async fn test_cancelled_before_call() {
        let client = Arc::new(ScriptedClient::constant(json!({})));
        let use_case = ChainOfThoughtUseCase::new(client.clone());
        let options = AgentOptions::default().with_should_continue(ShouldContinue::from_fn(|| false));

        let result = use_case
            .execute(ChainOfThoughtInput::new("why?").with_options(options))
            .await;

        assert_eq!(result, Err(AgentError::Cancelled));
        assert_eq!(client.call_count(), 0);
    }
}
