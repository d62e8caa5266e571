//! Grounded answer use case
//!
//! Answers a question using only the supplied context.

use super::chain_of_thought::complete_explained;
use super::shared::system_message;
use crate::config::AgentOptions;
use crate::ports::completion_client::StructuredCompletionClient;
use agentm_domain::{AgentResult, ExplainedAnswer, Message, PromptTemplate, PromptVariables};
use std::sync::Arc;

/// Input for the GroundedAnswer use case
#[derive(Debug, Clone)]
pub struct GroundedAnswerInput {
    pub question: String,
    /// The only information the answer may draw on
    pub context: String,
    pub options: AgentOptions,
}

impl GroundedAnswerInput {
    pub fn new(question: impl Into<String>, context: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            context: context.into(),
            options: AgentOptions::default(),
        }
    }

    pub fn with_options(mut self, options: AgentOptions) -> Self {
        self.options = options;
        self
    }
}

/// Use case for answering from a given context
pub struct GroundedAnswerUseCase<C: StructuredCompletionClient + ?Sized> {
    client: Arc<C>,
}

impl<C: StructuredCompletionClient + ?Sized> GroundedAnswerUseCase<C> {
    pub fn new(client: Arc<C>) -> Self {
        Self { client }
    }

    pub async fn execute(&self, input: GroundedAnswerInput) -> AgentResult<ExplainedAnswer> {
        let variables = PromptVariables::new()
            .with("context", input.context.as_str())
            .with("instructions", input.options.instructions_block());
        let system = system_message(PromptTemplate::grounded_answer_system(), &variables);
        complete_explained(
            self.client.as_ref(),
            &system,
            Message::user(input.question),
            &input.options,
        )
        .await
    }
}
