//! Reduce list use case
//!
//! A sequential left fold: each step's prompt depends on the previous
//! step's output, so items are processed one at a time. Recent prompt and
//! response pairs are replayed as history, capped at `max_history` messages
//! and evicted a whole exchange at a time.

use super::shared::{base_variables, item_prompt, item_values, system_message};
use crate::config::AgentOptions;
use crate::ports::completion_client::{CompletionRequest, StructuredCompletionClient};
use crate::ports::progress::{NoProgress, ProgressNotifier};
use agentm_domain::{
    AgentError, AgentResult, EXPLANATION_FIELD, Message, OutputSchema, PromptTemplate,
    strip_explanation, variable_to_string,
};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

const OPERATION: &str = "reduce";

/// Default number of history messages replayed to the model
pub const DEFAULT_MAX_HISTORY: usize = 8;

/// Smallest history cap: one prompt and its response
pub const MIN_MAX_HISTORY: usize = 2;

const REDUCTION_SCHEMA_NAME: &str = "reduction";

/// Input for the ReduceList use case
#[derive(Debug, Clone)]
pub struct ReduceListInput<T> {
    pub goal: String,
    pub items: Vec<T>,
    /// Seed output; must be a JSON object
    pub initial_value: Value,
    /// Schema of the output object; derived from `initial_value` when absent
    pub schema: Option<OutputSchema>,
    /// History cap in messages (floored at [`MIN_MAX_HISTORY`], odd caps
    /// round down to whole exchanges)
    pub max_history: usize,
    pub options: AgentOptions,
}

impl<T> ReduceListInput<T> {
    pub fn new(goal: impl Into<String>, items: Vec<T>, initial_value: Value) -> Self {
        Self {
            goal: goal.into(),
            items,
            initial_value,
            schema: None,
            max_history: DEFAULT_MAX_HISTORY,
            options: AgentOptions::default(),
        }
    }

    pub fn with_schema(mut self, schema: OutputSchema) -> Self {
        self.schema = Some(schema);
        self
    }

    pub fn with_max_history(mut self, max_history: usize) -> Self {
        self.max_history = max_history;
        self
    }

    pub fn with_options(mut self, options: AgentOptions) -> Self {
        self.options = options;
        self
    }

    /// The request schema with `explanation` merged in.
    fn request_schema(&self) -> AgentResult<OutputSchema> {
        let base = match &self.schema {
            Some(schema) => schema.clone(),
            None => OutputSchema::from_shape(REDUCTION_SCHEMA_NAME, &self.initial_value)
                .ok_or_else(|| {
                    AgentError::InvalidRequest("reduce initial value must be a JSON object".to_string())
                })?,
        };
        base.with_explanation().ok_or_else(|| {
            AgentError::InvalidRequest(format!("schema '{}' is not a JSON object", base.name))
        })
    }
}

/// Bounded, oldest-first conversation history.
#[derive(Debug, Clone)]
struct History {
    messages: Vec<Message>,
    cap: usize,
}

impl History {
    fn new(max_history: usize) -> Self {
        Self {
            messages: Vec::new(),
            cap: max_history.max(MIN_MAX_HISTORY) / 2 * 2,
        }
    }

    /// Append one exchange, evicting the oldest exchanges beyond the cap.
    fn push_exchange(&mut self, prompt: Message, response: Message) {
        self.messages.push(prompt);
        self.messages.push(response);
        while self.messages.len() > self.cap {
            self.messages.drain(..2);
        }
    }

    fn messages(&self) -> &[Message] {
        &self.messages
    }
}

/// Use case for folding a list into one object
pub struct ReduceListUseCase<C: StructuredCompletionClient + ?Sized> {
    client: Arc<C>,
}

impl<C: StructuredCompletionClient + ?Sized> ReduceListUseCase<C> {
    pub fn new(client: Arc<C>) -> Self {
        Self { client }
    }

    pub async fn execute<T: Serialize>(&self, input: ReduceListInput<T>) -> AgentResult<Value> {
        self.execute_with_progress(input, &NoProgress).await
    }

    pub async fn execute_with_progress<T: Serialize>(
        &self,
        input: ReduceListInput<T>,
        progress: &dyn ProgressNotifier,
    ) -> AgentResult<Value> {
        let schema = input.request_schema()?;
        let values = item_values(&input.items)?;
        let length = values.len();
        info!("Reducing {} items", length);

        let mut output = input.initial_value.clone();
        if let Some(fields) = output.as_object_mut() {
            fields.insert(
                EXPLANATION_FIELD.to_string(),
                PromptTemplate::explanation_placeholder().into(),
            );
        }
        let variables = base_variables(&input.goal, &input.options).with("output", output.clone());
        let system = system_message(PromptTemplate::reduce_system(), &variables);

        let mut history = History::new(input.max_history);
        progress.on_start(OPERATION, length);

        for (index, item) in values.iter().enumerate() {
            let prompt = item_prompt(PromptTemplate::indexed_item(), index, length, item);
            let request = CompletionRequest::new(prompt.clone())
                .with_system(system.clone())
                .with_history(history.messages().to_vec())
                .with_schema(schema.clone())
                .with_temperature(input.options.temperature)
                .with_max_tokens(input.options.max_tokens);

            let completion = match self.client.complete(request).await {
                Ok(completion) => completion,
                Err(err) => {
                    warn!("Reduce failed at item {}: {}", index, err);
                    progress.on_item_complete(OPERATION, index, false);
                    progress.on_finish(OPERATION, false);
                    return Err(err);
                }
            };
            // A cancellation observed after the call still discards its result.
            if !input.options.should_continue.check() {
                debug!("Reduce cancelled after item {}", index);
                progress.on_finish(OPERATION, false);
                return Err(AgentError::Cancelled);
            }

            output = completion.value;
            history.push_exchange(prompt, Message::assistant(variable_to_string(&output)));
            progress.on_item_complete(OPERATION, index, true);
        }

        progress.on_finish(OPERATION, true);
        Ok(strip_explanation(output))
    }
}
