//! Shared utilities for use cases.
//!
//! Prompt assembly, item serialization, output field extraction and the
//! per-item fan-out used by every list agent.

use crate::concurrency::ItemTaskRunner;
use crate::config::AgentOptions;
use crate::ports::completion_client::{CompletionRequest, StructuredCompletionClient};
use crate::ports::progress::ProgressNotifier;
use agentm_domain::{
    AgentError, AgentResult, Message, OutputSchema, PromptVariables, compose_prompt,
};
use serde::Serialize;
use serde_json::Value;

/// Serialize a caller item into the value substituted for `{{item}}`.
pub(crate) fn item_value<T: Serialize>(item: &T) -> AgentResult<Value> {
    serde_json::to_value(item)
        .map_err(|e| AgentError::InvalidRequest(format!("item cannot be serialized: {}", e)))
}

pub(crate) fn item_values<T: Serialize>(items: &[T]) -> AgentResult<Vec<Value>> {
    items.iter().map(item_value).collect()
}

/// Variables every system prompt starts from: the goal and the instructions slot.
pub(crate) fn base_variables(goal: &str, options: &AgentOptions) -> PromptVariables {
    PromptVariables::new()
        .with("goal", goal)
        .with("instructions", options.instructions_block())
}

pub(crate) fn system_message(template: &str, variables: &PromptVariables) -> Message {
    Message::system(compose_prompt(template, variables))
}

/// User prompt for one item, carrying its 0-based index and the list length.
pub(crate) fn item_prompt(template: &str, index: usize, length: usize, item: &Value) -> Message {
    let variables = PromptVariables::new()
        .with("index", index)
        .with("length", length)
        .with("item", item.clone());
    Message::user(compose_prompt(template, &variables))
}

pub(crate) fn structured_request(
    system: &Message,
    prompt: Message,
    schema: &OutputSchema,
    options: &AgentOptions,
) -> CompletionRequest {
    CompletionRequest::new(prompt)
        .with_system(system.clone())
        .with_schema(schema.clone())
        .with_temperature(options.temperature)
        .with_max_tokens(options.max_tokens)
}

pub(crate) fn bool_field(value: &Value, field: &str) -> AgentResult<bool> {
    value
        .get(field)
        .and_then(Value::as_bool)
        .ok_or_else(|| missing_field(field, "boolean"))
}

pub(crate) fn string_field(value: &Value, field: &str) -> AgentResult<String> {
    value
        .get(field)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| missing_field(field, "string"))
}

fn missing_field(field: &str, expected: &str) -> AgentError {
    AgentError::MalformedOutput(format!("expected {} field '{}' in model output", expected, field))
}

/// Static inputs for one fan-out run.
pub(crate) struct FanOut<'a> {
    pub operation: &'a str,
    pub system: &'a Message,
    pub item_template: &'a str,
    pub schema: &'a OutputSchema,
    pub options: &'a AgentOptions,
}

/// Run one structured completion per item and return the raw outputs in
/// input order.
pub(crate) async fn complete_each<C, T>(
    client: &C,
    items: &[T],
    fan_out: FanOut<'_>,
    progress: &dyn ProgressNotifier,
) -> AgentResult<Vec<Value>>
where
    C: StructuredCompletionClient + ?Sized,
    T: Serialize,
{
    let values = item_values(items)?;
    let length = values.len();
    let limiter = fan_out.options.limiter();

    ItemTaskRunner::new(&limiter)
        .with_error_reporting(fan_out.options.error_reporting)
        .with_progress(fan_out.operation, progress)
        .run(&values, |index, item| {
            let prompt = item_prompt(fan_out.item_template, index, length, item);
            let request = structured_request(fan_out.system, prompt, fan_out.schema, fan_out.options);
            async move { client.complete(request).await.map(|completion| completion.value) }
        })
        .await
}
