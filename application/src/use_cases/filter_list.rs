//! Filter list use case
//!
//! Asks the model, per item, whether the item should be removed and keeps
//! the survivors in their original relative order.

use super::shared::{FanOut, base_variables, bool_field, complete_each, system_message};
use crate::config::AgentOptions;
use crate::ports::completion_client::StructuredCompletionClient;
use crate::ports::progress::{NoProgress, ProgressNotifier};
use agentm_domain::schema::catalog;
use agentm_domain::{AgentResult, PromptTemplate};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

/// Input for the FilterList use case
#[derive(Debug, Clone)]
pub struct FilterListInput<T> {
    /// Describes which items to remove
    pub goal: String,
    pub items: Vec<T>,
    pub options: AgentOptions,
}

impl<T> FilterListInput<T> {
    pub fn new(goal: impl Into<String>, items: Vec<T>) -> Self {
        Self {
            goal: goal.into(),
            items,
            options: AgentOptions::default(),
        }
    }

    pub fn with_options(mut self, options: AgentOptions) -> Self {
        self.options = options;
        self
    }
}

/// Use case for filtering a list
pub struct FilterListUseCase<C: StructuredCompletionClient + ?Sized> {
    client: Arc<C>,
}

impl<C: StructuredCompletionClient + ?Sized> FilterListUseCase<C> {
    pub fn new(client: Arc<C>) -> Self {
        Self { client }
    }

    pub async fn execute<T: Serialize>(&self, input: FilterListInput<T>) -> AgentResult<Vec<T>> {
        self.execute_with_progress(input, &NoProgress).await
    }

    pub async fn execute_with_progress<T: Serialize>(
        &self,
        input: FilterListInput<T>,
        progress: &dyn ProgressNotifier,
    ) -> AgentResult<Vec<T>> {
        info!("Filtering {} items", input.items.len());

        let system = system_message(
            PromptTemplate::filter_system(),
            &base_variables(&input.goal, &input.options),
        );
        let schema = catalog::filter_decision();

        let outputs = complete_each(
            self.client.as_ref(),
            &input.items,
            FanOut {
                operation: "filter",
                system: &system,
                item_template: PromptTemplate::indexed_item(),
                schema: &schema,
                options: &input.options,
            },
            progress,
        )
        .await?;

        let mut kept = Vec::with_capacity(input.items.len());
        for (item, output) in input.items.into_iter().zip(outputs) {
            if !bool_field(&output, "remove_item")? {
                kept.push(item);
            }
        }
        info!("Filter kept {} items", kept.len());
        Ok(kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::test_support::{ScriptedClient, prompt_item};
    use agentm_domain::Completion;
    use serde_json::json;

    #[tokio::test]
    async fn test_keeps_survivors_in_order() {
        let client = Arc::new(ScriptedClient::new(|request| {
            let remove = prompt_item(request).parse::<i64>().unwrap() % 2 == 0;
            Ok(Completion::new(
                json!({"explanation": "parity", "remove_item": remove}),
            ))
        }));
        let use_case = FilterListUseCase::new(client);
        let input = FilterListInput::new("remove even numbers", vec![1, 2, 3, 4, 5, 6, 7])
            .with_options(AgentOptions::default().with_parallel_completions(4));

        let result = use_case.execute(input).await.unwrap();

        assert_eq!(result, vec![1, 3, 5, 7]);
    }

    #[tokio::test]
    async fn test_remove_everything() {
        let client = Arc::new(ScriptedClient::constant(
            json!({"explanation": "", "remove_item": true}),
        ));
        let use_case = FilterListUseCase::new(client);

        let result = use_case
            .execute(FilterListInput::new("remove all", vec!["a", "b"]))
            .await
            .unwrap();

        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_empty_input_makes_no_calls() {
        let client = Arc::new(ScriptedClient::constant(json!({})));
        let use_case = FilterListUseCase::new(client.clone());

        let result = use_case
            .execute(FilterListInput::<String>::new("anything", vec![]))
            .await
            .unwrap();

        assert!(result.is_empty());
        assert_eq!(client.call_count(), 0);
    }
}
