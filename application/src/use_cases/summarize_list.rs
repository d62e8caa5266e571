//! Summarize list use case

use super::shared::{FanOut, base_variables, complete_each, string_field, system_message};
use crate::config::AgentOptions;
use crate::ports::completion_client::StructuredCompletionClient;
use crate::ports::progress::{NoProgress, ProgressNotifier};
use agentm_domain::schema::catalog;
use agentm_domain::{AgentResult, PromptTemplate, SummarizedItem};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

/// Input for the SummarizeList use case
#[derive(Debug, Clone)]
pub struct SummarizeListInput<T> {
    pub goal: String,
    pub items: Vec<T>,
    pub options: AgentOptions,
}

impl<T> SummarizeListInput<T> {
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

/// Use case for summarizing every item of a list
pub struct SummarizeListUseCase<C: StructuredCompletionClient + ?Sized> {
    client: Arc<C>,
}

impl<C: StructuredCompletionClient + ?Sized> SummarizeListUseCase<C> {
    pub fn new(client: Arc<C>) -> Self {
        Self { client }
    }

    pub async fn execute<T: Serialize>(
        &self,
        input: SummarizeListInput<T>,
    ) -> AgentResult<Vec<SummarizedItem<T>>> {
        self.execute_with_progress(input, &NoProgress).await
    }

    pub async fn execute_with_progress<T: Serialize>(
        &self,
        input: SummarizeListInput<T>,
        progress: &dyn ProgressNotifier,
    ) -> AgentResult<Vec<SummarizedItem<T>>> {
        info!("Summarizing {} items", input.items.len());

        let system = system_message(
            PromptTemplate::summarize_system(),
            &base_variables(&input.goal, &input.options),
        );
        let schema = catalog::summarization();

        let outputs = complete_each(
            self.client.as_ref(),
            &input.items,
            FanOut {
                operation: "summarize",
                system: &system,
                item_template: PromptTemplate::plain_item(),
                schema: &schema,
                options: &input.options,
            },
            progress,
        )
        .await?;

        input
            .items
            .into_iter()
            .zip(outputs)
            .map(|(item, output)| {
                Ok(SummarizedItem {
                    item,
                    summary: string_field(&output, "summary")?,
                })
            })
            .collect()
    }
}
