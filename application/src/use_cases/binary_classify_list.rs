//! Binary classify list use case
//!
//! Decides for every item whether it matches a criterion.

use super::shared::{FanOut, base_variables, bool_field, complete_each, system_message};
use crate::config::AgentOptions;
use crate::ports::completion_client::StructuredCompletionClient;
use crate::ports::progress::{NoProgress, ProgressNotifier};
use agentm_domain::schema::catalog;
use agentm_domain::{AgentResult, BinaryClassifiedItem, PromptTemplate};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

/// Input for the BinaryClassifyList use case
#[derive(Debug, Clone)]
pub struct BinaryClassifyListInput<T> {
    /// The criterion each item is tested against
    pub goal: String,
    pub items: Vec<T>,
    pub options: AgentOptions,
}

impl<T> BinaryClassifyListInput<T> {
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

/// Use case for binary classification of a list
pub struct BinaryClassifyListUseCase<C: StructuredCompletionClient + ?Sized> {
    client: Arc<C>,
}

impl<C: StructuredCompletionClient + ?Sized> BinaryClassifyListUseCase<C> {
    pub fn new(client: Arc<C>) -> Self {
        Self { client }
    }

    pub async fn execute<T: Serialize>(
        &self,
        input: BinaryClassifyListInput<T>,
    ) -> AgentResult<Vec<BinaryClassifiedItem<T>>> {
        self.execute_with_progress(input, &NoProgress).await
    }

    pub async fn execute_with_progress<T: Serialize>(
        &self,
        input: BinaryClassifyListInput<T>,
        progress: &dyn ProgressNotifier,
    ) -> AgentResult<Vec<BinaryClassifiedItem<T>>> {
        info!("Binary classifying {} items", input.items.len());

        let system = system_message(
            PromptTemplate::binary_classify_system(),
            &base_variables(&input.goal, &input.options),
        );
        let schema = catalog::binary_classification();

        let outputs = complete_each(
            self.client.as_ref(),
            &input.items,
            FanOut {
                operation: "binary-classify",
                system: &system,
                item_template: PromptTemplate::indexed_item(),
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
                Ok(BinaryClassifiedItem {
                    item,
                    matches: bool_field(&output, "matches")?,
                })
            })
            .collect()
    }
}
