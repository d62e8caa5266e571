//! Classify list use case
//!
//! Assigns each item one of a fixed set of categories.

use super::shared::{FanOut, base_variables, complete_each, string_field, system_message};
use crate::config::AgentOptions;
use crate::ports::completion_client::StructuredCompletionClient;
use crate::ports::progress::{NoProgress, ProgressNotifier};
use agentm_domain::schema::catalog;
use agentm_domain::{AgentError, AgentResult, ClassifiedItem, PromptTemplate};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

/// Input for the ClassifyList use case
#[derive(Debug, Clone)]
pub struct ClassifyListInput<T> {
    pub goal: String,
    pub items: Vec<T>,
    /// Allowed categories; the model's answer is constrained to these
    pub categories: Vec<String>,
    pub options: AgentOptions,
}

impl<T> ClassifyListInput<T> {
    pub fn new(goal: impl Into<String>, items: Vec<T>, categories: Vec<String>) -> Self {
        Self {
            goal: goal.into(),
            items,
            categories,
            options: AgentOptions::default(),
        }
    }

    pub fn with_options(mut self, options: AgentOptions) -> Self {
        self.options = options;
        self
    }
}

/// Use case for classifying every item of a list
pub struct ClassifyListUseCase<C: StructuredCompletionClient + ?Sized> {
    client: Arc<C>,
}

impl<C: StructuredCompletionClient + ?Sized> ClassifyListUseCase<C> {
    pub fn new(client: Arc<C>) -> Self {
        Self { client }
    }

    pub async fn execute<T: Serialize>(
        &self,
        input: ClassifyListInput<T>,
    ) -> AgentResult<Vec<ClassifiedItem<T>>> {
        self.execute_with_progress(input, &NoProgress).await
    }

    pub async fn execute_with_progress<T: Serialize>(
        &self,
        input: ClassifyListInput<T>,
        progress: &dyn ProgressNotifier,
    ) -> AgentResult<Vec<ClassifiedItem<T>>> {
        if input.categories.is_empty() {
            return Err(AgentError::InvalidRequest(
                "classify requires at least one category".to_string(),
            ));
        }
        info!(
            "Classifying {} items into {} categories",
            input.items.len(),
            input.categories.len()
        );

        let variables = base_variables(&input.goal, &input.options)
            .with("categories", PromptTemplate::categories_block(&input.categories));
        let system = system_message(PromptTemplate::classify_system(), &variables);
        let schema = catalog::classification(&input.categories);

        let outputs = complete_each(
            self.client.as_ref(),
            &input.items,
            FanOut {
                operation: "classify",
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
                Ok(ClassifiedItem {
                    item,
                    category: string_field(&output, "category")?,
                })
            })
            .collect()
    }
}
