//! Project list use case
//!
//! Reformats each item with a caller template, guided by the goal.

use super::shared::{FanOut, base_variables, complete_each, string_field, system_message};
use crate::config::AgentOptions;
use crate::ports::completion_client::StructuredCompletionClient;
use crate::ports::progress::{NoProgress, ProgressNotifier};
use agentm_domain::schema::catalog;
use agentm_domain::{AgentResult, ProjectedItem, PromptTemplate};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

/// Input for the ProjectList use case
#[derive(Debug, Clone)]
pub struct ProjectListInput<T> {
    pub goal: String,
    pub items: Vec<T>,
    /// Free-text template the projection should follow
    pub template: String,
    pub options: AgentOptions,
}

impl<T> ProjectListInput<T> {
    pub fn new(goal: impl Into<String>, items: Vec<T>, template: impl Into<String>) -> Self {
        Self {
            goal: goal.into(),
            items,
            template: template.into(),
            options: AgentOptions::default(),
        }
    }

    pub fn with_options(mut self, options: AgentOptions) -> Self {
        self.options = options;
        self
    }
}

/// Use case for projecting a list through a template
pub struct ProjectListUseCase<C: StructuredCompletionClient + ?Sized> {
    client: Arc<C>,
}

impl<C: StructuredCompletionClient + ?Sized> ProjectListUseCase<C> {
    pub fn new(client: Arc<C>) -> Self {
        Self { client }
    }

    pub async fn execute<T: Serialize>(
        &self,
        input: ProjectListInput<T>,
    ) -> AgentResult<Vec<ProjectedItem<T>>> {
        self.execute_with_progress(input, &NoProgress).await
    }

    pub async fn execute_with_progress<T: Serialize>(
        &self,
        input: ProjectListInput<T>,
        progress: &dyn ProgressNotifier,
    ) -> AgentResult<Vec<ProjectedItem<T>>> {
        info!("Projecting {} items", input.items.len());

        let variables =
            base_variables(&input.goal, &input.options).with("template", input.template.as_str());
        let system = system_message(PromptTemplate::project_system(), &variables);
        let schema = catalog::projection();

        let outputs = complete_each(
            self.client.as_ref(),
            &input.items,
            FanOut {
                operation: "project",
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
                Ok(ProjectedItem {
                    item,
                    projection: string_field(&output, "projection")?,
                })
            })
            .collect()
    }
}
