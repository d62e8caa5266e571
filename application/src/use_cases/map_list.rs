//! Map list use case
//!
//! Transforms every item into a JSON object, described either by an example
//! shape or by a caller-supplied schema.

use super::shared::{FanOut, base_variables, complete_each, system_message};
use crate::config::AgentOptions;
use crate::ports::completion_client::StructuredCompletionClient;
use crate::ports::progress::{NoProgress, ProgressNotifier};
use agentm_domain::{
    AgentError, AgentResult, EXPLANATION_FIELD, MappedItem, OutputSchema, PromptTemplate,
    strip_explanation,
};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

const MAPPING_SCHEMA_NAME: &str = "mapping";
const MAPPING_EXPLANATION: &str = "<explanation supporting the mapping you did>";

/// Target of a map: what each mapped item should look like
#[derive(Debug, Clone, PartialEq)]
pub enum MapOutput {
    /// An example object; keys become required fields, values suggest types
    Shape(Value),
    /// An explicit schema for the mapped object
    Schema(OutputSchema),
}

impl MapOutput {
    /// The request schema with `explanation` merged in.
    pub fn request_schema(&self) -> AgentResult<OutputSchema> {
        let base = match self {
            MapOutput::Shape(shape) => OutputSchema::from_shape(MAPPING_SCHEMA_NAME, shape)
                .ok_or_else(|| {
                    AgentError::InvalidRequest("map shape must be a JSON object".to_string())
                })?,
            MapOutput::Schema(schema) => schema.clone(),
        };
        base.with_explanation().ok_or_else(|| {
            AgentError::InvalidRequest(format!("schema '{}' is not a JSON object", base.name))
        })
    }
}

/// Input for the MapList use case
#[derive(Debug, Clone)]
pub struct MapListInput<T> {
    pub goal: String,
    pub items: Vec<T>,
    pub output: MapOutput,
    pub options: AgentOptions,
}

impl<T> MapListInput<T> {
    pub fn new(goal: impl Into<String>, items: Vec<T>, output: MapOutput) -> Self {
        Self {
            goal: goal.into(),
            items,
            output,
            options: AgentOptions::default(),
        }
    }

    pub fn with_options(mut self, options: AgentOptions) -> Self {
        self.options = options;
        self
    }
}

/// Use case for mapping a list
pub struct MapListUseCase<C: StructuredCompletionClient + ?Sized> {
    client: Arc<C>,
}

impl<C: StructuredCompletionClient + ?Sized> MapListUseCase<C> {
    pub fn new(client: Arc<C>) -> Self {
        Self { client }
    }

    pub async fn execute<T: Serialize>(
        &self,
        input: MapListInput<T>,
    ) -> AgentResult<Vec<MappedItem<T>>> {
        self.execute_with_progress(input, &NoProgress).await
    }

    pub async fn execute_with_progress<T: Serialize>(
        &self,
        input: MapListInput<T>,
        progress: &dyn ProgressNotifier,
    ) -> AgentResult<Vec<MappedItem<T>>> {
        info!("Mapping {} items", input.items.len());

        let schema = input.output.request_schema()?;
        let variables = base_variables(&input.goal, &input.options);
        let system = match &input.output {
            MapOutput::Shape(shape) => {
                let mut output_shape = shape.clone();
                if let Some(fields) = output_shape.as_object_mut() {
                    fields.insert(EXPLANATION_FIELD.to_string(), MAPPING_EXPLANATION.into());
                }
                system_message(
                    PromptTemplate::map_shape_system(),
                    &variables.with("outputShape", output_shape),
                )
            }
            MapOutput::Schema(_) => system_message(PromptTemplate::map_schema_system(), &variables),
        };
        debug!("Map request schema strict={:?}", schema.strict);

        let outputs = complete_each(
            self.client.as_ref(),
            &input.items,
            FanOut {
                operation: "map",
                system: &system,
                item_template: PromptTemplate::indexed_item(),
                schema: &schema,
                options: &input.options,
            },
            progress,
        )
        .await?;

        Ok(input
            .items
            .into_iter()
            .zip(outputs)
            .map(|(item, output)| MappedItem {
                item,
                value: strip_explanation(output),
            })
            .collect())
    }
}
