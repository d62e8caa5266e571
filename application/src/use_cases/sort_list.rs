//! Sort list use case
//!
//! A merge sort whose comparator is a structured completion. Both halves of
//! every split are sorted concurrently; all comparisons across the recursion
//! share one [`ConcurrencyLimiter`], so the bound caps in-flight model calls
//! for the whole sort, not per merge level.
//!
//! `EQUAL` is treated as `BEFORE`: the left head is taken, which keeps equal
//! items in their original relative order.

use super::shared::{base_variables, item_values, string_field, structured_request, system_message};
use crate::concurrency::ConcurrencyLimiter;
use crate::config::AgentOptions;
use crate::ports::completion_client::StructuredCompletionClient;
use crate::ports::progress::{NoProgress, ProgressNotifier};
use agentm_domain::schema::catalog;
use agentm_domain::{
    AgentError, AgentResult, Message, OutputSchema, PromptTemplate, PromptVariables, SortDecision,
    compose_prompt, variable_to_string,
};
use futures::future::{BoxFuture, FutureExt, try_join};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, info};

const OPERATION: &str = "sort";

/// Input for the SortList use case
#[derive(Debug, Clone)]
pub struct SortListInput<T> {
    /// The ordering criterion
    pub goal: String,
    pub items: Vec<T>,
    pub options: AgentOptions,
}

impl<T> SortListInput<T> {
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

/// Use case for sorting a list with model comparisons
pub struct SortListUseCase<C: StructuredCompletionClient + ?Sized> {
    client: Arc<C>,
}

impl<C: StructuredCompletionClient + ?Sized> SortListUseCase<C> {
    pub fn new(client: Arc<C>) -> Self {
        Self { client }
    }

    pub async fn execute<T: Serialize + Send + Sync>(&self, input: SortListInput<T>) -> AgentResult<Vec<T>> {
        self.execute_with_progress(input, &NoProgress).await
    }

    pub async fn execute_with_progress<T: Serialize + Send + Sync>(
        &self,
        input: SortListInput<T>,
        progress: &dyn ProgressNotifier,
    ) -> AgentResult<Vec<T>> {
        let length = input.items.len();
        info!("Sorting {} items", length);

        let values = item_values(&input.items)?;
        let entries: Vec<(T, Value)> = input.items.into_iter().zip(values).collect();

        let sorter = MergeSorter {
            client: self.client.as_ref(),
            system: system_message(
                PromptTemplate::sort_system(),
                &base_variables(&input.goal, &input.options),
            ),
            schema: catalog::sort_decision(),
            options: &input.options,
            limiter: input.options.limiter(),
            progress,
            comparisons: AtomicUsize::new(0),
        };

        progress.on_start(OPERATION, max_comparisons(length));
        let result = sorter.sort(entries).await;
        progress.on_finish(OPERATION, result.is_ok());

        let sorted = result?;
        debug!(
            "Sort finished after {} comparisons",
            sorter.comparisons.load(Ordering::SeqCst)
        );
        Ok(sorted.into_iter().map(|(item, _)| item).collect())
    }
}

/// Worst-case comparison count of a top-down merge sort over `n` items.
fn max_comparisons(n: usize) -> usize {
    if n < 2 {
        return 0;
    }
    let depth = (usize::BITS - (n - 1).leading_zeros()) as usize;
    n * depth - (1usize << depth) + 1
}

struct MergeSorter<'a, C: ?Sized> {
    client: &'a C,
    system: Message,
    schema: OutputSchema,
    options: &'a AgentOptions,
    limiter: ConcurrencyLimiter,
    progress: &'a dyn ProgressNotifier,
    comparisons: AtomicUsize,
}

impl<C: StructuredCompletionClient + ?Sized> MergeSorter<'_, C> {
    fn sort<'s, T>(&'s self, mut entries: Vec<(T, Value)>) -> BoxFuture<'s, AgentResult<Vec<(T, Value)>>>
    where
        T: Send + Sync + 's,
    {
        async move {
            if entries.len() < 2 {
                return Ok(entries);
            }
            let right = entries.split_off(entries.len() / 2);
            let (left, right) = try_join(self.sort(entries), self.sort(right)).await?;
            self.merge(left, right).await
        }
        .boxed()
    }

    async fn merge<T: Send + Sync>(
        &self,
        left: Vec<(T, Value)>,
        right: Vec<(T, Value)>,
    ) -> AgentResult<Vec<(T, Value)>> {
        let mut merged = Vec::with_capacity(left.len() + right.len());
        let mut left = left.into_iter().peekable();
        let mut right = right.into_iter().peekable();

        while let (Some((_, a)), Some((_, b))) = (left.peek(), right.peek()) {
            let decision = self.compare(a, b).await?;
            if decision.takes_left() {
                merged.extend(left.next());
            } else {
                merged.extend(right.next());
            }
        }

        // One side is exhausted; the other is already in order.
        merged.extend(left);
        merged.extend(right);
        Ok(merged)
    }

    async fn compare(&self, a: &Value, b: &Value) -> AgentResult<SortDecision> {
        let variables = PromptVariables::new().with("a", a.clone()).with("b", b.clone());
        let prompt = Message::user(compose_prompt(PromptTemplate::sort_pair(), &variables));
        let request = structured_request(&self.system, prompt, &self.schema, self.options);

        let result = self.limiter.run(|| self.client.complete(request)).await;
        let index = self.comparisons.fetch_add(1, Ordering::SeqCst);
        self.progress.on_item_complete(OPERATION, index, result.is_ok());

        let output = result?.value;
        let decision: SortDecision = string_field(&output, "sort_item_a")?
            .parse()
            .map_err(AgentError::MalformedOutput)?;

        if self.options.log_explanations {
            let explanation = output
                .get("explanation")
                .and_then(Value::as_str)
                .unwrap_or_default();
            info!(
                "{} is {} {} because {}",
                variable_to_string(a),
                decision,
                variable_to_string(b),
                explanation
            );
        }
        Ok(decision)
    }
}
