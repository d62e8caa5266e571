//! Fan-out/fan-in driver for per-item completions.

use super::limiter::ConcurrencyLimiter;
use crate::ports::progress::{NoProgress, ProgressNotifier};
use agentm_domain::{AgentError, AgentResult};
use futures::StreamExt;
use futures::stream::FuturesUnordered;
use serde::{Deserialize, Serialize};
use std::future::Future;
use tracing::{debug, warn};

/// Which failure is reported when several item tasks fail.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorReporting {
    /// The first failure to settle wins, whatever its index
    #[default]
    FirstSettled,
    /// Wait for every task, then report the failure with the lowest index
    LowestIndex,
}

/// Applies one task per item through a [`ConcurrencyLimiter`].
///
/// All tasks are submitted up front and awaited together on the current
/// task; results are written into slots aligned with the input order. Once a
/// task fails the aggregate is failed: in-flight siblings still run to
/// completion but their results are discarded.
pub struct ItemTaskRunner<'a> {
    limiter: &'a ConcurrencyLimiter,
    error_reporting: ErrorReporting,
    progress: &'a dyn ProgressNotifier,
    operation: &'a str,
}

impl<'a> ItemTaskRunner<'a> {
    pub fn new(limiter: &'a ConcurrencyLimiter) -> Self {
        Self {
            limiter,
            error_reporting: ErrorReporting::default(),
            progress: &NoProgress,
            operation: "items",
        }
    }

    pub fn with_error_reporting(mut self, error_reporting: ErrorReporting) -> Self {
        self.error_reporting = error_reporting;
        self
    }

    pub fn with_progress(mut self, operation: &'a str, progress: &'a dyn ProgressNotifier) -> Self {
        self.operation = operation;
        self.progress = progress;
        self
    }

    /// Run `task(index, item)` for every item.
    ///
    /// Returns one result per item in input order, or the first failure
    /// according to the configured [`ErrorReporting`].
    pub async fn run<T, R, F, Fut>(&self, items: &[T], task: F) -> AgentResult<Vec<R>>
    where
        F: Fn(usize, &T) -> Fut,
        Fut: Future<Output = AgentResult<R>>,
    {
        let total = items.len();
        self.progress.on_start(self.operation, total);

        let task = &task;
        let mut pending: FuturesUnordered<_> = items
            .iter()
            .enumerate()
            .map(|(index, item)| async move {
                let result = self.limiter.run(|| task(index, item)).await;
                (index, result)
            })
            .collect();

        let mut slots: Vec<Option<R>> = std::iter::repeat_with(|| None).take(total).collect();
        let mut failure: Option<(usize, AgentError)> = None;

        while let Some((index, result)) = pending.next().await {
            self.progress
                .on_item_complete(self.operation, index, result.is_ok());
            match result {
                Ok(value) => {
                    if failure.is_none() {
                        slots[index] = Some(value);
                    }
                }
                Err(err) => {
                    debug!("{} task {} of {} failed: {}", self.operation, index, total, err);
                    let replace = match (&failure, self.error_reporting) {
                        (None, _) => true,
                        (Some((first, _)), ErrorReporting::LowestIndex) => index < *first,
                        (Some(_), ErrorReporting::FirstSettled) => false,
                    };
                    if replace {
                        failure = Some((index, err));
                    }
                    // Results that settle after a failure are discarded.
                    slots.clear();
                }
            }
        }

        if let Some((index, err)) = failure {
            warn!("{} failed at item {}: {}", self.operation, index, err);
            self.progress.on_finish(self.operation, false);
            return Err(err);
        }

        self.progress.on_finish(self.operation, true);
        let values: Option<Vec<R>> = slots.into_iter().collect();
        values.ok_or_else(|| {
            AgentError::InvalidRequest(format!("{} produced an incomplete result set", self.operation))
        })
    }
}
