//! Bounded-parallelism task gate.

use super::should_continue::ShouldContinue;
use agentm_domain::{AgentError, AgentResult};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::debug;

/// Default permit count: fully serial.
pub const DEFAULT_MAX_CONCURRENT: usize = 1;

/// Admits at most `max_concurrent` tasks at a time.
///
/// Waiting tasks are admitted in submission order (the underlying semaphore
/// is FIFO fair). The permit is held only while the task future runs and is
/// released when it settles or is dropped, before the next waiter is
/// admitted, so a limiter of one never deadlocks on re-entry from a later
/// task.
#[derive(Debug, Clone)]
pub struct ConcurrencyLimiter {
    semaphore: Arc<Semaphore>,
    max_concurrent: usize,
    should_continue: ShouldContinue,
}

impl ConcurrencyLimiter {
    /// `max_concurrent` is clamped to at least one.
    pub fn new(max_concurrent: usize) -> Self {
        let max_concurrent = max_concurrent.max(1);
        Self {
            semaphore: Arc::new(Semaphore::new(max_concurrent)),
            max_concurrent,
            should_continue: ShouldContinue::always(),
        }
    }

    pub fn with_should_continue(mut self, should_continue: ShouldContinue) -> Self {
        self.should_continue = should_continue;
        self
    }

    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }

    pub fn should_continue(&self) -> &ShouldContinue {
        &self.should_continue
    }

    /// Run `task` once a permit is available.
    ///
    /// Returns [`AgentError::Cancelled`] without invoking `task` when the
    /// cancellation predicate is false, either at submission or at the
    /// moment the permit would be granted.
    pub async fn run<F, Fut, T>(&self, task: F) -> AgentResult<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = AgentResult<T>>,
    {
        if !self.should_continue.check() {
            return Err(AgentError::Cancelled);
        }

        let permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| AgentError::Cancelled)?;

        if !self.should_continue.check() {
            drop(permit);
            debug!("Task rejected at admission: cancelled");
            return Err(AgentError::Cancelled);
        }

        let result = task().await;
        drop(permit);
        result
    }
}

impl Default for ConcurrencyLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CONCURRENT)
    }
}
