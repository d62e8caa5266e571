//! Progress notification port
//!
//! Defines the interface for reporting progress while an agent runs.

/// Callback for progress updates during an agent run
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (progress bars, plain text, ...).
pub trait ProgressNotifier: Send + Sync {
    /// Called once before any task is submitted
    fn on_start(&self, operation: &str, total_tasks: usize);

    /// Called whenever one item task (or one sort comparison) settles
    fn on_item_complete(&self, operation: &str, index: usize, success: bool);

    /// Called once the aggregate result is known
    fn on_finish(&self, operation: &str, success: bool);
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl ProgressNotifier for NoProgress {
    fn on_start(&self, _operation: &str, _total_tasks: usize) {}
    fn on_item_complete(&self, _operation: &str, _index: usize, _success: bool) {}
    fn on_finish(&self, _operation: &str, _success: bool) {}
}
