//! Port for usage accounting.
//!
//! Defines the [`UsageRecorder`] trait the completion client appends
//! [`UsageRecord`]s through after each successful completion. The core never
//! reads the store back.

use agentm_domain::UsageRecord;

/// Port for appending usage records to an external store.
///
/// The `record_usage` method is intentionally synchronous and non-fallible:
/// a failing store must not fail the completion that produced the record.
/// Implementations log their own write failures.
pub trait UsageRecorder: Send + Sync {
    fn record_usage(&self, record: &UsageRecord);
}

/// No-op implementation for tests and when accounting is disabled.
pub struct NoUsageRecorder;

impl UsageRecorder for NoUsageRecorder {
    fn record_usage(&self, _record: &UsageRecord) {}
}
