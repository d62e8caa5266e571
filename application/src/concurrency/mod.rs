//! Bounded fan-out of completion tasks.

pub mod item_runner;
pub mod limiter;
pub mod should_continue;

pub use item_runner::{ErrorReporting, ItemTaskRunner};
pub use limiter::{ConcurrencyLimiter, DEFAULT_MAX_CONCURRENT};
pub use should_continue::ShouldContinue;
