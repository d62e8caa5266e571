//! Infrastructure layer for agentm
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: the OpenAI-compatible chat provider and the
//! usage stores, plus configuration file loading.

pub mod config;
pub mod providers;
pub mod usage;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigValidationError, FileAgentsConfig, FileConfig, FilePricingEntry,
    FileProviderConfig, FileUsageConfig, UsageBackend,
};
pub use providers::OpenAiChatProvider;
pub use usage::{JsonlUsageStore, SqliteUsageStore, UsageStoreError};
