//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod chat_provider;
pub mod completion_client;
pub mod progress;
pub mod usage_recorder;
