//! Structured completion over a chat provider.

pub mod structured_client;

pub use structured_client::{ProviderCompletionClient, interpret_response, parse_output};
