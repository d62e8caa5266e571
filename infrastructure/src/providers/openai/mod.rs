//! OpenAI chat completions provider
//!
//! Bearer-token access to OpenAI or any server exposing the same
//! `/chat/completions` API.

mod adapter;
mod types;

pub use adapter::OpenAiChatProvider;
