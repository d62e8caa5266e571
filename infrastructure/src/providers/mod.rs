//! Model provider adapters implementing the `ChatProvider` port.

pub mod openai;

pub use openai::OpenAiChatProvider;
