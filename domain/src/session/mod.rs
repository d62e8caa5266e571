//! Conversation domain.
//!
//! - [`entities::Message`]: a single system, user or assistant message
//! - [`entities::assemble_messages`]: the canonical request ordering

pub mod entities;
