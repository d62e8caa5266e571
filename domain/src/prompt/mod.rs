//! Prompt domain
//!
//! Placeholder composition and the templates used by each list agent.

mod compose;
mod template;

pub use compose::{PromptVariables, compose_prompt, variable_to_string};
pub use template::PromptTemplate;
