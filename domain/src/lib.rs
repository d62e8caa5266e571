//! Domain layer for agentm
//!
//! This crate contains the core value types shared by the list agents.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## List agents
//!
//! A list agent turns one *goal* plus an ordered list of items into many
//! model calls: one per item (classify, filter, map, ...) or one per pairwise
//! comparison (sort). Every call asks for structured output that includes a
//! free-text `explanation` field, which is dropped from the final results.
//!
//! ## Results
//!
//! - [`CompletionOutcome`]: success or failure of a single completion
//! - [`AgentResult`]: completed or failed result of a whole agent run

pub mod agent;
pub mod completion;
pub mod core;
pub mod prompt;
pub mod schema;
pub mod session;
pub mod usage;

// Re-export commonly used types
pub use agent::entities::{
    BinaryClassifiedItem, ClassifiedItem, ExplainedAnswer, MappedItem, ProjectedItem,
    SortDecision, SummarizedItem,
};
pub use completion::value_objects::{
    Completion, CompletionOutcome, FinishReason, ResponseFormat, TokenUsage, UsageDetails,
};
pub use core::error::{AgentError, AgentResult, ErrorKind};
pub use prompt::{PromptTemplate, PromptVariables, compose_prompt, variable_to_string};
pub use schema::{EXPLANATION_FIELD, OutputSchema, strip_explanation};
pub use session::entities::{Message, Role, assemble_messages};
pub use usage::{ModelPricing, UsageRecord, UsageSummary};
