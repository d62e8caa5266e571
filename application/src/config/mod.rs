//! Application-level configuration.
//!
//! - [`AgentOptions`]: sampling, instructions, parallelism and cancellation
//!   shared by every agent

pub mod agent_options;

pub use agent_options::AgentOptions;
