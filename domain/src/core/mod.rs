//! Core domain concepts shared across all subdomains.
//!
//! - [`error::AgentError`]: the failure taxonomy every agent reports
//! - [`error::AgentResult`]: completed/failed result of an agent run

pub mod error;
