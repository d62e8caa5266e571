//! Output schema domain.
//!
//! - [`output_schema::OutputSchema`]: a named JSON schema plus the
//!   `explanation` merge step
//! - [`catalog`]: the schemas used by the built-in agents

pub mod catalog;
pub mod output_schema;

pub use output_schema::{EXPLANATION_FIELD, OutputSchema, strip_explanation};
