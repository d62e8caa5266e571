//! Presentation layer for agentm
//!
//! This crate contains CLI definitions, input reading, output formatters
//! and progress reporters.

pub mod cli;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use cli::commands::{Cli, Command, ErrorReportingArg, ListArgs, OutputFormat};
pub use cli::input::{read_items, read_text};
pub use output::console::ConsoleFormatter;
pub use progress::reporter::{ProgressReporter, SimpleProgress};
