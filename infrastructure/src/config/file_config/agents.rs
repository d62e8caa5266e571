//! Agent defaults from TOML (`[agents]` section)

use serde::{Deserialize, Serialize};

/// Defaults applied to every agent run started from the CLI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAgentsConfig {
    /// Maximum in-flight completions per operation
    pub parallel_completions: usize,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Retry once when the model output does not parse or validate
    pub retry_malformed_output: bool,
    /// Message cap for reduce history
    pub max_history: usize,
}

impl Default for FileAgentsConfig {
    fn default() -> Self {
        Self {
            parallel_completions: 1,
            temperature: 0.0,
            max_tokens: 1000,
            retry_malformed_output: false,
            max_history: 8,
        }
    }
}
