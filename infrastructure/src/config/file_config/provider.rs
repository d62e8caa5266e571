//! Model provider configuration from TOML (`[provider]` section)

use serde::{Deserialize, Serialize};

/// OpenAI-compatible provider configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProviderConfig {
    /// Environment variable name for the API key (default: "OPENAI_API_KEY").
    pub api_key_env: String,
    /// Direct API key (not recommended, use the env var instead).
    pub api_key: Option<String>,
    /// Base URL of the API, up to and including the version segment.
    pub base_url: String,
    /// Sent as `OpenAI-Organization` when set.
    pub organization: Option<String>,
    /// Sent as `OpenAI-Project` when set.
    pub project: Option<String>,
    /// Model id used for every completion.
    pub model: String,
    /// Model ids that accept `response_format = json_schema`.
    pub structured_output_models: Vec<String>,
    /// Per-request timeout. `None` leaves the HTTP client default.
    pub timeout_seconds: Option<u64>,
}

impl Default for FileProviderConfig {
    fn default() -> Self {
        Self {
            api_key_env: "OPENAI_API_KEY".to_string(),
            api_key: None,
            base_url: "https://api.openai.com/v1".to_string(),
            organization: None,
            project: None,
            model: "gpt-4o-mini".to_string(),
            structured_output_models: vec![
                "gpt-4o-mini".to_string(),
                "gpt-4o-2024-08-06".to_string(),
                "gpt-4o-mini-2024-07-18".to_string(),
            ],
            timeout_seconds: None,
        }
    }
}

impl FileProviderConfig {
    /// Resolve the API key: explicit `api_key` first, then `api_key_env`.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|k| !k.is_empty())
            .or_else(|| std::env::var(&self.api_key_env).ok())
            .filter(|k| !k.is_empty())
    }

    pub fn supports_structured_output(&self, model: &str) -> bool {
        self.structured_output_models.iter().any(|m| m == model)
    }
}
