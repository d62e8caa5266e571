//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted to domain types where needed.

mod agents;
mod pricing;
mod provider;
mod usage;

pub use agents::FileAgentsConfig;
pub use pricing::{FilePricingEntry, default_pricing};
pub use provider::FileProviderConfig;
pub use usage::{FileUsageConfig, UsageBackend};

use agentm_domain::ModelPricing;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigValidationError {
    #[error("agents.parallel_completions must be at least 1")]
    InvalidParallelism,

    #[error("provider.timeout_seconds cannot be 0")]
    InvalidTimeout,

    #[error("provider.model cannot be empty")]
    EmptyModelName,

    #[error("pricing entry {index} has an empty model name")]
    EmptyPricingModel { index: usize },
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Model provider settings
    pub provider: FileProviderConfig,
    /// Defaults for agent runs
    pub agents: FileAgentsConfig,
    /// Usage accounting
    pub usage: FileUsageConfig,
    /// Per-model token prices
    pub pricing: Vec<FilePricingEntry>,
}

impl FileConfig {
    /// Validate the entire configuration, returning every detected issue.
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut issues = Vec::new();

        if self.agents.parallel_completions == 0 {
            issues.push(ConfigValidationError::InvalidParallelism);
        }
        if self.provider.timeout_seconds == Some(0) {
            issues.push(ConfigValidationError::InvalidTimeout);
        }
        if self.provider.model.trim().is_empty() {
            issues.push(ConfigValidationError::EmptyModelName);
        }
        for (index, entry) in self.pricing.iter().enumerate() {
            if entry.model.trim().is_empty() {
                issues.push(ConfigValidationError::EmptyPricingModel { index });
            }
        }

        issues
    }

    /// Render the effective configuration as TOML (for `show-config`).
    ///
    /// The API key is masked.
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        let mut masked = self.clone();
        if masked.provider.api_key.is_some() {
            masked.provider.api_key = Some("********".to_string());
        }
        toml::to_string_pretty(&masked)
    }

    /// Pricing for `model`: configured entries first, then the built-in table.
    pub fn pricing_for(&self, model: &str) -> Option<ModelPricing> {
        self.pricing
            .iter()
            .find(|p| p.model == model)
            .map(ModelPricing::from)
            .or_else(|| {
                default_pricing()
                    .iter()
                    .find(|p| p.model == model)
                    .map(ModelPricing::from)
            })
    }
}
