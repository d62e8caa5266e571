//! Per-model token prices from TOML (`[[pricing]]` tables)

use agentm_domain::ModelPricing;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilePricingEntry {
    pub model: String,
    pub price_per_prompt_token: f64,
    pub price_per_completion_token: f64,
}

impl From<&FilePricingEntry> for ModelPricing {
    fn from(entry: &FilePricingEntry) -> Self {
        ModelPricing::new(
            entry.model.clone(),
            entry.price_per_prompt_token,
            entry.price_per_completion_token,
        )
    }
}

/// Prices shipped with the binary; `[[pricing]]` entries override them by model.
pub fn default_pricing() -> Vec<FilePricingEntry> {
    vec![
        FilePricingEntry {
            model: "gpt-4o-mini".to_string(),
            price_per_prompt_token: 0.000_000_15,
            price_per_completion_token: 0.000_000_6,
        },
        FilePricingEntry {
            model: "gpt-4o-mini-2024-07-18".to_string(),
            price_per_prompt_token: 0.000_000_15,
            price_per_completion_token: 0.000_000_6,
        },
        FilePricingEntry {
            model: "gpt-4o-2024-08-06".to_string(),
            price_per_prompt_token: 0.000_002_5,
            price_per_completion_token: 0.000_01,
        },
    ]
}
