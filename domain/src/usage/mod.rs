//! Usage accounting value objects.
//!
//! A [`UsageRecord`] is appended to the usage store after every successful
//! completion. Cost is derived from a [`ModelPricing`] entry.

use crate::completion::value_objects::TokenUsage;
use serde::{Deserialize, Serialize};

/// Per-token prices for one model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelPricing {
    pub model: String,
    pub price_per_prompt_token: f64,
    pub price_per_completion_token: f64,
}

impl ModelPricing {
    pub fn new(model: impl Into<String>, prompt: f64, completion: f64) -> Self {
        Self {
            model: model.into(),
            price_per_prompt_token: prompt,
            price_per_completion_token: completion,
        }
    }

    pub fn cost(&self, usage: &TokenUsage) -> f64 {
        usage.prompt_tokens as f64 * self.price_per_prompt_token
            + usage.completion_tokens as f64 * self.price_per_completion_token
    }
}

/// One append-only usage row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageRecord {
    pub session_id: String,
    pub model: String,
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,
    pub price_per_prompt_token: f64,
    pub price_per_completion_token: f64,
    pub total_cost: f64,
}

impl UsageRecord {
    /// Build a record, pricing it with `pricing` when known (free otherwise).
    pub fn new(
        session_id: impl Into<String>,
        model: impl Into<String>,
        usage: TokenUsage,
        pricing: Option<&ModelPricing>,
    ) -> Self {
        let (prompt_price, completion_price) = pricing
            .map(|p| (p.price_per_prompt_token, p.price_per_completion_token))
            .unwrap_or((0.0, 0.0));
        Self {
            session_id: session_id.into(),
            model: model.into(),
            prompt_tokens: usage.prompt_tokens,
            completion_tokens: usage.completion_tokens,
            total_tokens: usage.total_tokens,
            price_per_prompt_token: prompt_price,
            price_per_completion_token: completion_price,
            total_cost: pricing.map(|p| p.cost(&usage)).unwrap_or(0.0),
        }
    }
}

/// Aggregated usage for one session, or for the whole store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UsageSummary {
    /// `None` when the totals span every session
    pub session_id: Option<String>,
    pub requests: u64,
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,
    pub total_cost: f64,
}
