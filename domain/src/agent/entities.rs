//! Result items produced by the list agents.
//!
//! Each item pairs the caller's original payload with the field the model
//! returned for it. The `explanation` field never appears here.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinaryClassifiedItem<T> {
    pub item: T,
    pub matches: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedItem<T> {
    pub item: T,
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummarizedItem<T> {
    pub item: T,
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectedItem<T> {
    pub item: T,
    pub projection: String,
}

/// A mapped item: the original payload and the object the model produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappedItem<T> {
    pub item: T,
    pub value: Value,
}

/// Answer with its supporting explanation (chain of thought, grounded answer).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExplainedAnswer {
    pub explanation: String,
    pub answer: String,
}

/// Result of one pairwise sort comparison: where item A goes relative to B.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortDecision {
    Before,
    Equal,
    After,
}

impl SortDecision {
    /// `Equal` keeps the left item first, which keeps the merge stable.
    pub fn takes_left(&self) -> bool {
        matches!(self, SortDecision::Before | SortDecision::Equal)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortDecision::Before => "BEFORE",
            SortDecision::Equal => "EQUAL",
            SortDecision::After => "AFTER",
        }
    }
}

impl fmt::Display for SortDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortDecision {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BEFORE" => Ok(SortDecision::Before),
            "EQUAL" => Ok(SortDecision::Equal),
            "AFTER" => Ok(SortDecision::After),
            other => Err(format!("unknown sort decision: {}", other)),
        }
    }
}
