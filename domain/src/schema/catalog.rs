//! Built-in output schemas for the list agents.
//!
//! Every schema here requires `explanation` next to the operation field.

use super::output_schema::OutputSchema;
use serde_json::json;

/// Values accepted for the sort decision field.
pub const SORT_DECISIONS: [&str; 3] = ["BEFORE", "EQUAL", "AFTER"];

pub fn binary_classification() -> OutputSchema {
    OutputSchema::strict_object(
        "classification",
        json!({
            "explanation": {"type": "string"},
            "matches": {"type": "boolean"}
        }),
    )
}

pub fn classification(categories: &[String]) -> OutputSchema {
    let category = if categories.is_empty() {
        json!({"type": "string"})
    } else {
        json!({"type": "string", "enum": categories})
    };
    OutputSchema::strict_object(
        "classification",
        json!({
            "explanation": {"type": "string"},
            "category": category
        }),
    )
}

pub fn filter_decision() -> OutputSchema {
    OutputSchema::strict_object(
        "decision",
        json!({
            "explanation": {"type": "string"},
            "remove_item": {"type": "boolean"}
        }),
    )
}

pub fn projection() -> OutputSchema {
    OutputSchema::strict_object(
        "projection",
        json!({
            "explanation": {"type": "string"},
            "projection": {"type": "string"}
        }),
    )
}

pub fn summarization() -> OutputSchema {
    OutputSchema::strict_object(
        "summarization",
        json!({
            "explanation": {"type": "string"},
            "summary": {"type": "string"}
        }),
    )
}

pub fn sort_decision() -> OutputSchema {
    OutputSchema::strict_object(
        "decision",
        json!({
            "explanation": {"type": "string"},
            "sort_item_a": {"type": "string", "enum": SORT_DECISIONS}
        }),
    )
}

pub fn explained_answer() -> OutputSchema {
    OutputSchema::strict_object(
        "answer",
        json!({
            "explanation": {"type": "string"},
            "answer": {"type": "string"}
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::output_schema::EXPLANATION_FIELD;

    #[test]
    fn test_every_builtin_schema_requires_explanation() {
        let schemas = vec![
            binary_classification(),
            classification(&["a".to_string()]),
            filter_decision(),
            projection(),
            summarization(),
            sort_decision(),
            explained_answer(),
        ];
        for schema in schemas {
            assert!(
                schema.is_required(EXPLANATION_FIELD),
                "{} is missing explanation",
                schema.name
            );
            assert_eq!(schema.required().len(), 2, "{}", schema.name);
        }
    }

    #[test]
    fn test_classification_enumerates_categories() {
        let schema = classification(&["fruit".to_string(), "vegetable".to_string()]);
        assert_eq!(
            schema.properties().unwrap()["category"]["enum"],
            json!(["fruit", "vegetable"])
        );
    }
}
