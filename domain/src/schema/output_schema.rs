//! Named JSON schemas describing the structured output a model must return.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

/// Name of the chain-of-thought field every list-agent schema requires.
pub const EXPLANATION_FIELD: &str = "explanation";

/// A named JSON schema sent to the provider (or validated locally).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputSchema {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub schema: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strict: Option<bool>,
}

impl OutputSchema {
    pub fn new(name: impl Into<String>, schema: Value) -> Self {
        Self {
            name: name.into(),
            description: None,
            schema,
            strict: None,
        }
    }

    /// A strict object schema whose listed properties are all required.
    pub fn strict_object(name: impl Into<String>, properties: Value) -> Self {
        let required: Vec<Value> = properties
            .as_object()
            .map(|props| props.keys().cloned().map(Value::String).collect())
            .unwrap_or_default();
        Self {
            name: name.into(),
            description: None,
            schema: json!({
                "type": "object",
                "properties": properties,
                "required": required,
                "additionalProperties": false,
            }),
            strict: Some(true),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = Some(strict);
        self
    }

    pub fn properties(&self) -> Option<&Map<String, Value>> {
        self.schema.get("properties").and_then(Value::as_object)
    }

    pub fn required(&self) -> Vec<&str> {
        self.schema
            .get("required")
            .and_then(Value::as_array)
            .map(|names| names.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }

    pub fn is_required(&self, field: &str) -> bool {
        self.required().contains(&field)
    }

    /// Derive a schema from an example object: every key becomes a required
    /// property typed after its example value. Arrays take their item type
    /// from the first element and nested objects are inferred the same way.
    ///
    /// When part of the shape cannot be typed (an empty array or a `null`)
    /// the schema is marked non-strict. Returns `None` when `shape` is not a
    /// JSON object.
    pub fn from_shape(name: impl Into<String>, shape: &Value) -> Option<Self> {
        shape.as_object()?;
        let (schema, fully_typed) = infer_property(shape);
        Some(Self {
            name: name.into(),
            description: None,
            schema,
            strict: if fully_typed { None } else { Some(false) },
        })
    }

    /// Merge the required `explanation` string field into this schema.
    ///
    /// The result always lists `explanation` in `required`. If any property
    /// of the original schema was optional the merged schema is non-strict,
    /// since strict structured output demands every property be required.
    /// Returns `None` when the schema is not a JSON object.
    pub fn with_explanation(&self) -> Option<Self> {
        let mut schema = self.schema.clone();
        let root = schema.as_object_mut()?;

        let original_keys: Vec<String> = root
            .get("properties")
            .and_then(Value::as_object)
            .map(|props| props.keys().cloned().collect())
            .unwrap_or_default();
        let original_required: Vec<String> = root
            .get("required")
            .and_then(Value::as_array)
            .map(|names| {
                names
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        let has_optional = original_keys
            .iter()
            .any(|key| key != EXPLANATION_FIELD && !original_required.contains(key));

        let properties = root
            .entry("properties")
            .or_insert_with(|| Value::Object(Map::new()));
        if !properties.is_object() {
            *properties = Value::Object(Map::new());
        }
        if let Some(props) = properties.as_object_mut() {
            props.insert(
                EXPLANATION_FIELD.to_string(),
                json!({
                    "type": "string",
                    "description": "explanation supporting your answer",
                }),
            );
        }

        let mut required = original_required;
        if !required.iter().any(|r| r == EXPLANATION_FIELD) {
            required.push(EXPLANATION_FIELD.to_string());
        }
        root.insert(
            "required".to_string(),
            Value::Array(required.into_iter().map(Value::String).collect()),
        );
        root.entry("type")
            .or_insert_with(|| Value::String("object".to_string()));

        let strict = if has_optional {
            Some(false)
        } else {
            self.strict
        };

        Some(Self {
            name: self.name.clone(),
            description: self.description.clone(),
            schema,
            strict,
        })
    }
}

/// Schema for an example value, and whether every part of it got a type.
fn infer_property(example: &Value) -> (Value, bool) {
    match example {
        Value::String(_) => (json!({"type": "string"}), true),
        Value::Bool(_) => (json!({"type": "boolean"}), true),
        Value::Number(n) if n.is_i64() || n.is_u64() => (json!({"type": "integer"}), true),
        Value::Number(_) => (json!({"type": "number"}), true),
        Value::Array(elements) => match elements.first() {
            Some(first) => {
                let (items, typed) = infer_property(first);
                (json!({"type": "array", "items": items}), typed)
            }
            None => (json!({"type": "array", "items": {}}), false),
        },
        Value::Object(fields) => {
            let mut properties = Map::new();
            let mut typed = true;
            for (key, value) in fields {
                let (property, property_typed) = infer_property(value);
                typed &= property_typed;
                properties.insert(key.clone(), property);
            }
            let required: Vec<Value> = fields.keys().cloned().map(Value::String).collect();
            (
                json!({
                    "type": "object",
                    "properties": Value::Object(properties),
                    "required": required,
                }),
                typed,
            )
        }
        Value::Null => (json!({}), false),
    }
}

/// Remove the `explanation` field from an output object.
pub fn strip_explanation(mut value: Value) -> Value {
    if let Some(map) = value.as_object_mut() {
        map.remove(EXPLANATION_FIELD);
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strict_object_requires_all_properties() {
        let schema = OutputSchema::strict_object(
            "decision",
            json!({"explanation": {"type": "string"}, "remove_item": {"type": "boolean"}}),
        );
        assert_eq!(schema.strict, Some(true));
        assert!(schema.is_required("explanation"));
        assert!(schema.is_required("remove_item"));
        assert_eq!(schema.schema["additionalProperties"], json!(false));
    }

    #[test]
    fn test_with_explanation_appends_required_field() {
        let schema = OutputSchema::new(
            "person",
            json!({
                "type": "object",
                "properties": {"name": {"type": "string"}},
                "required": ["name"]
            }),
        )
        .with_strict(true);

        let merged = schema.with_explanation().unwrap();
        assert_eq!(merged.required(), vec!["name", "explanation"]);
        assert_eq!(
            merged.properties().unwrap()["explanation"]["type"],
            json!("string")
        );
        assert_eq!(merged.strict, Some(true));
        // Original untouched
        assert_eq!(schema.required(), vec!["name"]);
    }

    #[test]
    fn test_with_explanation_marks_optional_schema_non_strict() {
        let schema = OutputSchema::new(
            "person",
            json!({
                "type": "object",
                "properties": {"name": {"type": "string"}, "age": {"type": "integer"}},
                "required": ["name"]
            }),
        )
        .with_strict(true);

        let merged = schema.with_explanation().unwrap();
        assert_eq!(merged.strict, Some(false));
        assert!(merged.is_required("explanation"));
        assert!(!merged.is_required("age"));
    }

    #[test]
    fn test_with_explanation_without_required_list() {
        let schema = OutputSchema::new("bare", json!({"type": "object"}));
        let merged = schema.with_explanation().unwrap();
        assert_eq!(merged.required(), vec!["explanation"]);
    }

    #[test]
    fn test_with_explanation_is_idempotent() {
        let schema = OutputSchema::new("bare", json!({"type": "object"}));
        let once = schema.with_explanation().unwrap();
        let twice = once.with_explanation().unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_with_explanation_rejects_non_object() {
        let schema = OutputSchema::new("bad", json!("string"));
        assert!(schema.with_explanation().is_none());
    }

    #[test]
    fn test_from_shape_infers_types() {
        let shape = json!({"name": "", "age": 0, "score": 0.5, "tags": [], "ok": true});
        let schema = OutputSchema::from_shape("shape", &shape).unwrap();
        let props = schema.properties().unwrap();
        assert_eq!(props["name"]["type"], json!("string"));
        assert_eq!(props["age"]["type"], json!("integer"));
        assert_eq!(props["score"]["type"], json!("number"));
        assert_eq!(props["tags"]["type"], json!("array"));
        assert_eq!(props["ok"]["type"], json!("boolean"));
        assert_eq!(schema.required().len(), 5);
        assert!(OutputSchema::from_shape("x", &json!([1, 2])).is_none());
    }

    #[test]
    fn test_from_shape_types_array_items_and_nested_objects() {
        let shape = json!({"tags": [""], "author": {"name": "", "born": 0}, "scores": [[0.5]]});
        let schema = OutputSchema::from_shape("book", &shape).unwrap();
        let props = schema.properties().unwrap();

        assert_eq!(props["tags"]["items"], json!({"type": "string"}));
        assert_eq!(props["scores"]["items"]["items"], json!({"type": "number"}));
        assert_eq!(props["author"]["properties"]["born"], json!({"type": "integer"}));
        let nested_required = props["author"]["required"].as_array().unwrap();
        assert_eq!(nested_required.len(), 2);
        assert!(nested_required.contains(&json!("name")));
        assert_eq!(schema.strict, None);
    }

    #[test]
    fn test_from_shape_with_untyped_parts_is_non_strict() {
        for shape in [json!({"tags": []}), json!({"note": null}), json!({"meta": {"extra": []}})] {
            let schema = OutputSchema::from_shape("loose", &shape).unwrap();
            assert_eq!(schema.strict, Some(false), "{}", shape);
            let merged = schema.with_explanation().unwrap();
            assert_eq!(merged.strict, Some(false), "{}", shape);
        }
    }

    #[test]
    fn test_strip_explanation() {
        let value = strip_explanation(json!({"explanation": "why", "total": 3}));
        assert_eq!(value, json!({"total": 3}));
        assert_eq!(strip_explanation(json!("text")), json!("text"));
    }
}
