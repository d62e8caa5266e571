//! `{{name}}` placeholder substitution for prompt templates.

use regex::{Captures, Regex};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::LazyLock;

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([^}\s]+)\s*\}\}").expect("placeholder pattern is valid")
});

/// Named values substituted into a template.
#[derive(Debug, Clone, Default)]
pub struct PromptVariables {
    values: BTreeMap<String, Value>,
}

impl PromptVariables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }
}

/// String form of a prompt variable.
///
/// Strings are used verbatim, `null` becomes the empty string and every other
/// value is rendered as compact JSON.
pub fn variable_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Replace every `{{name}}` in `template` with the string form of the named
/// variable. Unknown names resolve to the empty string.
pub fn compose_prompt(template: &str, variables: &PromptVariables) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures<'_>| {
            variables
                .get(&caps[1])
                .map(variable_to_string)
                .unwrap_or_default()
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_substitutes_known_variables() {
        let vars = PromptVariables::new().with("goal", "sort by size").with("index", 2);
        let out = compose_prompt("Goal: {{goal}} ({{index}})", &vars);
        assert_eq!(out, "Goal: sort by size (2)");
    }

    #[test]
    fn test_unknown_variable_is_empty() {
        assert_eq!(compose_prompt("{{x}}", &PromptVariables::new()), "");
        assert_eq!(compose_prompt("a{{missing}}b", &PromptVariables::new()), "ab");
    }

    #[test]
    fn test_whitespace_inside_braces() {
        let vars = PromptVariables::new().with("name", "Ada");
        assert_eq!(compose_prompt("Hi {{ name }}!", &vars), "Hi Ada!");
    }

    #[test]
    fn test_structured_values_render_as_json() {
        let vars = PromptVariables::new()
            .with("obj", json!({"a": 1}))
            .with("none", Value::Null)
            .with("flag", true);
        assert_eq!(
            compose_prompt("{{obj}}|{{none}}|{{flag}}", &vars),
            r#"{"a":1}||true"#
        );
    }

    #[test]
    fn test_idempotent_without_placeholders() {
        let vars = PromptVariables::new().with("item", "carrot");
        let once = compose_prompt("<ITEM>\n{{item}}", &vars);
        let twice = compose_prompt(&once, &vars);
        assert_eq!(once, twice);

        let plain = "no placeholders here { single }";
        assert_eq!(compose_prompt(plain, &vars), plain);
    }

    #[test]
    fn test_repeated_placeholder() {
        let vars = PromptVariables::new().with("a", "x");
        assert_eq!(compose_prompt("{{a}}{{a}}", &vars), "xx");
    }
}
