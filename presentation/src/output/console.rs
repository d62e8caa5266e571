//! Console output formatter for agent results

use agentm_domain::{
    AgentError, BinaryClassifiedItem, ClassifiedItem, ExplainedAnswer, MappedItem,
    ProjectedItem, SummarizedItem, UsageSummary,
};
use colored::Colorize;
use serde::Serialize;
use serde_json::Value;

/// Formats agent results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format any result as pretty JSON
    pub fn format_json<T: Serialize>(result: &T) -> String {
        serde_json::to_string_pretty(result).unwrap_or_else(|_| "{}".to_string())
    }

    pub fn format_binary_classified(items: &[BinaryClassifiedItem<String>]) -> String {
        items
            .iter()
            .map(|c| {
                let mark = if c.matches { "v".green() } else { "x".red() };
                format!("{} {}", mark, c.item)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn format_classified(items: &[ClassifiedItem<String>]) -> String {
        let width = items.iter().map(|c| c.category.len()).max().unwrap_or(0);
        items
            .iter()
            .map(|c| {
                format!(
                    "{} {}",
                    format!("[{:<width$}]", c.category, width = width).cyan(),
                    c.item
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn format_summarized(items: &[SummarizedItem<String>]) -> String {
        Self::format_pairs(items.iter().map(|s| (s.item.as_str(), s.summary.as_str())))
    }

    pub fn format_projected(items: &[ProjectedItem<String>]) -> String {
        Self::format_pairs(
            items
                .iter()
                .map(|p| (p.item.as_str(), p.projection.as_str())),
        )
    }

    pub fn format_mapped(items: &[MappedItem<String>]) -> String {
        items
            .iter()
            .map(|m| {
                let value = serde_json::to_string(&m.value).unwrap_or_default();
                format!("{}\n{}", m.item.bold(), Self::indent(&value, "  -> "))
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Format a plain list (filter and sort results)
    pub fn format_list(items: &[String]) -> String {
        items.join("\n")
    }

    pub fn format_value(value: &Value) -> String {
        match value {
            Value::String(s) => s.clone(),
            other => Self::format_json(other),
        }
    }

    pub fn format_answer(answer: &ExplainedAnswer, show_explanation: bool) -> String {
        if !show_explanation {
            return answer.answer.clone();
        }
        format!(
            "{}\n{}\n\n{}\n{}",
            "Reasoning:".cyan().bold(),
            answer.explanation,
            "Answer:".cyan().bold(),
            answer.answer
        )
    }

    pub fn format_usage(summary: &UsageSummary) -> String {
        let scope = summary
            .session_id
            .as_deref()
            .map(|s| format!("session {}", s))
            .unwrap_or_else(|| "all sessions".to_string());

        let mut output = String::new();
        output.push_str(&Self::header(&format!("Usage ({})", scope)));
        output.push('\n');
        output.push_str(&format!("{} {}\n", "Requests:".cyan().bold(), summary.requests));
        output.push_str(&format!(
            "{} {} prompt + {} completion = {}\n",
            "Tokens:".cyan().bold(),
            summary.prompt_tokens,
            summary.completion_tokens,
            summary.total_tokens
        ));
        output.push_str(&format!(
            "{} ${:.6}\n",
            "Cost:".cyan().bold(),
            summary.total_cost
        ));
        output
    }

    pub fn format_error(error: &AgentError) -> String {
        format!(
            "{} {}",
            format!("Error ({}):", error.kind()).red().bold(),
            error
        )
    }

    fn format_pairs<'a>(pairs: impl Iterator<Item = (&'a str, &'a str)>) -> String {
        pairs
            .map(|(item, result)| format!("{}\n{}", item.bold(), Self::indent(result, "  -> ")))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(40);
        format!("{}\n{:^40}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn plain() {
        colored::control::set_override(false);
    }

    #[test]
    fn test_indent() {
        let result = ConsoleFormatter::indent("line1\nline2", "  ");
        assert_eq!(result, "  line1\n  line2");
    }

    #[test]
    fn test_binary_classified() {
        plain();
        let items = vec![
            BinaryClassifiedItem {
                item: "Apple".to_string(),
                matches: true,
            },
            BinaryClassifiedItem {
                item: "Chocolate".to_string(),
                matches: false,
            },
        ];
        assert_eq!(
            ConsoleFormatter::format_binary_classified(&items),
            "v Apple\nx Chocolate"
        );
    }

    #[test]
    fn test_classified_pads_categories() {
        plain();
        let items = vec![
            ClassifiedItem {
                item: "Apple".to_string(),
                category: "fruit".to_string(),
            },
            ClassifiedItem {
                item: "Carrot".to_string(),
                category: "vegetable".to_string(),
            },
        ];
        assert_eq!(
            ConsoleFormatter::format_classified(&items),
            "[fruit    ] Apple\n[vegetable] Carrot"
        );
    }

    #[test]
    fn test_summarized() {
        plain();
        let items = vec![SummarizedItem {
            item: "A long review".to_string(),
            summary: "Positive".to_string(),
        }];
        assert_eq!(
            ConsoleFormatter::format_summarized(&items),
            "A long review\n  -> Positive"
        );
    }

    #[test]
    fn test_value_strings_are_unquoted() {
        assert_eq!(ConsoleFormatter::format_value(&json!("done")), "done");
        assert!(ConsoleFormatter::format_value(&json!({"a": 1})).contains("\"a\": 1"));
    }

    #[test]
    fn test_answer_with_and_without_explanation() {
        plain();
        let answer = ExplainedAnswer {
            explanation: "2 + 2 is 4".to_string(),
            answer: "4".to_string(),
        };
        assert_eq!(ConsoleFormatter::format_answer(&answer, false), "4");
        let explained = ConsoleFormatter::format_answer(&answer, true);
        assert!(explained.contains("Reasoning:\n2 + 2 is 4"));
        assert!(explained.ends_with("Answer:\n4"));
    }

    #[test]
    fn test_error_names_kind() {
        plain();
        let formatted = ConsoleFormatter::format_error(&AgentError::Cancelled);
        assert!(formatted.starts_with("Error (cancelled):"));
    }

    #[test]
    fn test_usage_summary() {
        plain();
        let summary = UsageSummary {
            session_id: Some("s1".to_string()),
            requests: 2,
            prompt_tokens: 30,
            completion_tokens: 15,
            total_tokens: 45,
            total_cost: 0.06,
        };
        let formatted = ConsoleFormatter::format_usage(&summary);
        assert!(formatted.contains("Usage (session s1)"));
        assert!(formatted.contains("Tokens: 30 prompt + 15 completion = 45"));
        assert!(formatted.contains("Cost: $0.060000"));
    }
}
