//! Prompt templates for the list agents
//!
//! Templates use `{{name}}` placeholders filled in by
//! [`compose_prompt`](super::compose::compose_prompt). The system templates
//! end their instruction paragraph with `{{instructions}}`, which callers fill
//! with either nothing or a newline followed by the extra instructions.

/// Templates for generating prompts for each agent
pub struct PromptTemplate;

impl PromptTemplate {
    /// Per-item prompt shared by the fan-out agents and the reduce fold
    pub fn indexed_item() -> &'static str {
        "<INDEX>\n{{index}} of {{length}}\n\n<ITEM>\n{{item}}"
    }

    /// Per-item prompt without position information
    pub fn plain_item() -> &'static str {
        "<ITEM>\n{{item}}"
    }

    pub fn binary_classify_system() -> &'static str {
        r#"You are an expert at classifying items in a list.

<GOAL>
{{goal}}

<INSTRUCTIONS>
Given an <ITEM> determine if it matches the provided <GOAL>.
Return your classification as a JSON <CLASSIFICATION> object.{{instructions}}

<CLASSIFICATION>
{"explanation": "<explanation supporting your classification>", "matches": <true or false>}"#
    }

    pub fn classify_system() -> &'static str {
        r#"You are an expert at classifying items in a list.

<CATEGORIES>
{{categories}}

<GOAL>
{{goal}}

<INSTRUCTIONS>
Given an <ITEM> classify the item using the above <CATEGORIES> based upon the provided <GOAL>.
Return your classification as a JSON <CLASSIFICATION> object.{{instructions}}

<CLASSIFICATION>
{"explanation": "<explanation supporting your classification>", "category": "<category assigned>"}"#
    }

    pub fn filter_system() -> &'static str {
        r#"You are an expert at filtering items in a list.

<GOAL>
{{goal}}

<INSTRUCTIONS>
Determine if the <ITEM> should be removed from the list using provided <GOAL>.
Use the <DECISION> schema below to return your decisions as a JSON object.{{instructions}}

<DECISION>
{"explanation": "<explanation supporting your decision to remove item>", "remove_item": <true or false>}"#
    }

    /// Map system prompt used when the caller supplied a JSON schema
    pub fn map_schema_system() -> &'static str {
        r#"You are an expert at mapping list items from one type to another.

<GOAL>
{{goal}}

<INSTRUCTIONS>
Given an <ITEM> map the item to the provided JSON shape using the instructions specified by the <GOAL>.{{instructions}}"#
    }

    /// Map system prompt used when the caller supplied an example shape
    pub fn map_shape_system() -> &'static str {
        r#"You are an expert at mapping list items from one type to another.

<GOAL>
{{goal}}

<INSTRUCTIONS>
Given an <ITEM> return a new JSON <OUTPUT> object that maps the item to the shape specified by the <GOAL>.{{instructions}}

<OUTPUT>
{{outputShape}}"#
    }

    pub fn project_system() -> &'static str {
        r#"You are an expert at re-formatting a list of items using a template.

<TEMPLATE>
{{template}}

<GOAL>
{{goal}}

<INSTRUCTIONS>
Use the <TEMPLATE> above to reformat the <ITEM> using the directions in the provided <GOAL>.
Return the reformatted item as a JSON <PROJECTION> object.{{instructions}}

<PROJECTION>
{"explanation": "<explanation supporting your formatting>", "projection": "<the item formatted using the template>"}"#
    }

    pub fn summarize_system() -> &'static str {
        r#"You are an expert at summarizing text.

<GOAL>
{{goal}}

<INSTRUCTIONS>
Given an <ITEM> summarize it using the directions in the provided <GOAL>.
Return your summary as a JSON <SUMMARIZATION> object.
Ensure that the summary portion is a string.{{instructions}}

<SUMMARIZATION>
{"explanation": "<explanation supporting your summarization>", "summary": "<item summary as text>"}"#
    }

    pub fn sort_system() -> &'static str {
        r#"You are an expert in sorting a list of items.

<GOAL>
{{goal}}

<INSTRUCTIONS>
Determine if <ITEM_A> should be sorted BEFORE, EQUAL, or AFTER <ITEM_B> based upon the stated <GOAL>.
Use the <DECISION> schema below to return your decisions as a JSON object.{{instructions}}

<DECISION>
{"explanation": "<explanation supporting your decision>", "sort_item_a": "<BEFORE, EQUAL, or AFTER>"}"#
    }

    /// Pairwise comparison prompt for the sort agent
    pub fn sort_pair() -> &'static str {
        "<ITEM_A>\n{{a}}\n\n<ITEM_B>\n{{b}}"
    }

    pub fn reduce_system() -> &'static str {
        r#"You are an expert at combining and reducing items in a list.

<GOAL>
{{goal}}

<INSTRUCTIONS>
Given an <ITEM> return a new JSON <OUTPUT> object that combines the item with the current output to achieve the <GOAL>.{{instructions}}

<OUTPUT>
{{output}}"#
    }

    pub fn chain_of_thought_system() -> &'static str {
        r#"<INSTRUCTIONS>
Answer the users question using the JSON <OUTPUT> structure below.{{instructions}}

<OUTPUT>
{"explanation": "<explain your reasoning>", "answer": "<the answer>"}"#
    }

    pub fn grounded_answer_system() -> &'static str {
        r#"<CONTEXT>
{{context}}

<INSTRUCTIONS>
Base your answer only on the information provided in the above <CONTEXT>.
Return your answer using the JSON <OUTPUT> below.
Do not directly mention that you're using the context in your answer.{{instructions}}

<OUTPUT>
{"explanation": "<explain your reasoning>", "answer": "<the answer>"}"#
    }

    pub fn generate_object_system() -> &'static str {
        "{{context}}<INSTRUCTIONS>\nReturn a JSON object based on the users directions.{{instructions}}"
    }

    /// Placeholder value seeded into the `explanation` field of example outputs
    pub fn explanation_placeholder() -> &'static str {
        "<explanation supporting your answer>"
    }

    /// Format optional extra instructions for the `{{instructions}}` slot
    pub fn instructions_block(instructions: Option<&str>) -> String {
        match instructions {
            Some(text) if !text.trim().is_empty() => format!("\n{}", text),
            _ => String::new(),
        }
    }

    /// Format the category list for the classify prompt
    pub fn categories_block(categories: &[String]) -> String {
        categories
            .iter()
            .map(|c| format!("* {}", c))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
