//! Per-invocation agent options.
//!
//! [`AgentOptions`] groups the knobs every agent shares: sampling
//! parameters, optional extra instructions, the parallelism bound and the
//! cancellation predicate. Operation-specific inputs (categories, templates,
//! shapes) live on each use case's input struct.

use crate::concurrency::{
    ConcurrencyLimiter, DEFAULT_MAX_CONCURRENT, ErrorReporting, ShouldContinue,
};
use crate::ports::completion_client::{DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE};
use agentm_domain::PromptTemplate;

/// Shared agent options.
///
/// | Field | Default |
/// |-------|---------|
/// | `temperature` | 0.0 |
/// | `max_tokens` | 1000 |
/// | `instructions` | none |
/// | `parallel_completions` | 1 (serial) |
/// | `should_continue` | always |
/// | `error_reporting` | first settled |
/// | `log_explanations` | off |
#[derive(Debug, Clone)]
pub struct AgentOptions {
    pub temperature: f32,
    pub max_tokens: u32,
    /// Appended to the system prompt's instruction paragraph
    pub instructions: Option<String>,
    /// Maximum in-flight completions for one invocation
    pub parallel_completions: usize,
    pub should_continue: ShouldContinue,
    pub error_reporting: ErrorReporting,
    /// Log each sort comparison with the model's explanation
    pub log_explanations: bool,
}

impl Default for AgentOptions {
    fn default() -> Self {
        Self {
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            instructions: None,
            parallel_completions: DEFAULT_MAX_CONCURRENT,
            should_continue: ShouldContinue::always(),
            error_reporting: ErrorReporting::default(),
            log_explanations: false,
        }
    }
}

impl AgentOptions {
    // ==================== Builder Methods ====================

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = Some(instructions.into());
        self
    }

    pub fn with_parallel_completions(mut self, parallel_completions: usize) -> Self {
        self.parallel_completions = parallel_completions;
        self
    }

    pub fn with_should_continue(mut self, should_continue: ShouldContinue) -> Self {
        self.should_continue = should_continue;
        self
    }

    pub fn with_error_reporting(mut self, error_reporting: ErrorReporting) -> Self {
        self.error_reporting = error_reporting;
        self
    }

    pub fn with_log_explanations(mut self, log_explanations: bool) -> Self {
        self.log_explanations = log_explanations;
        self
    }

    // ==================== Derived Values ====================

    /// A fresh limiter for one invocation.
    pub fn limiter(&self) -> ConcurrencyLimiter {
        ConcurrencyLimiter::new(self.parallel_completions)
            .with_should_continue(self.should_continue.clone())
    }

    /// The `{{instructions}}` slot value.
    pub fn instructions_block(&self) -> String {
        PromptTemplate::instructions_block(self.instructions.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let options = AgentOptions::default();
        assert_eq!(options.temperature, 0.0);
        assert_eq!(options.max_tokens, 1000);
        assert!(options.instructions.is_none());
        assert_eq!(options.parallel_completions, 1);
        assert!(options.should_continue.check());
        assert_eq!(options.error_reporting, ErrorReporting::FirstSettled);
        assert!(!options.log_explanations);
    }

    #[test]
    fn test_builder() {
        let options = AgentOptions::default()
            .with_temperature(0.7)
            .with_max_tokens(250)
            .with_instructions("Be brief.")
            .with_parallel_completions(4)
            .with_error_reporting(ErrorReporting::LowestIndex);

        assert_eq!(options.temperature, 0.7);
        assert_eq!(options.max_tokens, 250);
        assert_eq!(options.instructions.as_deref(), Some("Be brief."));
        assert_eq!(options.limiter().max_concurrent(), 4);
        assert_eq!(options.error_reporting, ErrorReporting::LowestIndex);
    }

    #[test]
    fn test_instructions_block() {
        assert_eq!(AgentOptions::default().instructions_block(), "");
        assert_eq!(
            AgentOptions::default()
                .with_instructions("Use British spelling.")
                .instructions_block(),
            "\nUse British spelling."
        );
    }

    #[test]
    fn test_limiter_carries_cancellation() {
        let options = AgentOptions::default().with_should_continue(ShouldContinue::from_fn(|| false));
        assert!(!options.limiter().should_continue().check());
    }
}
