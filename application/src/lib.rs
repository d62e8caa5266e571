//! Application layer for agentm
//!
//! This crate contains the list agents (use cases), the ports they talk
//! through, the structured completion client and the concurrency primitives
//! that bound and cancel fan-out. It depends only on the domain layer.

pub mod completion;
pub mod concurrency;
pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use completion::ProviderCompletionClient;
pub use concurrency::{ConcurrencyLimiter, ErrorReporting, ItemTaskRunner, ShouldContinue};
pub use config::AgentOptions;
pub use ports::{
    chat_provider::{ChatProvider, ChatRequest, ChatResponse, ProviderError},
    completion_client::{CompletionRequest, StructuredCompletionClient},
    progress::{NoProgress, ProgressNotifier},
    usage_recorder::{NoUsageRecorder, UsageRecorder},
};
pub use use_cases::binary_classify_list::{BinaryClassifyListInput, BinaryClassifyListUseCase};
pub use use_cases::chain_of_thought::{ChainOfThoughtInput, ChainOfThoughtUseCase};
pub use use_cases::classify_list::{ClassifyListInput, ClassifyListUseCase};
pub use use_cases::filter_list::{FilterListInput, FilterListUseCase};
pub use use_cases::generate_object::{GenerateObjectInput, GenerateObjectUseCase};
pub use use_cases::grounded_answer::{GroundedAnswerInput, GroundedAnswerUseCase};
pub use use_cases::map_list::{MapListInput, MapListUseCase, MapOutput};
pub use use_cases::project_list::{ProjectListInput, ProjectListUseCase};
pub use use_cases::reduce_list::{DEFAULT_MAX_HISTORY, ReduceListInput, ReduceListUseCase};
pub use use_cases::sort_list::{SortListInput, SortListUseCase};
pub use use_cases::summarize_list::{SummarizeListInput, SummarizeListUseCase};
