//! Use cases
//!
//! One use case per agent. List agents fan out one completion per item (or
//! per comparison for sort); reduce folds sequentially; the remaining agents
//! make a single completion.

pub mod binary_classify_list;
pub mod chain_of_thought;
pub mod classify_list;
pub mod filter_list;
pub mod generate_object;
pub mod grounded_answer;
pub mod map_list;
pub mod project_list;
pub mod reduce_list;
pub(crate) mod shared;
pub mod sort_list;
pub mod summarize_list;

#[cfg(test)]
pub(crate) mod test_support;
