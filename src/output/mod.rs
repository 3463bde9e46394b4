//! Output formatting for chunks retrieved from a vector store.

mod search;

pub use search::{format_search_result, format_search_results};
