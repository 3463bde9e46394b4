//! Splitting strategies and the file chunking pipeline.

mod base;
mod code_chunker;
mod recursive_splitter;
mod token_splitter;

pub use base::{char_len, TextSplitter, TiktokenCounter, TokenCounter, TokenEncoding};
pub use code_chunker::{parse_code_files_for_db, CodeChunker, CodeChunks, IntoFileRecord};
pub use recursive_splitter::{separators_for, RecursiveSplitter};
pub use token_splitter::TokenSplitter;
