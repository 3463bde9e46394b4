//! Code Chunker Library
//!
//! Method-level chunking of source repositories for vector indexing.
//! Files are classified by extension, parsed with tree-sitter into
//! functions and methods, and re-split with language-aware splitters;
//! unrecognized files are split by token count.

pub mod api;
pub mod ast_engine;
pub mod chunkers;
pub mod error;
pub mod output;
pub mod processing;
pub mod types;

pub use ast_engine::{ParserRegistry, StructuralParser};
pub use chunkers::{parse_code_files_for_db, CodeChunker, CodeChunks};
pub use error::{ChunkError, Result};
pub use output::format_search_results;
pub use processing::{FileSelector, LocalRepository, SupportedLanguage};
pub use types::{ChunkDocument, FileRecord, MethodUnit};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::ast_engine::ParserRegistry;
    pub use crate::chunkers::*;
    pub use crate::error::{ChunkError, Result};
    pub use crate::processing::{FileFilter, FileSelector, LocalRepository, SupportedLanguage};
    pub use crate::types::*;
}

/// Default chunk size for extracted methods, in characters
pub const DEFAULT_CODE_CHUNK_SIZE: usize = 1024;

/// Default overlap between method chunks, in characters
pub const DEFAULT_CODE_CHUNK_OVERLAP: usize = 128;

/// Default chunk size for unclassified text, in tokens
pub const DEFAULT_TEXT_CHUNK_SIZE: usize = 256;

/// Default overlap between text chunks, in tokens
pub const DEFAULT_TEXT_CHUNK_OVERLAP: usize = 30;

/// Default tokenizer for unclassified text
pub const DEFAULT_TEXT_ENCODING: &str = "gpt2";
