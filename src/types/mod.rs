//! Core types for the chunking pipeline.

mod chunk;
mod config;
mod source;

pub use chunk::{ChunkDocument, MethodUnit, TEXT_METHOD_NAME};
pub use self::config::{ChunkConfig, ChunkingConfig, PipelineConfig};
pub use source::FileRecord;
