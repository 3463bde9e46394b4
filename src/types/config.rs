//! Configuration types for chunking.

use serde::{Deserialize, Serialize};

use crate::chunkers::TokenEncoding;
use crate::error::{ChunkError, Result};
use crate::{
    DEFAULT_CODE_CHUNK_OVERLAP, DEFAULT_CODE_CHUNK_SIZE, DEFAULT_TEXT_CHUNK_OVERLAP,
    DEFAULT_TEXT_CHUNK_SIZE, DEFAULT_TEXT_ENCODING,
};

/// Global chunking service configuration.
///
/// Every field can be overridden by an environment variable named after it
/// with a `CHUNKER_` prefix, e.g. `CHUNKER_CODE_CHUNK_SIZE=2048`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Characters per chunk for extracted methods
    pub code_chunk_size: usize,

    /// Characters of overlap between method chunks
    pub code_chunk_overlap: usize,

    /// Tokens per chunk for unclassified text
    pub text_chunk_size: usize,

    /// Tokens of overlap between text chunks
    pub text_chunk_overlap: usize,

    /// Tokenizer used for unclassified text
    pub text_encoding: String,

    /// Address the service binds to
    pub host: String,

    /// Port the service listens on
    pub port: u16,

    /// Upper bound on files accepted by one request
    pub max_files_per_request: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            code_chunk_size: DEFAULT_CODE_CHUNK_SIZE,
            code_chunk_overlap: DEFAULT_CODE_CHUNK_OVERLAP,
            text_chunk_size: DEFAULT_TEXT_CHUNK_SIZE,
            text_chunk_overlap: DEFAULT_TEXT_CHUNK_OVERLAP,
            text_encoding: DEFAULT_TEXT_ENCODING.to_string(),
            host: "0.0.0.0".to_string(),
            port: 3017,
            max_files_per_request: 10_000,
        }
    }
}

impl ChunkingConfig {
    /// Load configuration from `CHUNKER_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::load(config::Environment::with_prefix("CHUNKER"))
    }

    /// Load configuration from an explicit variable map instead of the process environment.
    pub fn from_vars(vars: config::Map<String, String>) -> Result<Self> {
        Self::load(config::Environment::with_prefix("CHUNKER").source(Some(vars)))
    }

    fn load(environment: config::Environment) -> Result<Self> {
        let defaults = Self::default();
        let settings = config::Config::builder()
            .set_default("code_chunk_size", defaults.code_chunk_size as u64)?
            .set_default("code_chunk_overlap", defaults.code_chunk_overlap as u64)?
            .set_default("text_chunk_size", defaults.text_chunk_size as u64)?
            .set_default("text_chunk_overlap", defaults.text_chunk_overlap as u64)?
            .set_default("text_encoding", defaults.text_encoding)?
            .set_default("host", defaults.host)?
            .set_default("port", defaults.port as u64)?
            .set_default("max_files_per_request", defaults.max_files_per_request as u64)?
            .add_source(environment.try_parsing(true))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Splitting policy for the pipeline.
    pub fn pipeline(&self) -> Result<PipelineConfig> {
        let code = ChunkConfig::with_size(self.code_chunk_size).with_overlap(self.code_chunk_overlap);
        let text = ChunkConfig::with_size(self.text_chunk_size).with_overlap(self.text_chunk_overlap);
        code.validate("code")?;
        text.validate("text")?;

        Ok(PipelineConfig {
            code,
            text,
            text_encoding: self.text_encoding.parse()?,
        })
    }
}

/// Size regime of one splitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkConfig {
    /// Maximum units (characters or tokens) per chunk
    pub chunk_size: usize,

    /// Units repeated between consecutive chunks
    pub chunk_overlap: usize,
}

impl ChunkConfig {
    /// Regime for extracted methods: 1024 characters, 128 overlap.
    pub fn code() -> Self {
        Self::with_size(DEFAULT_CODE_CHUNK_SIZE).with_overlap(DEFAULT_CODE_CHUNK_OVERLAP)
    }

    /// Regime for unclassified text: 256 tokens, 30 overlap.
    pub fn text() -> Self {
        Self::with_size(DEFAULT_TEXT_CHUNK_SIZE).with_overlap(DEFAULT_TEXT_CHUNK_OVERLAP)
    }

    /// Create a config with the given chunk size and no overlap.
    pub fn with_size(size: usize) -> Self {
        Self {
            chunk_size: size,
            chunk_overlap: 0,
        }
    }

    /// Set the overlap.
    pub fn with_overlap(mut self, overlap: usize) -> Self {
        self.chunk_overlap = overlap;
        self
    }

    /// Overlap must be smaller than the chunk size.
    pub fn validate(&self, regime: &str) -> Result<()> {
        if self.chunk_overlap >= self.chunk_size {
            return Err(ChunkError::Config(config::ConfigError::Message(format!(
                "{} chunk overlap ({}) must be smaller than chunk size ({})",
                regime, self.chunk_overlap, self.chunk_size
            ))));
        }
        Ok(())
    }
}

/// Splitting policy consumed by the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Regime for the language-aware splitter
    pub code: ChunkConfig,

    /// Regime for the token splitter
    pub text: ChunkConfig,

    /// Tokenizer for the token splitter
    pub text_encoding: TokenEncoding,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            code: ChunkConfig::code(),
            text: ChunkConfig::text(),
            text_encoding: TokenEncoding::Gpt2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults_match_pipeline_defaults() {
        let config = ChunkingConfig::from_vars(config::Map::new()).unwrap();

        assert_eq!(config, ChunkingConfig::default());
        assert_eq!(config.pipeline().unwrap(), PipelineConfig::default());
    }

    #[test]
    fn test_env_overrides() {
        let mut vars = config::Map::new();
        vars.insert("CHUNKER_CODE_CHUNK_SIZE".to_string(), "2048".to_string());
        vars.insert("CHUNKER_TEXT_ENCODING".to_string(), "cl100k_base".to_string());
        vars.insert("CHUNKER_PORT".to_string(), "8080".to_string());

        let config = ChunkingConfig::from_vars(vars).unwrap();
        assert_eq!(config.code_chunk_size, 2048);
        assert_eq!(config.port, 8080);
        assert_eq!(config.code_chunk_overlap, DEFAULT_CODE_CHUNK_OVERLAP);

        let pipeline = config.pipeline().unwrap();
        assert_eq!(pipeline.code.chunk_size, 2048);
        assert_eq!(pipeline.text_encoding, TokenEncoding::Cl100kBase);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut vars = config::Map::new();
        vars.insert("CHUNKER_PORT".to_string(), "not-a-port".to_string());
        assert!(ChunkingConfig::from_vars(vars).is_err());

        let config = ChunkingConfig {
            text_encoding: "o200k_unknown".to_string(),
            ..Default::default()
        };
        assert!(config.pipeline().is_err());
    }

    #[test]
    fn test_overlap_must_be_smaller_than_size() {
        let config = ChunkingConfig {
            code_chunk_size: 128,
            code_chunk_overlap: 128,
            ..Default::default()
        };
        let err = config.pipeline().unwrap_err();
        assert!(err.to_string().contains("code chunk overlap"));

        let config = ChunkingConfig {
            text_chunk_size: 10,
            text_chunk_overlap: 30,
            ..Default::default()
        };
        assert!(config.pipeline().is_err());

        assert!(ChunkConfig::with_size(10).with_overlap(9).validate("code").is_ok());
    }
}
