//! Error type shared by the chunking pipeline.

use thiserror::Error;

use crate::processing::SupportedLanguage;

/// Errors raised while classifying, parsing, or splitting source files.
#[derive(Debug, Error)]
pub enum ChunkError {
    /// No structural parser is registered for the language.
    #[error("no structural parser registered for language: {0}")]
    UnsupportedLanguage(SupportedLanguage),

    /// The tree-sitter grammar could not be loaded into a parser.
    #[error("failed to load {language} grammar: {message}")]
    Grammar {
        language: SupportedLanguage,
        message: String,
    },

    /// The grammar parser produced no syntax tree.
    #[error("failed to parse source as {0}")]
    Parse(SupportedLanguage),

    /// A node span did not decode as UTF-8.
    #[error("invalid UTF-8 in source: {0}")]
    Encoding(#[from] std::str::Utf8Error),

    /// Tokenizer could not be loaded or could not decode a window.
    #[error("tokenizer error: {0}")]
    Tokenizer(String),

    /// A splitter separator did not compile.
    #[error("invalid separator: {0}")]
    Separator(#[from] regex::Error),

    /// A whitelist or blacklist glob is malformed.
    #[error("invalid file pattern: {0}")]
    Pattern(#[from] globset::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Any of the above, attributed to the file being chunked.
    #[error("failed to chunk {file_name}: {source}")]
    File {
        file_name: String,
        #[source]
        source: Box<ChunkError>,
    },
}

impl ChunkError {
    /// Attach the name of the file being processed.
    pub fn in_file(self, file_name: &str) -> Self {
        match self {
            already @ ChunkError::File { .. } => already,
            other => ChunkError::File {
                file_name: file_name.to_string(),
                source: Box::new(other),
            },
        }
    }
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, ChunkError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_file_wraps_once() {
        let err = ChunkError::Parse(SupportedLanguage::Go)
            .in_file("main.go")
            .in_file("other.go");

        match err {
            ChunkError::File { file_name, source } => {
                assert_eq!(file_name, "main.go");
                assert!(matches!(*source, ChunkError::Parse(SupportedLanguage::Go)));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_display_names_language() {
        let err = ChunkError::UnsupportedLanguage(SupportedLanguage::Lua);
        assert_eq!(
            err.to_string(),
            "no structural parser registered for language: lua"
        );
    }
}
