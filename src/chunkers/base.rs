//! Base traits for all splitters.

use std::fmt;
use std::str::FromStr;

use crate::error::{ChunkError, Result};

/// The core trait that all secondary splitters implement.
///
/// A splitter breaks one block of text into bounded, overlapping pieces
/// suitable for embedding.
pub trait TextSplitter: Send + Sync {
    /// Get the name of this splitter.
    fn name(&self) -> &'static str;

    /// Split the given text.
    ///
    /// Returns the pieces in text order. Empty input yields no pieces.
    fn split_text(&self, text: &str) -> Result<Vec<String>>;

    /// Get the description of this splitter.
    fn description(&self) -> &'static str {
        "A text splitter"
    }
}

/// Token counter trait for counting tokens in text.
pub trait TokenCounter: Send + Sync {
    /// Count the number of tokens in the given text.
    fn count_tokens(&self, text: &str) -> usize;

    /// Encode text into token IDs.
    fn encode(&self, text: &str) -> Vec<usize>;

    /// Decode token IDs back to text.
    fn decode(&self, tokens: &[usize]) -> Result<String>;
}

/// Byte pair encodings available to the token splitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenEncoding {
    /// GPT-2 vocabulary (identical ranks to `r50k_base`)
    Gpt2,
    R50kBase,
    P50kBase,
    P50kEdit,
    Cl100kBase,
}

impl TokenEncoding {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenEncoding::Gpt2 => "gpt2",
            TokenEncoding::R50kBase => "r50k_base",
            TokenEncoding::P50kBase => "p50k_base",
            TokenEncoding::P50kEdit => "p50k_edit",
            TokenEncoding::Cl100kBase => "cl100k_base",
        }
    }
}

impl fmt::Display for TokenEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TokenEncoding {
    type Err = ChunkError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "gpt2" => Ok(TokenEncoding::Gpt2),
            "r50k_base" => Ok(TokenEncoding::R50kBase),
            "p50k_base" => Ok(TokenEncoding::P50kBase),
            "p50k_edit" => Ok(TokenEncoding::P50kEdit),
            "cl100k_base" => Ok(TokenEncoding::Cl100kBase),
            other => Err(ChunkError::Tokenizer(format!("unknown encoding: {}", other))),
        }
    }
}

/// Token counter backed by tiktoken.
pub struct TiktokenCounter {
    bpe: tiktoken_rs::CoreBPE,
    encoding: TokenEncoding,
}

impl TiktokenCounter {
    /// Create a token counter with a specific encoding.
    pub fn new(encoding: TokenEncoding) -> Result<Self> {
        let bpe = match encoding {
            TokenEncoding::Gpt2 | TokenEncoding::R50kBase => tiktoken_rs::r50k_base(),
            TokenEncoding::P50kBase => tiktoken_rs::p50k_base(),
            TokenEncoding::P50kEdit => tiktoken_rs::p50k_edit(),
            TokenEncoding::Cl100kBase => tiktoken_rs::cl100k_base(),
        }
        .map_err(|e| ChunkError::Tokenizer(format!("failed to load {}: {}", encoding, e)))?;

        Ok(Self { bpe, encoding })
    }

    pub fn encoding(&self) -> TokenEncoding {
        self.encoding
    }
}

impl fmt::Debug for TiktokenCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TiktokenCounter")
            .field("encoding", &self.encoding)
            .finish_non_exhaustive()
    }
}

impl TokenCounter for TiktokenCounter {
    fn count_tokens(&self, text: &str) -> usize {
        self.bpe.encode_ordinary(text).len()
    }

    fn encode(&self, text: &str) -> Vec<usize> {
        self.bpe.encode_ordinary(text)
    }

    fn decode(&self, tokens: &[usize]) -> Result<String> {
        self.bpe
            .decode(tokens.to_vec())
            .map_err(|e| ChunkError::Tokenizer(e.to_string()))
    }
}

/// Length of text in characters.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}
