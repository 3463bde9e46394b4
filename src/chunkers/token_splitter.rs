//! Token-based splitter for fixed-size token chunking.

use super::base::{TextSplitter, TiktokenCounter, TokenCounter, TokenEncoding};
use crate::error::Result;
use crate::types::ChunkConfig;

/// Tokens that may be trimmed from either edge of a window whose boundary
/// falls inside a multi-byte character.
const MAX_EDGE_TRIM: usize = 3;

/// Simple token-based splitter that cuts text into fixed-size token windows.
///
/// This splitter doesn't consider semantic boundaries. It is used for content
/// with no recognized programming language.
#[derive(Debug)]
pub struct TokenSplitter {
    counter: TiktokenCounter,
    config: ChunkConfig,
}

impl TokenSplitter {
    /// Create a new token splitter.
    pub fn new(encoding: TokenEncoding, config: ChunkConfig) -> Result<Self> {
        Ok(Self {
            counter: TiktokenCounter::new(encoding)?,
            config,
        })
    }

    /// GPT-2 encoding, 256 tokens per chunk, 30 tokens of overlap.
    pub fn for_text() -> Result<Self> {
        Self::new(TokenEncoding::Gpt2, ChunkConfig::text())
    }

    pub fn config(&self) -> &ChunkConfig {
        &self.config
    }

    pub fn counter(&self) -> &TiktokenCounter {
        &self.counter
    }

    /// Decode `tokens[start..end]`, trimming a few edge tokens when the window
    /// cuts a multi-byte character in half.
    fn decode_window(&self, tokens: &[usize], start: usize, end: usize) -> Result<String> {
        let first_error = match self.counter.decode(&tokens[start..end]) {
            Ok(text) => return Ok(text),
            Err(err) => err,
        };

        let max_head = if start == 0 { 0 } else { MAX_EDGE_TRIM };
        let max_tail = if end == tokens.len() { 0 } else { MAX_EDGE_TRIM };

        for total in 1..=(max_head + max_tail) {
            for head in 0..=total.min(max_head) {
                let tail = total - head;
                if tail > max_tail || start + head + tail >= end {
                    continue;
                }
                if let Ok(text) = self.counter.decode(&tokens[start + head..end - tail]) {
                    return Ok(text);
                }
            }
        }

        Err(first_error)
    }
}

impl TextSplitter for TokenSplitter {
    fn name(&self) -> &'static str {
        "token"
    }

    fn description(&self) -> &'static str {
        "Splits text into fixed-size token chunks with optional overlap"
    }

    fn split_text(&self, text: &str) -> Result<Vec<String>> {
        if text.is_empty() {
            return Ok(vec![]);
        }

        let tokens = self.counter.encode(text);
        if tokens.is_empty() {
            return Ok(vec![]);
        }

        let chunk_size = self.config.chunk_size.max(1);
        let step = if self.config.chunk_overlap >= chunk_size {
            chunk_size
        } else {
            chunk_size - self.config.chunk_overlap
        };

        let mut chunks = Vec::new();
        let mut start_token = 0;

        while start_token < tokens.len() {
            let end_token = (start_token + chunk_size).min(tokens.len());
            let chunk_text = self.decode_window(&tokens, start_token, end_token)?;
            if !chunk_text.is_empty() {
                chunks.push(chunk_text);
            }

            // Stop if we've reached the end
            if end_token >= tokens.len() {
                break;
            }
            start_token += step;
        }

        Ok(chunks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_content() {
        let splitter = TokenSplitter::for_text().unwrap();
        assert!(splitter.split_text("").unwrap().is_empty());
    }

    #[test]
    fn test_small_content() {
        let splitter = TokenSplitter::for_text().unwrap();
        let chunks = splitter.split_text("Hello, world!").unwrap();
        assert_eq!(chunks, vec!["Hello, world!".to_string()]);
    }

    #[test]
    fn test_chunks_respect_token_budget() {
        let splitter = TokenSplitter::for_text().unwrap();
        let content = "This is a test sentence. ".repeat(200);
        let chunks = splitter.split_text(&content).unwrap();

        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(splitter.counter().count_tokens(chunk) <= 256);
        }
    }

    #[test]
    fn test_chunk_overlap() {
        let splitter =
            TokenSplitter::new(TokenEncoding::Gpt2, ChunkConfig::with_size(50).with_overlap(10))
                .unwrap();
        let content: String = (0..200).map(|i| format!("w{} ", i)).collect();
        let chunks = splitter.split_text(&content).unwrap();

        assert!(chunks.len() > 1);
        for pair in chunks.windows(2) {
            let tail_word = pair[0].split_whitespace().last().unwrap();
            assert!(pair[1].contains(tail_word));
        }
    }

    #[test]
    fn test_multibyte_text_is_not_lost() {
        let splitter =
            TokenSplitter::new(TokenEncoding::Gpt2, ChunkConfig::with_size(7).with_overlap(3))
                .unwrap();
        let content = "日本語のテキストを分割します。".repeat(4);
        let chunks = splitter.split_text(&content).unwrap();

        assert!(!chunks.is_empty());
        assert!(chunks.iter().all(|c| content.contains(c.as_str())));
    }
}
