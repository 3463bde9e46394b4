//! Extraction and output units.

use serde::{Deserialize, Serialize};

use crate::processing::SupportedLanguage;

/// `method_name` given to chunks of files with no recognized language.
pub const TEXT_METHOD_NAME: &str = "text";

/// One function or method found by structural extraction.
///
/// Created fresh per parse call and consumed when the pipeline splits it
/// into [`ChunkDocument`]s.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodUnit {
    /// Declared identifier, or the language's fallback name
    pub name: String,

    /// Exact source of the declaration node
    pub source_text: String,

    /// Documentation attached to the declaration
    pub doc_comment: Option<String>,

    /// Byte offset of the declaration start
    pub start_byte: usize,

    /// Byte offset one past the declaration end
    pub end_byte: usize,

    /// Line range of the declaration (1-indexed, inclusive)
    pub line_range: (usize, usize),
}

impl MethodUnit {
    /// Text handed to the secondary splitter.
    ///
    /// The doc comment is prefixed on its own line when `prefix_doc` is set;
    /// this is the only place the prefix is applied.
    pub fn text_for_splitting(&self, prefix_doc: bool) -> String {
        match &self.doc_comment {
            Some(doc) if prefix_doc => format!("{}\n{}", doc, self.source_text),
            _ => self.source_text.clone(),
        }
    }
}

/// A chunk of source ready for embedding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkDocument {
    /// The chunk text
    pub content: String,

    /// Name of the file the chunk came from
    pub filename: String,

    /// Method the chunk belongs to, or `"text"` for unclassified content
    pub method_name: String,

    /// Language of the file
    pub language: SupportedLanguage,
}

impl ChunkDocument {
    /// Create a chunk of a method.
    pub fn for_method(
        content: String,
        filename: &str,
        method_name: &str,
        language: SupportedLanguage,
    ) -> Self {
        Self {
            content,
            filename: filename.to_string(),
            method_name: method_name.to_string(),
            language,
        }
    }

    /// Create a chunk of unclassified text.
    pub fn for_text(content: String, filename: &str) -> Self {
        Self::for_method(content, filename, TEXT_METHOD_NAME, SupportedLanguage::Unknown)
    }

    /// Get the length of the chunk content in characters.
    pub fn len(&self) -> usize {
        self.content.chars().count()
    }

    /// Check if the chunk is empty.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(doc: Option<&str>) -> MethodUnit {
        MethodUnit {
            name: "add".to_string(),
            source_text: "func add() {}".to_string(),
            doc_comment: doc.map(String::from),
            start_byte: 0,
            end_byte: 13,
            line_range: (1, 1),
        }
    }

    #[test]
    fn test_doc_prefix() {
        assert_eq!(
            unit(Some("// adds")).text_for_splitting(true),
            "// adds\nfunc add() {}"
        );
        assert_eq!(unit(Some("// adds")).text_for_splitting(false), "func add() {}");
        assert_eq!(unit(None).text_for_splitting(true), "func add() {}");
    }

    #[test]
    fn test_serialized_shape() {
        let doc = ChunkDocument::for_text("hello".to_string(), "notes.txt");
        let json = serde_json::to_value(&doc).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "content": "hello",
                "filename": "notes.txt",
                "method_name": "text",
                "language": "unknown",
            })
        );
    }
}
