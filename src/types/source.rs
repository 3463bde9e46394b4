//! Input records handed to the pipeline by a repository loader.

use serde::{Deserialize, Serialize};

use crate::processing::{extension_of, SupportedLanguage};

/// One file to be chunked.
///
/// Produced by the loader, consumed once by the pipeline, not retained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Path of the file within its repository
    pub file_name: String,

    /// Decoded text content
    pub file_content: String,
}

impl FileRecord {
    pub fn new(file_name: impl Into<String>, file_content: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            file_content: file_content.into(),
        }
    }

    /// Extension of the file name, including the leading dot.
    pub fn extension(&self) -> &str {
        extension_of(&self.file_name)
    }

    /// Language classified from the file name.
    pub fn language(&self) -> SupportedLanguage {
        SupportedLanguage::from_file_name(&self.file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_classification() {
        let record = FileRecord::new("pkg/server.go", "package main");
        assert_eq!(record.extension(), ".go");
        assert_eq!(record.language(), SupportedLanguage::Go);
    }

    #[test]
    fn test_record_deserializes_from_loader_shape() {
        let record: FileRecord = serde_json::from_str(
            r#"{"file_name": "a.rb", "file_content": "def a; end"}"#,
        )
        .unwrap();
        assert_eq!(record, FileRecord::new("a.rb", "def a; end"));
    }
}
