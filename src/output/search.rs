//! Rendering of scored search hits.

use crate::processing::SupportedLanguage;
use crate::types::ChunkDocument;

/// Render one scored chunk as a Markdown snippet.
///
/// The code fence is tagged with the language classified from the chunk's
/// file name, so text chunks are fenced as `unknown`.
pub fn format_search_result(document: &ChunkDocument, score: f32) -> String {
    let language = SupportedLanguage::from_file_name(&document.filename);
    format!(
        "{} -> {} (score: {})\n\n```{}\n{}\n```\n\n",
        document.filename, document.method_name, score, language, document.content
    )
}

/// Render scored chunks in order.
pub fn format_search_results(hits: &[(ChunkDocument, f32)]) -> Vec<String> {
    hits.iter()
        .map(|(document, score)| format_search_result(document, *score))
        .collect()
}
