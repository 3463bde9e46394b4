//! File pipeline: classify, extract methods, split.
//!
//! Files are filtered, classified by extension, and then either split as
//! plain text (unknown languages) or parsed into methods whose text is
//! re-split with the language-aware splitter.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::iter::FusedIterator;

use tracing::{debug, error};

use super::base::TextSplitter;
use super::recursive_splitter::RecursiveSplitter;
use super::token_splitter::TokenSplitter;
use crate::ast_engine::ParserRegistry;
use crate::error::Result;
use crate::processing::{FileFilter, SplitterLanguage, SupportedLanguage};
use crate::types::{ChunkDocument, FileRecord, PipelineConfig};

/// Items the pipeline accepts: plain records, or records from a fallible loader.
pub trait IntoFileRecord {
    fn into_file_record(self) -> Result<FileRecord>;
}

impl IntoFileRecord for FileRecord {
    fn into_file_record(self) -> Result<FileRecord> {
        Ok(self)
    }
}

impl IntoFileRecord for Result<FileRecord> {
    fn into_file_record(self) -> Result<FileRecord> {
        self
    }
}

/// Method-level code chunker.
#[derive(Debug)]
pub struct CodeChunker {
    registry: ParserRegistry,
    filter: FileFilter,
    splitters: HashMap<SplitterLanguage, RecursiveSplitter>,
    token_splitter: TokenSplitter,
    config: PipelineConfig,
}

impl CodeChunker {
    /// Create a chunker with the builtin grammars and default file filter.
    pub fn new(config: PipelineConfig) -> Result<Self> {
        let splitters = SupportedLanguage::ALL
            .iter()
            .filter_map(|language| language.splitter_language())
            .map(|id| RecursiveSplitter::for_language(id, config.code).map(|splitter| (id, splitter)))
            .collect::<Result<HashMap<_, _>>>()?;

        Ok(Self {
            registry: ParserRegistry::shared().clone(),
            filter: FileFilter::with_defaults(),
            splitters,
            token_splitter: TokenSplitter::new(config.text_encoding, config.text)?,
            config,
        })
    }

    /// Replace the parser registry.
    pub fn with_registry(mut self, registry: ParserRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Replace the file filter.
    pub fn with_filter(mut self, filter: FileFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn registry(&self) -> &ParserRegistry {
        &self.registry
    }

    /// Lazily chunk a sequence of files.
    ///
    /// Files are consumed one at a time as chunks are pulled. The first
    /// error ends the sequence.
    pub fn chunk_files<I>(&self, files: I) -> CodeChunks<&Self, I::IntoIter>
    where
        I: IntoIterator,
        I::Item: IntoFileRecord,
    {
        CodeChunks::new(self, files.into_iter())
    }

    /// Chunk a single file.
    ///
    /// Skipped files yield no chunks. Failures are logged and returned
    /// attributed to the file.
    pub fn chunk_file(&self, file: &FileRecord) -> Result<Vec<ChunkDocument>> {
        if let Err(reason) = self.filter.should_process(&file.file_name, &file.file_content) {
            debug!(file = %file.file_name, %reason, "Skipping file");
            return Ok(vec![]);
        }

        let language = file.language();
        let result = if language.is_unknown() {
            self.chunk_text(file)
        } else {
            self.chunk_code(file, language)
        };

        if let Ok(documents) = &result {
            debug!(file = %file.file_name, %language, chunks = documents.len(), "Chunked file");
        }

        result.map_err(|err| {
            error!(
                file = %file.file_name,
                language = %language,
                error = ?err,
                "Error processing file"
            );
            err.in_file(&file.file_name)
        })
    }

    fn chunk_text(&self, file: &FileRecord) -> Result<Vec<ChunkDocument>> {
        let pieces = self.token_splitter.split_text(&file.file_content)?;
        Ok(pieces
            .into_iter()
            .filter(|piece| !piece.is_empty())
            .map(|piece| ChunkDocument::for_text(piece, &file.file_name))
            .collect())
    }

    fn chunk_code(&self, file: &FileRecord, language: SupportedLanguage) -> Result<Vec<ChunkDocument>> {
        let mut parser = self.registry.create(language)?;
        let prefix_doc = parser.grammar().prefixes_doc();
        let splitter = language
            .splitter_language()
            .and_then(|id| self.splitters.get(&id));

        let units = parser.parse(file.file_content.as_bytes())?;
        if units.is_empty() {
            debug!(file = %file.file_name, %language, "No methods found");
        }

        let mut documents = Vec::new();
        for unit in units {
            let text = unit.text_for_splitting(prefix_doc);
            let pieces = match splitter {
                Some(splitter) => splitter.split_text(&text)?,
                None => vec![text],
            };

            documents.extend(
                pieces
                    .into_iter()
                    .filter(|piece| !piece.is_empty())
                    .map(|piece| {
                        ChunkDocument::for_method(piece, &file.file_name, &unit.name, language)
                    }),
            );
        }

        Ok(documents)
    }
}

/// Lazy sequence of chunks over a sequence of files.
///
/// Chunks of one file are buffered; the next file is only read once they
/// have all been yielded. After an error the sequence is exhausted.
pub struct CodeChunks<C, I> {
    chunker: C,
    files: I,
    pending: std::vec::IntoIter<ChunkDocument>,
    done: bool,
}

impl<C, I> CodeChunks<C, I> {
    fn new(chunker: C, files: I) -> Self {
        Self {
            chunker,
            files,
            pending: Vec::new().into_iter(),
            done: false,
        }
    }
}

impl<C, I> Iterator for CodeChunks<C, I>
where
    C: Borrow<CodeChunker>,
    I: Iterator,
    I::Item: IntoFileRecord,
{
    type Item = Result<ChunkDocument>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(document) = self.pending.next() {
                return Some(Ok(document));
            }
            if self.done {
                return None;
            }

            let item = match self.files.next() {
                Some(item) => item,
                None => {
                    self.done = true;
                    return None;
                }
            };

            let chunked = item
                .into_file_record()
                .and_then(|file| self.chunker.borrow().chunk_file(&file));

            match chunked {
                Ok(documents) => self.pending = documents.into_iter(),
                Err(err) => {
                    self.done = true;
                    return Some(Err(err));
                }
            }
        }
    }
}

impl<C, I> FusedIterator for CodeChunks<C, I>
where
    C: Borrow<CodeChunker>,
    I: Iterator,
    I::Item: IntoFileRecord,
{
}

/// Chunk files for indexing with the default pipeline policy.
///
/// Loading the tokenizer is the only eager step; the returned sequence
/// reads files as it is consumed.
pub fn parse_code_files_for_db<I>(files: I) -> Result<CodeChunks<CodeChunker, I::IntoIter>>
where
    I: IntoIterator,
    I::Item: IntoFileRecord,
{
    let chunker = CodeChunker::new(PipelineConfig::default())?;
    Ok(CodeChunks::new(chunker, files.into_iter()))
}
