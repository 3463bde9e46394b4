//! Recursive, language-aware character splitter.

use regex::Regex;
use tracing::warn;

use super::base::{char_len, TextSplitter};
use crate::error::Result;
use crate::processing::SplitterLanguage;
use crate::types::ChunkConfig;

/// Recursive splitter that breaks text at the coarsest boundary available.
///
/// Separators are tried in order of preference. The first separator that
/// occurs in the text is used to cut it, keeping the separator at the start
/// of the following piece. Pieces that are still too large are re-split with
/// the remaining, finer separators; small pieces are merged back up to the
/// chunk size with trailing overlap.
///
/// Sizes are measured in characters.
#[derive(Debug, Clone)]
pub struct RecursiveSplitter {
    /// Separators in order of preference (most to least preferred)
    separators: Vec<Separator>,
    config: ChunkConfig,
}

#[derive(Debug, Clone)]
struct Separator {
    literal: &'static str,
    pattern: Option<Regex>,
}

impl Separator {
    fn new(literal: &'static str) -> Result<Self> {
        let pattern = if literal.is_empty() {
            None
        } else {
            Some(Regex::new(&regex::escape(literal))?)
        };
        Ok(Self { literal, pattern })
    }

    fn occurs_in(&self, text: &str) -> bool {
        match &self.pattern {
            Some(pattern) => pattern.is_match(text),
            None => true,
        }
    }

    /// Split keeping each separator at the start of the piece that follows it.
    fn split<'a>(&self, text: &'a str) -> Vec<&'a str> {
        let pattern = match &self.pattern {
            Some(pattern) => pattern,
            None => {
                return text
                    .char_indices()
                    .map(|(i, c)| &text[i..i + c.len_utf8()])
                    .collect()
            }
        };

        let mut pieces = Vec::new();
        let mut piece_start = 0;
        for found in pattern.find_iter(text) {
            pieces.push(&text[piece_start..found.start()]);
            piece_start = found.start();
        }
        pieces.push(&text[piece_start..]);

        pieces.into_iter().filter(|p| !p.is_empty()).collect()
    }
}

impl RecursiveSplitter {
    /// Create a splitter with custom separators.
    pub fn with_separators(separators: &[&'static str], config: ChunkConfig) -> Result<Self> {
        let separators = separators
            .iter()
            .map(|literal| Separator::new(literal))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { separators, config })
    }

    /// Create a splitter tuned to a language's block and statement keywords.
    pub fn for_language(language: SplitterLanguage, config: ChunkConfig) -> Result<Self> {
        Self::with_separators(separators_for(language), config)
    }

    pub fn config(&self) -> &ChunkConfig {
        &self.config
    }

    fn recursive_split(&self, text: &str, separators: &[Separator]) -> Vec<String> {
        let mut final_chunks = Vec::new();

        // Pick the first separator present in the text; the empty separator always is.
        let (separator_index, separator) = match separators
            .iter()
            .enumerate()
            .find(|(_, s)| s.occurs_in(text))
        {
            Some(found) => found,
            None => match separators.last() {
                Some(last) => (separators.len() - 1, last),
                None => return vec![text.to_string()],
            },
        };
        let finer = &separators[separator_index + 1..];

        let mut good_splits: Vec<&str> = Vec::new();
        for split in separator.split(text) {
            if char_len(split) < self.config.chunk_size {
                good_splits.push(split);
                continue;
            }

            if !good_splits.is_empty() {
                final_chunks.extend(self.merge_splits(&good_splits));
                good_splits.clear();
            }

            if finer.is_empty() {
                final_chunks.push(split.to_string());
            } else {
                final_chunks.extend(self.recursive_split(split, finer));
            }
        }

        if !good_splits.is_empty() {
            final_chunks.extend(self.merge_splits(&good_splits));
        }

        final_chunks
    }

    /// Merge pieces into chunks no larger than the chunk size, carrying at
    /// most `chunk_overlap` characters of trailing pieces into the next chunk.
    fn merge_splits(&self, splits: &[&str]) -> Vec<String> {
        let chunk_size = self.config.chunk_size;
        let overlap = self.config.chunk_overlap;

        let mut docs = Vec::new();
        let mut current: std::collections::VecDeque<(&str, usize)> = Default::default();
        let mut total = 0;

        for &split in splits {
            let len = char_len(split);

            if total + len > chunk_size {
                if total > chunk_size {
                    warn!(
                        size = total,
                        chunk_size, "Created a chunk larger than the configured size"
                    );
                }
                if !current.is_empty() {
                    if let Some(doc) = join_pieces(current.iter().map(|(s, _)| *s)) {
                        docs.push(doc);
                    }
                    while total > overlap || (total + len > chunk_size && total > 0) {
                        match current.pop_front() {
                            Some((_, front_len)) => total -= front_len,
                            None => break,
                        }
                    }
                }
            }

            current.push_back((split, len));
            total += len;
        }

        if let Some(doc) = join_pieces(current.iter().map(|(s, _)| *s)) {
            docs.push(doc);
        }

        docs
    }
}

fn join_pieces<'a>(pieces: impl Iterator<Item = &'a str>) -> Option<String> {
    let joined: String = pieces.collect();
    let trimmed = joined.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

impl TextSplitter for RecursiveSplitter {
    fn name(&self) -> &'static str {
        "recursive"
    }

    fn description(&self) -> &'static str {
        "Hierarchically splits text at language block, line and word boundaries"
    }

    fn split_text(&self, text: &str) -> Result<Vec<String>> {
        if text.is_empty() {
            return Ok(vec![]);
        }
        Ok(self.recursive_split(text, &self.separators))
    }
}

/// Separators for each language, coarsest first.
pub fn separators_for(language: SplitterLanguage) -> &'static [&'static str] {
    match language {
        SplitterLanguage::Cpp => &[
            "\nclass ", "\nvoid ", "\nint ", "\nfloat ", "\ndouble ", "\nif ", "\nfor ",
            "\nwhile ", "\nswitch ", "\ncase ", "\n\n", "\n", " ", "",
        ],
        SplitterLanguage::Go => &[
            "\nfunc ", "\nvar ", "\nconst ", "\ntype ", "\nif ", "\nfor ", "\nswitch ",
            "\ncase ", "\n\n", "\n", " ", "",
        ],
        SplitterLanguage::Java => &[
            "\nclass ", "\npublic ", "\nprotected ", "\nprivate ", "\nstatic ", "\nif ",
            "\nfor ", "\nwhile ", "\nswitch ", "\ncase ", "\n\n", "\n", " ", "",
        ],
        SplitterLanguage::Kotlin => &[
            "\nclass ", "\npublic ", "\nprotected ", "\nprivate ", "\ninternal ",
            "\ncompanion ", "\nfun ", "\nval ", "\nvar ", "\nif ", "\nfor ", "\nwhile ",
            "\nwhen ", "\ncase ", "\nelse ", "\n\n", "\n", " ", "",
        ],
        SplitterLanguage::Js => &[
            "\nfunction ", "\nconst ", "\nlet ", "\nvar ", "\nclass ", "\nif ", "\nfor ",
            "\nwhile ", "\nswitch ", "\ncase ", "\ndefault ", "\n\n", "\n", " ", "",
        ],
        SplitterLanguage::Ts => &[
            "\nenum ", "\ninterface ", "\nnamespace ", "\ntype ", "\nclass ", "\nfunction ",
            "\nconst ", "\nlet ", "\nvar ", "\nif ", "\nfor ", "\nwhile ", "\nswitch ",
            "\ncase ", "\ndefault ", "\n\n", "\n", " ", "",
        ],
        SplitterLanguage::Python => &["\nclass ", "\ndef ", "\n\tdef ", "\n\n", "\n", " ", ""],
        SplitterLanguage::Ruby => &[
            "\ndef ", "\nclass ", "\nif ", "\nunless ", "\nwhile ", "\nfor ", "\ndo ",
            "\nbegin ", "\nrescue ", "\n\n", "\n", " ", "",
        ],
        SplitterLanguage::Rust => &[
            "\nfn ", "\nconst ", "\nlet ", "\nif ", "\nwhile ", "\nfor ", "\nloop ",
            "\nmatch ", "\nconst ", "\n\n", "\n", " ", "",
        ],
        SplitterLanguage::CSharp => &[
            "\ninterface ", "\nenum ", "\nimplements ", "\ndelegate ", "\nevent ", "\nclass ",
            "\nabstract ", "\npublic ", "\nprotected ", "\nprivate ", "\nstatic ", "\nreturn ",
            "\nif ", "\ncontinue ", "\nfor ", "\nforeach ", "\nwhile ", "\nswitch ", "\nbreak ",
            "\ncase ", "\nelse ", "\ntry ", "\nthrow ", "\nfinally ", "\ncatch ", "\n\n", "\n",
            " ", "",
        ],
        SplitterLanguage::Haskell => &[
            "\nmain :: ", "\nmain = ", "\nlet ", "\nin ", "\ndo ", "\nwhere ", "\n:: ", "\n= ",
            "\ndata ", "\nnewtype ", "\ntype ", "\nmodule ", "\nimport ", "\nqualified ",
            "\nimport qualified ", "\nclass ", "\ninstance ", "\ncase ", "\n| ", "\n= {", "\n, ",
            "\n\n", "\n", " ", "",
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn python_splitter(size: usize, overlap: usize) -> RecursiveSplitter {
        RecursiveSplitter::for_language(
            SplitterLanguage::Python,
            ChunkConfig::with_size(size).with_overlap(overlap),
        )
        .unwrap()
    }

    #[test]
    fn test_small_text_is_one_chunk() {
        let splitter = python_splitter(1024, 128);
        let chunks = splitter.split_text("def f():\n    return 1").unwrap();
        assert_eq!(chunks, vec!["def f():\n    return 1".to_string()]);
    }

    #[test]
    fn test_empty_text() {
        let splitter = python_splitter(1024, 128);
        assert!(splitter.split_text("").unwrap().is_empty());
        assert!(splitter.split_text("   \n\n  ").unwrap().is_empty());
    }

    #[test]
    fn test_separator_kept_at_piece_start() {
        let separator = Separator::new("\ndef ").unwrap();
        assert_eq!(
            separator.split("a\ndef b\ndef c"),
            vec!["a", "\ndef b", "\ndef c"]
        );
        assert_eq!(Separator::new("").unwrap().split("añb"), vec!["a", "ñ", "b"]);
    }

    #[test]
    fn test_prefers_language_boundaries() {
        let splitter = python_splitter(40, 0);
        let text = "class A:\n    x = 1\n\ndef first():\n    pass\n\ndef second():\n    pass\n";
        let chunks = splitter.split_text(text).unwrap();

        assert!(chunks.iter().any(|c| c.starts_with("def first")));
        assert!(chunks.iter().any(|c| c.starts_with("def second")));
    }

    #[test]
    fn test_chunks_bounded_with_overlap() {
        let splitter = python_splitter(200, 40);
        let text: String = (0..60)
            .map(|i| format!("    value_{i:02} = compute({i})\n"))
            .collect();
        let chunks = splitter.split_text(&text).unwrap();

        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(char_len(chunk) <= 200);
        }
        for pair in chunks.windows(2) {
            let first_line = pair[1].lines().next().unwrap().trim();
            assert!(pair[0].contains(first_line), "no overlap between chunks");
        }
    }

    #[test]
    fn test_unbroken_text_falls_back_to_characters() {
        let splitter = python_splitter(10, 0);
        let text = "x".repeat(35);
        let chunks = splitter.split_text(&text).unwrap();

        assert_eq!(chunks.len(), 4);
        assert!(chunks.iter().all(|c| char_len(c) <= 10));
        assert_eq!(chunks.concat(), text);
    }

    #[test]
    fn test_every_language_has_fallback_separators() {
        for language in [
            SplitterLanguage::Python,
            SplitterLanguage::Js,
            SplitterLanguage::Ts,
            SplitterLanguage::Java,
            SplitterLanguage::Kotlin,
            SplitterLanguage::Rust,
            SplitterLanguage::Go,
            SplitterLanguage::Cpp,
            SplitterLanguage::CSharp,
            SplitterLanguage::Haskell,
            SplitterLanguage::Ruby,
        ] {
            let separators = separators_for(language);
            assert_eq!(&separators[separators.len() - 4..], &["\n\n", "\n", " ", ""]);
            assert!(RecursiveSplitter::for_language(language, ChunkConfig::code()).is_ok());
        }
    }
}
