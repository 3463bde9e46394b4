//! Programming language classification.
//!
//! Classification is a total function over file names: anything that is not
//! recognized maps to [`SupportedLanguage::Unknown`].

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Languages the pipeline knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SupportedLanguage {
    Python,
    JavaScript,
    TypeScript,
    Java,
    Cpp,
    C,
    Go,
    Rust,
    Kotlin,
    CSharp,
    #[serde(rename = "objective_c")]
    ObjectiveC,
    Scala,
    Lua,
    Haskell,
    Ruby,
    Unknown,
}

impl SupportedLanguage {
    /// Every variant, in declaration order.
    pub const ALL: [SupportedLanguage; 16] = [
        SupportedLanguage::Python,
        SupportedLanguage::JavaScript,
        SupportedLanguage::TypeScript,
        SupportedLanguage::Java,
        SupportedLanguage::Cpp,
        SupportedLanguage::C,
        SupportedLanguage::Go,
        SupportedLanguage::Rust,
        SupportedLanguage::Kotlin,
        SupportedLanguage::CSharp,
        SupportedLanguage::ObjectiveC,
        SupportedLanguage::Scala,
        SupportedLanguage::Lua,
        SupportedLanguage::Haskell,
        SupportedLanguage::Ruby,
        SupportedLanguage::Unknown,
    ];

    /// Get a string representation of the language.
    pub fn as_str(&self) -> &'static str {
        match self {
            SupportedLanguage::Python => "python",
            SupportedLanguage::JavaScript => "javascript",
            SupportedLanguage::TypeScript => "typescript",
            SupportedLanguage::Java => "java",
            SupportedLanguage::Cpp => "cpp",
            SupportedLanguage::C => "c",
            SupportedLanguage::Go => "go",
            SupportedLanguage::Rust => "rust",
            SupportedLanguage::Kotlin => "kotlin",
            SupportedLanguage::CSharp => "csharp",
            SupportedLanguage::ObjectiveC => "objective_c",
            SupportedLanguage::Scala => "scala",
            SupportedLanguage::Lua => "lua",
            SupportedLanguage::Haskell => "haskell",
            SupportedLanguage::Ruby => "ruby",
            SupportedLanguage::Unknown => "unknown",
        }
    }

    /// Classify a file by its name.
    pub fn from_file_name(file_name: &str) -> Self {
        language_of(extension_of(file_name))
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, SupportedLanguage::Unknown)
    }

    /// The language-aware splitter used to re-split extracted methods.
    ///
    /// C has a structural parser but no language-aware splitter, so its
    /// methods are emitted whole.
    pub fn splitter_language(&self) -> Option<SplitterLanguage> {
        match self {
            SupportedLanguage::Python => Some(SplitterLanguage::Python),
            SupportedLanguage::JavaScript => Some(SplitterLanguage::Js),
            SupportedLanguage::TypeScript => Some(SplitterLanguage::Ts),
            SupportedLanguage::Java => Some(SplitterLanguage::Java),
            SupportedLanguage::Kotlin => Some(SplitterLanguage::Kotlin),
            SupportedLanguage::Rust => Some(SplitterLanguage::Rust),
            SupportedLanguage::Go => Some(SplitterLanguage::Go),
            SupportedLanguage::Cpp => Some(SplitterLanguage::Cpp),
            SupportedLanguage::CSharp => Some(SplitterLanguage::CSharp),
            SupportedLanguage::Haskell => Some(SplitterLanguage::Haskell),
            SupportedLanguage::Ruby => Some(SplitterLanguage::Ruby),
            _ => None,
        }
    }
}

impl fmt::Display for SupportedLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifiers of the language-aware splitters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SplitterLanguage {
    Python,
    Js,
    Ts,
    Java,
    Kotlin,
    Rust,
    Go,
    Cpp,
    CSharp,
    Haskell,
    Ruby,
}

lazy_static::lazy_static! {
    static ref EXTENSION_MAP: HashMap<&'static str, SupportedLanguage> = [
        (".py", SupportedLanguage::Python),
        (".js", SupportedLanguage::JavaScript),
        (".jsx", SupportedLanguage::JavaScript),
        (".mjs", SupportedLanguage::JavaScript),
        (".cjs", SupportedLanguage::JavaScript),
        (".ts", SupportedLanguage::TypeScript),
        (".tsx", SupportedLanguage::TypeScript),
        (".java", SupportedLanguage::Java),
        (".kt", SupportedLanguage::Kotlin),
        (".rs", SupportedLanguage::Rust),
        (".go", SupportedLanguage::Go),
        (".cpp", SupportedLanguage::Cpp),
        (".c", SupportedLanguage::C),
        (".cs", SupportedLanguage::CSharp),
        (".hs", SupportedLanguage::Haskell),
        (".rb", SupportedLanguage::Ruby),
    ]
    .into_iter()
    .collect();
}

/// Extension of a file name, including the leading dot.
///
/// Only the last path component is considered, and leading dots of that
/// component do not start an extension: `".gitignore"` has none,
/// `"src/a.tar.gz"` has `".gz"`.
pub fn extension_of(file_name: &str) -> &str {
    let base = file_name.rsplit(&['/', '\\'][..]).next().unwrap_or(file_name);
    let stem_start = base.len() - base.trim_start_matches('.').len();

    match base[stem_start..].rfind('.') {
        Some(dot) => &base[stem_start + dot..],
        None => "",
    }
}

/// Map an extension (as returned by [`extension_of`]) to a language.
pub fn language_of(extension: &str) -> SupportedLanguage {
    EXTENSION_MAP
        .get(extension)
        .copied()
        .unwrap_or(SupportedLanguage::Unknown)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("main.py"), ".py");
        assert_eq!(extension_of("src/lib/app.test.tsx"), ".tsx");
        assert_eq!(extension_of("archive.tar.gz"), ".gz");
        assert_eq!(extension_of("Makefile"), "");
        assert_eq!(extension_of(".gitignore"), "");
        assert_eq!(extension_of("dir.d/README"), "");
        assert_eq!(extension_of("dir\\win.rs"), ".rs");
        assert_eq!(extension_of(""), "");
        assert_eq!(extension_of("trailing."), ".");
    }

    #[test]
    fn test_language_of() {
        assert_eq!(language_of(".py"), SupportedLanguage::Python);
        assert_eq!(language_of(".mjs"), SupportedLanguage::JavaScript);
        assert_eq!(language_of(".tsx"), SupportedLanguage::TypeScript);
        assert_eq!(language_of(".kt"), SupportedLanguage::Kotlin);
        assert_eq!(language_of(".cs"), SupportedLanguage::CSharp);
        assert_eq!(language_of(".hs"), SupportedLanguage::Haskell);
        assert_eq!(language_of(".md"), SupportedLanguage::Unknown);
        assert_eq!(language_of(""), SupportedLanguage::Unknown);
        // Lookup is case-sensitive.
        assert_eq!(language_of(".PY"), SupportedLanguage::Unknown);
    }

    #[test]
    fn test_classification_is_total() {
        for name in ["", ".", "..", "a.", "x.y.z", "🦀.rs", "no_ext", "a/b/.c", "weird..go"] {
            let language = SupportedLanguage::from_file_name(name);
            assert!(SupportedLanguage::ALL.contains(&language), "{name}");
        }
        assert_eq!(SupportedLanguage::from_file_name("🦀.rs"), SupportedLanguage::Rust);
        assert_eq!(SupportedLanguage::from_file_name("weird..go"), SupportedLanguage::Go);
    }

    #[test]
    fn test_splitter_language() {
        assert_eq!(
            SupportedLanguage::Python.splitter_language(),
            Some(SplitterLanguage::Python)
        );
        assert_eq!(SupportedLanguage::C.splitter_language(), None);
        assert_eq!(SupportedLanguage::Unknown.splitter_language(), None);
    }

    #[test]
    fn test_serde_names_match_as_str() {
        for language in SupportedLanguage::ALL {
            let json = serde_json::to_string(&language).unwrap();
            assert_eq!(json, format!("\"{}\"", language.as_str()));
        }
    }
}
