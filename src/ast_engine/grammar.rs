//! Per-language grammar descriptors.
//!
//! Every structural parser runs the same extraction walk; languages differ
//! only in the node kinds they declare here.

use tree_sitter::{Language, Node};

use crate::processing::SupportedLanguage;

/// How a declaration's name is found among its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameLookup {
    /// First direct child whose kind is an identifier kind.
    FirstChild,
    /// Follow the `declarator` field through pointer/reference wrappers to
    /// the function declarator, then take its first identifier child.
    Declarator,
    /// Last identifier child before the parameter list; the return type may
    /// itself be an identifier.
    LastBeforeParameters,
}

/// Where a declaration's documentation lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocLookup {
    /// A comment node immediately preceding the declaration.
    PrecedingComment,
    /// A string literal opening the declaration body.
    BodyDocstring,
}

/// Node vocabulary of one grammar.
#[derive(Debug, Clone, Copy)]
pub struct LanguageGrammar {
    pub language: SupportedLanguage,
    pub ts_language: fn() -> Language,
    /// Node kind of a function or method declaration
    pub declaration: &'static str,
    /// Field a declaration node must carry to count as one
    pub required_field: Option<&'static str>,
    /// Node kinds usable as a declaration name
    pub identifiers: &'static [&'static str],
    /// Node kinds of comments
    pub comments: &'static [&'static str],
    /// Node kinds whose subtrees never contain declarations
    pub opaque: &'static [&'static str],
    pub name_lookup: NameLookup,
    pub doc_lookup: DocLookup,
    /// Name used when no identifier is found
    pub fallback_name: &'static str,
}

impl LanguageGrammar {
    pub fn is_identifier(&self, kind: &str) -> bool {
        self.identifiers.contains(&kind)
    }

    pub fn is_comment(&self, kind: &str) -> bool {
        self.comments.contains(&kind)
    }

    pub fn is_opaque(&self, kind: &str) -> bool {
        self.opaque.contains(&kind)
    }

    /// Whether `node` is a function or method declaration.
    pub fn is_declaration(&self, node: Node) -> bool {
        node.kind() == self.declaration
            && self
                .required_field
                .map_or(true, |field| node.child_by_field_name(field).is_some())
    }

    /// Load the tree-sitter language.
    pub fn load(&self) -> Language {
        (self.ts_language)()
    }

    /// Whether doc comments are prefixed to method text before splitting.
    pub fn prefixes_doc(&self) -> bool {
        self.doc_lookup == DocLookup::PrecedingComment
    }
}

fn python() -> Language {
    tree_sitter_python::LANGUAGE.into()
}

fn javascript() -> Language {
    tree_sitter_javascript::LANGUAGE.into()
}

fn typescript() -> Language {
    tree_sitter_typescript::LANGUAGE_TSX.into()
}

fn java() -> Language {
    tree_sitter_java::LANGUAGE.into()
}

fn go() -> Language {
    tree_sitter_go::LANGUAGE.into()
}

fn rust() -> Language {
    tree_sitter_rust::LANGUAGE.into()
}

fn kotlin() -> Language {
    tree_sitter_kotlin_ng::LANGUAGE.into()
}

fn c() -> Language {
    tree_sitter_c::LANGUAGE.into()
}

fn cpp() -> Language {
    tree_sitter_cpp::LANGUAGE.into()
}

fn csharp() -> Language {
    tree_sitter_c_sharp::LANGUAGE.into()
}

fn ruby() -> Language {
    tree_sitter_ruby::LANGUAGE.into()
}

fn haskell() -> Language {
    tree_sitter_haskell::LANGUAGE.into()
}

const DEFAULT_FALLBACK_NAME: &str = "anonymous";

/// Grammars shipped with the crate.
pub const BUILTIN_GRAMMARS: &[LanguageGrammar] = &[
    LanguageGrammar {
        language: SupportedLanguage::Python,
        ts_language: python,
        declaration: "function_definition",
        required_field: None,
        identifiers: &["identifier"],
        comments: &["comment"],
        opaque: &[],
        name_lookup: NameLookup::FirstChild,
        doc_lookup: DocLookup::BodyDocstring,
        fallback_name: DEFAULT_FALLBACK_NAME,
    },
    LanguageGrammar {
        language: SupportedLanguage::JavaScript,
        ts_language: javascript,
        declaration: "function_declaration",
        required_field: None,
        identifiers: &["identifier"],
        comments: &["comment"],
        opaque: &[],
        name_lookup: NameLookup::FirstChild,
        doc_lookup: DocLookup::PrecedingComment,
        fallback_name: DEFAULT_FALLBACK_NAME,
    },
    // TSX is a superset of TypeScript, so one grammar serves .ts and .tsx.
    LanguageGrammar {
        language: SupportedLanguage::TypeScript,
        ts_language: typescript,
        declaration: "function_declaration",
        required_field: None,
        identifiers: &["identifier"],
        comments: &["comment"],
        opaque: &[],
        name_lookup: NameLookup::FirstChild,
        doc_lookup: DocLookup::PrecedingComment,
        fallback_name: DEFAULT_FALLBACK_NAME,
    },
    LanguageGrammar {
        language: SupportedLanguage::Java,
        ts_language: java,
        declaration: "method_declaration",
        required_field: None,
        identifiers: &["identifier"],
        // Javadoc only; `//` lines are not documentation.
        comments: &["block_comment"],
        opaque: &[],
        name_lookup: NameLookup::FirstChild,
        doc_lookup: DocLookup::PrecedingComment,
        fallback_name: "Main",
    },
    LanguageGrammar {
        language: SupportedLanguage::Go,
        ts_language: go,
        declaration: "function_declaration",
        required_field: None,
        identifiers: &["identifier"],
        comments: &["comment"],
        opaque: &[],
        name_lookup: NameLookup::FirstChild,
        doc_lookup: DocLookup::PrecedingComment,
        fallback_name: DEFAULT_FALLBACK_NAME,
    },
    LanguageGrammar {
        language: SupportedLanguage::Rust,
        ts_language: rust,
        declaration: "function_item",
        required_field: None,
        identifiers: &["identifier"],
        comments: &["line_comment", "block_comment"],
        opaque: &[],
        name_lookup: NameLookup::FirstChild,
        doc_lookup: DocLookup::PrecedingComment,
        fallback_name: DEFAULT_FALLBACK_NAME,
    },
    LanguageGrammar {
        language: SupportedLanguage::Kotlin,
        ts_language: kotlin,
        declaration: "function_declaration",
        required_field: None,
        identifiers: &["identifier", "simple_identifier"],
        comments: &["line_comment", "block_comment", "comment"],
        opaque: &[],
        name_lookup: NameLookup::FirstChild,
        doc_lookup: DocLookup::PrecedingComment,
        fallback_name: DEFAULT_FALLBACK_NAME,
    },
    LanguageGrammar {
        language: SupportedLanguage::C,
        ts_language: c,
        declaration: "function_definition",
        required_field: None,
        identifiers: &["identifier"],
        comments: &["comment"],
        opaque: &[],
        name_lookup: NameLookup::Declarator,
        doc_lookup: DocLookup::PrecedingComment,
        fallback_name: DEFAULT_FALLBACK_NAME,
    },
    LanguageGrammar {
        language: SupportedLanguage::Cpp,
        ts_language: cpp,
        declaration: "function_definition",
        required_field: None,
        identifiers: &[
            "identifier",
            "field_identifier",
            "qualified_identifier",
            "destructor_name",
            "operator_name",
        ],
        comments: &["comment"],
        opaque: &[],
        name_lookup: NameLookup::Declarator,
        doc_lookup: DocLookup::PrecedingComment,
        fallback_name: DEFAULT_FALLBACK_NAME,
    },
    LanguageGrammar {
        language: SupportedLanguage::CSharp,
        ts_language: csharp,
        declaration: "method_declaration",
        required_field: None,
        identifiers: &["identifier"],
        comments: &["comment"],
        opaque: &[],
        name_lookup: NameLookup::LastBeforeParameters,
        doc_lookup: DocLookup::PrecedingComment,
        fallback_name: "Main",
    },
    LanguageGrammar {
        language: SupportedLanguage::Ruby,
        ts_language: ruby,
        declaration: "method",
        required_field: None,
        identifiers: &["identifier"],
        comments: &["comment"],
        opaque: &[],
        name_lookup: NameLookup::FirstChild,
        doc_lookup: DocLookup::PrecedingComment,
        fallback_name: DEFAULT_FALLBACK_NAME,
    },
    LanguageGrammar {
        language: SupportedLanguage::Haskell,
        ts_language: haskell,
        declaration: "function",
        // Function types are also `function` nodes, but have no name.
        required_field: Some("name"),
        identifiers: &["variable"],
        comments: &["comment", "haddock"],
        opaque: &[
            "signature",
            "data_type",
            "newtype",
            "type_synomym",
            "type_family",
            "data_family",
            "kind_signature",
            "foreign_import",
        ],
        name_lookup: NameLookup::FirstChild,
        doc_lookup: DocLookup::PrecedingComment,
        fallback_name: DEFAULT_FALLBACK_NAME,
    },
];

/// Look up a builtin grammar.
pub fn builtin_grammar(language: SupportedLanguage) -> Option<&'static LanguageGrammar> {
    BUILTIN_GRAMMARS.iter().find(|g| g.language == language)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_grammars_load() {
        for grammar in BUILTIN_GRAMMARS {
            let mut parser = tree_sitter::Parser::new();
            assert!(
                parser.set_language(&grammar.load()).is_ok(),
                "{} grammar is incompatible",
                grammar.language
            );
        }
    }

    #[test]
    fn test_one_grammar_per_language() {
        for (i, grammar) in BUILTIN_GRAMMARS.iter().enumerate() {
            assert!(
                BUILTIN_GRAMMARS[i + 1..]
                    .iter()
                    .all(|other| other.language != grammar.language),
                "{} registered twice",
                grammar.language
            );
        }
    }

    #[test]
    fn test_languages_without_grammar() {
        for language in [
            SupportedLanguage::ObjectiveC,
            SupportedLanguage::Scala,
            SupportedLanguage::Lua,
            SupportedLanguage::Unknown,
        ] {
            assert!(builtin_grammar(language).is_none());
        }
    }

    #[test]
    fn test_python_keeps_docstring_in_body() {
        let python = builtin_grammar(SupportedLanguage::Python).unwrap();
        assert!(!python.prefixes_doc());

        let go = builtin_grammar(SupportedLanguage::Go).unwrap();
        assert!(go.prefixes_doc());
        assert!(go.is_comment("comment"));
        assert!(go.is_identifier("identifier"));
    }
}
