//! AST engine for method-level extraction.
//!
//! This module provides:
//! - Per-language grammar descriptors
//! - The tree-sitter based structural parser
//! - A registry mapping languages to parsers

pub mod grammar;
pub mod parser;
pub mod registry;

pub use grammar::{builtin_grammar, DocLookup, LanguageGrammar, NameLookup, BUILTIN_GRAMMARS};
pub use parser::StructuralParser;
pub use registry::ParserRegistry;
