//! Language to structural parser lookup.

use std::collections::HashMap;

use crate::ast_engine::grammar::{LanguageGrammar, BUILTIN_GRAMMARS};
use crate::ast_engine::parser::StructuralParser;
use crate::error::{ChunkError, Result};
use crate::processing::SupportedLanguage;

lazy_static::lazy_static! {
    static ref BUILTIN: ParserRegistry = ParserRegistry::builtin();
}

/// Table of grammars, keyed by language.
///
/// Built once and shared read-only; every [`create`](Self::create) call
/// hands out a fresh parser.
#[derive(Debug, Clone, Default)]
pub struct ParserRegistry {
    grammars: HashMap<SupportedLanguage, LanguageGrammar>,
}

impl ParserRegistry {
    /// Registry of every grammar shipped with the crate.
    pub fn builtin() -> Self {
        Self::from_grammars(BUILTIN_GRAMMARS.iter().copied())
    }

    /// Shared instance of [`ParserRegistry::builtin`].
    pub fn shared() -> &'static ParserRegistry {
        &BUILTIN
    }

    /// Build a registry; a later grammar for the same language replaces an earlier one.
    pub fn from_grammars(grammars: impl IntoIterator<Item = LanguageGrammar>) -> Self {
        let mut registry = Self::default();
        for grammar in grammars {
            registry.register(grammar);
        }
        registry
    }

    /// Register a grammar, replacing any previous one for its language.
    pub fn register(&mut self, grammar: LanguageGrammar) {
        self.grammars.insert(grammar.language, grammar);
    }

    /// Create a parser for `language`.
    pub fn create(&self, language: SupportedLanguage) -> Result<StructuralParser> {
        let grammar = self
            .grammars
            .get(&language)
            .ok_or(ChunkError::UnsupportedLanguage(language))?;
        StructuralParser::new(*grammar)
    }

    pub fn supports(&self, language: SupportedLanguage) -> bool {
        self.grammars.contains_key(&language)
    }

    /// Registered languages, in declaration order.
    pub fn languages(&self) -> Vec<SupportedLanguage> {
        SupportedLanguage::ALL
            .into_iter()
            .filter(|language| self.supports(*language))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast_engine::grammar::builtin_grammar;

    #[test]
    fn test_builtin_languages() {
        let registry = ParserRegistry::builtin();

        assert_eq!(registry.languages().len(), 12);
        assert!(registry.supports(SupportedLanguage::C));
        assert!(!registry.supports(SupportedLanguage::Unknown));
    }

    #[test]
    fn test_create_unregistered_fails() {
        let registry = ParserRegistry::shared();

        for language in [
            SupportedLanguage::Unknown,
            SupportedLanguage::Lua,
            SupportedLanguage::Scala,
            SupportedLanguage::ObjectiveC,
        ] {
            match registry.create(language) {
                Err(ChunkError::UnsupportedLanguage(l)) => assert_eq!(l, language),
                other => panic!("unexpected result for {language}: {other:?}"),
            }
        }
    }

    #[test]
    fn test_create_returns_language_parser() {
        let parser = ParserRegistry::shared()
            .create(SupportedLanguage::Rust)
            .unwrap();
        assert_eq!(parser.language(), SupportedLanguage::Rust);
    }

    #[test]
    fn test_last_registration_wins() {
        let go = *builtin_grammar(SupportedLanguage::Go).unwrap();
        let renamed = LanguageGrammar {
            fallback_name: "unnamed",
            ..go
        };

        let registry = ParserRegistry::from_grammars([go, renamed]);

        assert_eq!(registry.languages(), vec![SupportedLanguage::Go]);
        let parser = registry.create(SupportedLanguage::Go).unwrap();
        assert_eq!(parser.grammar().fallback_name, "unnamed");
    }
}
