//! Tree-sitter based structural parser.
//!
//! Extracts method-level units from source: one [`MethodUnit`] per
//! function or method declaration, in document order.

use tree_sitter::{Node, Parser, Tree};
use tracing::debug;

use crate::ast_engine::grammar::{DocLookup, LanguageGrammar, NameLookup};
use crate::error::{ChunkError, Result};
use crate::processing::SupportedLanguage;
use crate::types::MethodUnit;

/// Structural parser for one language.
///
/// Holds a configured tree-sitter parser, which is not shareable across
/// threads; create one per worker.
pub struct StructuralParser {
    grammar: LanguageGrammar,
    parser: Parser,
}

impl std::fmt::Debug for StructuralParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StructuralParser")
            .field("language", &self.grammar.language)
            .finish_non_exhaustive()
    }
}

impl StructuralParser {
    /// Create a parser for a grammar.
    pub fn new(grammar: LanguageGrammar) -> Result<Self> {
        let mut parser = Parser::new();
        parser
            .set_language(&grammar.load())
            .map_err(|e| ChunkError::Grammar {
                language: grammar.language,
                message: e.to_string(),
            })?;

        Ok(Self { grammar, parser })
    }

    pub fn language(&self) -> SupportedLanguage {
        self.grammar.language
    }

    pub fn grammar(&self) -> &LanguageGrammar {
        &self.grammar
    }

    /// Extract every function or method declaration from `source`.
    ///
    /// Syntax errors inside the source do not fail the parse; tree-sitter
    /// recovers and the declarations it still recognizes are returned.
    pub fn parse(&mut self, source: &[u8]) -> Result<Vec<MethodUnit>> {
        let tree = self
            .parser
            .parse(source, None)
            .ok_or(ChunkError::Parse(self.grammar.language))?;

        let units = self.extract_units(&tree, source)?;
        debug!(
            language = %self.grammar.language,
            methods = units.len(),
            "Extracted methods"
        );
        Ok(units)
    }

    /// Preorder walk that does not descend into matched declarations or opaque nodes.
    fn extract_units(&self, tree: &Tree, source: &[u8]) -> Result<Vec<MethodUnit>> {
        let mut units = Vec::new();
        let mut cursor = tree.walk();

        loop {
            let node = cursor.node();
            let matched = self.grammar.is_declaration(node);
            if matched {
                units.push(self.method_unit(node, source)?);
            }

            let descend = !matched && !self.grammar.is_opaque(node.kind());
            if descend && cursor.goto_first_child() {
                continue;
            }

            // Move to the next subtree, climbing as far as needed.
            loop {
                if cursor.goto_next_sibling() {
                    break;
                }
                if !cursor.goto_parent() {
                    return Ok(units);
                }
            }
        }
    }

    fn method_unit(&self, node: Node, source: &[u8]) -> Result<MethodUnit> {
        let name = match self.resolve_name(node, source)? {
            Some(name) => name,
            None => self.grammar.fallback_name.to_string(),
        };

        Ok(MethodUnit {
            name,
            source_text: node.utf8_text(source)?.to_string(),
            doc_comment: self.resolve_doc(node, source)?,
            start_byte: node.start_byte(),
            end_byte: node.end_byte(),
            line_range: (node.start_position().row + 1, node.end_position().row + 1),
        })
    }

    fn resolve_name(&self, node: Node, source: &[u8]) -> Result<Option<String>> {
        let name_node = match self.grammar.name_lookup {
            NameLookup::FirstChild => self.first_identifier(node),
            NameLookup::Declarator => {
                function_declarator(node).and_then(|decl| self.first_identifier(decl))
            }
            NameLookup::LastBeforeParameters => {
                let mut cursor = node.walk();
                let last = node
                    .children(&mut cursor)
                    .take_while(|child| child.kind() != "parameter_list")
                    .filter(|child| self.grammar.is_identifier(child.kind()))
                    .last();
                last
            }
        };

        match name_node {
            Some(n) => Ok(Some(n.utf8_text(source)?.to_string())),
            None => Ok(None),
        }
    }

    fn first_identifier<'t>(&self, node: Node<'t>) -> Option<Node<'t>> {
        let mut cursor = node.walk();
        let found = node
            .children(&mut cursor)
            .find(|child| self.grammar.is_identifier(child.kind()));
        found
    }

    fn resolve_doc(&self, node: Node, source: &[u8]) -> Result<Option<String>> {
        let doc_node = match self.grammar.doc_lookup {
            DocLookup::PrecedingComment => node
                .prev_sibling()
                .filter(|prev| self.grammar.is_comment(prev.kind()))
                .filter(|prev| ends_directly_above(*prev, node)),
            DocLookup::BodyDocstring => self.body_docstring(node),
        };

        match doc_node {
            Some(n) => Ok(Some(n.utf8_text(source)?.trim_end().to_string())),
            None => Ok(None),
        }
    }

    fn body_docstring<'t>(&self, node: Node<'t>) -> Option<Node<'t>> {
        let body = node.child_by_field_name("body")?;
        let mut cursor = body.walk();
        let first = body
            .named_children(&mut cursor)
            .find(|child| !self.grammar.is_comment(child.kind()))?;
        if first.kind() != "expression_statement" {
            return None;
        }

        let string = first.named_child(0)?;
        (string.kind() == "string").then_some(string)
    }
}

/// Unwrap pointer, reference and parenthesized declarators down to the
/// function declarator.
fn function_declarator(definition: Node) -> Option<Node> {
    let mut current = definition.child_by_field_name("declarator");
    while let Some(node) = current {
        if node.kind() == "function_declarator" {
            return Some(node);
        }
        current = node.child_by_field_name("declarator").or_else(|| {
            let mut cursor = node.walk();
            let inner = node
                .named_children(&mut cursor)
                .find(|child| child.kind().ends_with("declarator"));
            inner
        });
    }
    None
}

/// A comment documents a declaration only when no blank line separates them.
fn ends_directly_above(comment: Node, declaration: Node) -> bool {
    let start = comment.start_position();
    let end = comment.end_position();
    // Line comments may own their trailing newline.
    let last_row = if end.column == 0 && end.row > start.row {
        end.row - 1
    } else {
        end.row
    };
    last_row + 1 >= declaration.start_position().row
}
