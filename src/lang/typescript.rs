//! TypeScript language support.
//!
//! Definitions are located exactly as in JavaScript; TypeScript adds declared
//! parameter and return types and abstract classes.

use super::javascript::{self, BLACKLIST};
use super::{DefinitionNode, DocAdapter, Language};
use crate::docstring::DocStyle;
use crate::noise::strip_c_style_comment_delimiters;
use crate::record::{ClassMetadata, FunctionMetadata};
use crate::span::SourceLines;
use tree_sitter::{Language as TsLanguage, Node};

/// TypeScript programming language.
pub struct TypeScript;

impl Language for TypeScript {
    fn name(&self) -> &'static str {
        "typescript"
    }

    fn aliases(&self) -> &[&'static str] {
        &["ts"]
    }

    fn extensions(&self) -> &[&'static str] {
        &["ts", "mts", "cts"]
    }

    fn grammar(&self) -> TsLanguage {
        tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into()
    }
}

impl DocAdapter for TypeScript {
    fn class_definitions<'t>(&self, root: Node<'t>) -> Vec<Node<'t>> {
        javascript::class_declarations(root, &["class_declaration", "abstract_class_declaration"])
    }

    fn function_definitions<'t>(&self, container: Node<'t>) -> Vec<DefinitionNode<'t>> {
        javascript::methods(container)
    }

    fn module_functions<'t>(&self, root: Node<'t>) -> Vec<DefinitionNode<'t>> {
        javascript::top_level_functions(root)
    }

    fn class_metadata(&self, class: Node<'_>, lines: &SourceLines<'_>) -> ClassMetadata {
        javascript::class_metadata(class, lines)
    }

    fn function_metadata(&self, function: Node<'_>, lines: &SourceLines<'_>) -> FunctionMetadata {
        javascript::function_metadata(function, lines)
    }

    fn preceding_doc_comment(
        &self,
        definition: &DefinitionNode<'_>,
        lines: &SourceLines<'_>,
    ) -> String {
        javascript::doc_comment(definition, lines)
    }

    fn comment_kinds(&self) -> &'static [&'static str] {
        &["comment"]
    }

    fn strip_comment(&self, comment: &str) -> String {
        strip_c_style_comment_delimiters(comment)
    }

    fn doc_style(&self) -> DocStyle {
        DocStyle::Javadoc
    }

    fn is_blacklisted_identifier(&self, name: &str) -> bool {
        BLACKLIST.contains(&name)
    }

    fn body<'t>(&self, function: Node<'t>) -> Option<Node<'t>> {
        javascript::body(function)
    }

    fn string_kinds(&self) -> &'static [&'static str] {
        &["string", "template_string"]
    }
}
