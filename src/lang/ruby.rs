//! Ruby language support.

use super::{
    DefinitionNode, DocAdapter, ExtractOptions, Language, comment_run, definitions_in,
    is_adjacent, name_of,
};
use crate::docstring::DocStyle;
use crate::noise::strip_hash_comment_delimiters;
use crate::record::{ClassMetadata, FunctionMetadata, Parameters};
use crate::span::{SourceLines, Span};
use crate::tree::{child_of_kind, children, collect_by_kind};
use tree_sitter::{Language as TsLanguage, Node};

/// Ruby programming language.
pub struct Ruby;

const BLACKLIST: &[&str] = &[
    "initialize",
    "to_s",
    "to_str",
    "inspect",
    "hash",
    "eql?",
    "==",
    "===",
    "<=>",
    "method_missing",
    "respond_to_missing?",
];

const PARAMETER_KINDS: &[&str] = &[
    "optional_parameter",
    "keyword_parameter",
    "splat_parameter",
    "hash_splat_parameter",
    "block_parameter",
];

impl Language for Ruby {
    fn name(&self) -> &'static str {
        "ruby"
    }

    fn aliases(&self) -> &[&'static str] {
        &["rb"]
    }

    fn extensions(&self) -> &[&'static str] {
        &["rb", "rake", "gemspec"]
    }

    fn grammar(&self) -> TsLanguage {
        tree_sitter_ruby::LANGUAGE.into()
    }
}

impl DocAdapter for Ruby {
    fn class_definitions<'t>(&self, root: Node<'t>) -> Vec<Node<'t>> {
        collect_by_kind(root, &["class", "module"])
    }

    fn class_body<'t>(&self, class: Node<'t>) -> Option<Node<'t>> {
        class
            .child_by_field_name("body")
            .or_else(|| child_of_kind(class, &["body_statement"]))
    }

    fn function_definitions<'t>(&self, container: Node<'t>) -> Vec<DefinitionNode<'t>> {
        definitions_in(container, |n| {
            matches!(n.kind(), "method" | "singleton_method").then_some(n)
        })
    }

    fn module_functions<'t>(&self, root: Node<'t>) -> Vec<DefinitionNode<'t>> {
        self.function_definitions(root)
    }

    fn class_metadata(&self, class: Node<'_>, lines: &SourceLines<'_>) -> ClassMetadata {
        let superclasses = class
            .child_by_field_name("superclass")
            .map(|clause| {
                children(clause)
                    .into_iter()
                    .filter(|n| n.is_named())
                    .map(|n| lines.node_text(&n))
                    .collect()
            })
            .unwrap_or_default();
        ClassMetadata {
            identifier: name_of(class, lines),
            superclasses,
        }
    }

    fn function_metadata(&self, function: Node<'_>, lines: &SourceLines<'_>) -> FunctionMetadata {
        let mut parameters = Parameters::new();
        if let Some(list) = function.child_by_field_name("parameters") {
            for param in children(list) {
                let name = match param.kind() {
                    "identifier" => Some(param),
                    kind if PARAMETER_KINDS.contains(&kind) => param.child_by_field_name("name"),
                    _ => None,
                };
                if let Some(name) = name {
                    parameters.insert(lines.node_text(&name), "");
                }
            }
        }

        FunctionMetadata {
            identifier: name_of(function, lines),
            parameters,
            return_type: String::new(),
        }
    }

    fn preceding_doc_comment(
        &self,
        definition: &DefinitionNode<'_>,
        lines: &SourceLines<'_>,
    ) -> String {
        let Some(last) = definition
            .previous
            .filter(|p| p.kind() == "comment" && is_adjacent(*p, definition.anchor))
        else {
            return String::new();
        };

        let last_text = lines.node_text(&last);
        if last_text.starts_with("=begin") {
            return strip_hash_comment_delimiters(&last_text).trim().to_string();
        }

        let run = comment_run(last, |n| {
            n.kind() == "comment" && lines.node_text(&n).starts_with('#')
        });
        run.iter()
            .map(|c| strip_hash_comment_delimiters(&lines.node_text(c)))
            .collect::<Vec<_>>()
            .join("\n")
            .trim()
            .to_string()
    }

    fn comment_kinds(&self) -> &'static [&'static str] {
        &["comment"]
    }

    fn strip_comment(&self, comment: &str) -> String {
        strip_hash_comment_delimiters(comment)
    }

    fn doc_style(&self) -> DocStyle {
        DocStyle::Yard
    }

    fn is_blacklisted_identifier(&self, name: &str) -> bool {
        BLACKLIST.contains(&name)
    }

    fn body<'t>(&self, function: Node<'t>) -> Option<Node<'t>> {
        function
            .child_by_field_name("body")
            .or_else(|| child_of_kind(function, &["body_statement"]))
    }

    fn is_body_empty(&self, function: Node<'_>, options: &ExtractOptions) -> bool {
        // `def name; body; end` is a one-liner even though its body is a separate node
        match self.body(function) {
            None => true,
            Some(_) => options.skip_single_line_bodies && Span::of(&function).is_single_line(),
        }
    }

    fn string_kinds(&self) -> &'static [&'static str] {
        &["string", "heredoc_body", "regex"]
    }
}
