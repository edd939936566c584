//! The per-language extraction contract and the algorithm shared by all languages.

use super::Language;
use crate::docstring::{self, DocStyle, DocstringRecord};
use crate::error::SkipReason;
use crate::noise::{clean_comment, is_auto_generated};
use crate::record::{ClassMetadata, Definition, FunctionMetadata, Parameters};
use crate::span::{SourceLines, Span};
use crate::tokenize::tokenize_docstring;
use crate::tree::{children, collect_by_kind, tokenize_code};
use tree_sitter::{Node, Tree};

/// Knobs that change which definitions are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Treat a body that starts and ends on one line as empty.
    pub skip_single_line_bodies: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            skip_single_line_bodies: true,
        }
    }
}

/// A function or method found inside a container node.
#[derive(Debug, Clone, Copy)]
pub struct DefinitionNode<'t> {
    /// The function or method itself.
    pub node: Node<'t>,
    /// The container child that holds `node`. Usually `node` itself; differs for
    /// wrappers such as `export_statement` or `decorated_definition`.
    pub anchor: Node<'t>,
    /// Position of `anchor` among the container's children.
    pub index: usize,
    /// The sibling right before `anchor`, comments included.
    pub previous: Option<Node<'t>>,
}

/// Walks the direct children of `container` and keeps those `select` maps to a
/// definition.
///
/// When the first child is selected and the container starts exactly where that
/// child does (Ruby `body_statement`, Python `block`), the comment before it was
/// attached to the enclosing node, so `previous` falls back to the container's
/// own previous sibling.
pub fn definitions_in<'t>(
    container: Node<'t>,
    mut select: impl FnMut(Node<'t>) -> Option<Node<'t>>,
) -> Vec<DefinitionNode<'t>> {
    let kids = children(container);
    let mut found = Vec::new();

    for (index, anchor) in kids.iter().copied().enumerate() {
        let Some(node) = select(anchor) else {
            continue;
        };
        let previous = match index.checked_sub(1) {
            Some(prev) => Some(kids[prev]),
            None if container.start_byte() == anchor.start_byte() => container.prev_sibling(),
            None => None,
        };
        found.push(DefinitionNode {
            node,
            anchor,
            index,
            previous,
        });
    }

    found
}

/// Returns true if `comment` ends on the line right above `definition` (or on
/// its first line), with no blank line in between.
pub fn is_adjacent(comment: Node<'_>, definition: Node<'_>) -> bool {
    comment.end_position().row + 1 >= definition.start_position().row
        && comment.end_byte() <= definition.start_byte()
}

/// Gathers the run of line comments that ends at `last`, in source order.
///
/// Every comment of the run starts its own line and sits on the line right
/// after the previous one. A trailing comment after code is never part of a run.
pub fn comment_run<'t>(last: Node<'t>, is_comment: impl Fn(Node<'t>) -> bool) -> Vec<Node<'t>> {
    let mut run = Vec::new();
    let mut current = Some(last);

    while let Some(comment) = current.filter(|n| is_comment(*n)) {
        let before = comment.prev_sibling();
        let starts_line = before.is_none_or(|b| b.end_position().row < comment.start_position().row);
        if !starts_line {
            break;
        }
        if run
            .last()
            .is_some_and(|next: &Node<'t>| comment.end_position().row + 1 < next.start_position().row)
        {
            break;
        }
        run.push(comment);
        current = before;
    }

    run.reverse();
    run
}

/// What a language must provide to turn a syntax tree into documented definitions.
///
/// Only the node-kind knowledge differs between languages; [`DocAdapter::extract`]
/// runs the same selection algorithm for all of them.
pub trait DocAdapter: Language {
    /// Class-like declarations whose methods are extracted.
    fn class_definitions<'t>(&self, _root: Node<'t>) -> Vec<Node<'t>> {
        Vec::new()
    }

    /// The node whose children are the methods of `class`.
    fn class_body<'t>(&self, class: Node<'t>) -> Option<Node<'t>> {
        class.child_by_field_name("body")
    }

    /// Function and method definitions directly inside `container`.
    fn function_definitions<'t>(&self, container: Node<'t>) -> Vec<DefinitionNode<'t>>;

    /// Definitions outside any class, extracted without an owner.
    fn module_functions<'t>(&self, _root: Node<'t>) -> Vec<DefinitionNode<'t>> {
        Vec::new()
    }

    /// Name of `class` and its supertypes. The default reads the `name` field
    /// and reports no supertypes.
    fn class_metadata(&self, class: Node<'_>, lines: &SourceLines<'_>) -> ClassMetadata {
        ClassMetadata {
            identifier: name_of(class, lines),
            superclasses: Vec::new(),
        }
    }

    fn function_metadata(&self, function: Node<'_>, lines: &SourceLines<'_>) -> FunctionMetadata;

    /// The owner of a definition that lives outside a class (a Go receiver).
    fn owner_identifier(&self, _function: Node<'_>, _lines: &SourceLines<'_>) -> Option<String> {
        None
    }

    /// The documentation comment of `definition` with its delimiters stripped,
    /// or an empty string when none is adjacent.
    fn preceding_doc_comment(&self, definition: &DefinitionNode<'_>, lines: &SourceLines<'_>)
    -> String;

    /// Node kinds of comments inside a function body.
    fn comment_kinds(&self) -> &'static [&'static str];

    /// Removes the comment markers of one comment.
    fn strip_comment(&self, comment: &str) -> String;

    /// Free-standing comments inside `function`, delimiters stripped.
    fn body_comments(&self, function: Node<'_>, lines: &SourceLines<'_>) -> Vec<String> {
        collect_by_kind(function, self.comment_kinds())
            .iter()
            .map(|comment| self.strip_comment(&lines.node_text(comment)))
            .collect()
    }

    /// The tag convention of this language's doc comments.
    fn doc_style(&self) -> DocStyle;

    /// Parses a doc comment against the signature, `None` if it is malformed.
    fn parse_doc_comment(&self, raw: &str, parameters: &Parameters) -> Option<DocstringRecord> {
        docstring::parse_doc_comment(self.doc_style(), raw, parameters)
    }

    /// Conventional overrides (equality, hashing, string conversion, lifecycle
    /// hooks) that are dropped even when documented.
    fn is_blacklisted_identifier(&self, name: &str) -> bool;

    fn body<'t>(&self, function: Node<'t>) -> Option<Node<'t>> {
        function.child_by_field_name("body")
    }

    /// Returns true for a missing body, or a body that fits on one line when
    /// `options.skip_single_line_bodies` is set.
    fn is_body_empty(&self, function: Node<'_>, options: &ExtractOptions) -> bool {
        match self.body(function) {
            None => true,
            Some(body) => options.skip_single_line_bodies && Span::of(&body).is_single_line(),
        }
    }

    /// Node kinds kept whole when tokenizing code.
    fn string_kinds(&self) -> &'static [&'static str];

    /// Nodes excluded from `function_tokens` because they are the docstring.
    fn docstring_nodes<'t>(&self, _function: Node<'t>) -> Vec<Node<'t>> {
        Vec::new()
    }

    /// Every documented definition of the tree that passes the filters.
    ///
    /// A class without a name makes the whole tree unusable and is reported as a
    /// [`SkipReason`]; every other rejection just drops one definition.
    fn extract(
        &self,
        tree: &Tree,
        source: &str,
        options: &ExtractOptions,
    ) -> Result<Vec<Definition>, SkipReason> {
        let root = tree.root_node();
        let lines = SourceLines::new(source);
        let mut definitions = Vec::new();

        for definition in self.module_functions(root) {
            let owner = self.owner_identifier(definition.node, &lines);
            definitions.extend(self.extract_definition(&definition, owner.as_deref(), &lines, options));
        }

        for class in self.class_definitions(root) {
            let metadata = self.class_metadata(class, &lines);
            if metadata.identifier.is_empty() {
                let start = class.start_position();
                return Err(SkipReason::MissingIdentifier {
                    kind: class.kind(),
                    row: start.row,
                    column: start.column,
                });
            }
            let Some(body) = self.class_body(class) else {
                continue;
            };
            for definition in self.function_definitions(body) {
                definitions.extend(self.extract_definition(
                    &definition,
                    Some(&metadata.identifier),
                    &lines,
                    options,
                ));
            }
        }

        Ok(definitions)
    }

    /// Runs the filters for one definition and assembles its record.
    fn extract_definition(
        &self,
        definition: &DefinitionNode<'_>,
        owner: Option<&str>,
        lines: &SourceLines<'_>,
        options: &ExtractOptions,
    ) -> Option<Definition> {
        let node = definition.node;
        if self.is_body_empty(node, options) {
            return None;
        }

        let metadata = self.function_metadata(node, lines);
        if metadata.identifier.is_empty() || self.is_blacklisted_identifier(&metadata.identifier) {
            return None;
        }

        let original_docstring = self.preceding_doc_comment(definition, lines);
        if original_docstring.trim().is_empty() {
            return None;
        }

        let parsed = self.parse_doc_comment(&original_docstring, &metadata.parameters)?;
        let docstring = clean_comment(&parsed.summary);
        if docstring.is_empty() || is_auto_generated(&metadata.identifier, &docstring) {
            return None;
        }

        // separator lines and other comments with no text left after cleaning are dropped
        let comment = self
            .body_comments(node, lines)
            .iter()
            .map(|c| clean_comment(c))
            .filter(|c| !c.is_empty())
            .collect();

        let identifier = match owner {
            Some(owner) => format!("{owner}.{}", metadata.identifier),
            None => metadata.identifier,
        };
        let span = Span::of(&node);
        let excluded = self.docstring_nodes(node);

        Some(Definition {
            identifier,
            function: lines.resolve(span),
            function_tokens: tokenize_code(node, lines, self.string_kinds(), &excluded),
            docstring_tokens: tokenize_docstring(&docstring),
            original_docstring,
            docstring,
            docstring_param: parsed.fields,
            parameters: metadata.parameters,
            comment,
            start_point: span.start(),
            end_point: span.end(),
        })
    }
}

/// Text of the `name`/`identifier` child of `node`, or an empty string.
pub(crate) fn name_of(node: Node<'_>, lines: &SourceLines<'_>) -> String {
    node.child_by_field_name("name")
        .map(|name| lines.node_text(&name))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::{Go, Java};

    #[test]
    fn test_previous_sibling_is_recorded() {
        let source = "class A {\n    /** Doc. */\n    void f() {\n    }\n}\n";
        let tree = Java.parse(source).unwrap();
        let class = children(tree.root_node())[0];
        let body = class.child_by_field_name("body").unwrap();
        let defs = Java.function_definitions(body);
        assert_eq!(defs.len(), 1);
        assert_eq!(defs[0].previous.map(|p| p.kind()), Some("block_comment"));
    }

    #[test]
    fn test_comment_run_stops_at_blank_line() {
        let source = "package p\n\n// detached\n\n// first\n// second\nfunc F() {\n}\n";
        let tree = Go.parse(source).unwrap();
        let root = tree.root_node();
        let func = children(root)
            .into_iter()
            .find(|n| n.kind() == "function_declaration")
            .unwrap();
        let previous = func.prev_sibling().unwrap();

        let run = comment_run(previous, |n| n.kind() == "comment");
        let lines = SourceLines::new(source);
        let texts: Vec<String> = run.iter().map(|n| lines.node_text(n)).collect();
        assert_eq!(texts, vec!["// first", "// second"]);
    }

    #[test]
    fn test_is_adjacent_rejects_blank_line() {
        let source = "package p\n\n// doc\n\nfunc F() {\n}\n";
        let tree = Go.parse(source).unwrap();
        let kids = children(tree.root_node());
        let comment = kids.iter().find(|n| n.kind() == "comment").copied().unwrap();
        let func = kids
            .iter()
            .find(|n| n.kind() == "function_declaration")
            .copied()
            .unwrap();
        assert!(!is_adjacent(comment, func));
    }

    #[test]
    fn test_body_comments_without_text_are_dropped() {
        let source = "class A {\n    /** Copies every row into the target table. */\n    void copy() {\n        // ------------\n        // real note\n        run();\n    }\n}\n";
        let tree = Java.parse(source).unwrap();
        let defs = Java
            .extract(&tree, source, &ExtractOptions::default())
            .unwrap();

        assert_eq!(defs.len(), 1);
        assert_eq!(defs[0].comment, vec!["real note"]);
    }

    #[test]
    fn test_default_class_metadata_reads_name() {
        let source = "package p\n\ntype Store struct {\n}\n";
        let tree = Go.parse(source).unwrap();
        let type_spec = collect_by_kind(tree.root_node(), &["type_spec"])[0];
        let metadata = Go.class_metadata(type_spec, &SourceLines::new(source));

        assert_eq!(metadata.identifier, "Store");
        assert!(metadata.superclasses.is_empty());
    }
}
