//! Python language support.
//!
//! Python documents a definition with a string literal opening its body rather
//! than a comment in front of it, and mixes three docstring conventions, so the
//! style is detected per docstring.

use super::{DefinitionNode, DocAdapter, ExtractOptions, Language, definitions_in, name_of};
use crate::docstring::{self, DocStyle, DocstringRecord, cleandoc};
use crate::noise::strip_hash_comment_delimiters;
use crate::record::{ClassMetadata, FunctionMetadata, Parameters};
use crate::span::{SourceLines, Span};
use crate::tree::children;
use tree_sitter::{Language as TsLanguage, Node};

/// Python programming language.
pub struct Python;

const BLACKLIST: &[&str] = &["setUp", "tearDown", "setUpClass", "tearDownClass"];

/// Receivers that are not part of the documented signature.
const IMPLICIT_PARAMETERS: &[&str] = &["self", "cls"];

impl Language for Python {
    fn name(&self) -> &'static str {
        "python"
    }

    fn aliases(&self) -> &[&'static str] {
        &["py"]
    }

    fn extensions(&self) -> &[&'static str] {
        &["py", "pyi"]
    }

    fn grammar(&self) -> TsLanguage {
        tree_sitter_python::LANGUAGE.into()
    }
}

/// Unwraps `decorated_definition` nodes, returning `node` if it is of `kind`.
fn definition_of<'t>(node: Node<'t>, kind: &str) -> Option<Node<'t>> {
    let node = match node.kind() {
        "decorated_definition" => node.child_by_field_name("definition")?,
        _ => node,
    };
    (node.kind() == kind).then_some(node)
}

/// The string literal opening the body of `function`, if any.
fn docstring_node<'t>(function: Node<'t>) -> Option<Node<'t>> {
    let body = function.child_by_field_name("body")?;
    let first = children(body)
        .into_iter()
        .find(|n| n.is_named() && n.kind() != "comment")?;
    if first.kind() != "expression_statement" {
        return None;
    }
    children(first)
        .into_iter()
        .find(|n| n.is_named())
        .filter(|n| n.kind() == "string")
}

/// Removes the prefix (`r`, `u`, `b`...) and quotes of a string literal.
fn string_contents(literal: &str) -> &str {
    let body = literal.trim_start_matches(|c: char| c.is_ascii_alphabetic());
    for quote in ["\"\"\"", "'''", "\"", "'"] {
        if let Some(inner) = body
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    body
}

impl DocAdapter for Python {
    fn class_definitions<'t>(&self, root: Node<'t>) -> Vec<Node<'t>> {
        children(root)
            .into_iter()
            .filter_map(|n| definition_of(n, "class_definition"))
            .collect()
    }

    fn function_definitions<'t>(&self, container: Node<'t>) -> Vec<DefinitionNode<'t>> {
        definitions_in(container, |n| definition_of(n, "function_definition"))
    }

    fn module_functions<'t>(&self, root: Node<'t>) -> Vec<DefinitionNode<'t>> {
        self.function_definitions(root)
    }

    fn class_metadata(&self, class: Node<'_>, lines: &SourceLines<'_>) -> ClassMetadata {
        let superclasses = class
            .child_by_field_name("superclasses")
            .map(|args| {
                children(args)
                    .into_iter()
                    .filter(|n| matches!(n.kind(), "identifier" | "attribute"))
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
            for param in children(list).into_iter().filter(|n| n.is_named()) {
                let (name, ty) = match param.kind() {
                    "identifier" => (Some(param), None),
                    "list_splat_pattern" | "dictionary_splat_pattern" => {
                        (children(param).into_iter().find(|n| n.kind() == "identifier"), None)
                    }
                    "default_parameter" | "typed_default_parameter" => (
                        param.child_by_field_name("name"),
                        param.child_by_field_name("type"),
                    ),
                    "typed_parameter" => {
                        let inner = children(param).into_iter().find(|n| {
                            matches!(
                                n.kind(),
                                "identifier" | "list_splat_pattern" | "dictionary_splat_pattern"
                            )
                        });
                        let name = inner.and_then(|n| match n.kind() {
                            "identifier" => Some(n),
                            _ => children(n).into_iter().find(|c| c.kind() == "identifier"),
                        });
                        (name, param.child_by_field_name("type"))
                    }
                    _ => (None, None),
                };
                let Some(name) = name.map(|n| lines.node_text(&n)) else {
                    continue;
                };
                if IMPLICIT_PARAMETERS.contains(&name.as_str()) {
                    continue;
                }
                let ty = ty.map(|t| lines.node_text(&t)).unwrap_or_default();
                parameters.insert(name, ty);
            }
        }

        FunctionMetadata {
            identifier: name_of(function, lines),
            parameters,
            return_type: function
                .child_by_field_name("return_type")
                .map(|t| lines.node_text(&t))
                .unwrap_or_default(),
        }
    }

    fn preceding_doc_comment(
        &self,
        definition: &DefinitionNode<'_>,
        lines: &SourceLines<'_>,
    ) -> String {
        docstring_node(definition.node)
            .map(|node| cleandoc(string_contents(&lines.node_text(&node))))
            .unwrap_or_default()
    }

    fn comment_kinds(&self) -> &'static [&'static str] {
        &["comment"]
    }

    fn strip_comment(&self, comment: &str) -> String {
        strip_hash_comment_delimiters(comment)
    }

    fn doc_style(&self) -> DocStyle {
        DocStyle::Plain
    }

    fn parse_doc_comment(&self, raw: &str, parameters: &Parameters) -> Option<DocstringRecord> {
        docstring::parse_doc_comment(DocStyle::detect_python(raw), raw, parameters)
    }

    fn is_blacklisted_identifier(&self, name: &str) -> bool {
        let dunder = name.len() > 4 && name.starts_with("__") && name.ends_with("__");
        dunder || BLACKLIST.contains(&name)
    }

    fn is_body_empty(&self, function: Node<'_>, options: &ExtractOptions) -> bool {
        // the body of `def f(): pass` starts after the colon, so measure the header too
        match self.body(function) {
            None => true,
            Some(_) => options.skip_single_line_bodies && Span::of(&function).is_single_line(),
        }
    }

    fn string_kinds(&self) -> &'static [&'static str] {
        &["string"]
    }

    fn docstring_nodes<'t>(&self, function: Node<'t>) -> Vec<Node<'t>> {
        docstring_node(function).into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Definition;

    const SOURCE: &str = r#"import os


def top_level(path, *args, mode="r", **kwargs):
    """Open the file at the given path and read every line.

    Args:
        path (str): where the file lives
        mode: how to open it
        missing: not a parameter

    Returns:
        list: the lines read
    """
    # read eagerly
    with open(path, mode) as handle:
        return handle.readlines()


class Reader(Base, metaclass=Meta):
    def __init__(self):
        """Build a reader with default settings applied."""
        self.x = 1

    @property
    def size(self) -> int:
        """Count how many bytes the underlying buffer holds.

        :param unused: ignored
        :rtype: int
        """
        return len(self.buffer)

    def one(self): return 1

    def undocumented(self):
        x = 1
        return x
"#;

    fn extract() -> Vec<Definition> {
        let tree = Python.parse(SOURCE).unwrap();
        Python
            .extract(&tree, SOURCE, &ExtractOptions::default())
            .unwrap()
    }

    #[test]
    fn test_module_functions_and_methods() {
        let defs = extract();
        let names: Vec<&str> = defs.iter().map(|d| d.identifier.as_str()).collect();
        assert_eq!(names, vec!["top_level", "Reader.size"]);
    }

    #[test]
    fn test_google_docstring() {
        let defs = extract();
        let top = &defs[0];

        assert_eq!(top.docstring, "Open the file at the given path and read every line.");
        let names: Vec<&str> = top.parameters.names().collect();
        assert_eq!(names, vec!["path", "args", "mode", "kwargs"]);

        let fields = &top.docstring_param;
        assert_eq!(fields.param("path").unwrap().type_name.as_deref(), Some("str"));
        assert_eq!(
            fields.param("mode").unwrap().docstring.as_deref(),
            Some("how to open it")
        );
        assert!(fields.other_param("missing").is_some());
        assert_eq!(fields.tag("returns").unwrap()[0].type_name.as_deref(), Some("list"));
        assert_eq!(top.comment, vec!["read eagerly"]);
    }

    #[test]
    fn test_docstring_is_not_a_code_token() {
        let defs = extract();
        let top = &defs[0];
        assert!(top.original_docstring.starts_with("Open the file"));
        assert!(!top.function_tokens.iter().any(|t| t.contains("Open the file")));
        assert_eq!(&top.function_tokens[..3], &["def", "top_level", "("]);
    }

    #[test]
    fn test_rest_docstring_and_self() {
        let defs = extract();
        let size = &defs[1];
        assert!(size.parameters.is_empty());
        assert!(size.docstring_param.other_param("unused").is_some());
        assert_eq!(size.start_point.0, 25);
    }

    #[test]
    fn test_class_metadata() {
        let tree = Python.parse(SOURCE).unwrap();
        let lines = SourceLines::new(SOURCE);
        let class = Python.class_definitions(tree.root_node())[0];
        let meta = Python.class_metadata(class, &lines);
        assert_eq!(meta.identifier, "Reader");
        assert_eq!(meta.superclasses, vec!["Base"]);
    }

    #[test]
    fn test_blacklist() {
        assert!(Python.is_blacklisted_identifier("__eq__"));
        assert!(Python.is_blacklisted_identifier("setUp"));
        assert!(!Python.is_blacklisted_identifier("_private"));
    }

    #[test]
    fn test_string_contents() {
        assert_eq!(string_contents(r#""""doc""""#), "doc");
        assert_eq!(string_contents("r'''raw'''"), "raw");
        assert_eq!(string_contents("'single'"), "single");
    }
}
