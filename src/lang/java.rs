//! Java language support.

use super::{DefinitionNode, DocAdapter, Language, definitions_in, is_adjacent, name_of};
use crate::docstring::DocStyle;
use crate::noise::strip_c_style_comment_delimiters;
use crate::record::{ClassMetadata, FunctionMetadata, Parameters};
use crate::span::SourceLines;
use crate::tree::children;
use tree_sitter::{Language as TsLanguage, Node};

/// Java programming language.
pub struct Java;

const BLACKLIST: &[&str] = &[
    "toString",
    "hashCode",
    "equals",
    "finalize",
    "notify",
    "notifyAll",
    "clone",
];

impl Language for Java {
    fn name(&self) -> &'static str {
        "java"
    }

    fn extensions(&self) -> &[&'static str] {
        &["java"]
    }

    fn grammar(&self) -> TsLanguage {
        tree_sitter_java::LANGUAGE.into()
    }
}

impl DocAdapter for Java {
    fn class_definitions<'t>(&self, root: Node<'t>) -> Vec<Node<'t>> {
        children(root)
            .into_iter()
            .filter(|n| n.kind() == "class_declaration")
            .collect()
    }

    fn function_definitions<'t>(&self, container: Node<'t>) -> Vec<DefinitionNode<'t>> {
        definitions_in(container, |n| (n.kind() == "method_declaration").then_some(n))
    }

    fn class_metadata(&self, class: Node<'_>, lines: &SourceLines<'_>) -> ClassMetadata {
        let mut superclasses = Vec::new();
        for field in ["superclass", "interfaces"] {
            if let Some(clause) = class.child_by_field_name(field) {
                superclasses.extend(type_names(clause, lines));
            }
        }
        ClassMetadata {
            identifier: name_of(class, lines),
            superclasses,
        }
    }

    fn function_metadata(&self, function: Node<'_>, lines: &SourceLines<'_>) -> FunctionMetadata {
        let mut parameters = Parameters::new();
        if let Some(list) = function.child_by_field_name("parameters") {
            for param in children(list) {
                match param.kind() {
                    "formal_parameter" => {
                        let name = param.child_by_field_name("name");
                        let ty = param.child_by_field_name("type");
                        if let Some(name) = name {
                            let ty = ty.map(|t| lines.node_text(&t)).unwrap_or_default();
                            parameters.insert(lines.node_text(&name), ty);
                        }
                    }
                    "spread_parameter" => {
                        let kids = children(param);
                        let ty = kids.iter().find(|n| {
                            n.is_named() && !matches!(n.kind(), "modifiers" | "variable_declarator")
                        });
                        let name = kids
                            .iter()
                            .find(|n| n.kind() == "variable_declarator")
                            .and_then(|d| d.child_by_field_name("name"));
                        if let Some(name) = name {
                            let ty = ty
                                .map(|t| format!("{}...", lines.node_text(t)))
                                .unwrap_or_default();
                            parameters.insert(lines.node_text(&name), ty);
                        }
                    }
                    _ => {}
                }
            }
        }

        FunctionMetadata {
            identifier: name_of(function, lines),
            parameters,
            return_type: function
                .child_by_field_name("type")
                .map(|t| lines.node_text(&t))
                .unwrap_or_default(),
        }
    }

    fn preceding_doc_comment(
        &self,
        definition: &DefinitionNode<'_>,
        lines: &SourceLines<'_>,
    ) -> String {
        match definition.previous {
            Some(prev) if prev.kind() == "block_comment" && is_adjacent(prev, definition.anchor) => {
                strip_c_style_comment_delimiters(&lines.node_text(&prev))
                    .trim()
                    .to_string()
            }
            _ => String::new(),
        }
    }

    fn comment_kinds(&self) -> &'static [&'static str] {
        &["line_comment", "block_comment"]
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

    fn string_kinds(&self) -> &'static [&'static str] {
        &["string_literal"]
    }
}

/// Type names listed under an `extends`/`implements` clause.
fn type_names(clause: Node<'_>, lines: &SourceLines<'_>) -> Vec<String> {
    let mut names = Vec::new();
    for child in children(clause).into_iter().filter(|n| n.is_named()) {
        if child.kind() == "type_list" {
            names.extend(type_names(child, lines));
        } else {
            names.push(lines.node_text(&child));
        }
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{collect_by_kind, collect_leaf_tokens};
    use crate::lang::ExtractOptions;

    const SOURCE: &str = r#"package demo;

public class Calculator extends Base implements Serializable, Cloneable {
    /**
     * Adds two numbers together and returns their sum.
     *
     * @param a the first operand
     * @param b the second operand
     * @param c not in the signature
     * @return the sum of both
     * @throws ArithmeticException on overflow
     */
    public int add(int a, int b) {
        // fast path
        return a + b;
    }

    /** Detached comment about subtraction and other things. */

    public int sub(int a, int b) {
        return a - b;
    }

    /** Returns a readable representation of this calculator. */
    public String toString() {
        return "calc";
    }

    /** A one line method that is easy to miss entirely. */
    public int one() { return 1; }

    /**
     * Joins all the given parts with a separator between them.
     */
    public String join(String sep, String... parts) {
        return String.join(sep, parts);
    }
}
"#;

    fn extract(options: ExtractOptions) -> Vec<crate::record::Definition> {
        let tree = Java.parse(SOURCE).unwrap();
        Java.extract(&tree, SOURCE, &options).unwrap()
    }

    #[test]
    fn test_extracts_documented_methods() {
        let defs = extract(ExtractOptions::default());
        let names: Vec<&str> = defs.iter().map(|d| d.identifier.as_str()).collect();
        assert_eq!(names, vec!["Calculator.add", "Calculator.join"]);

        let add = &defs[0];
        assert_eq!(add.docstring, "Adds two numbers together and returns their sum.");
        assert_eq!(add.comment, vec!["fast path"]);
        assert_eq!(add.start_point, (12, 4));
        assert_eq!(add.end_point, (15, 5));
        assert!(add.function.starts_with("public int add(int a, int b) {"));
        assert_eq!(&add.function_tokens[..4], &["public", "int", "add", "("]);
    }

    #[test]
    fn test_function_tokens_cover_every_leaf() {
        let tree = Java.parse(SOURCE).unwrap();
        let lines = SourceLines::new(SOURCE);
        let add = collect_by_kind(tree.root_node(), &["method_declaration"])[0];
        let leaves: Vec<String> = collect_leaf_tokens(add, Java.string_kinds())
            .iter()
            .map(|leaf| lines.node_text(leaf))
            .collect();

        let defs = extract(ExtractOptions::default());
        assert_eq!(defs[0].function_tokens.len(), leaves.len());
        assert_eq!(defs[0].function_tokens, leaves);
    }

    #[test]
    fn test_doc_comment_must_be_the_previous_sibling() {
        let source = r#"class Loader {
    /** Loads every cached row from the local disk store. */
    int retries = 1;
    void load() {
        read();
    }
}
"#;
        let tree = Java.parse(source).unwrap();
        let defs = Java
            .extract(&tree, source, &ExtractOptions::default())
            .unwrap();
        assert!(defs.is_empty());
    }

    #[test]
    fn test_docstring_fields_follow_signature() {
        let defs = extract(ExtractOptions::default());
        let fields = &defs[0].docstring_param;

        let a = fields.param("a").unwrap();
        assert_eq!(a.docstring.as_deref(), Some("the first operand"));
        assert_eq!(a.type_name.as_deref(), Some("int"));
        assert!(fields.other_param("c").is_some());
        assert_eq!(fields.tag("return").unwrap().len(), 1);
        assert_eq!(
            fields.tag("throws").unwrap()[0].type_name.as_deref(),
            Some("ArithmeticException")
        );
    }

    #[test]
    fn test_spread_parameter() {
        let defs = extract(ExtractOptions::default());
        let join = &defs[1];
        let params: Vec<(&str, &str)> = join.parameters.iter().collect();
        assert_eq!(params, vec![("sep", "String"), ("parts", "String...")]);
    }

    #[test]
    fn test_one_line_bodies_can_be_kept() {
        let defs = extract(ExtractOptions {
            skip_single_line_bodies: false,
        });
        assert!(defs.iter().any(|d| d.identifier == "Calculator.one"));
    }

    #[test]
    fn test_class_metadata() {
        let tree = Java.parse(SOURCE).unwrap();
        let lines = SourceLines::new(SOURCE);
        let class = Java.class_definitions(tree.root_node())[0];
        let meta = Java.class_metadata(class, &lines);
        assert_eq!(meta.identifier, "Calculator");
        assert_eq!(meta.superclasses, vec!["Base", "Serializable", "Cloneable"]);
    }

    #[test]
    fn test_blacklist() {
        assert!(Java.is_blacklisted_identifier("hashCode"));
        assert!(!Java.is_blacklisted_identifier("hash"));
    }
}
