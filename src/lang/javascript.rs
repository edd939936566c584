//! JavaScript language support.
//!
//! The helpers in this module also serve TypeScript, whose grammar extends
//! JavaScript's with type annotations.

use super::{DefinitionNode, DocAdapter, Language, definitions_in, is_adjacent, name_of};
use crate::docstring::DocStyle;
use crate::noise::strip_c_style_comment_delimiters;
use crate::record::{ClassMetadata, FunctionMetadata, Parameters};
use crate::span::SourceLines;
use crate::tree::children;
use tree_sitter::{Language as TsLanguage, Node};

/// JavaScript programming language.
pub struct JavaScript;

pub(super) const BLACKLIST: &[&str] = &[
    "constructor",
    "toString",
    "toLocaleString",
    "valueOf",
    "toJSON",
];

const FUNCTION_VALUES: &[&str] = &[
    "arrow_function",
    "function_expression",
    "function",
    "generator_function",
];

impl Language for JavaScript {
    fn name(&self) -> &'static str {
        "javascript"
    }

    fn aliases(&self) -> &[&'static str] {
        &["js", "jsx"]
    }

    fn extensions(&self) -> &[&'static str] {
        &["js", "jsx", "mjs", "cjs"]
    }

    fn grammar(&self) -> TsLanguage {
        tree_sitter_javascript::LANGUAGE.into()
    }
}

/// The declaration exported by an `export_statement`, or `node` itself.
fn unwrap_export(node: Node<'_>) -> Option<Node<'_>> {
    match node.kind() {
        "export_statement" => node.child_by_field_name("declaration"),
        _ => Some(node),
    }
}

/// The single `name = <function>` declarator of a `const`/`let`/`var` statement.
fn function_declarator(declaration: Node<'_>) -> Option<Node<'_>> {
    let mut declarators = children(declaration)
        .into_iter()
        .filter(|n| n.kind() == "variable_declarator");
    let declarator = declarators.next()?;
    if declarators.next().is_some() {
        return None;
    }
    let value = declarator.child_by_field_name("value")?;
    FUNCTION_VALUES.contains(&value.kind()).then_some(declarator)
}

/// The node carrying the parameters and body of a definition.
fn callable(function: Node<'_>) -> Option<Node<'_>> {
    match function.kind() {
        "lexical_declaration" | "variable_declaration" => {
            function_declarator(function)?.child_by_field_name("value")
        }
        _ => Some(function),
    }
}

pub(super) fn class_declarations<'t>(root: Node<'t>, kinds: &[&str]) -> Vec<Node<'t>> {
    children(root)
        .into_iter()
        .filter_map(unwrap_export)
        .filter(|n| kinds.contains(&n.kind()))
        .collect()
}

pub(super) fn methods(container: Node<'_>) -> Vec<DefinitionNode<'_>> {
    definitions_in(container, |n| (n.kind() == "method_definition").then_some(n))
}

pub(super) fn top_level_functions(root: Node<'_>) -> Vec<DefinitionNode<'_>> {
    definitions_in(root, |n| {
        let declaration = unwrap_export(n)?;
        match declaration.kind() {
            "function_declaration" | "generator_function_declaration" => Some(declaration),
            "lexical_declaration" | "variable_declaration" => {
                function_declarator(declaration).map(|_| declaration)
            }
            _ => None,
        }
    })
}

pub(super) fn class_metadata(class: Node<'_>, lines: &SourceLines<'_>) -> ClassMetadata {
    let mut superclasses = Vec::new();
    if let Some(heritage) = children(class)
        .into_iter()
        .find(|n| n.kind() == "class_heritage")
    {
        for clause in children(heritage).into_iter().filter(|n| n.is_named()) {
            match clause.kind() {
                // TypeScript splits `extends` and `implements` into clauses
                "extends_clause" | "implements_clause" => superclasses.extend(
                    children(clause)
                        .into_iter()
                        .filter(|n| n.is_named() && n.kind() != "type_arguments")
                        .map(|n| lines.node_text(&n)),
                ),
                _ => superclasses.push(lines.node_text(&clause)),
            }
        }
    }
    ClassMetadata {
        identifier: name_of(class, lines),
        superclasses,
    }
}

/// Name and declared type of one formal parameter.
fn parameter(param: Node<'_>, lines: &SourceLines<'_>) -> Option<(String, String)> {
    match param.kind() {
        "identifier" | "object_pattern" | "array_pattern" => {
            Some((lines.node_text(&param), String::new()))
        }
        "assignment_pattern" => {
            let left = param.child_by_field_name("left")?;
            Some((lines.node_text(&left), String::new()))
        }
        "rest_pattern" => {
            let name = children(param).into_iter().find(|n| n.is_named())?;
            Some((lines.node_text(&name), String::new()))
        }
        "required_parameter" | "optional_parameter" => {
            let pattern = param.child_by_field_name("pattern")?;
            let (name, _) = parameter(pattern, lines)?;
            let ty = param
                .child_by_field_name("type")
                .map(|t| type_annotation(&lines.node_text(&t)))
                .unwrap_or_default();
            Some((name, ty))
        }
        _ => None,
    }
}

/// `: string` → `string`.
fn type_annotation(text: &str) -> String {
    text.trim_start_matches(':').trim().to_string()
}

pub(super) fn function_metadata(function: Node<'_>, lines: &SourceLines<'_>) -> FunctionMetadata {
    let identifier = match function.kind() {
        "lexical_declaration" | "variable_declaration" => function_declarator(function)
            .map(|d| name_of(d, lines))
            .unwrap_or_default(),
        _ => name_of(function, lines),
    };

    let mut parameters = Parameters::new();
    let mut return_type = String::new();
    if let Some(callable) = callable(function) {
        if let Some(list) = callable.child_by_field_name("parameters") {
            for param in children(list).into_iter().filter(|n| n.is_named()) {
                if let Some((name, ty)) = parameter(param, lines) {
                    parameters.insert(name, ty);
                }
            }
        } else if let Some(single) = callable.child_by_field_name("parameter") {
            // `x => x + 1`
            parameters.insert(lines.node_text(&single), "");
        }
        if let Some(ty) = callable.child_by_field_name("return_type") {
            return_type = type_annotation(&lines.node_text(&ty));
        }
    }

    FunctionMetadata {
        identifier,
        parameters,
        return_type,
    }
}

pub(super) fn doc_comment(definition: &DefinitionNode<'_>, lines: &SourceLines<'_>) -> String {
    let Some(prev) = definition.previous.filter(|p| p.kind() == "comment") else {
        return String::new();
    };
    let text = lines.node_text(&prev);
    if !text.starts_with("/*") || !is_adjacent(prev, definition.anchor) {
        return String::new();
    }
    strip_c_style_comment_delimiters(&text).trim().to_string()
}

pub(super) fn body(function: Node<'_>) -> Option<Node<'_>> {
    callable(function)?.child_by_field_name("body")
}

impl DocAdapter for JavaScript {
    fn class_definitions<'t>(&self, root: Node<'t>) -> Vec<Node<'t>> {
        class_declarations(root, &["class_declaration"])
    }

    fn function_definitions<'t>(&self, container: Node<'t>) -> Vec<DefinitionNode<'t>> {
        methods(container)
    }

    fn module_functions<'t>(&self, root: Node<'t>) -> Vec<DefinitionNode<'t>> {
        top_level_functions(root)
    }

    fn class_metadata(&self, class: Node<'_>, lines: &SourceLines<'_>) -> ClassMetadata {
        class_metadata(class, lines)
    }

    fn function_metadata(&self, function: Node<'_>, lines: &SourceLines<'_>) -> FunctionMetadata {
        function_metadata(function, lines)
    }

    fn preceding_doc_comment(
        &self,
        definition: &DefinitionNode<'_>,
        lines: &SourceLines<'_>,
    ) -> String {
        doc_comment(definition, lines)
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
        body(function)
    }

    fn string_kinds(&self) -> &'static [&'static str] {
        &["string", "template_string"]
    }
}
