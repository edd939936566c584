//! Go language support.

use super::{
    DefinitionNode, DocAdapter, Language, comment_run, definitions_in, is_adjacent, name_of,
};
use crate::docstring::DocStyle;
use crate::noise::strip_c_style_comment_delimiters;
use crate::record::{FunctionMetadata, Parameters};
use crate::span::SourceLines;
use crate::tree::children;
use tree_sitter::{Language as TsLanguage, Node};

/// Go programming language.
pub struct Go;

const BLACKLIST: &[&str] = &["String", "Error", "Reset", "ProtoMessage", "Descriptor"];

/// Prefix of fields and methods generated by protoc.
const GENERATED_PREFIX: &str = "XXX_";

impl Language for Go {
    fn name(&self) -> &'static str {
        "go"
    }

    fn aliases(&self) -> &[&'static str] {
        &["golang"]
    }

    fn extensions(&self) -> &[&'static str] {
        &["go"]
    }

    fn grammar(&self) -> TsLanguage {
        tree_sitter_go::LANGUAGE.into()
    }
}

impl DocAdapter for Go {
    fn function_definitions<'t>(&self, container: Node<'t>) -> Vec<DefinitionNode<'t>> {
        definitions_in(container, |n| {
            matches!(n.kind(), "function_declaration" | "method_declaration").then_some(n)
        })
    }

    // Go has no classes: methods are top-level declarations with a receiver.
    fn module_functions<'t>(&self, root: Node<'t>) -> Vec<DefinitionNode<'t>> {
        self.function_definitions(root)
    }

    fn function_metadata(&self, function: Node<'_>, lines: &SourceLines<'_>) -> FunctionMetadata {
        let mut parameters = Parameters::new();
        if let Some(list) = function.child_by_field_name("parameters") {
            for param in children(list) {
                let variadic = match param.kind() {
                    "parameter_declaration" => false,
                    "variadic_parameter_declaration" => true,
                    _ => continue,
                };
                let ty = param
                    .child_by_field_name("type")
                    .map(|t| lines.node_text(&t))
                    .unwrap_or_default();
                let ty = if variadic { format!("...{ty}") } else { ty };
                // `a, b int` declares several names sharing one type
                for name in children(param).into_iter().filter(|n| n.kind() == "identifier") {
                    parameters.insert(lines.node_text(&name), ty.clone());
                }
            }
        }

        FunctionMetadata {
            identifier: name_of(function, lines),
            parameters,
            return_type: function
                .child_by_field_name("result")
                .map(|t| lines.node_text(&t))
                .unwrap_or_default(),
        }
    }

    fn owner_identifier(&self, function: Node<'_>, lines: &SourceLines<'_>) -> Option<String> {
        let receiver = function.child_by_field_name("receiver")?;
        let param = children(receiver)
            .into_iter()
            .find(|n| n.kind() == "parameter_declaration")?;
        let ty = lines.node_text(&param.child_by_field_name("type")?);
        let ty = ty.trim_start_matches('*');
        let ty = ty.split('[').next().unwrap_or(ty).trim();
        (!ty.is_empty()).then(|| ty.to_string())
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
        if last_text.starts_with("/*") {
            return strip_c_style_comment_delimiters(&last_text).trim().to_string();
        }

        let run = comment_run(last, |n| {
            n.kind() == "comment" && lines.node_text(&n).starts_with("//")
        });
        run.iter()
            .map(|c| strip_c_style_comment_delimiters(&lines.node_text(c)))
            .collect::<Vec<_>>()
            .join("\n")
            .trim()
            .to_string()
    }

    fn comment_kinds(&self) -> &'static [&'static str] {
        &["comment"]
    }

    fn strip_comment(&self, comment: &str) -> String {
        strip_c_style_comment_delimiters(comment)
    }

    fn doc_style(&self) -> DocStyle {
        DocStyle::Plain
    }

    fn is_blacklisted_identifier(&self, name: &str) -> bool {
        BLACKLIST.contains(&name) || name.starts_with(GENERATED_PREFIX)
    }

    fn string_kinds(&self) -> &'static [&'static str] {
        &["interpreted_string_literal", "raw_string_literal"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::ExtractOptions;
    use crate::record::Definition;

    const SOURCE: &str = r#"package store

import "errors"

// ErrMissing is returned when a key is absent.
var ErrMissing = errors.New("missing")

// Get returns the value stored under the key, or
// ErrMissing when nothing has been stored yet.
func (s *Store[K]) Get(key K) (string, error) {
	// read lock
	v, ok := s.data[key]
	if !ok {
		return "", ErrMissing
	}
	return v, nil
}

// String renders the whole store as a readable table.
func (s *Store[K]) String() string {
	return "store"
}

// Merge combines several maps into a new map and returns it.
func Merge(a, b map[string]int, rest ...map[string]int) map[string]int {
	out := map[string]int{}
	return out
}

// Detached note about the helper below.

func helper() {
	return
}
"#;

    fn extract() -> Vec<Definition> {
        let tree = Go.parse(SOURCE).unwrap();
        Go.extract(&tree, SOURCE, &ExtractOptions::default()).unwrap()
    }

    #[test]
    fn test_functions_and_receiver_methods() {
        let defs = extract();
        let names: Vec<&str> = defs.iter().map(|d| d.identifier.as_str()).collect();
        assert_eq!(names, vec!["Store.Get", "Merge"]);
    }

    #[test]
    fn test_comment_run_is_joined() {
        let defs = extract();
        let get = &defs[0];
        assert_eq!(
            get.original_docstring,
            "Get returns the value stored under the key, or\nErrMissing when nothing has been stored yet."
        );
        assert_eq!(get.comment, vec!["read lock"]);
        assert_eq!(get.parameters.get("key"), Some("K"));
        assert!(get.function_tokens.contains(&"\"\"".to_string()));
    }

    #[test]
    fn test_grouped_and_variadic_parameters() {
        let defs = extract();
        let params: Vec<(&str, &str)> = defs[1].parameters.iter().collect();
        assert_eq!(
            params,
            vec![
                ("a", "map[string]int"),
                ("b", "map[string]int"),
                ("rest", "...map[string]int"),
            ]
        );
    }

    #[test]
    fn test_blacklist() {
        assert!(Go.is_blacklisted_identifier("String"));
        assert!(Go.is_blacklisted_identifier("XXX_Unmarshal"));
        assert!(!Go.is_blacklisted_identifier("Strings"));
    }
}
