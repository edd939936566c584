//! Language support: grammars, name lookup, and per-language extraction rules.

mod adapter;
mod go;
mod java;
mod javascript;
mod python;
mod ruby;
mod typescript;

pub use adapter::{
    DefinitionNode, DocAdapter, ExtractOptions, comment_run, definitions_in, is_adjacent,
};
pub(crate) use adapter::name_of;
pub use go::Go;
pub use java::Java;
pub use javascript::JavaScript;
pub use python::Python;
pub use ruby::Ruby;
pub use typescript::TypeScript;

use crate::error::{DocpairError, Result};
use tree_sitter::{Language as TsLanguage, Parser, Tree};

/// A programming language with a tree-sitter grammar.
pub trait Language: Send + Sync {
    /// Returns the canonical, lowercase name of the language.
    fn name(&self) -> &'static str;

    /// Other names the language is known by in datasets.
    fn aliases(&self) -> &[&'static str] {
        &[]
    }

    /// Returns the file extensions associated with this language.
    fn extensions(&self) -> &[&'static str];

    /// Returns the tree-sitter language grammar.
    fn grammar(&self) -> TsLanguage;

    /// Creates a parser for this language, to be reused across many files.
    fn parser(&self) -> Result<Parser> {
        let mut parser = Parser::new();
        parser
            .set_language(&self.grammar())
            .map_err(|e| DocpairError::Grammar {
                language: self.name().to_string(),
                message: e.to_string(),
            })?;
        Ok(parser)
    }

    /// Parses source code into a tree-sitter AST.
    fn parse(&self, source: &str) -> Result<Tree> {
        self.parser()?
            .parse(source, None)
            .ok_or_else(|| DocpairError::Grammar {
                language: self.name().to_string(),
                message: "parser produced no tree".to_string(),
            })
    }

    /// Checks if `name` (already normalized) refers to this language.
    fn matches_name(&self, name: &str) -> bool {
        self.name() == name || self.aliases().contains(&name)
    }
}

/// Lowercases a dataset language name and maps the spellings that are not
/// valid identifiers (`C++`, `C#`) onto grammar names.
pub fn normalize_language_name(name: &str) -> String {
    let name = name.trim().to_lowercase();
    match name.as_str() {
        "c++" => "cpp".to_string(),
        "c#" => "c_sharp".to_string(),
        _ => name,
    }
}

/// Registry of supported languages.
#[derive(Default)]
pub struct LanguageRegistry {
    languages: Vec<Box<dyn DocAdapter>>,
}

impl LanguageRegistry {
    /// Creates a new registry with all built-in languages.
    pub fn new() -> Self {
        let mut registry = Self::default();
        registry.register(Box::new(Python));
        registry.register(Box::new(Java));
        registry.register(Box::new(JavaScript));
        registry.register(Box::new(TypeScript));
        registry.register(Box::new(Go));
        registry.register(Box::new(Ruby));
        registry
    }

    /// Registers a new language.
    pub fn register(&mut self, lang: Box<dyn DocAdapter>) {
        self.languages.push(lang);
    }

    /// Finds a language by name or alias, case-insensitively.
    pub fn by_name(&self, name: &str) -> Option<&dyn DocAdapter> {
        let name = normalize_language_name(name);
        self.languages
            .iter()
            .find(|l| l.matches_name(&name))
            .map(|l| l.as_ref())
    }

    /// Like [`LanguageRegistry::by_name`], but an unknown name is an error.
    pub fn resolve(&self, name: &str) -> Result<&dyn DocAdapter> {
        self.by_name(name)
            .ok_or_else(|| DocpairError::UnsupportedLanguage(normalize_language_name(name)))
    }

    /// Returns all registered languages.
    pub fn all(&self) -> &[Box<dyn DocAdapter>] {
        &self.languages
    }
}
