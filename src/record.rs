//! Input units, intermediate metadata, and output records.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::docstring::DocstringParams;

/// One source file and its provenance, as read from the dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceUnit {
    #[serde(alias = "repo_name")]
    pub repo: String,
    pub path: String,
    pub language: String,
    pub license: String,
    pub code: String,
}

impl SourceUnit {
    /// Creates a unit with placeholder provenance, mostly useful in tests.
    pub fn new(language: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            repo: String::new(),
            path: String::new(),
            language: language.into(),
            license: String::new(),
            code: code.into(),
        }
    }

    /// Sets the repository name.
    pub fn with_repo(mut self, repo: impl Into<String>) -> Self {
        self.repo = repo.into();
        self
    }

    /// Sets the file path.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Sets the license.
    pub fn with_license(mut self, license: impl Into<String>) -> Self {
        self.license = license.into();
        self
    }
}

/// Parameter names mapped to their declared types, in declaration order.
///
/// Names are unique; inserting an existing name updates its type in place.
/// Serializes as a JSON object whose keys keep declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Parameters {
    entries: Vec<(String, String)>,
}

impl Parameters {
    /// Creates an empty parameter list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a parameter, or updates the type of an existing one.
    pub fn insert(&mut self, name: impl Into<String>, type_name: impl Into<String>) {
        let name = name.into();
        let type_name = type_name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = type_name,
            None => self.entries.push((name, type_name)),
        }
    }

    /// Returns the declared type of `name`, if it is a parameter.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, t)| t.as_str())
    }

    /// Returns true if `name` is a parameter.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Iterates over `(name, type)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, t)| (n.as_str(), t.as_str()))
    }

    /// Parameter names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<N: Into<String>, T: Into<String>> FromIterator<(N, T)> for Parameters {
    fn from_iter<I: IntoIterator<Item = (N, T)>>(iter: I) -> Self {
        let mut params = Parameters::new();
        for (name, type_name) in iter {
            params.insert(name, type_name);
        }
        params
    }
}

impl Serialize for Parameters {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, type_name) in &self.entries {
            map.serialize_entry(name, type_name)?;
        }
        map.end()
    }
}

/// Name and signature details of a function or method.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FunctionMetadata {
    pub identifier: String,
    pub parameters: Parameters,
    pub return_type: String,
}

/// Name and supertypes of a class-like declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassMetadata {
    pub identifier: String,
    /// Superclass and implemented interface names, in source order.
    pub superclasses: Vec<String>,
}

/// Everything an adapter extracts for one documented definition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Definition {
    pub identifier: String,
    pub parameters: Parameters,
    pub function: String,
    pub function_tokens: Vec<String>,
    pub original_docstring: String,
    pub docstring: String,
    pub docstring_tokens: Vec<String>,
    pub docstring_param: DocstringParams,
    pub comment: Vec<String>,
    pub start_point: (usize, usize),
    pub end_point: (usize, usize),
}

/// One output line: a definition together with the provenance of its file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractionRecord {
    pub repo: String,
    pub path: String,
    pub language: String,
    pub license: String,
    pub identifier: String,
    pub parameters: Parameters,
    pub function: String,
    pub function_tokens: Vec<String>,
    pub original_docstring: String,
    pub docstring: String,
    pub docstring_tokens: Vec<String>,
    pub docstring_param: DocstringParams,
    pub comment: Vec<String>,
    pub start_point: (usize, usize),
    pub end_point: (usize, usize),
}

impl ExtractionRecord {
    /// Attaches the provenance of `unit` to an extracted definition.
    pub fn new(unit: &SourceUnit, definition: Definition) -> Self {
        Self {
            repo: unit.repo.clone(),
            path: unit.path.clone(),
            language: unit.language.clone(),
            license: unit.license.clone(),
            identifier: definition.identifier,
            parameters: definition.parameters,
            function: definition.function,
            function_tokens: definition.function_tokens,
            original_docstring: definition.original_docstring,
            docstring: definition.docstring,
            docstring_tokens: definition.docstring_tokens,
            docstring_param: definition.docstring_param,
            comment: definition.comment,
            start_point: definition.start_point,
            end_point: definition.end_point,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parameters_keep_declaration_order() {
        let params: Parameters = [("zeta", "int"), ("alpha", "String"), ("mid", "")]
            .into_iter()
            .collect();
        let names: Vec<&str> = params.names().collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);

        let json = serde_json::to_string(&params).unwrap();
        assert_eq!(json, r#"{"zeta":"int","alpha":"String","mid":""}"#);
    }

    #[test]
    fn test_parameters_names_are_unique() {
        let mut params = Parameters::new();
        params.insert("a", "int");
        params.insert("b", "long");
        params.insert("a", "String");

        assert_eq!(params.len(), 2);
        assert_eq!(params.get("a"), Some("String"));
        let names: Vec<&str> = params.names().collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_source_unit_accepts_repo_name() {
        let json = r#"{"repo_name":"o/r","path":"A.java","language":"Java","license":"mit","code":"x"}"#;
        let unit: SourceUnit = serde_json::from_str(json).unwrap();
        assert_eq!(unit.repo, "o/r");

        let json = r#"{"repo":"o/r","path":"A.java","language":"Java","license":"mit","code":"x"}"#;
        let unit: SourceUnit = serde_json::from_str(json).unwrap();
        assert_eq!(unit.repo, "o/r");
    }

    #[test]
    fn test_source_unit_requires_code() {
        let json = r#"{"repo":"o/r","path":"A.java","language":"Java","license":"mit"}"#;
        assert!(serde_json::from_str::<SourceUnit>(json).is_err());
    }
}
