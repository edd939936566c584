//! Loading source units from line-delimited JSON.

use crate::error::{DocpairError, Result};
use crate::lang::LanguageRegistry;
use crate::record::SourceUnit;
use globset::Glob;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::debug;
use walkdir::WalkDir;

/// The entries of one run, in load order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    entries: Vec<SourceUnit>,
}

impl Dataset {
    pub fn new(entries: Vec<SourceUnit>) -> Self {
        Self { entries }
    }

    /// Loads a JSONL file, or every file under a directory that matches `glob`
    /// (relative to the directory), in file-name order.
    ///
    /// All entries are validated here: a line that is not JSON or lacks a
    /// required field fails the whole load with its file and line number.
    pub fn load(path: &Path, glob: &str) -> Result<Self> {
        if path.is_file() {
            return Ok(Self::new(read_jsonl(path)?));
        }

        let matcher = Glob::new(glob)?.compile_matcher();
        let mut entries = Vec::new();
        for entry in WalkDir::new(path).sort_by_file_name() {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let relative = entry.path().strip_prefix(path).unwrap_or(entry.path());
            if !matcher.is_match(relative) {
                debug!(path = %entry.path().display(), "skipping file outside dataset glob");
                continue;
            }
            entries.extend(read_jsonl(entry.path())?);
        }
        Ok(Self::new(entries))
    }

    /// Parses JSONL from `reader`; `source_name` is used in error messages.
    pub fn from_reader(reader: impl BufRead, source_name: &Path) -> Result<Self> {
        let mut entries = Vec::new();
        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let unit = serde_json::from_str::<SourceUnit>(&line).map_err(|e| {
                DocpairError::Dataset {
                    source_name: source_name.to_path_buf(),
                    line: index + 1,
                    message: e.to_string(),
                }
            })?;
            entries.push(unit);
        }
        Ok(Self::new(entries))
    }

    /// Keeps only the entries written in `language` (aliases allowed).
    pub fn filter_language(self, language: &str, registry: &LanguageRegistry) -> Result<Self> {
        let wanted = registry.resolve(language)?.name();
        let entries = self
            .entries
            .into_iter()
            .filter(|unit| registry.by_name(&unit.language).is_some_and(|l| l.name() == wanted))
            .collect();
        Ok(Self::new(entries))
    }

    pub fn entries(&self) -> &[SourceUnit] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn read_jsonl(path: &Path) -> Result<Vec<SourceUnit>> {
    let file = File::open(path)?;
    Ok(Dataset::from_reader(BufReader::new(file), path)?.entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn line(repo: &str, language: &str) -> String {
        format!(
            r#"{{"repo_name":"{repo}","path":"a","language":"{language}","license":"mit","code":"x"}}"#
        )
    }

    #[test]
    fn test_load_single_file_skips_blank_lines() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("data.jsonl");
        fs::write(&file, format!("{}\n\n{}\n", line("a/b", "Java"), line("c/d", "Go"))).unwrap();

        let dataset = Dataset::load(&file, "**/*.jsonl").unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.entries()[1].repo, "c/d");
    }

    #[test]
    fn test_load_directory_in_name_order() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("b.jsonl"), line("second", "Java")).unwrap();
        fs::write(dir.path().join("a.jsonl"), line("first", "Java")).unwrap();
        fs::write(dir.path().join("nested/c.jsonl"), line("third", "Java")).unwrap();
        fs::write(dir.path().join("notes.txt"), "not data").unwrap();

        let dataset = Dataset::load(dir.path(), "**/*.jsonl").unwrap();
        let repos: Vec<&str> = dataset.entries().iter().map(|u| u.repo.as_str()).collect();
        assert_eq!(repos, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_missing_field_reports_line() {
        let text = format!(
            "{}\n{}\n",
            line("a/b", "Java"),
            r#"{"repo":"x","path":"p","language":"Java","code":"c"}"#
        );
        let err = Dataset::from_reader(text.as_bytes(), Path::new("input.jsonl")).unwrap_err();
        match err {
            DocpairError::Dataset {
                source_name,
                line,
                message,
            } => {
                assert_eq!(source_name, PathBuf::from("input.jsonl"));
                assert_eq!(line, 2);
                assert!(message.contains("license"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_filter_language_resolves_aliases() {
        let dataset = Dataset::new(vec![
            SourceUnit::new("JavaScript", "a"),
            SourceUnit::new("Java", "b"),
            SourceUnit::new("js", "c"),
        ]);
        let registry = LanguageRegistry::new();

        let filtered = dataset.clone().filter_language("js", &registry).unwrap();
        let codes: Vec<&str> = filtered.entries().iter().map(|u| u.code.as_str()).collect();
        assert_eq!(codes, vec!["a", "c"]);

        assert!(dataset.filter_language("php", &registry).is_err());
    }
}
