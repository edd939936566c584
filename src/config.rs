//! Run configuration, loadable from YAML or JSON.
//!
//! Every field has a default, so a config file only needs the values it
//! changes:
//!
//! ```yaml
//! language: java
//! data_path: ./cache/java.jsonl
//! output_dir: ./data/java
//! shards: 8
//! ```

use crate::error::{DocpairError, Result};
use crate::lang::ExtractOptions;
use crate::pipeline::TokenBounds;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Settings of one extraction run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Only process entries of this language.
    pub language: Option<String>,
    /// A JSONL file, or a directory of JSONL files.
    pub data_path: PathBuf,
    /// Where the `batch_<index>_data.jsonl` files are written.
    pub output_dir: PathBuf,
    /// Number of output shards.
    pub shards: usize,
    /// Number of worker threads.
    pub workers: usize,
    /// Records need strictly more docstring tokens than this.
    pub min_docstring_tokens: usize,
    /// Records need strictly fewer docstring tokens than this.
    pub max_docstring_tokens: usize,
    /// Drop definitions whose body fits on a single line.
    pub skip_single_line_bodies: bool,
    /// Files to read when `data_path` is a directory.
    pub dataset_glob: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            language: None,
            data_path: PathBuf::from("./cache"),
            output_dir: PathBuf::from("./data"),
            shards: 40,
            workers: default_workers(),
            min_docstring_tokens: 3,
            max_docstring_tokens: 256,
            skip_single_line_bodies: true,
            dataset_glob: "**/*.jsonl".to_string(),
        }
    }
}

fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

impl PipelineConfig {
    /// Parses a YAML document.
    pub fn from_yaml(text: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Parses a JSON document.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Loads a config file; `.json` files are read as JSON, anything else as YAML.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::from_json(&text),
            _ => Self::from_yaml(&text),
        }
    }

    /// Rejects settings no run can succeed with.
    pub fn validate(&self) -> Result<()> {
        if self.shards == 0 {
            return Err(DocpairError::InvalidConfig(
                "shards must be at least 1".to_string(),
            ));
        }
        if self.workers == 0 {
            return Err(DocpairError::InvalidConfig(
                "workers must be at least 1".to_string(),
            ));
        }
        if self.min_docstring_tokens >= self.max_docstring_tokens {
            return Err(DocpairError::InvalidConfig(format!(
                "min_docstring_tokens ({}) must be below max_docstring_tokens ({})",
                self.min_docstring_tokens, self.max_docstring_tokens
            )));
        }
        Ok(())
    }

    pub fn token_bounds(&self) -> TokenBounds {
        TokenBounds {
            min_exclusive: self.min_docstring_tokens,
            max_exclusive: self.max_docstring_tokens,
        }
    }

    pub fn extract_options(&self) -> ExtractOptions {
        ExtractOptions {
            skip_single_line_bodies: self.skip_single_line_bodies,
        }
    }
}
