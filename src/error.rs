//! Error types for docpair.

use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors. Any of these aborts a run before (or instead of) writing output.
#[derive(Error, Debug)]
pub enum DocpairError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Glob pattern error: {0}")]
    Glob(#[from] globset::Error),

    #[error("Directory walk error: {0}")]
    WalkDir(#[from] walkdir::Error),

    #[error("Worker pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("Failed to load grammar for {language}: {message}")]
    Grammar { language: String, message: String },

    #[error("Language {0} not supported")]
    UnsupportedLanguage(String),

    #[error("Invalid dataset entry at {}:{line}: {message}", source_name.display())]
    Dataset {
        source_name: PathBuf,
        line: usize,
        message: String,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// A specialized Result type for docpair operations.
pub type Result<T> = std::result::Result<T, DocpairError>;

/// Why a single dataset entry produced no records at all.
///
/// Skips are recoverable: the pipeline drops the entry and moves on.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    #[error("grammar produced no syntax tree")]
    ParseFailed,

    #[error("{kind} at {row}:{column} has no identifier")]
    MissingIdentifier {
        kind: &'static str,
        row: usize,
        column: usize,
    },
}
