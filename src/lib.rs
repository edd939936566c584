//! # docpair
//!
//! Extracts pairs of function bodies and their documentation comments from
//! source files in several languages, for building code/documentation corpora.
//!
//! This crate provides:
//! - Per-language adapters over tree-sitter grammars that find documented
//!   functions and methods
//! - Parsers for Javadoc, JSDoc, YARD and the Python docstring conventions
//! - Noise filtering of machine-written or empty documentation
//! - A sharded, parallel pipeline that writes one JSONL file per shard
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use docpair::prelude::*;
//! use std::path::Path;
//!
//! let dataset = Dataset::load(Path::new("./cache/java.jsonl"), "**/*.jsonl")?;
//! let config = PipelineConfig {
//!     language: Some("java".to_string()),
//!     output_dir: "./data/java".into(),
//!     shards: 8,
//!     ..PipelineConfig::default()
//! };
//!
//! let summary = run(dataset, &config)?;
//! println!("{} records", summary.records);
//! # Ok::<(), docpair::error::DocpairError>(())
//! ```
//!
//! ## Extracting a Single File
//!
//! ```rust
//! use docpair::prelude::*;
//!
//! let source = "class Cart {\n    /** Adds one item to the cart and updates the total. */\n    void add(Item item) {\n        items.add(item);\n    }\n}\n";
//! let tree = Java.parse(source)?;
//! let definitions = Java
//!     .extract(&tree, source, &ExtractOptions::default())
//!     .expect("class has a name");
//!
//! assert_eq!(definitions[0].identifier, "Cart.add");
//! # Ok::<(), docpair::error::DocpairError>(())
//! ```
//!
//! ## Supported Languages
//!
//! - Python (`.py`, `.pyi`)
//! - Java (`.java`)
//! - JavaScript (`.js`, `.jsx`, `.mjs`, `.cjs`)
//! - TypeScript (`.ts`, `.mts`, `.cts`)
//! - Go (`.go`)
//! - Ruby (`.rb`, `.rake`, `.gemspec`)

pub mod config;
pub mod dataset;
pub mod docstring;
pub mod error;
pub mod lang;
pub mod noise;
pub mod pipeline;
pub mod record;
pub mod span;
pub mod tokenize;
pub mod tree;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::config::PipelineConfig;
    pub use crate::dataset::Dataset;
    pub use crate::docstring::{DocStyle, DocstringParams, FieldDoc};
    pub use crate::error::{DocpairError, Result, SkipReason};
    pub use crate::lang::{
        DocAdapter, ExtractOptions, Go, Java, JavaScript, Language, LanguageRegistry, Python,
        Ruby, TypeScript,
    };
    pub use crate::pipeline::{Extractor, RunSummary, ShardSummary, TokenBounds, run};
    pub use crate::record::{Definition, ExtractionRecord, Parameters, SourceUnit};
    pub use crate::span::{SourceLines, Span};
}

pub use prelude::*;
