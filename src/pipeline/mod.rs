//! Sharded, parallel extraction of a whole dataset.
//!
//! The dataset is split into contiguous shards. Each shard runs on a worker of a
//! rayon pool, owns its own parsers, and writes its own
//! `batch_<index>_data.jsonl` file, so workers never share mutable state.

mod shard;
mod sink;

pub use shard::{ShardSummary, run_shard, shard_path, shard_ranges};
pub use sink::JsonlSink;

use crate::config::PipelineConfig;
use crate::dataset::Dataset;
use crate::error::{Result, SkipReason};
use crate::lang::{DocAdapter, ExtractOptions, LanguageRegistry};
use crate::record::{ExtractionRecord, SourceUnit};
use rayon::ThreadPoolBuilder;
use rayon::prelude::*;
use tracing::info;
use tree_sitter::Parser;

/// Exclusive bounds on the number of docstring tokens a record may have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenBounds {
    pub min_exclusive: usize,
    pub max_exclusive: usize,
}

impl Default for TokenBounds {
    fn default() -> Self {
        Self {
            min_exclusive: 3,
            max_exclusive: 256,
        }
    }
}

impl TokenBounds {
    pub fn admits(&self, tokens: usize) -> bool {
        tokens > self.min_exclusive && tokens < self.max_exclusive
    }
}

/// Turns source units of one language into records.
///
/// Owns a parser, so each worker keeps its own extractor per language.
pub struct Extractor<'r> {
    adapter: &'r dyn DocAdapter,
    parser: Parser,
    options: ExtractOptions,
    bounds: TokenBounds,
}

impl<'r> Extractor<'r> {
    pub fn new(
        adapter: &'r dyn DocAdapter,
        options: ExtractOptions,
        bounds: TokenBounds,
    ) -> Result<Self> {
        Ok(Self {
            adapter,
            parser: adapter.parser()?,
            options,
            bounds,
        })
    }

    /// Extracts the records of one entry.
    ///
    /// Definitions whose docstring token count falls outside the bounds are
    /// dropped; an entry that cannot be used at all is reported as a [`SkipReason`].
    pub fn process_entry(
        &mut self,
        unit: &SourceUnit,
    ) -> std::result::Result<Vec<ExtractionRecord>, SkipReason> {
        let tree = self
            .parser
            .parse(&unit.code, None)
            .ok_or(SkipReason::ParseFailed)?;
        let definitions = self.adapter.extract(&tree, &unit.code, &self.options)?;

        Ok(definitions
            .into_iter()
            .filter(|d| self.bounds.admits(d.docstring_tokens.len()))
            .map(|d| ExtractionRecord::new(unit, d))
            .collect())
    }
}

/// Totals of a whole run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub shards: Vec<ShardSummary>,
    pub entries: usize,
    pub skipped: usize,
    pub records: usize,
}

/// Extracts every entry of `dataset` into `config.output_dir`.
///
/// Configuration and language problems are reported before the output directory
/// is created. After that, shards run in parallel on `config.workers` threads and
/// the first shard error aborts the run.
pub fn run(dataset: Dataset, config: &PipelineConfig) -> Result<RunSummary> {
    config.validate()?;
    let registry = LanguageRegistry::new();

    let dataset = match &config.language {
        Some(language) => dataset.filter_language(language, &registry)?,
        None => dataset,
    };
    for unit in dataset.entries() {
        registry.resolve(&unit.language)?;
    }

    std::fs::create_dir_all(&config.output_dir)?;

    let entries = dataset.entries();
    let ranges = shard_ranges(entries.len(), config.shards);
    info!(
        entries = entries.len(),
        shards = ranges.len(),
        workers = config.workers,
        output = %config.output_dir.display(),
        "starting extraction"
    );

    let pool = ThreadPoolBuilder::new()
        .num_threads(config.workers)
        .thread_name(|i| format!("docpair-worker-{i}"))
        .build()?;
    let shards = pool.install(|| {
        ranges
            .par_iter()
            .enumerate()
            .map(|(index, range)| run_shard(index, &entries[range.clone()], &registry, config))
            .collect::<Result<Vec<_>>>()
    })?;

    let summary = RunSummary {
        entries: shards.iter().map(|s| s.entries).sum(),
        skipped: shards.iter().map(|s| s.skipped).sum(),
        records: shards.iter().map(|s| s.records).sum(),
        shards,
    };
    info!(
        entries = summary.entries,
        skipped = summary.skipped,
        records = summary.records,
        "extraction complete"
    );
    Ok(summary)
}
