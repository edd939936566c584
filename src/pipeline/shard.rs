//! Splitting a dataset into shards and processing one shard.

use super::Extractor;
use super::sink::JsonlSink;
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::lang::LanguageRegistry;
use crate::record::SourceUnit;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::ops::Range;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// What one shard did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShardSummary {
    pub index: usize,
    /// Entries assigned to the shard.
    pub entries: usize,
    /// Entries that produced no records because extraction skipped them.
    pub skipped: usize,
    /// Records written.
    pub records: usize,
    pub path: PathBuf,
}

/// Splits `0..len` into `shards` contiguous ranges of `len / shards` entries;
/// the last range also takes the remainder.
///
/// Never returns more ranges than there are entries, so no shard is empty.
pub fn shard_ranges(len: usize, shards: usize) -> Vec<Range<usize>> {
    let shards = shards.min(len);
    if shards == 0 {
        return Vec::new();
    }
    let chunk = len / shards;
    (0..shards)
        .map(|i| {
            let start = i * chunk;
            let end = if i + 1 == shards { len } else { start + chunk };
            start..end
        })
        .collect()
}

/// Output file of shard `index`.
pub fn shard_path(output_dir: &Path, index: usize) -> PathBuf {
    output_dir.join(format!("batch_{index}_data.jsonl"))
}

/// Extracts every entry of one shard into its own output file.
///
/// Entries whose extraction is skipped are counted and logged at debug level;
/// only I/O and configuration problems are errors.
pub fn run_shard(
    index: usize,
    entries: &[SourceUnit],
    registry: &LanguageRegistry,
    config: &PipelineConfig,
) -> Result<ShardSummary> {
    let path = shard_path(&config.output_dir, index);
    let mut sink = JsonlSink::create(&path)?;
    let mut extractors: HashMap<&'static str, Extractor<'_>> = HashMap::new();
    let mut skipped = 0;

    for unit in entries {
        let adapter = registry.resolve(&unit.language)?;
        let extractor = match extractors.entry(adapter.name()) {
            Entry::Occupied(e) => e.into_mut(),
            Entry::Vacant(e) => e.insert(Extractor::new(
                adapter,
                config.extract_options(),
                config.token_bounds(),
            )?),
        };

        match extractor.process_entry(unit) {
            Ok(records) => {
                for record in &records {
                    sink.write(record)?;
                }
            }
            Err(reason) => {
                skipped += 1;
                debug!(shard = index, repo = %unit.repo, path = %unit.path, %reason, "skipping entry");
            }
        }
    }

    let records = sink.finish()?;
    info!(shard = index, entries = entries.len(), records, skipped, "shard complete");

    Ok(ShardSummary {
        index,
        entries: entries.len(),
        skipped,
        records,
        path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_shard_takes_remainder() {
        assert_eq!(shard_ranges(10, 3), vec![0..3, 3..6, 6..10]);
        assert_eq!(shard_ranges(9, 3), vec![0..3, 3..6, 6..9]);
    }

    #[test]
    fn test_more_shards_than_entries() {
        assert_eq!(shard_ranges(2, 40), vec![0..1, 1..2]);
        assert!(shard_ranges(0, 40).is_empty());
    }

    #[test]
    fn test_ranges_cover_everything_once() {
        for (len, shards) in [(1, 1), (7, 2), (100, 40), (41, 40)] {
            let ranges = shard_ranges(len, shards);
            let covered: Vec<usize> = ranges.into_iter().flatten().collect();
            assert_eq!(covered, (0..len).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_shard_path() {
        assert_eq!(
            shard_path(Path::new("out"), 7),
            PathBuf::from("out/batch_7_data.jsonl")
        );
    }
}
