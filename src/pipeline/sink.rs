//! Line-delimited JSON output.

use crate::error::Result;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Writes one JSON object per line to a file owned by a single shard.
pub struct JsonlSink {
    writer: BufWriter<File>,
    path: PathBuf,
    written: usize,
}

impl JsonlSink {
    /// Creates the file, truncating whatever a previous run left there.
    pub fn create(path: &Path) -> Result<Self> {
        Ok(Self {
            writer: BufWriter::new(File::create(path)?),
            path: path.to_path_buf(),
            written: 0,
        })
    }

    /// Appends `record` as one line. Non-ASCII text is written as is.
    pub fn write<T: Serialize>(&mut self, record: &T) -> Result<()> {
        serde_json::to_writer(&mut self.writer, record)?;
        self.writer.write_all(b"\n")?;
        self.written += 1;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Flushes the file and returns the number of lines written.
    pub fn finish(mut self) -> Result<usize> {
        self.writer.flush()?;
        Ok(self.written)
    }
}
