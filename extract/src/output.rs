//! Per-word training set output streams.
//!
//! A stream is opened lazily on the first context emitted for its word and
//! stays open for the rest of the run. [`OutputStreams::close`] consumes the
//! registry, so a closed stream can never be written again.

use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{ExtractError, Result};

/// Path of the training set file for a canonical word.
pub fn training_set_path(dir: &Path, word: &str) -> PathBuf {
    dir.join(format!("{word}-trainingset.csv"))
}

fn open_stream(dir: &Path, word: &str) -> Result<OutputStream> {
    let path = training_set_path(dir, word);
    let file = File::create(&path).map_err(|source| ExtractError::StreamOpen {
        path: path.clone(),
        source,
    })?;
    debug!("Opened training set {}", path.display());

    Ok(OutputStream {
        path,
        writer: BufWriter::new(file),
        bytes_written: 0,
    })
}

fn write_record(writer: &mut impl Write, context: &str) -> std::io::Result<()> {
    writer.write_all(context.as_bytes())?;
    writer.write_all(b"\n")
}

struct OutputStream {
    path: PathBuf,
    writer: BufWriter<File>,
    bytes_written: u64,
}

/// Open per-word streams and their byte counters, keyed by canonical word.
pub struct OutputStreams {
    dir: PathBuf,
    streams: HashMap<String, OutputStream>,
}

impl OutputStreams {
    /// Create an empty registry writing into `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            streams: HashMap::new(),
        }
    }

    /// Bytes written for `word` during this run.
    pub fn bytes_written(&self, word: &str) -> u64 {
        self.streams.get(word).map_or(0, |s| s.bytes_written)
    }

    /// Whether a stream for `word` has been opened.
    pub fn is_open(&self, word: &str) -> bool {
        self.streams.contains_key(word)
    }

    /// Number of open streams.
    pub fn open_count(&self) -> usize {
        self.streams.len()
    }

    /// Append `context` and a newline to the stream for `word`, opening it
    /// (truncating any existing file) on first use. Returns the bytes written.
    pub fn write_line(&mut self, word: &str, context: &str) -> Result<u64> {
        let stream = match self.streams.entry(word.to_string()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(open_stream(&self.dir, word)?),
        };

        write_record(&mut stream.writer, context).map_err(|source| ExtractError::StreamWrite {
            path: stream.path.clone(),
            source,
        })?;

        let written = context.len() as u64 + 1;
        stream.bytes_written += written;
        Ok(written)
    }

    /// Flush and close every stream, returning bytes written per word.
    pub fn close(self) -> Result<BTreeMap<String, u64>> {
        let mut totals = BTreeMap::new();
        for (word, stream) in self.streams {
            let OutputStream {
                path,
                writer,
                bytes_written,
            } = stream;
            let file = writer.into_inner().map_err(|e| ExtractError::StreamWrite {
                path: path.clone(),
                source: e.into_error(),
            })?;
            file.sync_all()
                .map_err(|source| ExtractError::StreamWrite { path, source })?;
            totals.insert(word, bytes_written);
        }
        Ok(totals)
    }
}
