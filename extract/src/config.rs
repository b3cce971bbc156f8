//! Configuration for training set extraction.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ExtractError, Result};

/// Default half-width of the context window.
pub const DEFAULT_WINDOW_SIZE: usize = 25;

/// Default number of sentences between progress lines.
pub const DEFAULT_PROGRESS_INTERVAL: u64 = 100_000;

/// Name of the directory created under the output directory.
pub const UNLABELLED_DIR: &str = "unlabelled";

/// Configuration for one extraction run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Root for the lexicon, tagger and undesirables resources.
    pub data_path: PathBuf,

    /// Directory scanned (one level deep) for corpus files.
    pub corpus_dir: PathBuf,

    /// Directory under which `unlabelled/` is created.
    pub output_dir: PathBuf,

    /// Soft per-word output cap in bytes (<= 0 disables).
    pub max_file_bytes: i64,

    /// Half-width of the context window.
    pub window_size: usize,

    /// Restriction list (empty = all lexicon keys).
    pub focus_words: Vec<String>,

    /// Sentences between progress lines.
    pub progress_interval: u64,
}

impl ExtractionConfig {
    /// Create a new config with default window and cap settings.
    pub fn new(
        data_path: impl Into<PathBuf>,
        corpus_dir: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            data_path: data_path.into(),
            corpus_dir: corpus_dir.into(),
            output_dir: output_dir.into(),
            ..Self::default()
        }
    }

    /// Load a config from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ExtractError::ResourceRead {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&content)?)
    }

    /// Set the window half-width.
    pub fn with_window_size(mut self, window_size: usize) -> Self {
        self.window_size = window_size;
        self
    }

    /// Set the soft per-word byte cap.
    pub fn with_max_file_bytes(mut self, max_file_bytes: i64) -> Self {
        self.max_file_bytes = max_file_bytes;
        self
    }

    /// Restrict extraction to the given words.
    pub fn with_focus_words<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.focus_words = words.into_iter().map(Into::into).collect();
        self
    }

    /// Set the progress reporting interval.
    pub fn with_progress_interval(mut self, interval: u64) -> Self {
        self.progress_interval = interval;
        self
    }

    /// Directory holding the per-word training set files.
    pub fn unlabelled_dir(&self) -> PathBuf {
        self.output_dir.join(UNLABELLED_DIR)
    }

    /// Minimum window span and kept-token count for an emission.
    pub fn min_valid_size(&self) -> usize {
        self.window_size / 2
    }

    /// The byte cap, if one is in force.
    pub fn byte_cap(&self) -> Option<u64> {
        u64::try_from(self.max_file_bytes).ok().filter(|cap| *cap > 0)
    }

    /// Check the config for values the engine cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.corpus_dir.as_os_str().is_empty() {
            return Err(ExtractError::Config("corpus_dir is not set".to_string()));
        }
        if self.output_dir.as_os_str().is_empty() {
            return Err(ExtractError::Config("output_dir is not set".to_string()));
        }
        if self.progress_interval == 0 {
            return Err(ExtractError::Config(
                "progress_interval must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::new(),
            corpus_dir: PathBuf::new(),
            output_dir: PathBuf::new(),
            max_file_bytes: 0,
            window_size: DEFAULT_WINDOW_SIZE,
            focus_words: Vec::new(),
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }
}
