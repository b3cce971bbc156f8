//! `wsdset`: generate unlabelled word-sense training sets from a corpus.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use wsdset_extract::{ExtractionConfig, generate_unlabelled};

#[derive(Debug, Parser)]
#[command(
    name = "wsdset",
    version,
    about = "Write a context window for every ambiguous noun in a corpus to per-word training sets"
)]
struct Cli {
    /// TOML config file; flags override its values.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory holding ambiguous-nouns.txt and optional tagger resources.
    #[arg(long, value_name = "DIR")]
    data: Option<PathBuf>,

    /// Directory of .txt, .gz and .parsed corpus files (not recursive).
    #[arg(long, value_name = "DIR")]
    corpus: Option<PathBuf>,

    /// Directory under which unlabelled/ is created.
    #[arg(long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Soft per-word output cap in bytes; 0 or less disables it.
    #[arg(long, allow_negative_numbers = true)]
    max_file_bytes: Option<i64>,

    /// Half-width of the context window.
    #[arg(long)]
    window_size: Option<usize>,

    /// Sentences between progress lines.
    #[arg(long)]
    progress_interval: Option<u64>,

    /// Print run statistics as JSON on stdout.
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Log at debug level.
    #[arg(short, long, default_value_t = false)]
    verbose: bool,

    /// Only extract these words (default: the whole lexicon).
    #[arg(value_name = "FOCUS_WORDS")]
    focus_words: Vec<String>,
}

impl Cli {
    fn into_config(self) -> anyhow::Result<(ExtractionConfig, bool)> {
        let mut config = match &self.config {
            Some(path) => ExtractionConfig::from_toml_file(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => ExtractionConfig::default(),
        };

        if let Some(data) = self.data {
            config.data_path = data;
        }
        if let Some(corpus) = self.corpus {
            config.corpus_dir = corpus;
        }
        if let Some(output) = self.output {
            config.output_dir = output;
        }
        if let Some(max_file_bytes) = self.max_file_bytes {
            config.max_file_bytes = max_file_bytes;
        }
        if let Some(window_size) = self.window_size {
            config.window_size = window_size;
        }
        if let Some(interval) = self.progress_interval {
            config.progress_interval = interval;
        }
        if !self.focus_words.is_empty() {
            config.focus_words = self.focus_words;
        }

        Ok((config, self.json))
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let (config, json) = cli.into_config()?;
    tracing::debug!(?config, "resolved configuration");
    let stats = generate_unlabelled(&config).with_context(|| {
        format!(
            "generating training sets from {} into {}",
            config.corpus_dir.display(),
            config.output_dir.display()
        )
    })?;

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    }
    Ok(())
}
