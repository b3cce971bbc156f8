//! # Unlabelled WSD Training Set Extraction
//!
//! This crate scans a corpus for occurrences of ambiguous nouns and writes a
//! window of surrounding words for each occurrence to a per-word training
//! set file. The files are unlabelled input for word-sense disambiguation
//! models.
//!
//! ## Features
//!
//! - **Resumable**: words whose training set already exists are skipped
//! - **Sentence-bounded windows**: contexts never cross a `.`
//! - **Canonical output**: plural occurrences land in the singular's file
//! - **Soft size cap**: per-word output stops once a byte budget is reached
//! - **Three input formats**: `.txt`, `.gz` and pre-tagged `.parsed` files
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     Training Set Extraction                     │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  Lexicon ──► ResumptionPlanner ──► FocusSet                     │
//! │                                       │                         │
//! │                                       ▼                         │
//! │  CorpusFile ──► Chunk ──► NlpParser ──► ContextExtractor        │
//! │                                          │          │           │
//! │                          UndesirableFilter          ▼           │
//! │                                           OutputStreams         │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Output lands in `<output_dir>/unlabelled/<word>-trainingset.csv`, one
//! comma-separated context per line.

pub mod config;
pub mod corpus;
pub mod engine;
pub mod error;
pub mod lexicon;
pub mod output;
pub mod parser;
pub mod planner;
pub mod token;
pub mod undesirables;
pub mod window;

pub use config::{DEFAULT_PROGRESS_INTERVAL, DEFAULT_WINDOW_SIZE, ExtractionConfig};
pub use corpus::{Chunk, ChunkKind, ChunkReader, CorpusFile, CorpusFormat, list_corpus_files};
pub use engine::{ContextExtractor, RunStats, generate_unlabelled, run_with};
pub use error::{ExtractError, ParseError, Result};
pub use lexicon::{AmbiguousEntry, Lexicon};
pub use output::{OutputStreams, training_set_path};
pub use parser::{NlpParser, RuleBasedParser, parse_pretagged_line};
pub use planner::{FocusSet, ResumptionPlanner};
pub use token::{Sentence, Token};
pub use undesirables::{UndesirableFilter, Undesirables};
pub use window::Context;
