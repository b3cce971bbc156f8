//! The extraction engine.
//!
//! Walks the corpus file by file and sentence by sentence, and writes a
//! filtered context line for every qualifying focus-noun occurrence to the
//! training set of its canonical singular.

use std::collections::BTreeMap;
use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::ExtractionConfig;
use crate::corpus::{Chunk, ChunkKind, CorpusFile, list_corpus_files};
use crate::error::{ExtractError, Result};
use crate::lexicon::Lexicon;
use crate::output::OutputStreams;
use crate::parser::{NlpParser, RuleBasedParser};
use crate::planner::{FocusSet, ResumptionPlanner};
use crate::token::Sentence;
use crate::undesirables::{UndesirableFilter, Undesirables};
use crate::window::{collect_context, is_focus_token, passes_size_gate, window_bounds};

/// Statistics about an extraction run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    /// Focus words left after resumption planning.
    pub focus_words: usize,

    /// Corpus files read to the end.
    pub files_processed: usize,

    /// Corpus files that could not be read.
    pub files_skipped: usize,

    /// Chunks handed to the parser.
    pub chunks_parsed: usize,

    /// Chunks the parser rejected.
    pub parse_failures: usize,

    /// Chunks that produced no sentences.
    pub empty_parses: usize,

    /// Sentences scanned.
    pub sentences: u64,

    /// Context lines written.
    pub contexts_written: u64,

    /// Bytes written per canonical word.
    pub bytes_written: BTreeMap<String, u64>,

    /// Wall-clock time in milliseconds.
    pub elapsed_ms: u64,
}

/// Scans sentences for focus nouns and writes their contexts.
pub struct ContextExtractor<'a> {
    config: &'a ExtractionConfig,
    lexicon: &'a Lexicon,
    focus: &'a FocusSet,
    parser: &'a dyn NlpParser,
    filter: &'a dyn UndesirableFilter,
}

impl<'a> ContextExtractor<'a> {
    /// Create an extractor over a planned focus set.
    pub fn new(
        config: &'a ExtractionConfig,
        lexicon: &'a Lexicon,
        focus: &'a FocusSet,
        parser: &'a dyn NlpParser,
        filter: &'a dyn UndesirableFilter,
    ) -> Self {
        Self {
            config,
            lexicon,
            focus,
            parser,
            filter,
        }
    }

    /// Process every corpus file, then close all streams.
    pub fn run(&self) -> Result<RunStats> {
        let start = Instant::now();
        let mut stats = RunStats {
            focus_words: self.focus.len(),
            ..RunStats::default()
        };
        let mut streams = OutputStreams::new(self.config.unlabelled_dir());

        info!(
            "Reading corpus files in {} for {} focus words",
            self.config.corpus_dir.display(),
            self.focus.len()
        );
        for file in list_corpus_files(&self.config.corpus_dir) {
            self.process_file(&file, &mut streams, &mut stats)?;
        }

        stats.bytes_written = streams.close()?;
        stats.elapsed_ms = start.elapsed().as_millis() as u64;

        info!(
            "Extraction complete: {} files, {} sentences, {} contexts for {} words in {}ms",
            stats.files_processed,
            stats.sentences,
            stats.contexts_written,
            stats.bytes_written.len(),
            stats.elapsed_ms
        );
        Ok(stats)
    }

    /// Process one corpus file. Read errors are logged and end the file;
    /// only output errors are returned.
    fn process_file(
        &self,
        file: &CorpusFile,
        streams: &mut OutputStreams,
        stats: &mut RunStats,
    ) -> Result<()> {
        info!("Parsing and analysing {}", file.path.display());

        let chunks = match file.chunks() {
            Ok(chunks) => chunks,
            Err(source) => {
                let err = ExtractError::CorpusFileUnreadable {
                    path: file.path.clone(),
                    source,
                };
                warn!("{err}");
                stats.files_skipped += 1;
                return Ok(());
            }
        };

        for chunk in chunks {
            match chunk {
                Ok(chunk) => self.process_chunk(&chunk, streams, stats)?,
                Err(source) => {
                    let err = ExtractError::CorpusFileUnreadable {
                        path: file.path.clone(),
                        source,
                    };
                    warn!("{err}");
                    stats.files_skipped += 1;
                    return Ok(());
                }
            }
        }

        stats.files_processed += 1;
        Ok(())
    }

    fn process_chunk(
        &self,
        chunk: &Chunk,
        streams: &mut OutputStreams,
        stats: &mut RunStats,
    ) -> Result<()> {
        stats.chunks_parsed += 1;
        let parsed = match chunk.kind {
            ChunkKind::Text => self.parser.parse(&chunk.text),
            ChunkKind::Pretagged => self.parser.parse_pretagged(&chunk.text),
        };

        let sentences = match parsed {
            Ok(sentences) => sentences,
            Err(e) => {
                warn!("Error parsing {}: {}", chunk.label, ExtractError::from(e));
                stats.parse_failures += 1;
                return Ok(());
            }
        };

        if sentences.is_empty() {
            info!("Empty: {}", chunk.label);
            stats.empty_parses += 1;
            return Ok(());
        }

        debug!("Sentences: {}, for {}", sentences.len(), chunk.label);
        self.process_sentences(&sentences, streams, stats)
    }

    /// Scan parsed sentences and write every qualifying context.
    pub fn process_sentences(
        &self,
        sentences: &[Sentence],
        streams: &mut OutputStreams,
        stats: &mut RunStats,
    ) -> Result<()> {
        for sentence in sentences {
            self.process_sentence(sentence, streams, stats)?;

            stats.sentences += 1;
            if stats.sentences % self.config.progress_interval.max(1) == 0 {
                info!("   lines processed: {}", stats.sentences);
            }
        }
        Ok(())
    }

    fn process_sentence(
        &self,
        sentence: &Sentence,
        streams: &mut OutputStreams,
        stats: &mut RunStats,
    ) -> Result<()> {
        let tokens = sentence.tokens();
        let min_valid_size = self.config.min_valid_size();
        let byte_cap = self.config.byte_cap();

        for (index, token) in tokens.iter().enumerate() {
            if !is_focus_token(token, self.focus) {
                continue;
            }

            let (left, right) = window_bounds(tokens, index, self.config.window_size);
            if !passes_size_gate(left, right, min_valid_size) {
                continue;
            }

            let word = token.text.to_lowercase();
            let Some(key) = self.lexicon.canonical(&word) else {
                continue;
            };

            let context = collect_context(tokens, left, right, self.filter);
            if context.kept < min_valid_size {
                continue;
            }
            if byte_cap.is_some_and(|cap| streams.bytes_written(key) >= cap) {
                continue;
            }

            streams.write_line(key, &context.text)?;
            stats.contexts_written += 1;
        }
        Ok(())
    }
}

/// Plan the focus set and run the extraction with the given collaborators.
///
/// Returns early, without reading the corpus, when every focus word already
/// has a training set file.
pub fn run_with(
    config: &ExtractionConfig,
    lexicon: &Lexicon,
    parser: &dyn NlpParser,
    filter: &dyn UndesirableFilter,
) -> Result<RunStats> {
    config.validate()?;

    let unlabelled_dir = config.unlabelled_dir();
    let planner = ResumptionPlanner::new(lexicon, &unlabelled_dir);
    let focus = planner.plan(&config.focus_words)?;

    std::fs::create_dir_all(&unlabelled_dir).map_err(|source| ExtractError::CreateDirectory {
        path: unlabelled_dir.clone(),
        source,
    })?;

    if focus.is_empty() {
        info!("All focus words already processed, nothing to extract");
        return Ok(RunStats::default());
    }

    ContextExtractor::new(config, lexicon, &focus, parser, filter).run()
}

/// Load the bundled lexicon, parser and filter from `data_path` and run.
pub fn generate_unlabelled(config: &ExtractionConfig) -> Result<RunStats> {
    config.validate()?;

    let lexicon = Lexicon::load(&config.data_path)?;
    let parser = RuleBasedParser::load(&config.data_path)?;
    let filter = Undesirables::load(&config.data_path)?;

    run_with(config, &lexicon, &parser, &filter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::AmbiguousEntry;
    use crate::token::Token;
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;
    use tempfile::TempDir;

    fn sentence(tagged: &str) -> Sentence {
        Sentence::new(
            tagged
                .split_whitespace()
                .map(|item| {
                    let (text, tag) = item.rsplit_once(':').unwrap();
                    Token::word(text, tag)
                })
                .collect(),
        )
    }

    struct Fixture {
        temp_dir: TempDir,
        config: ExtractionConfig,
        lexicon: Lexicon,
        filter: HashSet<String>,
    }

    impl Fixture {
        fn new(window_size: usize, max_file_bytes: i64) -> Self {
            let temp_dir = TempDir::new().unwrap();
            let config = ExtractionConfig::new(
                temp_dir.path(),
                temp_dir.path().join("corpus"),
                temp_dir.path().join("out"),
            )
            .with_window_size(window_size)
            .with_max_file_bytes(max_file_bytes);
            std::fs::create_dir_all(config.unlabelled_dir()).unwrap();

            Self {
                temp_dir,
                config,
                lexicon: Lexicon::from_entries([
                    AmbiguousEntry::new("bat", Some("bats")),
                    AmbiguousEntry::new("mouse", Some("mice")),
                ]),
                filter: ["the", "a"].iter().map(|w| (*w).to_string()).collect(),
            }
        }

        fn extract(&self, sentences: &[Sentence]) -> (RunStats, String) {
            let focus: FocusSet = self.lexicon.keys().map(str::to_string).collect();
            let parser = RuleBasedParser::new();
            let extractor =
                ContextExtractor::new(&self.config, &self.lexicon, &focus, &parser, &self.filter);

            let mut streams = OutputStreams::new(self.config.unlabelled_dir());
            let mut stats = RunStats::default();
            extractor
                .process_sentences(sentences, &mut streams, &mut stats)
                .unwrap();
            stats.bytes_written = streams.close().unwrap();

            let path = self.config.unlabelled_dir().join("bat-trainingset.csv");
            let content = std::fs::read_to_string(path).unwrap_or_default();
            (stats, content)
        }
    }

    #[test]
    fn test_sentence_bounded_windows() {
        let fixture = Fixture::new(4, 0);
        let (stats, content) = fixture.extract(&[sentence(
            "The:DT bat:NN flew:VBD .:. A:DT bat:NN ate:VBD the:DT insect:NN .:.",
        )]);

        assert_eq!(content, "bat,flew\nbat,ate,insect\n");
        assert_eq!(stats.contexts_written, 2);
        assert_eq!(stats.sentences, 1);
    }

    #[test]
    fn test_verb_use_is_ignored() {
        let fixture = Fixture::new(4, 0);
        let (stats, content) =
            fixture.extract(&[sentence("they:PRP bat:VBP balls:NNS over:IN fences:NNS")]);

        assert_eq!(content, "");
        assert_eq!(stats.contexts_written, 0);
        assert!(stats.bytes_written.is_empty());
    }

    #[test]
    fn test_plural_goes_to_singular_file() {
        let fixture = Fixture::new(4, 0);
        let (_, content) = fixture.extract(&[sentence("three:CD bats:NNS hung:VBD upside:RB")]);

        assert_eq!(content, "three,bats,hung,upside\n");
        assert!(
            !fixture
                .config
                .unlabelled_dir()
                .join("bats-trainingset.csv")
                .exists()
        );
    }

    #[test]
    fn test_too_few_kept_tokens() {
        let fixture = Fixture::new(6, 0);
        // Window spans enough positions, but only two tokens survive filtering.
        let (_, content) = fixture.extract(&[sentence("the:DT the:DT a:DT bat:NN a:DT flew:VBD")]);

        assert_eq!(content, "");
    }

    #[test]
    fn test_soft_byte_cap() {
        let fixture = Fixture::new(2, 10);
        let line = sentence("big:JJ bat:NN flew:VBD");
        let (stats, content) = fixture.extract(&[line.clone(), line.clone(), line]);

        // "big,bat,flew\n" is 13 bytes: the first line overshoots, the rest are dropped.
        assert_eq!(content, "big,bat,flew\n");
        assert_eq!(stats.bytes_written.get("bat"), Some(&13));
    }

    #[test]
    fn test_zero_window_emits_every_focus_noun() {
        let fixture = Fixture::new(0, 0);
        let (_, content) = fixture.extract(&[sentence(".:. bat:NN .:. bats:NNS")]);

        assert_eq!(content, "bat\nbats\n");
    }

    #[test]
    fn test_run_with_short_circuits_when_all_done() {
        let fixture = Fixture::new(4, 0);
        std::fs::write(fixture.config.unlabelled_dir().join("bat-trainingset.csv"), "x\n").unwrap();
        std::fs::write(fixture.config.unlabelled_dir().join("mouse-trainingset.csv"), "y\n").unwrap();

        let corpus_dir = fixture.temp_dir.path().join("corpus");
        std::fs::create_dir_all(&corpus_dir).unwrap();
        std::fs::write(corpus_dir.join("doc.parsed"), "the:DT bat:NN flew:VBD away:RB\n").unwrap();

        let stats = run_with(
            &fixture.config,
            &fixture.lexicon,
            &RuleBasedParser::new(),
            &fixture.filter,
        )
        .unwrap();

        assert_eq!(stats, RunStats::default());
        let content =
            std::fs::read_to_string(fixture.config.unlabelled_dir().join("bat-trainingset.csv"))
                .unwrap();
        assert_eq!(content, "x\n");
    }
}
