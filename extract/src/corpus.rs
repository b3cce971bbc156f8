//! Corpus discovery and chunk producers.
//!
//! Each recognised corpus file becomes a lazy sequence of [`Chunk`]s. Plain
//! text files are one chunk; gzip and pre-tagged files yield a chunk per
//! line so that sentences never bridge lines.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use flate2::read::MultiGzDecoder;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Input formats recognised by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorpusFormat {
    /// `.txt`: the whole file is one free-text chunk.
    PlainText,
    /// `.gz`: every decompressed line is a free-text chunk.
    Gzip,
    /// `.parsed`: every line is in the `word:tag ...` format.
    Pretagged,
}

impl CorpusFormat {
    /// Pick the format for a path, or `None` for files to ignore.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "txt" => Some(Self::PlainText),
            "gz" => Some(Self::Gzip),
            "parsed" => Some(Self::Pretagged),
            _ => None,
        }
    }
}

/// How a chunk must be handed to the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkKind {
    /// Free text for tokenising and tagging.
    Text,
    /// An already tagged line.
    Pretagged,
}

/// A unit of input for the parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// `path` or `path:line`, for log messages.
    pub label: String,

    /// Chunk contents.
    pub text: String,

    /// Parser entry point to use.
    pub kind: ChunkKind,
}

/// A corpus file with a recognised format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusFile {
    pub path: PathBuf,
    pub format: CorpusFormat,
}

impl CorpusFile {
    /// Open the file and return its chunks.
    pub fn chunks(&self) -> io::Result<ChunkReader> {
        let label = self.path.display().to_string();
        let source = match self.format {
            CorpusFormat::PlainText => {
                let bytes = std::fs::read(&self.path)?;
                ChunkSource::Whole(Some(String::from_utf8_lossy(&bytes).into_owned()))
            }
            CorpusFormat::Gzip => {
                let decoder = MultiGzDecoder::new(File::open(&self.path)?);
                ChunkSource::Lines(Box::new(BufReader::new(decoder)))
            }
            CorpusFormat::Pretagged => {
                ChunkSource::Lines(Box::new(BufReader::new(File::open(&self.path)?)))
            }
        };

        let kind = match self.format {
            CorpusFormat::Pretagged => ChunkKind::Pretagged,
            CorpusFormat::PlainText | CorpusFormat::Gzip => ChunkKind::Text,
        };

        Ok(ChunkReader {
            label,
            kind,
            source,
            line: 0,
            buf: Vec::new(),
        })
    }
}

enum ChunkSource {
    Whole(Option<String>),
    Lines(Box<dyn BufRead>),
}

/// Read one line, replacing malformed UTF-8 instead of failing on it.
/// Returns `None` at end of input.
fn read_lossy_line(reader: &mut dyn BufRead, buf: &mut Vec<u8>) -> io::Result<Option<String>> {
    buf.clear();
    if reader.read_until(b'\n', buf)? == 0 {
        return Ok(None);
    }
    if buf.last() == Some(&b'\n') {
        buf.pop();
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }
    }
    Ok(Some(String::from_utf8_lossy(buf).into_owned()))
}

/// Iterator over the chunks of one corpus file.
pub struct ChunkReader {
    label: String,
    kind: ChunkKind,
    source: ChunkSource,
    line: usize,
    buf: Vec<u8>,
}

impl Iterator for ChunkReader {
    type Item = io::Result<Chunk>;

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.source {
            ChunkSource::Whole(text) => text.take().map(|text| {
                Ok(Chunk {
                    label: self.label.clone(),
                    text,
                    kind: self.kind,
                })
            }),
            ChunkSource::Lines(reader) => {
                let text = match read_lossy_line(reader.as_mut(), &mut self.buf) {
                    Ok(Some(text)) => text,
                    Ok(None) => return None,
                    Err(e) => return Some(Err(e)),
                };
                self.line += 1;
                Some(Ok(Chunk {
                    label: format!("{}:{}", self.label, self.line),
                    text,
                    kind: self.kind,
                }))
            }
        }
    }
}

/// List recognised corpus files directly inside `dir`, sorted by name.
///
/// Subdirectories are not entered. A missing directory is logged and
/// yields no files.
pub fn list_corpus_files(dir: &Path) -> Vec<CorpusFile> {
    if !dir.is_dir() {
        warn!("Corpus directory not found: {}", dir.display());
        return Vec::new();
    }

    let walker = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name();

    let mut files = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Failed to list corpus entry in {}: {e}", dir.display());
                continue;
            }
        };

        let path = entry.path();
        debug!("Found corpus entry: {}", path.display());
        if !path.is_file() {
            continue;
        }
        match CorpusFormat::from_path(path) {
            Some(format) => files.push(CorpusFile {
                path: path.to_path_buf(),
                format,
            }),
            None => debug!("Ignoring {}", path.display()),
        }
    }
    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use tempfile::TempDir;

    fn collect(file: &CorpusFile) -> Vec<Chunk> {
        file.chunks()
            .unwrap()
            .collect::<io::Result<Vec<_>>>()
            .unwrap()
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            CorpusFormat::from_path(Path::new("a/news.txt")),
            Some(CorpusFormat::PlainText)
        );
        assert_eq!(
            CorpusFormat::from_path(Path::new("wiki.gz")),
            Some(CorpusFormat::Gzip)
        );
        assert_eq!(
            CorpusFormat::from_path(Path::new("bnc.parsed")),
            Some(CorpusFormat::Pretagged)
        );
        assert_eq!(CorpusFormat::from_path(Path::new("notes.md")), None);
        assert_eq!(CorpusFormat::from_path(Path::new("README")), None);
    }

    #[test]
    fn test_list_is_flat_and_sorted() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("b.txt"), "b").unwrap();
        std::fs::write(temp_dir.path().join("a.parsed"), "a:DT").unwrap();
        std::fs::write(temp_dir.path().join("c.csv"), "c").unwrap();
        std::fs::create_dir(temp_dir.path().join("nested.txt")).unwrap();
        std::fs::create_dir(temp_dir.path().join("sub")).unwrap();
        std::fs::write(temp_dir.path().join("sub/d.txt"), "d").unwrap();

        let names: Vec<_> = list_corpus_files(temp_dir.path())
            .into_iter()
            .map(|f| f.path.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.parsed", "b.txt"]);
    }

    #[test]
    fn test_missing_directory_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        assert!(list_corpus_files(&temp_dir.path().join("missing")).is_empty());
    }

    #[test]
    fn test_plain_text_is_one_chunk() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("doc.txt");
        std::fs::write(&path, "One line.\nAnother line.\n").unwrap();

        let chunks = collect(&CorpusFile {
            path: path.clone(),
            format: CorpusFormat::PlainText,
        });
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "One line.\nAnother line.\n");
        assert_eq!(chunks[0].kind, ChunkKind::Text);
        assert_eq!(chunks[0].label, path.display().to_string());
    }

    #[test]
    fn test_gzip_yields_line_chunks() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("doc.gz");
        let mut encoder = GzEncoder::new(File::create(&path).unwrap(), Compression::default());
        for i in 1..=5 {
            writeln!(encoder, "Line {i} about a bat.").unwrap();
        }
        encoder.finish().unwrap();

        let chunks = collect(&CorpusFile {
            path: path.clone(),
            format: CorpusFormat::Gzip,
        });
        assert_eq!(chunks.len(), 5);
        assert_eq!(chunks[2].text, "Line 3 about a bat.");
        assert_eq!(chunks[2].label, format!("{}:3", path.display()));
        assert!(chunks.iter().all(|c| c.kind == ChunkKind::Text));
    }

    #[test]
    fn test_pretagged_yields_line_chunks() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("doc.parsed");
        std::fs::write(&path, "The:DT bat:NN\nflew:VBD .:.\n").unwrap();

        let chunks = collect(&CorpusFile {
            path,
            format: CorpusFormat::Pretagged,
        });
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[1].text, "flew:VBD .:.");
        assert_eq!(chunks[1].kind, ChunkKind::Pretagged);
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        let temp_dir = TempDir::new().unwrap();
        let tagged = temp_dir.path().join("doc.parsed");
        std::fs::write(&tagged, b"caf\xe9:NN\r\nbat:NN\n").unwrap();
        let text = temp_dir.path().join("doc.txt");
        std::fs::write(&text, b"a bat\xff flew.").unwrap();

        let chunks = collect(&CorpusFile {
            path: tagged,
            format: CorpusFormat::Pretagged,
        });
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].text, "caf\u{FFFD}:NN");
        assert_eq!(chunks[1].text, "bat:NN");

        let chunks = collect(&CorpusFile {
            path: text,
            format: CorpusFormat::PlainText,
        });
        assert_eq!(chunks[0].text, "a bat\u{FFFD} flew.");
    }

    #[test]
    fn test_corrupt_gzip_reports_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("broken.gz");
        std::fs::write(&path, b"not gzip at all").unwrap();

        let mut chunks = CorpusFile {
            path,
            format: CorpusFormat::Gzip,
        }
        .chunks()
        .unwrap();
        assert!(chunks.next().unwrap().is_err());
    }
}
