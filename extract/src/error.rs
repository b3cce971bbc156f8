//! Error types for training set extraction.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractError>;

/// Errors that can occur while generating a training set.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// A focus restriction word is not a lexicon key.
    #[error("unknown focus word \"{0}\"")]
    UnknownFocusWord(String),

    /// A corpus file could not be opened or decoded.
    #[error("failed to read corpus file {}: {source}", path.display())]
    CorpusFileUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The parser rejected a chunk.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// A per-word output stream could not be created.
    #[error("failed to open output stream {}: {source}", path.display())]
    StreamOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing or flushing a per-word output stream failed.
    #[error("failed to write output stream {}: {source}", path.display())]
    StreamWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to create an output directory.
    #[error("failed to create directory {}: {source}", path.display())]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A lexicon, tag or undesirables resource could not be read.
    #[error("failed to read resource {}: {source}", path.display())]
    ResourceRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A lexicon line could not be turned into an entry.
    #[error("invalid lexicon entry on line {line}: {content:?}")]
    InvalidLexiconEntry { line: usize, content: String },

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// TOML configuration could not be decoded.
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised at the parser boundary for a single chunk.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A pre-tagged token lacks the `:` separating text from tag.
    #[error("malformed pre-tagged token {token:?}")]
    MalformedToken { token: String },

    /// The parser cannot handle this chunk.
    #[error("unsupported input: {0}")]
    Unsupported(String),
}
