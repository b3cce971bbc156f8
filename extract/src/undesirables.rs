//! Tokens that never appear in an emitted context.

use std::collections::HashSet;
use std::path::Path;

use tracing::{debug, info};

use crate::error::{ExtractError, Result};

/// File name of the optional extra word list under the data path.
pub const UNDESIRABLES_FILE: &str = "undesirables.txt";

/// Decides whether a lower-cased token is excluded from contexts.
pub trait UndesirableFilter {
    /// True if the token must not be emitted.
    fn is_undesirable(&self, lowercased: &str) -> bool;
}

/// Exact membership: the set holds the excluded words.
impl UndesirableFilter for HashSet<String> {
    fn is_undesirable(&self, lowercased: &str) -> bool {
        self.contains(lowercased)
    }
}

/// Built-in filter: English function words plus anything without a letter
/// or digit.
#[derive(Debug, Clone)]
pub struct Undesirables {
    words: HashSet<String>,
}

impl Undesirables {
    /// Create the filter with the built-in word list.
    pub fn new() -> Self {
        Self {
            words: STOP_WORDS.iter().map(|w| (*w).to_string()).collect(),
        }
    }

    /// Create the filter and add words from `undesirables.txt` if present.
    pub fn load(data_path: impl AsRef<Path>) -> Result<Self> {
        let mut filter = Self::new();
        let path = data_path.as_ref().join(UNDESIRABLES_FILE);
        if !path.is_file() {
            debug!("No extra undesirables at {}", path.display());
            return Ok(filter);
        }

        let content =
            std::fs::read_to_string(&path).map_err(|source| ExtractError::ResourceRead {
                path: path.clone(),
                source,
            })?;
        let before = filter.len();
        filter.extend(
            content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#')),
        );
        info!(
            "Loaded {} extra undesirable words from {}",
            filter.len() - before,
            path.display()
        );
        Ok(filter)
    }

    /// Add words to the filter.
    pub fn extend<I, S>(&mut self, words: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.words
            .extend(words.into_iter().map(|w| w.as_ref().to_lowercase()));
    }

    /// Number of listed words.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Whether no words are listed.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl Default for Undesirables {
    fn default() -> Self {
        Self::new()
    }
}

impl UndesirableFilter for Undesirables {
    fn is_undesirable(&self, lowercased: &str) -> bool {
        !lowercased.chars().any(char::is_alphanumeric) || self.words.contains(lowercased)
    }
}

const STOP_WORDS: &[&str] = &[
    // articles & determiners
    "the", "a", "an", "this", "that", "these", "those",
    // be-verbs
    "is", "are", "was", "were", "be", "been", "being", "am",
    // auxiliaries
    "have", "has", "had", "do", "does", "did",
    // modals
    "will", "would", "shall", "should", "may", "might", "can", "could", "must",
    // prepositions
    "to", "of", "in", "for", "on", "with", "at", "by", "from", "into", "about",
    // conjunctions & negation
    "and", "or", "but", "not", "no", "if", "then", "than", "so", "as",
    // pronouns
    "i", "you", "he", "she", "it", "we", "they", "me", "him", "her", "us", "them",
    "my", "your", "his", "our", "their", "its",
    // interrogatives
    "who", "what", "which", "when", "where", "how", "why",
    // contraction fragments
    "'s", "n't", "'re", "'ll", "'ve", "'d", "'m",
];
