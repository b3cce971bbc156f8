//! Resumption planning.
//!
//! Extraction over a large corpus is slow, so a rerun skips every word whose
//! training set file already exists. A plural and its singular share one
//! file and are skipped together.

use std::collections::HashSet;
use std::path::PathBuf;

use tracing::{debug, info};

use crate::error::{ExtractError, Result};
use crate::lexicon::Lexicon;
use crate::output::training_set_path;

/// Lower-cased focus words active for a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FocusSet {
    words: HashSet<String>,
}

impl FocusSet {
    /// Whether the lower-cased word is a focus word.
    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    /// Number of focus words.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Whether nothing is left to extract.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Focus words, sorted.
    pub fn sorted(&self) -> Vec<&str> {
        let mut words: Vec<&str> = self.words.iter().map(String::as_str).collect();
        words.sort_unstable();
        words
    }
}

impl FromIterator<String> for FocusSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            words: iter.into_iter().collect(),
        }
    }
}

/// Computes the focus set for a run.
pub struct ResumptionPlanner<'a> {
    lexicon: &'a Lexicon,
    unlabelled_dir: PathBuf,
}

impl<'a> ResumptionPlanner<'a> {
    /// Create a planner checking for finished files in `unlabelled_dir`.
    pub fn new(lexicon: &'a Lexicon, unlabelled_dir: impl Into<PathBuf>) -> Self {
        Self {
            lexicon,
            unlabelled_dir: unlabelled_dir.into(),
        }
    }

    /// Resolve the restriction list against the lexicon without touching disk.
    ///
    /// An empty restriction selects every lexicon key.
    pub fn candidates<S: AsRef<str>>(&self, restriction: &[S]) -> Result<FocusSet> {
        if restriction.is_empty() {
            return Ok(self.lexicon.keys().map(str::to_string).collect());
        }

        restriction
            .iter()
            .map(|word| {
                let word = word.as_ref().to_lowercase();
                if self.lexicon.contains(&word) {
                    Ok(word)
                } else {
                    Err(ExtractError::UnknownFocusWord(word))
                }
            })
            .collect()
    }

    /// Resolve the restriction list and drop words already extracted.
    pub fn plan<S: AsRef<str>>(&self, restriction: &[S]) -> Result<FocusSet> {
        let mut focus = self.candidates(restriction)?;
        let before = focus.len();

        let mut finished: Vec<String> = Vec::new();
        for word in &focus.words {
            let Some(entry) = self.lexicon.get(word) else {
                continue;
            };
            let canonical = self.lexicon.canonical(word).unwrap_or(word);
            if !self.is_finished(canonical) {
                continue;
            }

            debug!("Training set for \"{canonical}\" already exists, skipping \"{word}\"");
            finished.push(word.clone());
            finished.push(canonical.to_string());
            if entry.has_distinct_plural() {
                finished.extend(entry.plural.clone());
            }
        }
        for word in &finished {
            focus.words.remove(word);
        }

        if focus.len() < before {
            info!(
                "Skipping {} already processed focus words, {} remain",
                before - focus.len(),
                focus.len()
            );
        }
        Ok(focus)
    }

    fn is_finished(&self, canonical: &str) -> bool {
        training_set_path(&self.unlabelled_dir, canonical).exists()
    }
}
