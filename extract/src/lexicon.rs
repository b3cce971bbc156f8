//! The ambiguous-noun lexicon.
//!
//! Every entry is reachable under its singular key and, when it has one,
//! its plural key. Output files are always keyed by the singular.

use std::collections::HashMap;
use std::path::Path;

use tracing::{info, warn};

use crate::error::{ExtractError, Result};

/// File name of the lexicon under the data path.
pub const LEXICON_FILE: &str = "ambiguous-nouns.txt";

/// A lexicon entry: a noun with several senses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmbiguousEntry {
    /// Canonical, lower-cased singular form.
    pub singular: String,

    /// Lower-cased plural form, if the noun has one.
    pub plural: Option<String>,
}

impl AmbiguousEntry {
    /// Create an entry. Both forms are lower-cased.
    pub fn new(singular: impl Into<String>, plural: Option<&str>) -> Self {
        Self {
            singular: singular.into().to_lowercase(),
            plural: plural.map(str::to_lowercase),
        }
    }

    /// Whether the plural exists and differs from the singular.
    pub fn has_distinct_plural(&self) -> bool {
        self.plural.as_deref().is_some_and(|p| p != self.singular)
    }
}

/// Mapping from lower-cased surface form to its entry.
#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    entries: Vec<AmbiguousEntry>,
    index: HashMap<String, usize>,
}

impl Lexicon {
    /// Build a lexicon from entries. The first entry claiming a key wins.
    pub fn from_entries(entries: impl IntoIterator<Item = AmbiguousEntry>) -> Self {
        let mut lexicon = Self::default();
        for entry in entries {
            lexicon.insert(entry);
        }
        lexicon
    }

    /// Load `ambiguous-nouns.txt` from the data path.
    pub fn load(data_path: impl AsRef<Path>) -> Result<Self> {
        let path = data_path.as_ref().join(LEXICON_FILE);
        let content =
            std::fs::read_to_string(&path).map_err(|source| ExtractError::ResourceRead {
                path: path.clone(),
                source,
            })?;
        let lexicon = Self::parse(&content);
        info!("Loaded {} ambiguous nouns from {}", lexicon.entries.len(), path.display());
        Ok(lexicon)
    }

    /// Parse the lexicon text format.
    ///
    /// One entry per line: `singular [plural] [ignored...]`. A plural of
    /// `-` means the noun has none. Blank lines and `#` comments are skipped.
    /// Lines naming a word that cannot be a file name are logged and skipped.
    pub fn parse(content: &str) -> Self {
        let mut lexicon = Self::default();

        for (number, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let mut columns = line.split_whitespace();
            let Some(singular) = columns.next() else {
                continue;
            };
            let plural = columns.next().filter(|p| *p != "-");
            if !is_valid_word(singular) || plural.is_some_and(|p| !is_valid_word(p)) {
                let err = ExtractError::InvalidLexiconEntry {
                    line: number + 1,
                    content: line.to_string(),
                };
                warn!("Skipping {err}");
                continue;
            }

            lexicon.insert(AmbiguousEntry::new(singular, plural));
        }

        lexicon
    }

    fn insert(&mut self, entry: AmbiguousEntry) {
        let position = self.entries.len();
        let mut claimed = false;

        let plural = entry.plural.clone().filter(|p| *p != entry.singular);
        let keys = std::iter::once(entry.singular.clone()).chain(plural);
        for key in keys {
            if self.index.contains_key(&key) {
                warn!("Duplicate lexicon key \"{key}\", keeping the first entry");
                continue;
            }
            self.index.insert(key, position);
            claimed = true;
        }

        if claimed {
            self.entries.push(entry);
        }
    }

    /// Look up the entry for a lower-cased word.
    pub fn get(&self, word: &str) -> Option<&AmbiguousEntry> {
        self.index.get(word).map(|&i| &self.entries[i])
    }

    /// Whether the lower-cased word is a key.
    pub fn contains(&self, word: &str) -> bool {
        self.index.contains_key(word)
    }

    /// All keys (singulars and plurals).
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.index.keys().map(String::as_str)
    }

    /// The output key for a lower-cased word: plurals map to their singular.
    pub fn canonical<'a>(&'a self, word: &'a str) -> Option<&'a str> {
        let entry = self.get(word)?;
        if entry.plural.as_deref() == Some(word) {
            Some(entry.singular.as_str())
        } else {
            Some(word)
        }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the lexicon has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Words become file names, so path syntax is rejected.
fn is_valid_word(word: &str) -> bool {
    !word.is_empty() && word != "." && word != ".." && !word.contains(['/', '\\'])
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_lexicon() {
        let lexicon = Lexicon::parse(
            "# noun plural senses\n\
             bat bats 2\n\
             Mouse mice\n\
             \n\
             sheep sheep\n\
             music -\n",
        );

        assert_eq!(lexicon.len(), 4);
        assert!(lexicon.contains("bats"));
        assert!(lexicon.contains("mouse"));
        assert!(lexicon.contains("mice"));
        assert!(!lexicon.contains("Mouse"));
        assert_eq!(lexicon.get("music").unwrap().plural, None);
        assert_eq!(lexicon.get("sheep").unwrap().plural.as_deref(), Some("sheep"));
        assert!(!lexicon.get("sheep").unwrap().has_distinct_plural());
    }

    #[test]
    fn test_canonical_maps_plural_to_singular() {
        let lexicon = Lexicon::from_entries([
            AmbiguousEntry::new("mouse", Some("mice")),
            AmbiguousEntry::new("sheep", Some("sheep")),
        ]);

        assert_eq!(lexicon.canonical("mice"), Some("mouse"));
        assert_eq!(lexicon.canonical("mouse"), Some("mouse"));
        assert_eq!(lexicon.canonical("sheep"), Some("sheep"));
        assert_eq!(lexicon.canonical("cat"), None);
    }

    #[test]
    fn test_duplicate_keys_keep_first() {
        let lexicon = Lexicon::from_entries([
            AmbiguousEntry::new("bass", Some("basses")),
            AmbiguousEntry::new("bass", None),
        ]);

        assert_eq!(lexicon.len(), 1);
        assert_eq!(lexicon.get("bass").unwrap().plural.as_deref(), Some("basses"));
    }

    #[test]
    fn test_path_like_lines_are_skipped() {
        let lexicon = Lexicon::parse("bat bats\n../etc\ncat ca/ts\nmouse mice\n");

        assert_eq!(lexicon.len(), 2);
        assert!(lexicon.contains("bat"));
        assert!(lexicon.contains("mice"));
        assert!(!lexicon.contains("../etc"));
        assert!(!lexicon.contains("cat"));
    }
}
