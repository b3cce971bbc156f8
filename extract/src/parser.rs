//! Sentence splitting and part-of-speech tagging.
//!
//! [`NlpParser`] is the seam the extraction engine drives. Free text goes
//! through [`NlpParser::parse`]; lines that are already tagged in the
//! `word:tag word:tag ...` format go through [`NlpParser::parse_pretagged`].
//!
//! [`RuleBasedParser`] is the bundled implementation: Unicode word-boundary
//! tokenisation, terminator-based sentence splitting and a lookup plus
//! word-shape tagger producing Penn Treebank style tags.

use std::collections::HashMap;
use std::path::Path;

use tracing::{debug, info};
use unicode_segmentation::UnicodeSegmentation;

use crate::error::{ExtractError, ParseError};
use crate::token::{Sentence, Token, is_word_text};

/// File name of the optional tag lexicon under the data path.
pub const POS_LEXICON_FILE: &str = "pos-lexicon.tsv";

/// Converts text into tagged sentences.
pub trait NlpParser {
    /// Tokenise and tag free text. An empty result means nothing to tag.
    fn parse(&self, text: &str) -> Result<Vec<Sentence>, ParseError>;

    /// Read one pre-tagged line.
    fn parse_pretagged(&self, line: &str) -> Result<Vec<Sentence>, ParseError> {
        parse_pretagged_line(line)
    }
}

/// Parse a `word:tag word:tag ...` line into a single sentence.
///
/// The last `:` of each token separates text from tag, so `12:30:CD` is the
/// text `12:30` tagged `CD`. A blank line yields no sentences.
pub fn parse_pretagged_line(line: &str) -> Result<Vec<Sentence>, ParseError> {
    let tokens = line
        .split_whitespace()
        .map(|item| {
            item.rsplit_once(':')
                .map(|(text, tag)| Token::word(text, tag))
                .ok_or_else(|| ParseError::MalformedToken {
                    token: item.to_string(),
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    if tokens.is_empty() {
        return Ok(Vec::new());
    }
    Ok(vec![Sentence::new(tokens)])
}

/// Tokens after which a sentence ends.
const TERMINATORS: [&str; 3] = [".", "!", "?"];

/// Bundled tokeniser and tagger.
#[derive(Debug, Clone, Default)]
pub struct RuleBasedParser {
    /// Lower-cased word to tag overrides.
    tags: HashMap<String, String>,
}

impl RuleBasedParser {
    /// Create a parser with only the built-in tagging rules.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a parser, reading `pos-lexicon.tsv` from the data path if present.
    pub fn load(data_path: impl AsRef<Path>) -> crate::Result<Self> {
        let path = data_path.as_ref().join(POS_LEXICON_FILE);
        if !path.is_file() {
            debug!("No tag lexicon at {}, using built-in rules", path.display());
            return Ok(Self::new());
        }

        let content =
            std::fs::read_to_string(&path).map_err(|source| ExtractError::ResourceRead {
                path: path.clone(),
                source,
            })?;
        let parser = Self::with_tag_lexicon(&content);
        info!("Loaded {} tag overrides from {}", parser.tags.len(), path.display());
        Ok(parser)
    }

    /// Create a parser from `word<TAB>TAG` lines.
    pub fn with_tag_lexicon(content: &str) -> Self {
        let tags = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .filter_map(|line| {
                let mut columns = line.split_whitespace();
                let word = columns.next()?;
                let tag = columns.next()?;
                Some((word.to_lowercase(), tag.to_string()))
            })
            .collect();
        Self { tags }
    }

    fn tag(&self, text: &str, sentence_initial: bool) -> String {
        let lower = text.to_lowercase();
        if let Some(tag) = self.tags.get(&lower) {
            return tag.clone();
        }

        if !is_word_text(text) {
            return punctuation_tag(text).to_string();
        }
        if let Some(tag) = closed_class_tag(&lower) {
            return tag.to_string();
        }
        if text
            .chars()
            .all(|c| c.is_numeric() || matches!(c, '.' | ',' | ':'))
        {
            return "CD".to_string();
        }
        if !sentence_initial && text.chars().next().is_some_and(char::is_uppercase) {
            return "NNP".to_string();
        }

        let tag = if lower.ends_with("ly") {
            "RB"
        } else if lower.ends_with("ing") {
            "VBG"
        } else if lower.ends_with("ed") {
            "VBD"
        } else if lower.ends_with('s') && !lower.ends_with("ss") && lower.len() > 3 {
            "NNS"
        } else {
            "NN"
        };
        tag.to_string()
    }
}

impl NlpParser for RuleBasedParser {
    fn parse(&self, text: &str) -> Result<Vec<Sentence>, ParseError> {
        if text.contains('\0') {
            return Err(ParseError::Unsupported("binary content".to_string()));
        }

        let mut sentences: Vec<Vec<Token>> = Vec::new();
        let mut current: Vec<Token> = Vec::new();

        for piece in text.split_word_bounds() {
            if piece.trim().is_empty() {
                continue;
            }

            let terminator = TERMINATORS.contains(&piece);
            if terminator && current.is_empty() {
                // Runs like "..." or "?!" stay with the sentence they close.
                if let Some(last) = sentences.last_mut() {
                    last.push(Token::word(piece, "."));
                    continue;
                }
            }

            let sentence_initial = !current.iter().any(|t| t.is_text);
            let tag = self.tag(piece, sentence_initial);
            current.push(Token::word(piece, tag));

            if terminator {
                sentences.push(std::mem::take(&mut current));
            }
        }

        if !current.is_empty() {
            sentences.push(current);
        }
        Ok(sentences.into_iter().map(Sentence::new).collect())
    }
}

fn punctuation_tag(text: &str) -> &'static str {
    match text {
        "." | "!" | "?" => ".",
        "," => ",",
        ":" | ";" | "-" | "--" | "\u{2013}" | "\u{2014}" => ":",
        "(" | "[" | "{" => "-LRB-",
        ")" | "]" | "}" => "-RRB-",
        "\"" | "'" | "\u{201c}" | "\u{201d}" | "\u{2018}" | "\u{2019}" => "''",
        "$" | "\u{00a3}" | "\u{20ac}" => "$",
        "#" => "#",
        _ => "SYM",
    }
}

fn closed_class_tag(word: &str) -> Option<&'static str> {
    let tag = match word {
        "the" | "a" | "an" | "this" | "that" | "these" | "those" | "each" | "every"
        | "some" | "any" | "no" | "another" => "DT",
        "and" | "or" | "but" | "nor" | "yet" => "CC",
        "of" | "in" | "on" | "at" | "by" | "for" | "with" | "from" | "into" | "about"
        | "over" | "under" | "between" | "through" | "after" | "before" | "during"
        | "without" | "within" | "against" | "among" | "if" | "because" | "while"
        | "than" | "as" | "since" | "until" => "IN",
        "to" => "TO",
        "i" | "you" | "he" | "she" | "it" | "we" | "they" | "me" | "him" | "us" | "them" => {
            "PRP"
        }
        "my" | "your" | "his" | "her" | "its" | "our" | "their" => "PRP$",
        "who" | "what" => "WP",
        "which" => "WDT",
        "when" | "where" | "how" | "why" => "WRB",
        "is" | "has" | "does" => "VBZ",
        "are" | "am" | "have" | "do" => "VBP",
        "was" | "were" | "had" | "did" => "VBD",
        "be" => "VB",
        "been" => "VBN",
        "being" => "VBG",
        "will" | "would" | "shall" | "should" | "may" | "might" | "can" | "could"
        | "must" => "MD",
        "not" | "very" | "also" | "just" | "too" | "never" | "often" => "RB",
        "there" => "EX",
        _ => return None,
    };
    Some(tag)
}
