//! Tokens and sentences produced by the parser.

use serde::{Deserialize, Serialize};

/// Text of the only token treated as a sentence terminator.
pub const SENTENCE_END: &str = ".";

/// A tagged token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Surface text.
    pub text: String,

    /// Part-of-speech tag.
    pub tag: String,

    /// True for words, false for punctuation and symbols.
    pub is_text: bool,
}

impl Token {
    /// Create a token with an explicit word/punctuation flag.
    pub fn new(text: impl Into<String>, tag: impl Into<String>, is_text: bool) -> Self {
        Self {
            text: text.into(),
            tag: tag.into(),
            is_text,
        }
    }

    /// Create a token, deriving `is_text` from the text itself.
    pub fn word(text: impl Into<String>, tag: impl Into<String>) -> Self {
        let text = text.into();
        let is_text = is_word_text(&text);
        Self::new(text, tag, is_text)
    }

    /// Whether this token ends a sentence, whatever its `is_text` flag says.
    pub fn is_sentence_end(&self) -> bool {
        self.text == SENTENCE_END
    }

    /// Whether the tag marks any kind of noun.
    pub fn is_noun(&self) -> bool {
        self.tag.starts_with("NN")
    }
}

/// A word has at least one alphanumeric character.
pub fn is_word_text(text: &str) -> bool {
    text.chars().any(char::is_alphanumeric)
}

/// An ordered run of tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sentence {
    tokens: Vec<Token>,
}

impl Sentence {
    /// Create a sentence from tokens.
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens }
    }

    /// The tokens in order.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Number of tokens.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Whether the sentence has no tokens.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Serialise to the `word:tag word:tag ...` line format.
    pub fn to_pretagged(&self) -> String {
        self.tokens
            .iter()
            .map(|t| format!("{}:{}", t.text, t.tag))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_token_flags() {
        assert!(Token::word("bat", "NN").is_text);
        assert!(Token::word("3.5", "CD").is_text);
        assert!(!Token::word(",", ",").is_text);
        assert!(Token::word("bats", "NNS").is_noun());
        assert!(!Token::word("flew", "VBD").is_noun());
    }

    #[test]
    fn test_period_ends_sentence_even_if_flagged_text() {
        let token = Token::new(".", ".", true);
        assert!(token.is_sentence_end());
        assert!(!Token::word("!", ".").is_sentence_end());
    }

    #[test]
    fn test_to_pretagged() {
        let sentence = Sentence::new(vec![
            Token::word("The", "DT"),
            Token::word("bat", "NN"),
            Token::word(".", "."),
        ]);
        assert_eq!(sentence.to_pretagged(), "The:DT bat:NN .:.");
    }
}
