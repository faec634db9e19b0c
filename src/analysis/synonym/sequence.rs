//! Analysed phrases and the mappings between them.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SynonymError};

/// Separator between tokens inside a dictionary key.
///
/// Analysed tokens never contain it, and it sorts below every other byte, so
/// byte order of keys matches token-wise order of sequences.
pub const WORD_SEPARATOR: char = '\u{0}';

/// An ordered list of analysed tokens produced from one rule phrase.
///
/// # Examples
///
/// ```
/// use index_synonyms::analysis::synonym::TokenSequence;
///
/// let seq = TokenSequence::from_phrase("i  pod");
/// assert_eq!(seq.len(), 2);
/// assert_eq!(seq.to_string(), "i pod");
/// assert_eq!(TokenSequence::from_key(&seq.to_key()).unwrap(), seq);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenSequence {
    tokens: Vec<String>,
}

impl TokenSequence {
    /// Create a sequence from already analysed tokens.
    pub fn new(tokens: Vec<String>) -> Self {
        TokenSequence { tokens }
    }

    /// Split a phrase on whitespace without further analysis.
    ///
    /// Intended for lookups where the caller already holds analysed text.
    pub fn from_phrase(phrase: &str) -> Self {
        TokenSequence {
            tokens: phrase.split_whitespace().map(str::to_string).collect(),
        }
    }

    /// Decode a dictionary key produced by [`to_key`](Self::to_key).
    pub fn from_key(key: &[u8]) -> Result<Self> {
        let text = std::str::from_utf8(key)
            .map_err(|e| SynonymError::dictionary(format!("Invalid key encoding: {e}")))?;
        if text.is_empty() {
            return Ok(TokenSequence::default());
        }
        Ok(TokenSequence {
            tokens: text.split(WORD_SEPARATOR).map(str::to_string).collect(),
        })
    }

    /// Encode this sequence as a dictionary key.
    pub fn to_key(&self) -> Vec<u8> {
        let mut key = Vec::with_capacity(self.tokens.iter().map(|t| t.len() + 1).sum());
        for (i, token) in self.tokens.iter().enumerate() {
            if i > 0 {
                key.push(WORD_SEPARATOR as u8);
            }
            key.extend_from_slice(token.as_bytes());
        }
        key
    }

    /// The tokens of this sequence.
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Number of tokens.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Whether the sequence holds no tokens.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl fmt::Display for TokenSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tokens.join(" "))
    }
}

impl From<Vec<String>> for TokenSequence {
    fn from(tokens: Vec<String>) -> Self {
        TokenSequence::new(tokens)
    }
}

impl From<&str> for TokenSequence {
    fn from(phrase: &str) -> Self {
        TokenSequence::from_phrase(phrase)
    }
}

/// One directed rewrite produced by a rule line.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SynonymMapping {
    /// Sequence matched in the token stream.
    pub input: TokenSequence,
    /// Sequence emitted for the match.
    pub output: TokenSequence,
    /// Whether the matched tokens are kept alongside the output.
    pub include_original: bool,
}

impl SynonymMapping {
    /// Create a new mapping.
    pub fn new(input: TokenSequence, output: TokenSequence, include_original: bool) -> Self {
        SynonymMapping {
            input,
            output,
            include_original,
        }
    }
}

impl fmt::Display for SynonymMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} => {}", self.input, self.output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_ordering_matches_sequence_ordering() {
        let shorter = TokenSequence::from_phrase("a b");
        let longer = TokenSequence::from_phrase("ab");

        assert!(shorter < longer);
        assert!(shorter.to_key() < longer.to_key());

        let prefix = TokenSequence::from_phrase("a");
        assert!(prefix < shorter);
        assert!(prefix.to_key() < shorter.to_key());
    }

    #[test]
    fn test_empty_sequence_key() {
        let empty = TokenSequence::default();
        assert!(empty.to_key().is_empty());
        assert!(TokenSequence::from_key(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_key() {
        let result = TokenSequence::from_key(&[0xff, 0xfe]);
        assert!(matches!(result, Err(SynonymError::Dictionary(_))));
    }

    #[test]
    fn test_mapping_display() {
        let mapping = SynonymMapping::new("foo".into(), "bar baz".into(), false);
        assert_eq!(mapping.to_string(), "foo => bar baz");
    }
}
