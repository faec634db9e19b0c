//! Stop filter implementation.
//!
//! Removes stop words from the stream. The number of removed tokens is added
//! to the position increment of the next surviving token, so downstream
//! consumers can tell that a gap exists.
//!
//! ```
//! use index_synonyms::analysis::token_filter::Filter;
//! use index_synonyms::analysis::token_filter::stop::StopFilter;
//! use index_synonyms::analysis::token::Token;
//!
//! let filter = StopFilter::new();
//! let tokens = vec![Token::new("the", 0), Token::new("ipod", 1)];
//!
//! let result: Vec<_> = filter.filter(Box::new(tokens.into_iter()))
//!     .unwrap()
//!     .collect();
//!
//! assert_eq!(result.len(), 1);
//! assert_eq!(result[0].text, "ipod");
//! assert_eq!(result[0].position_increment, 2);
//! ```

use std::sync::{Arc, LazyLock};

use ahash::AHashSet;

use crate::analysis::token::{Token, TokenStream};
use crate::analysis::token_filter::Filter;
use crate::error::Result;

/// Default English stop words list.
const DEFAULT_ENGLISH_STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "but", "by", "for", "if", "in", "into", "is", "it",
    "no", "not", "of", "on", "or", "such", "that", "the", "their", "then", "there", "these",
    "they", "this", "to", "was", "will", "with",
];

/// Default English stop words as a set.
pub static DEFAULT_ENGLISH_STOP_WORDS_SET: LazyLock<Arc<AHashSet<String>>> = LazyLock::new(|| {
    Arc::new(
        DEFAULT_ENGLISH_STOP_WORDS
            .iter()
            .map(|&s| s.to_string())
            .collect(),
    )
});

/// A filter that removes stop words from the token stream.
#[derive(Clone, Debug)]
pub struct StopFilter {
    stop_words: Arc<AHashSet<String>>,
}

impl StopFilter {
    /// Create a new stop filter with the default English stop words.
    pub fn new() -> Self {
        StopFilter {
            stop_words: Arc::clone(&DEFAULT_ENGLISH_STOP_WORDS_SET),
        }
    }

    /// Create a stop filter from a custom word list.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        StopFilter {
            stop_words: Arc::new(words.into_iter().map(Into::into).collect()),
        }
    }

    /// Check whether a word is in the stop list.
    pub fn is_stop_word(&self, word: &str) -> bool {
        self.stop_words.contains(word)
    }

    /// Get the number of stop words.
    pub fn len(&self) -> usize {
        self.stop_words.len()
    }

    /// Check if the stop list is empty.
    pub fn is_empty(&self) -> bool {
        self.stop_words.is_empty()
    }
}

impl Default for StopFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl Filter for StopFilter {
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream> {
        let mut kept: Vec<Token> = Vec::new();
        let mut skipped = 0;

        for token in tokens {
            if self.is_stop_word(&token.text) {
                skipped += token.position_increment;
                continue;
            }
            let increment = token.position_increment + skipped;
            skipped = 0;
            kept.push(token.with_position_increment(increment));
        }

        Ok(Box::new(kept.into_iter()))
    }

    fn name(&self) -> &'static str {
        "stop"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(filter: &StopFilter, words: &[&str]) -> Vec<Token> {
        let tokens: Vec<Token> = words
            .iter()
            .enumerate()
            .map(|(i, w)| Token::new(*w, i))
            .collect();
        filter.filter(Box::new(tokens.into_iter())).unwrap().collect()
    }

    #[test]
    fn test_stop_filter_records_gaps() {
        let filter = StopFilter::new();
        let result = run(&filter, &["wifi", "and", "the", "bluetooth"]);

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].text, "wifi");
        assert_eq!(result[0].position_increment, 1);
        assert_eq!(result[1].text, "bluetooth");
        assert_eq!(result[1].position_increment, 3);
    }

    #[test]
    fn test_stop_filter_all_removed() {
        let filter = StopFilter::new();
        assert!(run(&filter, &["the", "a"]).is_empty());
    }

    #[test]
    fn test_custom_stop_words() {
        let filter = StopFilter::from_words(vec!["foo"]);
        assert!(filter.is_stop_word("foo"));
        assert!(!filter.is_stop_word("the"));
        assert_eq!(filter.len(), 1);

        let result = run(&filter, &["the", "foo"]);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].text, "the");
    }
}
