//! Compiled synonym dictionary.
//!
//! Uses FST (Finite State Transducer) for memory-efficient storage and fast
//! lookup. Keys are encoded input sequences; each FST value indexes an entry
//! holding the ordinals of its output sequences.

use std::fmt;
use std::sync::Arc;

use fst::{Map, Streamer};
use serde::Serialize;

use crate::analysis::synonym::builder::SynonymMapBuilder;
use crate::analysis::synonym::sequence::TokenSequence;
use crate::error::Result;

/// Compiled rewrites for one input sequence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SynonymEntry {
    input: TokenSequence,
    outputs: Vec<u32>,
    include_original: bool,
}

impl SynonymEntry {
    pub(crate) fn new(input: TokenSequence, outputs: Vec<u32>, include_original: bool) -> Self {
        SynonymEntry {
            input,
            outputs,
            include_original,
        }
    }
}

/// Borrowed view of one dictionary entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SynonymRule<'a> {
    pub input: &'a TokenSequence,
    pub outputs: Vec<&'a TokenSequence>,
    pub include_original: bool,
}

/// Immutable, queryable synonym map.
///
/// Cloning is cheap: all tables are shared behind `Arc`, so one compiled
/// dictionary can be handed to any number of reader threads.
#[derive(Clone)]
pub struct SynonymDictionary {
    /// FST map: encoded input -> index into `entries`
    fst_map: Arc<Map<Vec<u8>>>,
    entries: Arc<Vec<SynonymEntry>>,
    /// Interned output sequences referenced by entry ordinals
    words: Arc<Vec<TokenSequence>>,
    max_input_length: usize,
}

impl SynonymDictionary {
    pub(crate) fn from_parts(
        fst_map: Map<Vec<u8>>,
        entries: Vec<SynonymEntry>,
        words: Vec<TokenSequence>,
        max_input_length: usize,
    ) -> Self {
        SynonymDictionary {
            fst_map: Arc::new(fst_map),
            entries: Arc::new(entries),
            words: Arc::new(words),
            max_input_length,
        }
    }

    /// A dictionary with no entries.
    pub fn empty() -> Result<Self> {
        SynonymMapBuilder::new(true).finish()
    }

    fn entry(&self, input: &TokenSequence) -> Option<&SynonymEntry> {
        let index = self.fst_map.get(input.to_key())? as usize;
        self.entries.get(index)
    }

    /// Output sequences recorded for `input`, in insertion order.
    ///
    /// Returns an empty list when the input has no rules.
    pub fn expansions_for(&self, input: &TokenSequence) -> Vec<&TokenSequence> {
        match self.entry(input) {
            Some(entry) => self.resolve(&entry.outputs),
            None => Vec::new(),
        }
    }

    /// Whether matches of `input` keep the original tokens.
    pub fn include_original(&self, input: &TokenSequence) -> bool {
        self.entry(input).is_some_and(|entry| entry.include_original)
    }

    /// Whether `input` has any rules.
    pub fn contains(&self, input: &TokenSequence) -> bool {
        self.fst_map.contains_key(input.to_key())
    }

    /// Number of distinct input sequences.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the dictionary holds no rules.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of distinct output sequences.
    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    /// Longest input sequence, in tokens. Zero for an empty dictionary.
    pub fn max_input_length(&self) -> usize {
        self.max_input_length
    }

    /// Size of the serialized FST in bytes.
    pub fn fst_size(&self) -> usize {
        self.fst_map.as_fst().size()
    }

    /// All entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = SynonymRule<'_>> + '_ {
        self.entries.iter().map(|entry| SynonymRule {
            input: &entry.input,
            outputs: self.resolve(&entry.outputs),
            include_original: entry.include_original,
        })
    }

    /// Input sequences in key order, decoded from the FST itself.
    pub fn inputs(&self) -> Result<Vec<TokenSequence>> {
        let mut inputs = Vec::with_capacity(self.entries.len());
        let mut stream = self.fst_map.stream();
        while let Some((key, _)) = stream.next() {
            inputs.push(TokenSequence::from_key(key)?);
        }
        Ok(inputs)
    }

    fn resolve(&self, ords: &[u32]) -> Vec<&TokenSequence> {
        ords.iter()
            .filter_map(|&ord| self.words.get(ord as usize))
            .collect()
    }
}

impl PartialEq for SynonymDictionary {
    fn eq(&self, other: &Self) -> bool {
        self.fst_map.as_fst().as_bytes() == other.fst_map.as_fst().as_bytes()
            && self.entries == other.entries
            && self.words == other.words
            && self.max_input_length == other.max_input_length
    }
}

impl Eq for SynonymDictionary {}

impl fmt::Debug for SynonymDictionary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SynonymDictionary")
            .field("inputs", &self.entries.len())
            .field("words", &self.words.len())
            .field("max_input_length", &self.max_input_length)
            .field("fst_bytes", &self.fst_size())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::synonym::sequence::SynonymMapping;

    fn dictionary(pairs: &[(&str, &str, bool)]) -> SynonymDictionary {
        let mut builder = SynonymMapBuilder::new(true);
        for (input, output, include_original) in pairs {
            builder.add(SynonymMapping::new(
                (*input).into(),
                (*output).into(),
                *include_original,
            ));
        }
        builder.finish().unwrap()
    }

    #[test]
    fn test_empty_dictionary() {
        let dictionary = SynonymDictionary::empty().unwrap();
        assert!(dictionary.is_empty());
        assert_eq!(dictionary.len(), 0);
        assert_eq!(dictionary.word_count(), 0);
        assert_eq!(dictionary.max_input_length(), 0);
        assert!(dictionary.expansions_for(&"anything".into()).is_empty());
        assert!(!dictionary.include_original(&"anything".into()));
    }

    #[test]
    fn test_multi_word_lookup() {
        let dictionary = dictionary(&[("i pod", "ipod", true), ("ipod", "i pod", true)]);

        let expansions = dictionary.expansions_for(&"i pod".into());
        assert_eq!(expansions, vec![&TokenSequence::from_phrase("ipod")]);
        assert!(dictionary.contains(&"ipod".into()));
        assert!(!dictionary.contains(&"i".into()));
        assert!(!dictionary.contains(&"pod".into()));
    }

    #[test]
    fn test_iter_in_key_order() {
        let dictionary = dictionary(&[("zebra", "horse", false), ("apple", "fruit", true)]);

        let rules: Vec<_> = dictionary.iter().collect();
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].input.to_string(), "apple");
        assert!(rules[0].include_original);
        assert_eq!(rules[1].input.to_string(), "zebra");
        assert_eq!(rules[1].outputs[0].to_string(), "horse");

        let inputs = dictionary.inputs().unwrap();
        assert_eq!(
            inputs,
            vec![TokenSequence::from_phrase("apple"), TokenSequence::from_phrase("zebra")]
        );
    }

    #[test]
    fn test_structural_equality() {
        let first = dictionary(&[("a", "b", true), ("b", "a", true)]);
        let second = dictionary(&[("a", "b", true), ("b", "a", true)]);
        let different = dictionary(&[("a", "b", false), ("b", "a", true)]);

        assert_eq!(first, second);
        assert_ne!(first, different);
    }
}
