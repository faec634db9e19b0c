//! Accumulates mappings and compiles them into a [`SynonymDictionary`].

use std::collections::BTreeMap;

use ahash::AHashMap;
use fst::{Map, MapBuilder};

use crate::analysis::synonym::dictionary::{SynonymDictionary, SynonymEntry};
use crate::analysis::synonym::sequence::{SynonymMapping, TokenSequence};
use crate::error::{Result, SynonymError};

#[derive(Debug)]
struct PendingEntry {
    input: TokenSequence,
    outputs: Vec<u32>,
    include_original: bool,
}

/// Mutable accumulator for synonym mappings.
///
/// Inputs are grouped by their encoded key. Outputs are interned once and
/// referenced by ordinal, so a phrase used as output by many rules is stored
/// a single time.
///
/// # Examples
///
/// ```
/// use index_synonyms::analysis::synonym::{SynonymMapBuilder, SynonymMapping};
///
/// let mut builder = SynonymMapBuilder::new(true);
/// builder.add(SynonymMapping::new("ipod".into(), "i pod".into(), true));
/// builder.add(SynonymMapping::new("ipod".into(), "i pod".into(), true));
///
/// let dictionary = builder.finish().unwrap();
/// assert_eq!(dictionary.len(), 1);
/// assert_eq!(dictionary.expansions_for(&"ipod".into()).len(), 1);
/// ```
#[derive(Debug)]
pub struct SynonymMapBuilder {
    dedup: bool,
    entries: BTreeMap<Vec<u8>, PendingEntry>,
    words: Vec<TokenSequence>,
    word_ids: AHashMap<TokenSequence, u32>,
    mappings: usize,
    max_input_length: usize,
}

impl SynonymMapBuilder {
    /// Create an empty builder. With `dedup`, repeated (input, output) pairs
    /// are recorded once.
    pub fn new(dedup: bool) -> Self {
        SynonymMapBuilder {
            dedup,
            entries: BTreeMap::new(),
            words: Vec::new(),
            word_ids: AHashMap::new(),
            mappings: 0,
            max_input_length: 0,
        }
    }

    /// Record a mapping. Returns false when it was dropped as a duplicate.
    ///
    /// `include_original` is sticky per input: once any mapping for an input
    /// asks to keep the original, the compiled entry keeps it.
    pub fn add(&mut self, mapping: SynonymMapping) -> bool {
        let SynonymMapping {
            input,
            output,
            include_original,
        } = mapping;

        let ord = self.intern(output);
        self.max_input_length = self.max_input_length.max(input.len());

        let entry = self
            .entries
            .entry(input.to_key())
            .or_insert_with(|| PendingEntry {
                input,
                outputs: Vec::new(),
                include_original: false,
            });
        entry.include_original |= include_original;

        if self.dedup && entry.outputs.contains(&ord) {
            return false;
        }
        entry.outputs.push(ord);
        self.mappings += 1;
        true
    }

    /// Whether duplicate pairs are collapsed.
    pub fn dedup(&self) -> bool {
        self.dedup
    }

    /// Number of mappings recorded so far.
    pub fn mapping_count(&self) -> usize {
        self.mappings
    }

    /// Number of distinct inputs recorded so far.
    pub fn input_count(&self) -> usize {
        self.entries.len()
    }

    fn intern(&mut self, output: TokenSequence) -> u32 {
        if let Some(&ord) = self.word_ids.get(&output) {
            return ord;
        }
        let ord = self.words.len() as u32;
        self.word_ids.insert(output.clone(), ord);
        self.words.push(output);
        ord
    }

    /// Compile the accumulated mappings into an immutable dictionary.
    pub fn finish(self) -> Result<SynonymDictionary> {
        let mut builder = MapBuilder::memory();
        let mut entries = Vec::with_capacity(self.entries.len());

        // BTreeMap iterates in byte order, which is what the FST requires.
        for (key, pending) in self.entries {
            builder
                .insert(&key, entries.len() as u64)
                .map_err(|e| SynonymError::dictionary(format!("FST build error: {e}")))?;
            entries.push(SynonymEntry::new(
                pending.input,
                pending.outputs,
                pending.include_original,
            ));
        }

        let fst_bytes = builder
            .into_inner()
            .map_err(|e| SynonymError::dictionary(format!("FST finalize error: {e}")))?;
        let fst_map = Map::new(fst_bytes)
            .map_err(|e| SynonymError::dictionary(format!("FST creation error: {e}")))?;

        Ok(SynonymDictionary::from_parts(
            fst_map,
            entries,
            self.words,
            self.max_input_length,
        ))
    }
}

impl Default for SynonymMapBuilder {
    fn default() -> Self {
        Self::new(true)
    }
}
