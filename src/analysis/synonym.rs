//! Solr-format synonym rules and their compiled form.
//!
//! - [`SolrSynonymParser`] turns rule lines into [`SynonymMapping`]s
//! - [`SynonymMapBuilder`] accumulates mappings
//! - [`SynonymDictionary`] is the immutable, FST-backed result

pub mod builder;
pub mod dictionary;
pub mod parser;
pub mod sequence;

pub use builder::SynonymMapBuilder;
pub use dictionary::{SynonymDictionary, SynonymRule};
pub use parser::{ParseOptions, SolrSynonymParser, is_rule_line};
pub use sequence::{SynonymMapping, TokenSequence};
