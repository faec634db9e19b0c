//! # index-synonyms
//!
//! Builds Solr-format synonym dictionaries from rules stored as documents in a
//! remote search index.
//!
//! ## Pipeline
//!
//! ```text
//! RuleSource ─> client::fetch ─> extractor::RuleLines ─> SolrSynonymParser ─> SynonymMapBuilder
//!                                                                                   │
//!                                                     SynonymDictionary <── finish ─┘
//! ```
//!
//! - Remote rules are fetched once per build over a one-shot HTTP client
//! - A missing rule index yields an empty dictionary rather than an error
//! - Lenient mode drops malformed phrases and keeps the rest of the rules
//! - The compiled dictionary is immutable and can be shared across threads
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use index_synonyms::analysis::analyzer::StandardAnalyzer;
//! use index_synonyms::analysis::synonym::TokenSequence;
//! use index_synonyms::loader::{ParseOptions, SynonymLoader};
//! use index_synonyms::source::StaticRuleSource;
//!
//! let loader = SynonymLoader::new(
//!     StaticRuleSource::empty(),
//!     Arc::new(StandardAnalyzer::new().unwrap()),
//! );
//! let lines = vec!["ipod, i-pod".to_string(), "foo => bar".to_string()];
//! let (dictionary, report) = loader.compile(lines, &ParseOptions::default()).unwrap();
//!
//! assert_eq!(report.rules_loaded, 2);
//! let expansions = dictionary.expansions_for(&TokenSequence::from_phrase("foo"));
//! assert_eq!(expansions[0].to_string(), "bar");
//! ```

pub mod analysis;
pub mod cli;
pub mod error;
pub mod loader;
pub mod source;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
