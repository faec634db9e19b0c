//! Remote rule sources.
//!
//! A [`RuleSource`] names an index in an Elasticsearch-compatible store. A
//! [`RuleDocumentSource`] fetches its documents and [`extract`] flattens them
//! into rule values for the parser.

pub mod client;
pub mod config;
pub mod document;
pub mod extractor;

pub use client::{FetchOutcome, RemoteRuleClient, RuleDocumentSource, StaticRuleSource};
pub use config::{Credentials, RuleSource, RuleSourceConfig};
pub use document::RawDocument;
pub use extractor::{RuleLines, extract};
