//! Dictionary build orchestration.
//!
//! ```text
//! fetch ─> extract ─> parse (per rule value) ─> builder ─> SynonymDictionary
//! ```
//!
//! A missing index is reported and yields an empty dictionary. Fetch failures
//! and strict-mode parse failures abort the build.

pub mod listener;
pub mod reloadable;

use std::sync::Arc;

use log::debug;
use serde::Serialize;

use crate::analysis::analyzer::Analyzer;
use crate::analysis::synonym::{
    SolrSynonymParser, SynonymDictionary, SynonymMapBuilder, is_rule_line,
};
use crate::error::Result;
use crate::source::client::{FetchOutcome, RuleDocumentSource};
use crate::source::config::RuleSource;
use crate::source::extractor::extract;

pub use crate::analysis::synonym::ParseOptions;
pub use listener::{BuildListener, LogListener, NoopListener, RecordingListener};
pub use reloadable::ReloadableSynonyms;

/// Counters for one build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuildReport {
    /// Documents returned by the store.
    pub documents: usize,
    /// Rule values read from those documents.
    pub lines_read: usize,
    /// Rule values that produced at least one mapping.
    pub rules_loaded: usize,
    /// Rule values that produced no mapping, usually because lenient
    /// parsing dropped their phrases.
    pub rules_skipped: usize,
    /// Mappings recorded in the dictionary.
    pub mappings: usize,
    /// Distinct input sequences in the dictionary.
    pub input_keys: usize,
}

/// Builds synonym dictionaries from a rule document source.
pub struct SynonymLoader<S: RuleDocumentSource> {
    documents: S,
    analyzer: Arc<dyn Analyzer>,
    listener: Arc<dyn BuildListener>,
}

impl<S: RuleDocumentSource> SynonymLoader<S> {
    /// Create a loader that logs through the `log` facade.
    pub fn new(documents: S, analyzer: Arc<dyn Analyzer>) -> Self {
        SynonymLoader {
            documents,
            analyzer,
            listener: Arc::new(LogListener),
        }
    }

    /// Send build events to `listener` instead.
    pub fn with_listener(mut self, listener: Arc<dyn BuildListener>) -> Self {
        self.listener = listener;
        self
    }

    pub fn analyzer(&self) -> &Arc<dyn Analyzer> {
        &self.analyzer
    }

    /// Build a dictionary from the rules stored at `source`.
    pub fn build(&self, source: &RuleSource) -> Result<SynonymDictionary> {
        self.build_with_report(source).map(|(dictionary, _)| dictionary)
    }

    /// Like [`build`](Self::build), also returning the build counters.
    pub fn build_with_report(
        &self,
        source: &RuleSource,
    ) -> Result<(SynonymDictionary, BuildReport)> {
        let documents = match self.documents.fetch(source) {
            Ok(FetchOutcome::Documents(documents)) => documents,
            Ok(FetchOutcome::IndexNotFound) => {
                self.listener.index_not_found(source.index());
                let dictionary = SynonymMapBuilder::new(source.options().dedup).finish()?;
                return Ok((dictionary, BuildReport::default()));
            }
            Err(err) => {
                self.listener.fetch_failed(source.index(), &err);
                return Err(err);
            }
        };

        let document_count = documents.len();
        debug!(
            "Fetched {document_count} documents from index [{}]",
            source.index()
        );

        let mut lines = extract(documents, source.field());
        let (dictionary, mut report) = self.compile(lines.by_ref(), source.options())?;
        report.documents = document_count;
        report.lines_read = lines.consumed();

        self.listener.rules_loaded(source.index(), &report);
        Ok((dictionary, report))
    }

    /// Parse and compile rule values without fetching.
    ///
    /// A value may hold several rule lines separated by newlines.
    pub fn compile<I>(
        &self,
        values: I,
        options: &ParseOptions,
    ) -> Result<(SynonymDictionary, BuildReport)>
    where
        I: IntoIterator<Item = String>,
    {
        let parser = SolrSynonymParser::new(self.analyzer.as_ref(), *options)
            .with_listener(self.listener.as_ref());
        let mut builder = SynonymMapBuilder::new(options.dedup);
        let mut report = BuildReport::default();

        for value in values {
            report.lines_read += 1;
            if !value.lines().any(is_rule_line) {
                continue;
            }

            let mappings = parser.parse(&value)?;
            if mappings.is_empty() {
                report.rules_skipped += 1;
                continue;
            }
            report.rules_loaded += 1;
            for mapping in mappings {
                builder.add(mapping);
            }
        }

        report.mappings = builder.mapping_count();
        report.input_keys = builder.input_count();
        let dictionary = builder.finish()?;
        Ok((dictionary, report))
    }
}
