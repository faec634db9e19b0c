//! A dictionary handle that can be rebuilt in place.

use std::sync::Arc;

use log::{error, info, warn};
use parking_lot::RwLock;

use crate::analysis::synonym::SynonymDictionary;
use crate::error::Result;
use crate::loader::{BuildReport, SynonymLoader};
use crate::source::client::RuleDocumentSource;
use crate::source::config::RuleSource;

/// Publishes the latest successfully built dictionary.
///
/// Readers take a cheap `Arc` snapshot with [`current`](Self::current) and
/// keep using it even while a reload swaps in a newer one.
pub struct ReloadableSynonyms<S: RuleDocumentSource> {
    loader: SynonymLoader<S>,
    source: RuleSource,
    current: RwLock<Arc<SynonymDictionary>>,
}

impl<S: RuleDocumentSource> ReloadableSynonyms<S> {
    /// Build the initial dictionary. Fails if that build fails.
    pub fn new(loader: SynonymLoader<S>, source: RuleSource) -> Result<Self> {
        let (dictionary, _) = loader.build_with_report(&source).inspect_err(|e| {
            error!("failed to build synonyms from index [{}]: {e}", source.index());
        })?;

        Ok(ReloadableSynonyms {
            loader,
            source,
            current: RwLock::new(Arc::new(dictionary)),
        })
    }

    /// The dictionary currently in effect.
    pub fn current(&self) -> Arc<SynonymDictionary> {
        Arc::clone(&self.current.read())
    }

    /// Rebuild from the source and publish the result.
    ///
    /// On error the previous dictionary stays in effect.
    pub fn reload(&self) -> Result<BuildReport> {
        match self.loader.build_with_report(&self.source) {
            Ok((dictionary, report)) => {
                *self.current.write() = Arc::new(dictionary);
                info!("Reloaded synonyms from index [{}]", self.source.index());
                Ok(report)
            }
            Err(err) => {
                warn!(
                    "Reloading synonyms from index [{}] failed, keeping previous dictionary",
                    self.source.index()
                );
                Err(err)
            }
        }
    }

    pub fn source(&self) -> &RuleSource {
        &self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyzer::StandardAnalyzer;
    use crate::analysis::synonym::TokenSequence;
    use crate::error::SynonymError;
    use crate::source::config::RuleSourceConfig;
    use crate::source::document::RawDocument;
    use parking_lot::Mutex;
    use serde_json::json;

    use crate::source::client::FetchOutcome;

    /// Serves a scripted sequence of outcomes, repeating the last one.
    struct ScriptedSource {
        outcomes: Mutex<Vec<std::result::Result<Vec<&'static str>, &'static str>>>,
    }

    impl RuleDocumentSource for ScriptedSource {
        fn fetch(&self, source: &RuleSource) -> Result<FetchOutcome> {
            let mut outcomes = self.outcomes.lock();
            let next = if outcomes.len() > 1 {
                outcomes.remove(0)
            } else {
                outcomes[0].clone()
            };
            match next {
                Ok(rules) => Ok(FetchOutcome::Documents(vec![
                    RawDocument::from_source(json!({ "rules": rules })).unwrap(),
                ])),
                Err(reason) => Err(SynonymError::remote_fetch(source.index(), reason)),
            }
        }
    }

    fn reloadable(
        outcomes: Vec<std::result::Result<Vec<&'static str>, &'static str>>,
    ) -> Result<ReloadableSynonyms<ScriptedSource>> {
        let loader = SynonymLoader::new(
            ScriptedSource {
                outcomes: Mutex::new(outcomes),
            },
            Arc::new(StandardAnalyzer::new().unwrap()),
        );
        let source = RuleSourceConfig {
            field: Some("rules".to_string()),
            ..RuleSourceConfig::default()
        }
        .validate()
        .unwrap();
        ReloadableSynonyms::new(loader, source)
    }

    #[test]
    fn test_reload_swaps_dictionary() {
        let handle = reloadable(vec![Ok(vec!["foo => bar"]), Ok(vec!["foo => baz"])]).unwrap();

        let before = handle.current();
        assert_eq!(
            before.expansions_for(&TokenSequence::from_phrase("foo"))[0].to_string(),
            "bar"
        );

        handle.reload().unwrap();
        let after = handle.current();
        assert_eq!(
            after.expansions_for(&TokenSequence::from_phrase("foo"))[0].to_string(),
            "baz"
        );
        // Earlier snapshots are unaffected.
        assert_eq!(
            before.expansions_for(&TokenSequence::from_phrase("foo"))[0].to_string(),
            "bar"
        );
    }

    #[test]
    fn test_failed_reload_keeps_previous() {
        let handle = reloadable(vec![Ok(vec!["foo => bar"]), Err("connection refused")]).unwrap();

        assert!(handle.reload().is_err());
        assert_eq!(
            handle
                .current()
                .expansions_for(&TokenSequence::from_phrase("foo"))[0]
                .to_string(),
            "bar"
        );
    }

    #[test]
    fn test_initial_malformed_rule_is_reported_as_such() {
        match reloadable(vec![Ok(vec!["foo => the"])]) {
            Err(err) => assert!(err.is_malformed_rule()),
            Ok(_) => panic!("expected the initial build to fail"),
        }
    }

    #[test]
    fn test_initial_build_failure() {
        let result = reloadable(vec![Err("connection refused")]);
        match result {
            Err(err) => assert!(matches!(err, SynonymError::RemoteFetchFailed { .. })),
            Ok(_) => panic!("expected the initial build to fail"),
        }
    }
}
