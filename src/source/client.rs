//! Fetching rule documents from a document store.

use log::debug;
use reqwest::StatusCode;
use reqwest::blocking::{Client, RequestBuilder};

use crate::error::{Result, SynonymError};
use crate::source::config::RuleSource;
use crate::source::document::{RawDocument, SearchRequest, SearchResponse};

/// Result of a successful fetch.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// Every document matched by the search.
    Documents(Vec<RawDocument>),
    /// The rule index does not exist. Not an error: the build yields an
    /// empty dictionary.
    IndexNotFound,
}

/// A store that can list the rule documents of a [`RuleSource`].
pub trait RuleDocumentSource: Send + Sync {
    fn fetch(&self, source: &RuleSource) -> Result<FetchOutcome>;
}

impl<S: RuleDocumentSource + ?Sized> RuleDocumentSource for Box<S> {
    fn fetch(&self, source: &RuleSource) -> Result<FetchOutcome> {
        (**self).fetch(source)
    }
}

/// Client for an Elasticsearch-compatible REST API.
///
/// Each fetch opens its own HTTP client and drops it before returning, so
/// no connection outlives a build.
#[derive(Debug, Clone, Default)]
pub struct RemoteRuleClient;

impl RemoteRuleClient {
    pub fn new() -> Self {
        RemoteRuleClient
    }

    fn connect(source: &RuleSource) -> Result<Client> {
        Client::builder()
            .timeout(source.timeout())
            .build()
            .map_err(|e| SynonymError::remote_fetch(source.index(), e.to_string()))
    }

    fn authorize(request: RequestBuilder, source: &RuleSource) -> RequestBuilder {
        match source.credentials() {
            Some(credentials) => {
                request.basic_auth(&credentials.username, Some(&credentials.password))
            }
            None => request,
        }
    }

    fn index_exists(client: &Client, source: &RuleSource) -> Result<bool> {
        let url = source.endpoint(&[source.index()])?;
        debug!("HEAD {url}");

        let response = Self::authorize(client.head(url), source)
            .send()
            .map_err(|e| SynonymError::remote_fetch(source.index(), e.to_string()))?;

        match response.status() {
            StatusCode::OK => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            status => Err(SynonymError::remote_fetch(
                source.index(),
                format!("unexpected status {status} checking index existence"),
            )),
        }
    }

    fn search(client: &Client, source: &RuleSource) -> Result<Vec<RawDocument>> {
        let url = source.endpoint(&[source.index(), "_search"])?;
        debug!("POST {url} (size={})", source.max_documents());

        let body = SearchRequest::match_all(source.max_documents(), source.field());
        let response = Self::authorize(client.post(url), source)
            .json(&body)
            .send()
            .map_err(|e| SynonymError::remote_fetch(source.index(), e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().unwrap_or_default();
            return Err(SynonymError::remote_fetch(
                source.index(),
                format!("search returned status {status}: {detail}"),
            ));
        }

        let response: SearchResponse = response.json().map_err(|e| {
            SynonymError::remote_fetch(source.index(), format!("invalid search response: {e}"))
        })?;
        Ok(response.hits.hits)
    }
}

impl RuleDocumentSource for RemoteRuleClient {
    fn fetch(&self, source: &RuleSource) -> Result<FetchOutcome> {
        let client = Self::connect(source)?;

        let outcome = match Self::index_exists(&client, source) {
            Ok(true) => Self::search(&client, source).map(FetchOutcome::Documents),
            Ok(false) => Ok(FetchOutcome::IndexNotFound),
            Err(err) => Err(err),
        };

        drop(client);
        debug!("Closed connection to {}", source.base_url());
        outcome
    }
}

/// In-memory document source for offline builds and tests.
#[derive(Debug, Clone)]
pub struct StaticRuleSource {
    outcome: std::result::Result<Option<Vec<RawDocument>>, String>,
}

impl StaticRuleSource {
    /// A source whose index holds `documents`.
    pub fn new(documents: Vec<RawDocument>) -> Self {
        StaticRuleSource {
            outcome: Ok(Some(documents)),
        }
    }

    /// A source whose index exists but is empty.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// A source whose index does not exist.
    pub fn missing() -> Self {
        StaticRuleSource { outcome: Ok(None) }
    }

    /// A source whose every fetch fails with `reason`.
    pub fn failing<S: Into<String>>(reason: S) -> Self {
        StaticRuleSource {
            outcome: Err(reason.into()),
        }
    }
}

impl RuleDocumentSource for StaticRuleSource {
    fn fetch(&self, source: &RuleSource) -> Result<FetchOutcome> {
        match &self.outcome {
            Ok(Some(documents)) => Ok(FetchOutcome::Documents(documents.clone())),
            Ok(None) => Ok(FetchOutcome::IndexNotFound),
            Err(reason) => Err(SynonymError::remote_fetch(source.index(), reason.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::config::RuleSourceConfig;
    use serde_json::json;

    fn rule_source() -> RuleSource {
        RuleSourceConfig::default().validate().unwrap()
    }

    #[test]
    fn test_static_source_outcomes() {
        let source = rule_source();
        let document = RawDocument::from_source(json!({ "rules": "a, b" })).unwrap();

        let outcome = StaticRuleSource::new(vec![document.clone()])
            .fetch(&source)
            .unwrap();
        assert_eq!(outcome, FetchOutcome::Documents(vec![document]));

        let outcome = StaticRuleSource::missing().fetch(&source).unwrap();
        assert_eq!(outcome, FetchOutcome::IndexNotFound);

        let err = StaticRuleSource::failing("boom").fetch(&source).unwrap_err();
        match err {
            SynonymError::RemoteFetchFailed { index, reason } => {
                assert_eq!(index, ".synonyms");
                assert_eq!(reason, "boom");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_boxed_source() {
        let boxed: Box<dyn RuleDocumentSource> = Box::new(StaticRuleSource::missing());
        assert_eq!(
            boxed.fetch(&rule_source()).unwrap(),
            FetchOutcome::IndexNotFound
        );
    }
}
