//! Wire types for the remote document store.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Result, SynonymError};

/// One matched record as returned by a search.
///
/// `source` is the stored document body; `fields` holds values the search
/// requested explicitly, which the store always returns as arrays.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawDocument {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(rename = "_source", default)]
    pub source: Map<String, Value>,

    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub fields: Map<String, Value>,
}

impl RawDocument {
    /// Build a document from a JSON object body.
    pub fn from_source(source: Value) -> Result<Self> {
        match source {
            Value::Object(source) => Ok(RawDocument {
                source,
                ..RawDocument::default()
            }),
            other => Err(SynonymError::other(format!(
                "Document source must be a JSON object, got: {other}"
            ))),
        }
    }

    /// Set the document id.
    pub fn with_id<S: Into<String>>(mut self, id: S) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Value of `field`, preferring the query-time `fields` entry.
    pub fn field_value(&self, field: &str) -> Option<&Value> {
        self.fields.get(field).or_else(|| self.source.get(field))
    }
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct SearchRequest<'a> {
    pub size: usize,
    pub query: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<[&'a str; 1]>,
}

impl<'a> SearchRequest<'a> {
    pub fn match_all(size: usize, field: Option<&'a str>) -> Self {
        SearchRequest {
            size,
            query: serde_json::json!({ "match_all": {} }),
            fields: field.map(|field| [field]),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct SearchResponse {
    #[serde(default)]
    pub hits: SearchHits,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct SearchHits {
    #[serde(default)]
    pub hits: Vec<RawDocument>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_search_response() {
        let body = json!({
            "took": 1,
            "hits": {
                "total": { "value": 2, "relation": "eq" },
                "hits": [
                    { "_id": "1", "_source": { "rules": ["a, b"] } },
                    { "_id": "2", "_source": { "rules": "c => d" }, "fields": { "rules": ["c => d"] } }
                ]
            }
        });

        let response: SearchResponse = serde_json::from_value(body).unwrap();
        let hits = response.hits.hits;
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].id.as_deref(), Some("1"));
        assert_eq!(hits[1].field_value("rules"), Some(&json!(["c => d"])));
    }

    #[test]
    fn test_missing_source_defaults_to_empty() {
        let document: RawDocument = serde_json::from_value(json!({ "_id": "x" })).unwrap();
        assert!(document.source.is_empty());
        assert!(document.field_value("rules").is_none());
    }

    #[test]
    fn test_search_request_body() {
        let body = serde_json::to_value(SearchRequest::match_all(10, Some("rules"))).unwrap();
        assert_eq!(
            body,
            json!({ "size": 10, "query": { "match_all": {} }, "fields": ["rules"] })
        );

        let body = serde_json::to_value(SearchRequest::match_all(10, None)).unwrap();
        assert_eq!(body, json!({ "size": 10, "query": { "match_all": {} } }));
    }

    #[test]
    fn test_from_source_rejects_non_objects() {
        assert!(RawDocument::from_source(json!(["a"])).is_err());
        let document = RawDocument::from_source(json!({ "rules": "a, b" }))
            .unwrap()
            .with_id("1");
        assert_eq!(document.id.as_deref(), Some("1"));
    }
}
