//! Flattens fetched documents into rule values.
//!
//! Field values come in whatever shape the documents were indexed with:
//!
//! ```text
//! { "rules": "a, b" }                 -> "a, b"
//! { "rules": ["a, b", "c => d"] }     -> "a, b", "c => d"
//! { "rules": 42 }                     -> "42"
//! { "rules": null } / { "rules": {} } -> nothing
//! ```

use std::collections::VecDeque;

use serde_json::Value;

use crate::source::document::RawDocument;

/// Lazy iterator over the rule values of a batch of documents.
#[derive(Debug)]
pub struct RuleLines {
    documents: std::vec::IntoIter<RawDocument>,
    field: Option<String>,
    pending: VecDeque<String>,
    consumed: usize,
}

/// Iterate the rule values of `documents`, restricted to `field` when given.
pub fn extract(documents: Vec<RawDocument>, field: Option<&str>) -> RuleLines {
    RuleLines {
        documents: documents.into_iter(),
        field: field.map(str::to_string),
        pending: VecDeque::new(),
        consumed: 0,
    }
}

impl RuleLines {
    /// Number of rule values yielded so far.
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    fn queue(&mut self, document: &RawDocument) {
        match &self.field {
            Some(field) => {
                if let Some(value) = document.field_value(field) {
                    push_value(value, &mut self.pending);
                }
            }
            None => {
                for value in document.source.values() {
                    push_value(value, &mut self.pending);
                }
            }
        }
    }
}

impl Iterator for RuleLines {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        loop {
            if let Some(line) = self.pending.pop_front() {
                self.consumed += 1;
                return Some(line);
            }
            let document = self.documents.next()?;
            self.queue(&document);
        }
    }
}

fn push_value(value: &Value, out: &mut VecDeque<String>) {
    match value {
        Value::Array(elements) => out.extend(elements.iter().filter_map(scalar_text)),
        other => out.extend(scalar_text(other)),
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
