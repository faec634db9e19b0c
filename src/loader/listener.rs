//! Build event sinks.

use log::{error, info, warn};
use parking_lot::Mutex;

use crate::error::SynonymError;
use crate::loader::BuildReport;

/// Receives notable events of a dictionary build.
///
/// All methods default to doing nothing.
pub trait BuildListener: Send + Sync {
    /// The rule index does not exist; an empty dictionary is returned.
    fn index_not_found(&self, _index: &str) {}

    /// A phrase was dropped under lenient parsing.
    fn rule_skipped(&self, _phrase: &str, _error: &SynonymError) {}

    /// A build finished.
    fn rules_loaded(&self, _index: &str, _report: &BuildReport) {}

    /// The rule index could not be read.
    fn fetch_failed(&self, _index: &str, _error: &SynonymError) {}
}

/// Forwards build events to the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogListener;

impl BuildListener for LogListener {
    fn index_not_found(&self, index: &str) {
        warn!("Could not find index for synonyms [{index}], using an empty dictionary");
    }

    fn rule_skipped(&self, phrase: &str, error: &SynonymError) {
        warn!("Synonym rule for [{phrase}] was ignored: {error}");
    }

    fn rules_loaded(&self, index: &str, report: &BuildReport) {
        info!(
            "{} synonym rules loaded from index [{index}] ({} skipped, {} inputs)",
            report.rules_loaded, report.rules_skipped, report.input_keys
        );
    }

    fn fetch_failed(&self, index: &str, error: &SynonymError) {
        error!("Failed to load synonyms from index [{index}]: {error}");
    }
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopListener;

impl BuildListener for NoopListener {}

/// A recorded build event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildEvent {
    IndexNotFound { index: String },
    RuleSkipped { phrase: String, reason: String },
    RulesLoaded { index: String, report: BuildReport },
    FetchFailed { index: String, reason: String },
}

/// Keeps every event in memory.
#[derive(Debug, Default)]
pub struct RecordingListener {
    events: Mutex<Vec<BuildEvent>>,
}

impl RecordingListener {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events recorded so far.
    pub fn events(&self) -> Vec<BuildEvent> {
        self.events.lock().clone()
    }

    /// Phrases dropped by lenient parsing, in order.
    pub fn skipped_phrases(&self) -> Vec<String> {
        self.events
            .lock()
            .iter()
            .filter_map(|event| match event {
                BuildEvent::RuleSkipped { phrase, .. } => Some(phrase.clone()),
                _ => None,
            })
            .collect()
    }

    fn record(&self, event: BuildEvent) {
        self.events.lock().push(event);
    }
}

impl BuildListener for RecordingListener {
    fn index_not_found(&self, index: &str) {
        self.record(BuildEvent::IndexNotFound {
            index: index.to_string(),
        });
    }

    fn rule_skipped(&self, phrase: &str, error: &SynonymError) {
        self.record(BuildEvent::RuleSkipped {
            phrase: phrase.to_string(),
            reason: error.to_string(),
        });
    }

    fn rules_loaded(&self, index: &str, report: &BuildReport) {
        self.record(BuildEvent::RulesLoaded {
            index: index.to_string(),
            report: report.clone(),
        });
    }

    fn fetch_failed(&self, index: &str, error: &SynonymError) {
        self.record(BuildEvent::FetchFailed {
            index: index.to_string(),
            reason: error.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_listener() {
        let listener = RecordingListener::new();
        listener.index_not_found(".synonyms");
        listener.rule_skipped("the", &SynonymError::malformed("the", "eliminated"));

        let events = listener.events();
        assert_eq!(events.len(), 2);
        assert_eq!(
            events[0],
            BuildEvent::IndexNotFound {
                index: ".synonyms".to_string()
            }
        );
        assert_eq!(listener.skipped_phrases(), vec!["the".to_string()]);
    }

    #[test]
    fn test_listeners_are_object_safe() {
        let listeners: Vec<Box<dyn BuildListener>> = vec![
            Box::new(LogListener),
            Box::new(NoopListener),
            Box::new(RecordingListener::new()),
        ];
        for listener in &listeners {
            listener.rules_loaded("idx", &BuildReport::default());
        }
    }
}
