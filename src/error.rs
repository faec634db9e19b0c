//! Error types for synonym dictionary builds.
//!
//! All fallible operations in this crate return [`SynonymError`]. Only a few
//! variants are fatal to a build; an absent rule index is not an error at all
//! (see [`FetchOutcome`](crate::source::client::FetchOutcome)).
//!
//! # Examples
//!
//! ```
//! use index_synonyms::error::{Result, SynonymError};
//!
//! fn validate(index: &str) -> Result<()> {
//!     if index.trim().is_empty() {
//!         return Err(SynonymError::invalid_config("index must not be blank"));
//!     }
//!     Ok(())
//! }
//!
//! assert!(validate(".synonyms").is_ok());
//! assert!(validate(" ").is_err());
//! ```

use std::io;

use thiserror::Error;

/// The error type for synonym dictionary operations.
#[derive(Error, Debug)]
pub enum SynonymError {
    /// I/O errors (reading local rule files)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The remote document store could not be queried.
    #[error("Failed to load synonym rules from index '{index}': {reason}")]
    RemoteFetchFailed { index: String, reason: String },

    /// A rule line could not be parsed or one of its phrases failed analysis.
    #[error("Invalid synonym rule [{rule}]: {reason}")]
    MalformedRule { rule: String, reason: String },

    /// Missing or invalid settings, raised before any build starts.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The analyzer itself failed (as opposed to rejecting a phrase).
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// The compiled dictionary could not be constructed.
    #[error("Dictionary error: {0}")]
    Dictionary(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),
}

/// Result type alias for operations that may fail with SynonymError.
pub type Result<T> = std::result::Result<T, SynonymError>;

impl SynonymError {
    /// Create a new remote fetch error for the given index.
    pub fn remote_fetch<I: Into<String>, S: Into<String>>(index: I, reason: S) -> Self {
        SynonymError::RemoteFetchFailed {
            index: index.into(),
            reason: reason.into(),
        }
    }

    /// Create a new malformed rule error.
    pub fn malformed<R: Into<String>, S: Into<String>>(rule: R, reason: S) -> Self {
        SynonymError::MalformedRule {
            rule: rule.into(),
            reason: reason.into(),
        }
    }

    /// Create a new invalid configuration error.
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        SynonymError::InvalidConfiguration(msg.into())
    }

    /// Create a new analysis error.
    pub fn analysis<S: Into<String>>(msg: S) -> Self {
        SynonymError::Analysis(msg.into())
    }

    /// Create a new dictionary error.
    pub fn dictionary<S: Into<String>>(msg: S) -> Self {
        SynonymError::Dictionary(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        SynonymError::Other(msg.into())
    }

    /// Whether this error is a per-rule analysis failure that lenient mode may absorb.
    pub fn is_malformed_rule(&self) -> bool {
        matches!(self, SynonymError::MalformedRule { .. })
    }
}
