//! Core analyzer trait definition.
//!
//! The synonym parser runs every rule phrase through an [`Analyzer`] so that
//! rule inputs are normalised exactly like the query text they will later be
//! matched against.
//!
//! ```text
//! Raw phrase → Analyzer → Token Stream → TokenSequence
//!               ↓
//!           Tokenizer
//!               ↓
//!           Filter 1..N
//! ```
//!
//! Implementing a custom analyzer:
//!
//! ```
//! use index_synonyms::analysis::analyzer::Analyzer;
//! use index_synonyms::analysis::token::{Token, TokenStream};
//! use index_synonyms::error::Result;
//!
//! struct UpperAnalyzer;
//!
//! impl Analyzer for UpperAnalyzer {
//!     fn analyze(&self, text: &str) -> Result<TokenStream> {
//!         let tokens: Vec<Token> = text
//!             .split_whitespace()
//!             .enumerate()
//!             .map(|(i, w)| Token::new(w.to_uppercase(), i))
//!             .collect();
//!         Ok(Box::new(tokens.into_iter()))
//!     }
//!
//!     fn name(&self) -> &'static str {
//!         "upper"
//!     }
//! }
//! ```

use crate::analysis::token::TokenStream;
use crate::error::Result;

/// Trait for analyzers that convert text into processed tokens.
///
/// Requires `Send + Sync` so one analyzer can serve concurrent dictionary
/// builds.
pub trait Analyzer: Send + Sync {
    /// Analyze the given text and return a stream of tokens.
    ///
    /// An `Err` here means the analyzer itself failed; rejecting a phrase
    /// (e.g. because it was reduced to nothing) is decided by the caller from
    /// the returned tokens.
    fn analyze(&self, text: &str) -> Result<TokenStream>;

    /// Get the name of this analyzer (for logging and configuration).
    fn name(&self) -> &'static str;
}
