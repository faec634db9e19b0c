//! Text analysis for synonym rules.
//!
//! Rule phrases are analysed with the same kind of pipeline the search chain
//! uses, then compiled into a [`synonym::SynonymDictionary`].

pub mod analyzer;
pub mod synonym;
pub mod token;
pub mod token_filter;
pub mod tokenizer;

pub use analyzer::Analyzer;
pub use token::{Token, TokenStream};
