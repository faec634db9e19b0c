//! Analyzer implementations that combine tokenizers and filters.

mod analyzer;
mod keyword;
mod pipeline;
mod standard;
mod whitespace;

pub use analyzer::Analyzer;
pub use keyword::KeywordAnalyzer;
pub use pipeline::PipelineAnalyzer;
pub use standard::StandardAnalyzer;
pub use whitespace::WhitespaceAnalyzer;
