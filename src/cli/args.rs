//! Command line argument parsing using clap.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::analysis::analyzer::{
    Analyzer, KeywordAnalyzer, PipelineAnalyzer, StandardAnalyzer, WhitespaceAnalyzer,
};
use crate::analysis::synonym::ParseOptions;
use crate::analysis::token_filter::LowercaseFilter;
use crate::analysis::tokenizer::UnicodeWordTokenizer;
use crate::error::Result;
use crate::source::config::{
    DEFAULT_HOST, DEFAULT_INDEX, DEFAULT_MAX_DOCUMENTS, DEFAULT_PORT, DEFAULT_SCHEME,
    DEFAULT_TIMEOUT_SECS, RuleSourceConfig,
};

/// Build Solr-format synonym dictionaries from rules stored in a search index
#[derive(Parser, Debug, Clone)]
#[command(name = "index-synonyms")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct SynonymsArgs {
    /// Verbosity level (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only print errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human", global = true)]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl SynonymsArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose.saturating_add(1)
        }
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Build a dictionary from rules stored in a remote index
    Build(BuildArgs),

    /// Build a dictionary from local rule files
    Parse(ParseArgs),
}

/// Arguments for building from a remote index
#[derive(Args, Debug, Clone)]
pub struct BuildArgs {
    #[arg(long, default_value = DEFAULT_HOST)]
    pub host: String,

    #[arg(long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    #[arg(long, default_value = DEFAULT_SCHEME)]
    pub scheme: String,

    /// Index holding the rule documents
    #[arg(long, default_value = DEFAULT_INDEX)]
    pub index: String,

    /// Read rules from this field only (default: every field)
    #[arg(long)]
    pub field: Option<String>,

    /// Basic auth user, used only together with a password
    #[arg(long)]
    pub username: Option<String>,

    #[arg(long, env = "INDEX_SYNONYMS_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Maximum number of rule documents fetched
    #[arg(long, default_value_t = DEFAULT_MAX_DOCUMENTS)]
    pub max_documents: usize,

    #[command(flatten)]
    pub policy: PolicyArgs,
}

impl BuildArgs {
    pub fn to_config(&self) -> RuleSourceConfig {
        let options = self.policy.parse_options();
        RuleSourceConfig {
            scheme: self.scheme.clone(),
            host: self.host.clone(),
            port: self.port,
            index: self.index.clone(),
            field: self.field.clone(),
            username: self.username.clone(),
            password: self.password.clone(),
            expand: options.expand,
            dedup: options.dedup,
            lenient: options.lenient,
            timeout_secs: self.timeout,
            max_documents: self.max_documents,
        }
    }
}

/// Arguments for building from local rule files
#[derive(Args, Debug, Clone)]
pub struct ParseArgs {
    /// Rule files, one rule per line
    #[arg(value_name = "RULES_FILE", required = true)]
    pub files: Vec<PathBuf>,

    #[command(flatten)]
    pub policy: PolicyArgs,
}

/// Parsing policy and inspection flags shared by all commands
#[derive(Args, Debug, Clone)]
pub struct PolicyArgs {
    /// Map equivalent phrases onto the first phrase only
    #[arg(long)]
    pub no_expand: bool,

    /// Skip malformed phrases instead of failing
    #[arg(long)]
    pub lenient: bool,

    /// Keep duplicate mappings
    #[arg(long)]
    pub no_dedup: bool,

    /// Analyzer applied to rule phrases
    #[arg(long, value_enum, default_value = "standard")]
    pub analyzer: AnalyzerKind,

    /// Print the expansions of this phrase (repeatable)
    #[arg(long, value_name = "PHRASE")]
    pub lookup: Vec<String>,

    /// Print every dictionary entry
    #[arg(long)]
    pub dump: bool,
}

impl PolicyArgs {
    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            expand: !self.no_expand,
            dedup: !self.no_dedup,
            lenient: self.lenient,
        }
    }
}

/// Analyzers available for rule phrases
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnalyzerKind {
    /// Word tokens, lowercased, English stop words removed
    Standard,
    /// Word tokens, lowercased
    StandardNoStop,
    /// Whitespace-separated tokens, lowercased
    Whitespace,
    /// Unicode word boundaries, lowercased
    Unicode,
    /// The whole phrase as one token
    Keyword,
}

impl AnalyzerKind {
    pub fn build(self) -> Result<Arc<dyn Analyzer>> {
        let analyzer: Arc<dyn Analyzer> = match self {
            AnalyzerKind::Standard => Arc::new(StandardAnalyzer::new()?),
            AnalyzerKind::StandardNoStop => Arc::new(StandardAnalyzer::without_stop_words()?),
            AnalyzerKind::Whitespace => Arc::new(WhitespaceAnalyzer::new()),
            AnalyzerKind::Unicode => Arc::new(
                PipelineAnalyzer::new(Arc::new(UnicodeWordTokenizer::new()))
                    .add_filter(Arc::new(LowercaseFilter::new()))
                    .with_name("unicode"),
            ),
            AnalyzerKind::Keyword => Arc::new(KeywordAnalyzer::new()),
        };
        Ok(analyzer)
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}
