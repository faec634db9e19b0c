//! Parser for Solr-format synonym rules.
//!
//! Two line shapes are recognised:
//!
//! ```text
//! ipod, i pod, i-pod        equivalence list
//! foo, foos => bar, baz     explicit mapping
//! ```
//!
//! Commas and `=>` may be escaped with a backslash. Every phrase is run
//! through the configured [`Analyzer`]; a phrase that does not analyse to a
//! clean run of tokens is a [`MalformedRule`](SynonymError::MalformedRule).

use serde::{Deserialize, Serialize};

use crate::analysis::analyzer::Analyzer;
use crate::analysis::synonym::sequence::{SynonymMapping, TokenSequence, WORD_SEPARATOR};
use crate::error::{Result, SynonymError};
use crate::loader::listener::{BuildListener, LogListener};

const MAPPING_SEPARATOR: &str = "=>";
const PHRASE_SEPARATOR: &str = ",";

static DEFAULT_LISTENER: LogListener = LogListener;

/// Rule interpretation policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// Equivalence lists map every phrase to every other phrase.
    /// When false they collapse onto their first phrase.
    pub expand: bool,
    /// Collapse repeated (input, output) pairs.
    pub dedup: bool,
    /// Drop malformed phrases instead of failing the build.
    pub lenient: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            expand: true,
            dedup: true,
            lenient: false,
        }
    }
}

/// Returns true if the line holds a rule, i.e. is neither blank nor a comment.
pub fn is_rule_line(line: &str) -> bool {
    let line = line.trim_start();
    !line.is_empty() && !line.starts_with('#')
}

/// Parses rule lines into [`SynonymMapping`]s.
///
/// # Examples
///
/// ```
/// use index_synonyms::analysis::analyzer::StandardAnalyzer;
/// use index_synonyms::analysis::synonym::{ParseOptions, SolrSynonymParser};
///
/// let analyzer = StandardAnalyzer::new().unwrap();
/// let parser = SolrSynonymParser::new(&analyzer, ParseOptions::default());
///
/// let mappings = parser.parse_line("Foo => Bar, baz").unwrap();
/// assert_eq!(mappings.len(), 2);
/// assert_eq!(mappings[0].to_string(), "foo => bar");
/// ```
pub struct SolrSynonymParser<'a> {
    analyzer: &'a dyn Analyzer,
    listener: &'a dyn BuildListener,
    options: ParseOptions,
}

impl<'a> SolrSynonymParser<'a> {
    /// Create a parser that reports skipped phrases through the `log` facade.
    pub fn new(analyzer: &'a dyn Analyzer, options: ParseOptions) -> Self {
        SolrSynonymParser {
            analyzer,
            listener: &DEFAULT_LISTENER,
            options,
        }
    }

    /// Report skipped phrases to `listener` instead.
    pub fn with_listener(mut self, listener: &'a dyn BuildListener) -> Self {
        self.listener = listener;
        self
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Analyse one phrase into a token sequence.
    ///
    /// Fails with `MalformedRule` if a token is empty or holds the word
    /// separator, if any token does not directly follow its predecessor, or
    /// if nothing is left.
    pub fn analyze(&self, text: &str) -> Result<TokenSequence> {
        let mut tokens = Vec::new();
        for token in self.analyzer.analyze(text)? {
            if token.is_empty() {
                return Err(SynonymError::malformed(
                    text,
                    "term analyzed to a zero-length token",
                ));
            }
            if token.text.contains(WORD_SEPARATOR) {
                return Err(SynonymError::malformed(
                    text,
                    "term analyzed to a token containing the reserved word separator U+0000",
                ));
            }
            if token.position_increment != 1 {
                return Err(SynonymError::malformed(
                    text,
                    format!(
                        "term analyzed to a token ({}) with position increment != 1 (got: {})",
                        token.text, token.position_increment
                    ),
                ));
            }
            tokens.push(token.text);
        }

        if tokens.is_empty() {
            return Err(SynonymError::malformed(
                text,
                "term was completely eliminated by analyzer",
            ));
        }
        Ok(TokenSequence::new(tokens))
    }

    /// Analyse a phrase under the lenient policy. `None` means dropped.
    fn analyze_phrase(&self, phrase: &str) -> Result<Option<TokenSequence>> {
        match self.analyze(phrase) {
            Ok(sequence) => Ok(Some(sequence)),
            Err(err) if self.options.lenient && err.is_malformed_rule() => {
                self.listener.rule_skipped(phrase, &err);
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    fn analyze_side(&self, side: &str) -> Result<Vec<Option<TokenSequence>>> {
        split_unescaped(side, PHRASE_SEPARATOR)
            .iter()
            .map(|phrase| self.analyze_phrase(unescape(phrase).trim()))
            .collect()
    }

    /// Parse one physical rule line.
    ///
    /// Blank and comment lines yield no mappings.
    pub fn parse_line(&self, line: &str) -> Result<Vec<SynonymMapping>> {
        if !is_rule_line(line) {
            return Ok(Vec::new());
        }

        let sides = split_unescaped(line, MAPPING_SEPARATOR);
        let mut mappings = Vec::new();

        match sides.as_slice() {
            [lhs, rhs] => {
                let inputs = self.analyze_side(lhs)?;
                let outputs = self.analyze_side(rhs)?;
                for input in inputs.iter().flatten() {
                    for output in outputs.iter().flatten() {
                        mappings.push(SynonymMapping::new(input.clone(), output.clone(), false));
                    }
                }
            }
            [list] => {
                let phrases = self.analyze_side(list)?;
                if self.options.expand {
                    for (i, input) in phrases.iter().enumerate() {
                        let Some(input) = input else { continue };
                        for (j, output) in phrases.iter().enumerate() {
                            let Some(output) = output else { continue };
                            if i != j {
                                mappings.push(SynonymMapping::new(
                                    input.clone(),
                                    output.clone(),
                                    true,
                                ));
                            }
                        }
                    }
                } else if let Some(Some(target)) = phrases.first() {
                    for input in phrases.iter().flatten() {
                        mappings.push(SynonymMapping::new(input.clone(), target.clone(), false));
                    }
                }
            }
            [] => {}
            _ => {
                return Err(SynonymError::malformed(
                    line,
                    "more than one explicit mapping specified on the same line",
                ));
            }
        }

        Ok(mappings)
    }

    /// Parse text that may span several physical lines.
    pub fn parse(&self, text: &str) -> Result<Vec<SynonymMapping>> {
        let mut mappings = Vec::new();
        for line in text.lines() {
            mappings.extend(self.parse_line(line)?);
        }
        Ok(mappings)
    }
}

/// Split on `separator`, keeping backslash escapes intact and dropping empty
/// segments.
fn split_unescaped(s: &str, separator: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut rest = s;

    while !rest.is_empty() {
        if let Some(after) = rest.strip_prefix(separator) {
            if !current.is_empty() {
                parts.push(std::mem::take(&mut current));
            }
            rest = after;
            continue;
        }

        let mut chars = rest.chars();
        let Some(ch) = chars.next() else { break };
        current.push(ch);
        if ch == '\\' {
            if let Some(escaped) = chars.next() {
                current.push(escaped);
            }
        }
        rest = chars.as_str();
    }

    if !current.is_empty() {
        parts.push(current);
    }
    parts
}

/// Remove backslash escapes. A trailing lone backslash is kept.
fn unescape(s: &str) -> String {
    if !s.contains('\\') {
        return s.to_string();
    }

    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' => out.push(chars.next().unwrap_or('\\')),
            _ => out.push(ch),
        }
    }
    out
}
