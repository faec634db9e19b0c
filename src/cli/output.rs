//! Output formatting for CLI commands.

use std::io::{self, Write};

use serde::Serialize;

use crate::analysis::synonym::{SynonymDictionary, TokenSequence};
use crate::cli::args::{OutputFormat, SynonymsArgs};
use crate::error::Result;
use crate::loader::BuildReport;

/// Expansions of one looked-up phrase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LookupResult {
    pub phrase: String,
    pub analyzed: Option<String>,
    pub expansions: Vec<String>,
    pub include_original: bool,
}

/// One dictionary entry, flattened for printing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryOutput {
    pub input: String,
    pub outputs: Vec<String>,
    pub include_original: bool,
}

/// Size of a compiled dictionary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DictionaryStats {
    pub inputs: usize,
    pub words: usize,
    pub max_input_length: usize,
    pub fst_bytes: usize,
}

impl DictionaryStats {
    pub fn of(dictionary: &SynonymDictionary) -> Self {
        DictionaryStats {
            inputs: dictionary.len(),
            words: dictionary.word_count(),
            max_input_length: dictionary.max_input_length(),
            fst_bytes: dictionary.fst_size(),
        }
    }
}

/// Result structure for build and parse commands.
#[derive(Debug, Clone, Serialize)]
pub struct BuildSummary {
    pub source: String,
    pub report: BuildReport,
    pub dictionary: DictionaryStats,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub lookups: Vec<LookupResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entries: Option<Vec<EntryOutput>>,
}

/// Flatten every entry of `dictionary`.
pub fn dump_entries(dictionary: &SynonymDictionary) -> Vec<EntryOutput> {
    dictionary
        .iter()
        .map(|rule| EntryOutput {
            input: rule.input.to_string(),
            outputs: rule.outputs.iter().map(|o| o.to_string()).collect(),
            include_original: rule.include_original,
        })
        .collect()
}

/// Look up an already analysed sequence.
pub fn lookup(
    dictionary: &SynonymDictionary,
    phrase: &str,
    analyzed: Option<&TokenSequence>,
) -> LookupResult {
    let expansions = analyzed
        .map(|sequence| {
            dictionary
                .expansions_for(sequence)
                .iter()
                .map(|s| s.to_string())
                .collect()
        })
        .unwrap_or_default();

    LookupResult {
        phrase: phrase.to_string(),
        analyzed: analyzed.map(|s| s.to_string()),
        expansions,
        include_original: analyzed.is_some_and(|s| dictionary.include_original(s)),
    }
}

/// Output a result in the specified format.
pub fn output_result(summary: &BuildSummary, args: &SynonymsArgs) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match args.output_format {
        OutputFormat::Human => write_human(&mut out, summary, args.verbosity()),
        OutputFormat::Json => write_json(&mut out, summary, args.pretty),
    }
}

fn write_json<W: Write>(out: &mut W, summary: &BuildSummary, pretty: bool) -> Result<()> {
    if pretty {
        serde_json::to_writer_pretty(&mut *out, summary)?;
    } else {
        serde_json::to_writer(&mut *out, summary)?;
    }
    writeln!(out)?;
    Ok(())
}

fn write_human<W: Write>(out: &mut W, summary: &BuildSummary, verbosity: u8) -> Result<()> {
    let report = &summary.report;
    if verbosity > 0 {
        writeln!(out, "Synonyms built from {}", summary.source)?;
        writeln!(out, "═══════════════")?;
        writeln!(out, "  Documents:      {}", report.documents)?;
        writeln!(out, "  Rule values:    {}", report.lines_read)?;
        writeln!(out, "  Rules loaded:   {}", report.rules_loaded)?;
        writeln!(out, "  Rules skipped:  {}", report.rules_skipped)?;
        writeln!(out, "  Mappings:       {}", report.mappings)?;
        writeln!(
            out,
            "  Inputs:         {} ({} distinct outputs, longest {} tokens)",
            summary.dictionary.inputs,
            summary.dictionary.words,
            summary.dictionary.max_input_length
        )?;
        writeln!(
            out,
            "  FST size:       {}",
            format_bytes(summary.dictionary.fst_bytes as u64)
        )?;
    }

    for result in &summary.lookups {
        writeln!(out)?;
        match &result.analyzed {
            None => writeln!(out, "{}: phrase analyses to nothing", result.phrase)?,
            Some(_) if result.expansions.is_empty() => {
                writeln!(out, "{}: no synonyms", result.phrase)?
            }
            Some(analyzed) => {
                let keep = if result.include_original {
                    " (keeps original)"
                } else {
                    ""
                };
                writeln!(out, "{} [{analyzed}]{keep}:", result.phrase)?;
                for expansion in &result.expansions {
                    writeln!(out, "  => {expansion}")?;
                }
            }
        }
    }

    if let Some(entries) = &summary.entries {
        writeln!(out)?;
        for entry in entries {
            writeln!(out, "{}", format_entry(entry))?;
        }
    }

    Ok(())
}

/// Format an entry the way it would be written as an explicit rule.
fn format_entry(entry: &EntryOutput) -> String {
    let marker = if entry.include_original { " +" } else { "" };
    format!("{} =>{marker} {}", entry.input, entry.outputs.join(", "))
}

/// Format bytes into human-readable format.
fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    let unit = UNITS[unit_index];
    if unit_index == 0 {
        format!("{bytes} {unit}")
    } else {
        format!("{size:.1} {unit}")
    }
}
