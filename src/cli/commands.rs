//! Command implementations.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use log::{debug, info};

use crate::analysis::analyzer::Analyzer;
use crate::analysis::synonym::{SolrSynonymParser, SynonymDictionary};
use crate::cli::args::{BuildArgs, Command, ParseArgs, PolicyArgs, SynonymsArgs};
use crate::cli::output::{BuildSummary, DictionaryStats, dump_entries, lookup, output_result};
use crate::loader::{BuildReport, SynonymLoader};
use crate::source::client::{RemoteRuleClient, StaticRuleSource};

/// Execute a CLI command.
pub fn execute_command(args: SynonymsArgs) -> Result<()> {
    let summary = match &args.command {
        Command::Build(build_args) => build_from_index(build_args)?,
        Command::Parse(parse_args) => build_from_files(parse_args)?,
    };
    output_result(&summary, &args).context("Failed to write output")
}

fn build_from_index(args: &BuildArgs) -> Result<BuildSummary> {
    let source = args
        .to_config()
        .validate()
        .context("Invalid rule source settings")?;
    let analyzer = args.policy.analyzer.build()?;

    info!(
        "Loading synonym rules from {}{}",
        source.base_url(),
        source.index()
    );
    let loader = SynonymLoader::new(RemoteRuleClient::new(), Arc::clone(&analyzer));
    let (dictionary, report) = loader
        .build_with_report(&source)
        .with_context(|| format!("Failed to build synonyms from index [{}]", source.index()))?;

    summarize(
        format!("index [{}]", source.index()),
        dictionary,
        report,
        &args.policy,
        analyzer.as_ref(),
    )
}

fn build_from_files(args: &ParseArgs) -> Result<BuildSummary> {
    let mut values = Vec::with_capacity(args.files.len());
    for path in &args.files {
        debug!("Reading rules from {}", path.display());
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read rule file {}", path.display()))?;
        values.push(text);
    }

    let analyzer = args.policy.analyzer.build()?;
    let loader = SynonymLoader::new(StaticRuleSource::empty(), Arc::clone(&analyzer));
    let (dictionary, report) = loader
        .compile(values, &args.policy.parse_options())
        .context("Failed to parse synonym rules")?;

    summarize(
        describe_files(&args.files),
        dictionary,
        report,
        &args.policy,
        analyzer.as_ref(),
    )
}

fn summarize(
    source: String,
    dictionary: SynonymDictionary,
    report: BuildReport,
    policy: &PolicyArgs,
    analyzer: &dyn Analyzer,
) -> Result<BuildSummary> {
    // A lookup phrase that analyses to nothing is reported, not an error.
    let parser = SolrSynonymParser::new(analyzer, policy.parse_options());

    let mut lookups = Vec::with_capacity(policy.lookup.len());
    for phrase in &policy.lookup {
        let analyzed = match parser.analyze(phrase) {
            Ok(sequence) => Some(sequence),
            Err(err) if err.is_malformed_rule() => None,
            Err(err) => return Err(err).context("Failed to analyze lookup phrase"),
        };
        lookups.push(lookup(&dictionary, phrase, analyzed.as_ref()));
    }

    Ok(BuildSummary {
        source,
        report,
        dictionary: DictionaryStats::of(&dictionary),
        lookups,
        entries: policy.dump.then(|| dump_entries(&dictionary)),
    })
}

fn describe_files(files: &[PathBuf]) -> String {
    let names: Vec<String> = files.iter().map(|p| p.display().to_string()).collect();
    format!("file(s) {}", names.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::args::AnalyzerKind;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn policy(lookup: &[&str]) -> PolicyArgs {
        PolicyArgs {
            no_expand: false,
            lenient: false,
            no_dedup: false,
            analyzer: AnalyzerKind::Standard,
            lookup: lookup.iter().map(|s| s.to_string()).collect(),
            dump: true,
        }
    }

    #[test]
    fn test_build_from_files() {
        let mut first = NamedTempFile::new().unwrap();
        writeln!(first, "# devices\nipod, i-pod").unwrap();
        let mut second = NamedTempFile::new().unwrap();
        writeln!(second, "foo => bar, baz").unwrap();

        let args = ParseArgs {
            files: vec![first.path().to_path_buf(), second.path().to_path_buf()],
            policy: policy(&["Foo", "the"]),
        };
        let summary = build_from_files(&args).unwrap();

        assert_eq!(summary.report.lines_read, 2);
        assert_eq!(summary.report.rules_loaded, 2);
        assert_eq!(summary.dictionary.inputs, 3);
        assert_eq!(summary.lookups[0].expansions, vec!["bar", "baz"]);
        assert!(summary.lookups[1].analyzed.is_none());
        assert_eq!(summary.entries.as_ref().map(Vec::len), Some(3));
    }

    #[test]
    fn test_missing_rule_file() {
        let args = ParseArgs {
            files: vec![PathBuf::from("/nonexistent/rules.txt")],
            policy: policy(&[]),
        };
        let err = build_from_files(&args).unwrap_err();
        assert!(err.to_string().contains("Failed to read rule file"));
    }

    #[test]
    fn test_strict_parse_failure_has_context() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "a => b => c").unwrap();

        let args = ParseArgs {
            files: vec![file.path().to_path_buf()],
            policy: policy(&[]),
        };
        let err = build_from_files(&args).unwrap_err();
        assert!(err.to_string().contains("Failed to parse synonym rules"));
    }
}
