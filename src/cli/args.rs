//! Command line argument parsing using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::skos::types::SkosType;

/// SKOS vocabulary expansion for text analysis.
#[derive(Parser, Debug, Clone)]
#[command(name = "sarissa-skos")]
#[command(about = "Expand text with the labels of a SKOS vocabulary")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct SkosArgs {
    /// Increase logging (-v info, -vv debug).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors.
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format.
    #[arg(short = 'f', long = "format", default_value = "human")]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output.
    #[arg(long)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl SkosArgs {
    /// 0 when quiet, 1 by default, one more per `-v`.
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
    /// Analyze text and print the expanded token stream.
    Analyze(AnalyzeArgs),

    /// Print the concepts a label denotes.
    Lookup(LookupArgs),

    /// Build a concept segment for a vocabulary.
    Build(BuildArgs),

    /// Print vocabulary statistics.
    Stats(StatsArgs),
}

/// Options that shape the concept store.
#[derive(Args, Debug, Clone, Default)]
pub struct StoreOptions {
    /// Keep only labels in this language (repeatable).
    #[arg(long = "lang", value_name = "LANG")]
    pub languages: Vec<String>,

    /// Do not compute transitive broader/narrower closures.
    #[arg(long)]
    pub no_transitive: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct AnalyzeArgs {
    /// Vocabulary file (.ttl, .n3 or .nt).
    #[arg(value_name = "VOCAB")]
    pub vocabulary: PathBuf,

    /// Text to analyze, or a concept identifier with --uri.
    #[arg(value_name = "TEXT")]
    pub text: String,

    #[command(flatten)]
    pub store: StoreOptions,

    /// Expansion type to emit (repeatable), e.g. ALT or broader_transitive.
    #[arg(long = "type", value_name = "TYPE")]
    pub types: Vec<SkosType>,

    /// Widest lookup window, in tokens.
    #[arg(long)]
    pub buffer_size: Option<usize>,

    /// Analyzer configuration file (JSON).
    #[arg(long, value_name = "CONFIG")]
    pub config: Option<PathBuf>,

    /// Treat TEXT as a concept identifier.
    #[arg(long)]
    pub uri: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct LookupArgs {
    #[arg(value_name = "VOCAB")]
    pub vocabulary: PathBuf,

    #[arg(value_name = "LABEL")]
    pub label: String,

    #[command(flatten)]
    pub store: StoreOptions,
}

#[derive(Parser, Debug, Clone)]
pub struct BuildArgs {
    #[arg(value_name = "VOCAB")]
    pub vocabulary: PathBuf,

    /// Directory that receives the segment.
    #[arg(value_name = "INDEX_DIR")]
    pub index_dir: PathBuf,

    #[command(flatten)]
    pub store: StoreOptions,
}

#[derive(Parser, Debug, Clone)]
pub struct StatsArgs {
    #[arg(value_name = "VOCAB")]
    pub vocabulary: PathBuf,

    #[command(flatten)]
    pub store: StoreOptions,
}

/// Output formats for CLI.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_analyze() {
        let args = SkosArgs::try_parse_from([
            "sarissa-skos",
            "-vv",
            "--format",
            "json",
            "analyze",
            "animals.ttl",
            "the lazy dog",
            "--lang",
            "en",
            "--lang",
            "fr",
            "--type",
            "ALT",
            "--type",
            "broader_transitive",
            "--buffer-size",
            "2",
        ])
        .unwrap();

        assert_eq!(args.verbosity(), 3);
        assert_eq!(args.output_format, OutputFormat::Json);
        match args.command {
            Command::Analyze(analyze) => {
                assert_eq!(analyze.text, "the lazy dog");
                assert_eq!(analyze.store.languages, vec!["en", "fr"]);
                assert_eq!(
                    analyze.types,
                    vec![SkosType::Alt, SkosType::BroaderTransitive]
                );
                assert_eq!(analyze.buffer_size, Some(2));
                assert!(!analyze.uri);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_quiet() {
        let args = SkosArgs::try_parse_from(["sarissa-skos", "-q", "stats", "animals.ttl"]).unwrap();
        assert_eq!(args.verbosity(), 0);
    }

    #[test]
    fn test_unknown_type_rejected() {
        let result = SkosArgs::try_parse_from([
            "sarissa-skos",
            "analyze",
            "animals.ttl",
            "dog",
            "--type",
            "sibling",
        ]);
        assert!(result.is_err());
    }
}
