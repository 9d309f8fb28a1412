//! Output formatting for CLI commands.

use serde::Serialize;

use crate::analysis::token::Token;
use crate::cli::args::{OutputFormat, SkosArgs};
use crate::error::Result;

/// A command result that can also be printed for people.
pub trait HumanReadable {
    fn to_human(&self) -> String;
}

/// One token of an analyzed stream.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TokenRow {
    pub text: String,
    pub position: usize,
    pub start_offset: usize,
    pub end_offset: usize,
    pub position_increment: usize,
    #[serde(rename = "type")]
    pub skos_type: Option<String>,
}

impl From<&Token> for TokenRow {
    fn from(token: &Token) -> Self {
        TokenRow {
            text: token.text.clone(),
            position: token.position,
            start_offset: token.start_offset,
            end_offset: token.end_offset,
            position_increment: token.position_increment,
            skos_type: token.skos_type.map(|t| t.name().to_string()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AnalysisResult {
    pub text: String,
    pub tokens: Vec<TokenRow>,
}

impl HumanReadable for AnalysisResult {
    fn to_human(&self) -> String {
        let mut lines = vec![format!(
            "{:>4}  {:<24} {:>11}  {}",
            "pos", "term", "offsets", "type"
        )];
        for row in &self.tokens {
            lines.push(format!(
                "{:>4}  {:<24} {:>11}  {}",
                row.position,
                row.text,
                format!("{}-{}", row.start_offset, row.end_offset),
                row.skos_type.as_deref().unwrap_or("-"),
            ));
        }
        lines.join("\n")
    }
}

/// A concept and its labels and relations.
#[derive(Debug, Default, Serialize)]
pub struct ConceptReport {
    pub id: String,
    pub pref_labels: Vec<String>,
    pub alt_labels: Vec<String>,
    pub hidden_labels: Vec<String>,
    pub broader: Vec<String>,
    pub narrower: Vec<String>,
    pub related: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct LookupResult {
    pub label: String,
    pub concepts: Vec<ConceptReport>,
}

impl HumanReadable for LookupResult {
    fn to_human(&self) -> String {
        if self.concepts.is_empty() {
            return format!("No concept has the label {:?}", self.label);
        }

        let mut lines = Vec::new();
        for concept in &self.concepts {
            lines.push(concept.id.clone());
            for (name, values) in [
                ("prefLabel", &concept.pref_labels),
                ("altLabel", &concept.alt_labels),
                ("hiddenLabel", &concept.hidden_labels),
                ("broader", &concept.broader),
                ("narrower", &concept.narrower),
                ("related", &concept.related),
            ] {
                if !values.is_empty() {
                    lines.push(format!("  {name}: {}", values.join(", ")));
                }
            }
        }
        lines.join("\n")
    }
}

#[derive(Debug, Serialize)]
pub struct BuildResult {
    pub segment: String,
    pub directory: String,
    pub concepts: usize,
    pub labels: usize,
    pub duration_ms: u64,
}

impl HumanReadable for BuildResult {
    fn to_human(&self) -> String {
        format!(
            "Wrote segment {} to {} ({} concepts, {} labels) in {} ms",
            self.segment, self.directory, self.concepts, self.labels, self.duration_ms
        )
    }
}

#[derive(Debug, Serialize)]
pub struct VocabularyStats {
    pub source: String,
    pub languages: Vec<String>,
    pub concepts: usize,
    pub labels: usize,
    pub max_pref_label_terms: usize,
}

impl HumanReadable for VocabularyStats {
    fn to_human(&self) -> String {
        let languages = if self.languages.is_empty() {
            "all".to_string()
        } else {
            self.languages.join(", ")
        };
        format!(
            "Vocabulary: {}\nLanguages: {}\nConcepts: {}\nLabels: {}\nLongest preferred label: {} terms",
            self.source, languages, self.concepts, self.labels, self.max_pref_label_terms
        )
    }
}

/// Print a command result in the requested format.
pub fn output_result<T: Serialize + HumanReadable>(result: &T, args: &SkosArgs) -> Result<()> {
    println!("{}", render(result, args.output_format, args.pretty)?);
    Ok(())
}

fn render<T: Serialize + HumanReadable>(
    result: &T,
    format: OutputFormat,
    pretty: bool,
) -> Result<String> {
    Ok(match format {
        OutputFormat::Human => result.to_human(),
        OutputFormat::Json if pretty => serde_json::to_string_pretty(result)?,
        OutputFormat::Json => serde_json::to_string(result)?,
    })
}
