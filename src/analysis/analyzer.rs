//! Analyzers run a tokenizer and a filter chain over text.

use crate::analysis::token::TokenStream;
use crate::error::Result;

/// Turns text into a token stream.
pub trait Analyzer: Send + Sync {
    /// Analyze the given text.
    fn analyze(&self, text: &str) -> Result<TokenStream>;

    /// Name of this analyzer.
    fn name(&self) -> &'static str;

    /// Access to the concrete analyzer.
    fn as_any(&self) -> &dyn std::any::Any;
}

pub mod pipeline;
pub mod skos;

pub use pipeline::PipelineAnalyzer;
pub use skos::{ExpansionType, SkosAnalyzer, SkosAnalyzerConfig};
