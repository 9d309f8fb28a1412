//! Parallel analysis of many texts against one analyzer.
//!
//! Every text gets its own token stream on a rayon worker; the analyzer and
//! the concept store behind it are shared read-only.

use rayon::prelude::*;

use crate::analysis::analyzer::Analyzer;
use crate::analysis::token::Token;
use crate::error::Result;

/// Analyze every text, in parallel, keeping input order.
///
/// Fails with the first error any text produced.
pub fn analyze_batch<S>(analyzer: &dyn Analyzer, texts: &[S]) -> Result<Vec<Vec<Token>>>
where
    S: AsRef<str> + Sync,
{
    texts
        .par_iter()
        .map(|text| -> Result<Vec<Token>> { Ok(analyzer.analyze(text.as_ref())?.collect()) })
        .collect()
}

/// Number of tokens each text analyzes to, expansions included.
pub fn token_counts<S>(analyzer: &dyn Analyzer, texts: &[S]) -> Result<Vec<usize>>
where
    S: AsRef<str> + Sync,
{
    texts
        .par_iter()
        .map(|text| -> Result<usize> { Ok(analyzer.analyze(text.as_ref())?.count()) })
        .collect()
}
