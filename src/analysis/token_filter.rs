//! Token filters rewrite a token stream.
//!
//! Filters are lazy: [`Filter::filter`] wraps the upstream stream and does
//! its work as tokens are pulled, so an abandoned stream costs nothing more.

use crate::analysis::token::TokenStream;
use crate::error::Result;

/// Transforms a token stream into another token stream.
pub trait Filter: Send + Sync {
    /// Apply this filter to a token stream.
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream>;

    /// Name of this filter.
    fn name(&self) -> &'static str;
}

pub mod expansion;
pub mod lowercase;
pub mod remove_duplicates;
pub mod skos_label;
pub mod skos_uri;
pub mod stop;

pub use expansion::{AnalyzerNormalizer, ExpandedTerm, TextNormalizer};
pub use lowercase::LowercaseFilter;
pub use remove_duplicates::RemoveDuplicatesFilter;
pub use skos_label::SkosLabelFilter;
pub use skos_uri::SkosUriFilter;
pub use stop::StopFilter;
