//! Expansion of free text against vocabulary labels.
//!
//! [`SkosLabelFilter`] buffers up to `buffer_size` upstream tokens and looks
//! the widest window starting at the head token up in the concept store.
//! The first width with any matching concept wins: its concepts are
//! expanded and narrower windows are not tried. Only the head token is
//! consumed per step, so every input token is emitted exactly once, at its
//! original position, whatever width matched.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//!
//! use sarissa_skos::analysis::token::Token;
//! use sarissa_skos::analysis::token_filter::{Filter, SkosLabelFilter};
//! use sarissa_skos::skos::{ConceptStoreBuilder, LabelKind, SkosEngine, SkosType, StoreConfig};
//!
//! let mut builder = ConceptStoreBuilder::new(StoreConfig::default());
//! builder.add_label("ex:7", LabelKind::Preferred, "lazy dog", None);
//! builder.add_label("ex:7", LabelKind::Alternate, "odie", None);
//! let store: Arc<dyn SkosEngine> = Arc::new(builder.build());
//!
//! let filter = SkosLabelFilter::new(store)
//!     .with_types(vec![SkosType::Alt])
//!     .with_buffer_size(2)
//!     .unwrap();
//! let tokens = vec![
//!     Token::with_offsets("lazy", 0, 0, 4),
//!     Token::with_offsets("dog", 1, 5, 8),
//! ];
//!
//! let result: Vec<Token> = filter.filter(Box::new(tokens.into_iter())).unwrap().collect();
//! assert_eq!(result[1].text, "odie");
//! assert_eq!(result[1].position, 0);
//! assert_eq!((result[1].start_offset, result[1].end_offset), (0, 8));
//! ```

use std::collections::VecDeque;
use std::sync::Arc;

use log::warn;

use crate::analysis::token::{Token, TokenStream};
use crate::analysis::token_filter::Filter;
use crate::analysis::token_filter::expansion::{
    ExpandedTerm, ExpansionState, Expander, PendingTerms, TextNormalizer,
};
use crate::error::{Result, SkosError};
use crate::skos::engine::SkosEngine;
use crate::skos::types::{DEFAULT_EXPANSION_TYPES, SkosType};

/// Longest token, in characters, that takes part in a lookup by default.
pub const DEFAULT_MAX_TOKEN_LENGTH: usize = 255;

/// Injects the labels of concepts whose labels occur in the text.
#[derive(Clone)]
pub struct SkosLabelFilter {
    engine: Arc<dyn SkosEngine>,
    types: Vec<SkosType>,
    buffer_size: usize,
    max_token_length: usize,
    normalizer: Option<Arc<dyn TextNormalizer>>,
    keep_identical_preferred: bool,
}

impl SkosLabelFilter {
    /// A filter with a single-token window and the default expansion types.
    pub fn new(engine: Arc<dyn SkosEngine>) -> Self {
        SkosLabelFilter {
            engine,
            types: DEFAULT_EXPANSION_TYPES.to_vec(),
            buffer_size: 1,
            max_token_length: DEFAULT_MAX_TOKEN_LENGTH,
            normalizer: None,
            keep_identical_preferred: false,
        }
    }

    pub fn with_types(mut self, types: Vec<SkosType>) -> Self {
        self.types = types;
        self
    }

    /// Widest window, in tokens. Must be at least 1.
    pub fn with_buffer_size(mut self, buffer_size: usize) -> Result<Self> {
        if buffer_size == 0 {
            return Err(SkosError::invalid_argument("buffer size must be at least 1"));
        }
        self.buffer_size = buffer_size;
        Ok(self)
    }

    /// Size the window to fit the longest preferred label in the store.
    pub fn with_auto_buffer_size(mut self) -> Self {
        self.buffer_size = self.engine.max_pref_label_terms().max(1);
        self
    }

    pub fn with_max_token_length(mut self, max_token_length: usize) -> Self {
        self.max_token_length = max_token_length;
        self
    }

    /// Normalize expansion labels before emitting them.
    pub fn with_normalizer(mut self, normalizer: Arc<dyn TextNormalizer>) -> Self {
        self.normalizer = Some(normalizer);
        self
    }

    /// Emit a preferred label even when it equals the matched text.
    pub fn with_keep_identical_preferred(mut self, keep: bool) -> Self {
        self.keep_identical_preferred = keep;
        self
    }

    pub fn buffer_size(&self) -> usize {
        self.buffer_size
    }

    pub fn types(&self) -> &[SkosType] {
        &self.types
    }

    pub fn max_token_length(&self) -> usize {
        self.max_token_length
    }
}

impl Filter for SkosLabelFilter {
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream> {
        Ok(Box::new(LabelExpansion {
            upstream: tokens,
            expander: Expander {
                engine: Arc::clone(&self.engine),
                types: self.types.as_slice().into(),
                normalizer: self.normalizer.clone(),
                keep_identical_preferred: self.keep_identical_preferred,
            },
            buffer_size: self.buffer_size,
            max_token_length: self.max_token_length,
            buffer: VecDeque::with_capacity(self.buffer_size),
            pending: PendingTerms::default(),
            state: ExpansionState::Passthrough,
        }))
    }

    fn name(&self) -> &'static str {
        "skos_label"
    }
}

impl std::fmt::Debug for SkosLabelFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SkosLabelFilter")
            .field("types", &self.types)
            .field("buffer_size", &self.buffer_size)
            .field("max_token_length", &self.max_token_length)
            .field("keep_identical_preferred", &self.keep_identical_preferred)
            .finish()
    }
}

/// The lazy token stream produced by [`SkosLabelFilter`].
struct LabelExpansion {
    upstream: TokenStream,
    expander: Expander,
    buffer_size: usize,
    max_token_length: usize,
    buffer: VecDeque<Token>,
    pending: PendingTerms,
    state: ExpansionState,
}

impl LabelExpansion {
    fn fill_buffer(&mut self) {
        while self.buffer.len() < self.buffer_size {
            match self.upstream.next() {
                Some(token) => self.buffer.push_back(token),
                None => break,
            }
        }
    }

    fn lookup_allowed(&self, token: &Token) -> bool {
        token.text.chars().count() <= self.max_token_length
    }

    /// Expand the widest matching window that starts at the head token.
    fn match_window(&self) -> Vec<ExpandedTerm> {
        // Widths past an over-long token can never be looked up.
        let usable = self
            .buffer
            .iter()
            .take_while(|token| self.lookup_allowed(token))
            .count();

        for width in (1..=usable).rev() {
            let window: Vec<&str> = self
                .buffer
                .iter()
                .take(width)
                .map(|t| t.text.as_str())
                .collect();
            let window_text = window.join(" ");

            let concepts = match self.expander.engine.concepts(&window_text) {
                Ok(concepts) => concepts,
                Err(e) => {
                    warn!("Lookup of {window_text:?} failed: {e}");
                    continue;
                }
            };

            if !concepts.is_empty() {
                let start = self.buffer[0].start_offset;
                let end = self.buffer[width - 1].end_offset;
                return self
                    .expander
                    .expand(&concepts, &window_text, start, end, width);
            }
        }

        Vec::new()
    }
}

impl Iterator for LabelExpansion {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.state == ExpansionState::Emitting {
            if let Some(token) = self.pending.pop() {
                if self.pending.is_empty() {
                    self.state = ExpansionState::Passthrough;
                }
                return Some(token);
            }
            self.state = ExpansionState::Passthrough;
        }

        self.fill_buffer();
        if self.buffer.is_empty() {
            return None;
        }

        let terms = self.match_window();
        let head = self.buffer.pop_front()?;

        if !terms.is_empty() {
            self.pending.push_all(terms, head.position);
            self.state = ExpansionState::Emitting;
        }

        Some(head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skos::store::{ConceptStoreBuilder, StoreConfig};
    use crate::skos::types::{LabelKind, RelationKind};

    fn store() -> Arc<dyn SkosEngine> {
        let mut builder = ConceptStoreBuilder::new(StoreConfig::default());
        builder.add_label("ex:1", LabelKind::Preferred, "jumps", None);
        builder.add_label("ex:1", LabelKind::Alternate, "leaps", None);
        builder.add_label("ex:1", LabelKind::Alternate, "hops", None);
        builder.add_label("ex:7", LabelKind::Preferred, "lazy dog", None);
        builder.add_label("ex:7", LabelKind::Alternate, "odie", None);
        builder.add_label("ex:4", LabelKind::Preferred, "lazy", None);
        builder.add_label("ex:4", LabelKind::Alternate, "idle", None);
        builder.add_label("ex:5", LabelKind::Preferred, "dog", None);
        builder.add_label("ex:5", LabelKind::Alternate, "hound", None);
        builder.add_label("ex:9", LabelKind::Preferred, "animal", None);
        builder.add_relation("ex:5", RelationKind::Broader, "ex:9");
        Arc::new(builder.build())
    }

    fn run(filter: &SkosLabelFilter, words: &[&str]) -> Vec<Token> {
        let mut offset = 0;
        let tokens: Vec<Token> = words
            .iter()
            .enumerate()
            .map(|(position, word)| {
                let token = Token::with_offsets(*word, position, offset, offset + word.len());
                offset += word.len() + 1;
                token
            })
            .collect();
        filter.filter(Box::new(tokens.into_iter())).unwrap().collect()
    }

    fn texts(tokens: &[Token]) -> Vec<&str> {
        tokens.iter().map(|t| t.text.as_str()).collect()
    }

    #[test]
    fn test_single_token_expansion() {
        let filter = SkosLabelFilter::new(store()).with_types(vec![SkosType::Alt]);
        let result = run(&filter, &["jumps"]);

        assert_eq!(texts(&result), vec!["jumps", "leaps", "hops"]);
        assert!(result.iter().all(|t| t.position == 0));
        assert_eq!(result[0].position_increment, 1);
        assert!(result[0].skos_type.is_none());
        assert_eq!(result[1].position_increment, 0);
        assert_eq!(result[2].skos_type, Some(SkosType::Alt));
    }

    #[test]
    fn test_widest_window_wins() {
        let filter = SkosLabelFilter::new(store())
            .with_types(vec![SkosType::Alt])
            .with_buffer_size(2)
            .unwrap();
        let result = run(&filter, &["lazy", "dog"]);

        // "lazy dog" matches at width 2, so "lazy" alone is never expanded;
        // "dog" is looked up again once it is the head token.
        assert_eq!(texts(&result), vec!["lazy", "odie", "dog", "hound"]);
        assert_eq!(result[1].position, 0);
        assert_eq!(result[1].position_length, 2);
        assert_eq!((result[1].start_offset, result[1].end_offset), (0, 8));
        assert_eq!(result[2].position, 1);
        assert_eq!(result[2].position_increment, 1);
    }

    #[test]
    fn test_narrow_window_when_wide_misses() {
        let filter = SkosLabelFilter::new(store())
            .with_types(vec![SkosType::Alt])
            .with_buffer_size(3)
            .unwrap();
        let result = run(&filter, &["lazy", "cat"]);

        assert_eq!(texts(&result), vec!["lazy", "idle", "cat"]);
    }

    #[test]
    fn test_relation_expansion() {
        let filter = SkosLabelFilter::new(store()).with_types(vec![SkosType::Broader]);
        let result = run(&filter, &["the", "dog"]);

        assert_eq!(texts(&result), vec!["the", "dog", "animal"]);
        assert_eq!(result[2].position, 1);
        assert_eq!(result[2].payload(), Some([3]));
    }

    #[test]
    fn test_case_insensitive_lookup() {
        let filter = SkosLabelFilter::new(store()).with_types(vec![SkosType::Pref]);
        let result = run(&filter, &["Jumps"]);

        // the preferred label equals the matched text and is skipped
        assert_eq!(texts(&result), vec!["Jumps"]);

        let filter = filter.with_keep_identical_preferred(true);
        assert_eq!(texts(&run(&filter, &["Jumps"])), vec!["Jumps", "jumps"]);
    }

    #[test]
    fn test_no_match_passes_through() {
        let filter = SkosLabelFilter::new(store()).with_buffer_size(4).unwrap();
        let result = run(&filter, &["quick", "brown", "fox"]);

        assert_eq!(texts(&result), vec!["quick", "brown", "fox"]);
        assert!(result.iter().all(|t| t.position_increment == 1));
    }

    #[test]
    fn test_long_tokens_are_not_looked_up() {
        let filter = SkosLabelFilter::new(store())
            .with_types(vec![SkosType::Alt])
            .with_buffer_size(2)
            .unwrap()
            .with_max_token_length(4);
        let result = run(&filter, &["lazy", "jumps"]);

        // "jumps" exceeds the limit, so neither "lazy jumps" nor "jumps" is looked up
        assert_eq!(texts(&result), vec!["lazy", "idle", "jumps"]);
    }

    #[test]
    fn test_auto_buffer_size() {
        let filter = SkosLabelFilter::new(store()).with_auto_buffer_size();
        assert_eq!(filter.buffer_size(), 2);
    }

    #[test]
    fn test_zero_buffer_size_rejected() {
        assert!(SkosLabelFilter::new(store()).with_buffer_size(0).is_err());
    }

    #[test]
    fn test_empty_stream() {
        let filter = SkosLabelFilter::new(store());
        assert!(run(&filter, &[]).is_empty());
    }
}
