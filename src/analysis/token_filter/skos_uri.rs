//! Expansion of fields that already hold concept identifiers.

use std::sync::Arc;

use crate::analysis::token::{Token, TokenStream};
use crate::analysis::token_filter::Filter;
use crate::analysis::token_filter::expansion::{
    ExpansionState, Expander, PendingTerms, TextNormalizer,
};
use crate::analysis::token_filter::skos_label::DEFAULT_MAX_TOKEN_LENGTH;
use crate::error::Result;
use crate::skos::engine::SkosEngine;
use crate::skos::types::{DEFAULT_EXPANSION_TYPES, SkosType};

/// Treats each token as a concept identifier and injects that concept's
/// labels after it.
///
/// Unknown identifiers, and identifiers longer than the maximum token
/// length, pass through without expansion.
#[derive(Clone)]
pub struct SkosUriFilter {
    engine: Arc<dyn SkosEngine>,
    types: Vec<SkosType>,
    max_token_length: usize,
    normalizer: Option<Arc<dyn TextNormalizer>>,
}

impl SkosUriFilter {
    pub fn new(engine: Arc<dyn SkosEngine>) -> Self {
        SkosUriFilter {
            engine,
            types: DEFAULT_EXPANSION_TYPES.to_vec(),
            max_token_length: DEFAULT_MAX_TOKEN_LENGTH,
            normalizer: None,
        }
    }

    pub fn with_types(mut self, types: Vec<SkosType>) -> Self {
        self.types = types;
        self
    }

    /// Identifiers longer than this many characters are not looked up.
    pub fn with_max_token_length(mut self, max_token_length: usize) -> Self {
        self.max_token_length = max_token_length;
        self
    }

    pub fn with_normalizer(mut self, normalizer: Arc<dyn TextNormalizer>) -> Self {
        self.normalizer = Some(normalizer);
        self
    }

    pub fn types(&self) -> &[SkosType] {
        &self.types
    }

    pub fn max_token_length(&self) -> usize {
        self.max_token_length
    }
}

impl Filter for SkosUriFilter {
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream> {
        Ok(Box::new(UriExpansion {
            upstream: tokens,
            expander: Expander {
                engine: Arc::clone(&self.engine),
                types: self.types.as_slice().into(),
                normalizer: self.normalizer.clone(),
                keep_identical_preferred: false,
            },
            max_token_length: self.max_token_length,
            pending: PendingTerms::default(),
            state: ExpansionState::Passthrough,
        }))
    }

    fn name(&self) -> &'static str {
        "skos_uri"
    }
}

impl std::fmt::Debug for SkosUriFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SkosUriFilter")
            .field("types", &self.types)
            .field("max_token_length", &self.max_token_length)
            .finish()
    }
}

struct UriExpansion {
    upstream: TokenStream,
    expander: Expander,
    max_token_length: usize,
    pending: PendingTerms,
    state: ExpansionState,
}

impl Iterator for UriExpansion {
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

        let token = self.upstream.next()?;
        if token.text.chars().count() > self.max_token_length {
            return Some(token);
        }

        let concept = token.text.trim().to_string();
        let terms = self.expander.expand(
            &[concept],
            &token.text,
            token.start_offset,
            token.end_offset,
            1,
        );

        if !terms.is_empty() {
            self.pending.push_all(terms, token.position);
            self.state = ExpansionState::Emitting;
        }

        Some(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skos::store::{ConceptStoreBuilder, StoreConfig};
    use crate::skos::types::{LabelKind, RelationKind};

    fn store() -> Arc<dyn SkosEngine> {
        let mut builder = ConceptStoreBuilder::new(StoreConfig::default());
        builder.add_label("http://example.org/dog", LabelKind::Preferred, "Dog", None);
        builder.add_label("http://example.org/dog", LabelKind::Alternate, "hound", None);
        builder.add_label("http://example.org/animal", LabelKind::Preferred, "animal", None);
        builder.add_relation(
            "http://example.org/dog",
            RelationKind::Broader,
            "http://example.org/animal",
        );
        Arc::new(builder.build())
    }

    fn run(filter: &SkosUriFilter, uri: &str) -> Vec<Token> {
        let tokens = vec![Token::with_offsets(uri, 0, 0, uri.len())];
        filter.filter(Box::new(tokens.into_iter())).unwrap().collect()
    }

    #[test]
    fn test_uri_expansion() {
        let filter = SkosUriFilter::new(store()).with_types(vec![
            SkosType::Pref,
            SkosType::Alt,
            SkosType::Broader,
        ]);
        let result = run(&filter, "http://example.org/dog");
        let texts: Vec<&str> = result.iter().map(|t| t.text.as_str()).collect();

        assert_eq!(texts, vec!["http://example.org/dog", "dog", "hound", "animal"]);
        assert_eq!(result[1].skos_type, Some(SkosType::Pref));
        assert_eq!(result[2].skos_type, Some(SkosType::Alt));
        assert_eq!(result[3].skos_type, Some(SkosType::Broader));
        assert!(result[1..].iter().all(|t| t.position == 0 && t.position_increment == 0));
        assert_eq!(result[3].end_offset, 22);
    }

    #[test]
    fn test_identifiers_are_case_sensitive() {
        let filter = SkosUriFilter::new(store());
        assert_eq!(run(&filter, "http://example.org/DOG").len(), 1);
    }

    #[test]
    fn test_long_identifiers_are_not_looked_up() {
        let filter = SkosUriFilter::new(store()).with_max_token_length(10);
        let result = run(&filter, "http://example.org/dog");

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].text, "http://example.org/dog");
        assert!(result[0].skos_type.is_none());

        let filter = SkosUriFilter::new(store()).with_max_token_length(22);
        assert!(run(&filter, "http://example.org/dog").len() > 1);
    }

    #[test]
    fn test_unknown_uri_passes_through() {
        let filter = SkosUriFilter::new(store()).with_types(vec![SkosType::Alt]);
        let result = run(&filter, "http://example.org/unicorn");

        assert_eq!(result.len(), 1);
        assert!(result[0].skos_type.is_none());
    }
}
