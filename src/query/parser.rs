//! Query parsing through a vocabulary-expanding analyzer.
//!
//! The query string is analyzed like document text, so every word brings
//! its expansions along at the same position. Tokens sharing a position
//! become one synonym group:
//!
//! - unquoted input gives a SHOULD [`BooleanQuery`] with one clause per
//!   position, either a [`TermQuery`] or a nested SHOULD group;
//! - quoted input gives a [`PhraseQuery`], or a [`MultiPhraseQuery`] when a
//!   position holds more than one term. Positions left empty by removed stop
//!   words stay as gaps in the phrase.
//!
//! The configured [`RelationBoost`] is applied to the result.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//!
//! use sarissa_skos::analysis::analyzer::{SkosAnalyzer, SkosAnalyzerConfig};
//! use sarissa_skos::query::{RelationBoost, SkosQueryParser};
//! use sarissa_skos::skos::{ConceptStoreBuilder, LabelKind, SkosEngine, SkosType, StoreConfig};
//!
//! let mut builder = ConceptStoreBuilder::new(StoreConfig::default());
//! builder.add_label("ex:1", LabelKind::Preferred, "jumps", None);
//! builder.add_label("ex:1", LabelKind::Alternate, "leaps", None);
//! let store: Arc<dyn SkosEngine> = Arc::new(builder.build());
//!
//! let analyzer = SkosAnalyzer::new(store, SkosAnalyzerConfig::default()).unwrap();
//! let parser = SkosQueryParser::new(Arc::new(analyzer), "content")
//!     .with_relation_boost(RelationBoost::new().with_boost(SkosType::Alt, 0.5));
//!
//! let query = parser.parse("fox jumps").unwrap();
//! assert_eq!(query.description(), "(content:fox (content:jumps content:leaps^0.5))");
//!
//! let phrase = parser.parse("\"fox jumps\"").unwrap();
//! assert_eq!(phrase.description(), "content:\"fox (jumps leaps)\"");
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

use log::debug;

use crate::analysis::analyzer::Analyzer;
use crate::analysis::token::Token;
use crate::error::Result;
use crate::query::boolean::BooleanQuery;
use crate::query::phrase::{MultiPhraseQuery, PhraseQuery};
use crate::query::query::Query;
use crate::query::relation_boost::RelationBoost;
use crate::query::term::TermQuery;

/// Builds query trees from query strings with an expanding analyzer.
pub struct SkosQueryParser {
    analyzer: Arc<dyn Analyzer>,
    field: String,
    relation_boost: RelationBoost,
}

impl SkosQueryParser {
    pub fn new<F: Into<String>>(analyzer: Arc<dyn Analyzer>, field: F) -> Self {
        SkosQueryParser {
            analyzer,
            field: field.into(),
            relation_boost: RelationBoost::new(),
        }
    }

    pub fn with_relation_boost(mut self, relation_boost: RelationBoost) -> Self {
        self.relation_boost = relation_boost;
        self
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    /// Parse a query string against the default field.
    pub fn parse(&self, input: &str) -> Result<Box<dyn Query>> {
        self.parse_field(&self.field, input)
    }

    /// Parse a query string against `field`.
    pub fn parse_field(&self, field: &str, input: &str) -> Result<Box<dyn Query>> {
        let input = input.trim();

        let mut query = match input
            .strip_prefix('"')
            .and_then(|rest| rest.strip_suffix('"'))
        {
            Some(phrase) => self.phrase_query(field, phrase)?,
            None => self.boolean_query(field, input)?,
        };

        self.relation_boost.apply(query.as_mut());
        debug!("Parsed {input:?} as {}", query.description());
        Ok(query)
    }

    /// Analyzed tokens grouped by position, in position order. Each group is
    /// paired with its position relative to the first group.
    fn positions(&self, text: &str) -> Result<Vec<(usize, Vec<Token>)>> {
        let mut groups: BTreeMap<usize, Vec<Token>> = BTreeMap::new();
        for token in self.analyzer.analyze(text)? {
            groups.entry(token.position).or_default().push(token);
        }

        let first = groups.keys().next().copied().unwrap_or(0);
        Ok(groups
            .into_iter()
            .map(|(position, group)| (position - first, group))
            .collect())
    }

    fn boolean_query(&self, field: &str, text: &str) -> Result<Box<dyn Query>> {
        let mut clauses: Vec<Box<dyn Query>> = self
            .positions(text)?
            .into_iter()
            .map(|(_, group)| synonym_group(field, group))
            .collect();

        if clauses.len() == 1 {
            if let Some(only) = clauses.pop() {
                return Ok(only);
            }
        }

        let mut query = BooleanQuery::new();
        for clause in clauses {
            query.add_should(clause);
        }
        Ok(Box::new(query))
    }

    fn phrase_query(&self, field: &str, text: &str) -> Result<Box<dyn Query>> {
        let positions: Vec<(usize, Vec<String>)> = self
            .positions(text)?
            .into_iter()
            .map(|(position, group)| (position, group.into_iter().map(|t| t.text).collect()))
            .collect();

        if positions.iter().all(|(_, terms)| terms.len() == 1) {
            let mut query = PhraseQuery::empty(field);
            for (position, terms) in positions {
                for term in terms {
                    query.add_term(term, position);
                }
            }
            return Ok(Box::new(query));
        }

        let mut query = MultiPhraseQuery::new(field);
        for (position, terms) in positions {
            query.add_position_at(terms, position);
        }
        Ok(Box::new(query))
    }
}

/// A single term, or a SHOULD group over the terms sharing one position.
fn synonym_group(field: &str, group: Vec<Token>) -> Box<dyn Query> {
    let mut terms: Vec<Box<dyn Query>> = group
        .into_iter()
        .map(|token| {
            Box::new(TermQuery::new(field, token.text).with_skos_type(token.skos_type))
                as Box<dyn Query>
        })
        .collect();

    if terms.len() == 1 {
        if let Some(only) = terms.pop() {
            return only;
        }
    }

    let mut query = BooleanQuery::new();
    for term in terms {
        query.add_should(term);
    }
    Box::new(query)
}

impl std::fmt::Debug for SkosQueryParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SkosQueryParser")
            .field("analyzer", &self.analyzer.name())
            .field("field", &self.field)
            .field("relation_boost", &self.relation_boost)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyzer::{SkosAnalyzer, SkosAnalyzerConfig};
    use crate::skos::engine::SkosEngine;
    use crate::skos::store::{ConceptStoreBuilder, StoreConfig};
    use crate::skos::types::{LabelKind, RelationKind, SkosType};

    fn parser() -> SkosQueryParser {
        let mut builder = ConceptStoreBuilder::new(StoreConfig::default());
        builder.add_label("ex:1", LabelKind::Preferred, "jumps", None);
        builder.add_label("ex:1", LabelKind::Alternate, "hops", None);
        builder.add_label("ex:1", LabelKind::Alternate, "leaps", None);
        builder.add_label("ex:2", LabelKind::Preferred, "movement", None);
        builder.add_relation("ex:1", RelationKind::Broader, "ex:2");
        let store: Arc<dyn SkosEngine> = Arc::new(builder.build());

        let config = SkosAnalyzerConfig::default().with_types(vec![
            SkosType::Alt,
            SkosType::Broader,
        ]);
        let analyzer = SkosAnalyzer::new(store, config).unwrap();
        let boost = RelationBoost::new()
            .with_boost(SkosType::Alt, 0.5)
            .with_boost(SkosType::Broader, 0.25);

        SkosQueryParser::new(Arc::new(analyzer), "content").with_relation_boost(boost)
    }

    #[test]
    fn test_boolean_with_synonym_group() {
        let query = parser().parse("the fox jumps").unwrap();
        assert_eq!(
            query.description(),
            "(content:fox (content:jumps content:hops^0.5 content:leaps^0.5 content:movement^0.25))"
        );
    }

    #[test]
    fn test_single_term() {
        let query = parser().parse("fox").unwrap();
        assert_eq!(query.description(), "content:fox");
        assert!(query.as_any().downcast_ref::<TermQuery>().is_some());
    }

    #[test]
    fn test_phrase() {
        let parser = parser();
        let query = parser.parse("\"quick fox\"").unwrap();
        assert_eq!(query.description(), "content:\"quick fox\"");

        let query = parser.parse_field("title", "\"fox jumps\"").unwrap();
        assert_eq!(
            query.description(),
            "title:\"fox (jumps hops leaps movement)\""
        );
        assert!(query.as_any().downcast_ref::<MultiPhraseQuery>().is_some());
    }

    #[test]
    fn test_phrase_keeps_stop_word_gaps() {
        let parser = parser();
        let query = parser.parse("\"lazy the dog\"").unwrap();
        assert_eq!(query.description(), "content:\"lazy ? dog\"");
        let phrase = query.as_any().downcast_ref::<PhraseQuery>().unwrap();
        assert_eq!(phrase.positions(), &[0, 2]);

        let query = parser.parse("\"the fox a jumps\"").unwrap();
        assert_eq!(
            query.description(),
            "content:\"fox ? (jumps hops leaps movement)\""
        );
        let multi = query.as_any().downcast_ref::<MultiPhraseQuery>().unwrap();
        assert_eq!(multi.positions(), &[0, 2]);
    }

    #[test]
    fn test_empty_query() {
        let query = parser().parse("  the  ").unwrap();
        assert_eq!(query.description(), "()");
    }
}
