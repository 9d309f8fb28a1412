//! Reweighting of expanded query terms by vocabulary relation.
//!
//! # Examples
//!
//! ```
//! use sarissa_skos::query::{Query, RelationBoost, TermQuery};
//! use sarissa_skos::skos::SkosType;
//!
//! let boost = RelationBoost::new().with_boost(SkosType::Broader, 0.5);
//! let mut query = TermQuery::new("body", "animal").with_skos_type(Some(SkosType::Broader));
//!
//! boost.apply(&mut query);
//! assert_eq!(query.description(), "body:animal^0.5");
//! ```

use ahash::AHashMap;

use crate::query::query::Query;
use crate::skos::types::SkosType;

/// Per-relation weights for query terms that came from an expansion.
///
/// Relations without a configured weight keep a factor of 1. Terms that
/// were typed in, or that are a concept's preferred label, are never
/// reweighted.
#[derive(Debug, Clone, Default)]
pub struct RelationBoost {
    boosts: AHashMap<SkosType, f32>,
}

impl RelationBoost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_boost(mut self, skos_type: SkosType, boost: f32) -> Self {
        self.boosts.insert(skos_type, boost);
        self
    }

    pub fn set_boost(&mut self, skos_type: SkosType, boost: f32) {
        self.boosts.insert(skos_type, boost);
    }

    /// Factor applied to terms expanded through `skos_type`.
    pub fn boost_for(&self, skos_type: SkosType) -> f32 {
        self.boosts.get(&skos_type).copied().unwrap_or(1.0)
    }

    pub fn is_empty(&self) -> bool {
        self.boosts.is_empty()
    }

    /// Multiply the boost of every tagged leaf in the tree by its factor.
    pub fn apply(&self, query: &mut dyn Query) {
        if let Some(skos_type) = query.skos_type() {
            if skos_type != SkosType::Pref {
                query.set_boost(query.boost() * self.boost_for(skos_type));
            }
        }

        for child in query.children_mut() {
            self.apply(child);
        }
    }
}

impl FromIterator<(SkosType, f32)> for RelationBoost {
    fn from_iter<I: IntoIterator<Item = (SkosType, f32)>>(iter: I) -> Self {
        RelationBoost {
            boosts: iter.into_iter().collect(),
        }
    }
}
