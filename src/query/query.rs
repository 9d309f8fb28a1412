//! The query trait.

use std::any::Any;
use std::fmt::Debug;

use crate::skos::types::SkosType;

/// A node of a query tree.
pub trait Query: Send + Sync + Debug {
    /// Weight of this query.
    fn boost(&self) -> f32;

    /// Set the weight of this query.
    fn set_boost(&mut self, boost: f32);

    /// Human-readable form of the query, e.g. `body:dog^0.5`.
    fn description(&self) -> String;

    /// Clone this query into a box.
    fn clone_box(&self) -> Box<dyn Query>;

    fn as_any(&self) -> &dyn Any;

    /// Field this query targets, if it targets one.
    fn field(&self) -> Option<&str> {
        None
    }

    /// Vocabulary relation the query's term was expanded from.
    fn skos_type(&self) -> Option<SkosType> {
        None
    }

    /// Sub-queries, for rewriting passes that walk the tree.
    fn children_mut(&mut self) -> Vec<&mut dyn Query> {
        Vec::new()
    }
}

impl Clone for Box<dyn Query> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}
