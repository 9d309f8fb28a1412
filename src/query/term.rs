//! Single-term query.

use crate::query::query::Query;
use crate::skos::types::SkosType;

/// Matches one term in one field.
#[derive(Debug, Clone, PartialEq)]
pub struct TermQuery {
    field: String,
    term: String,
    boost: f32,
    skos_type: Option<SkosType>,
}

impl TermQuery {
    pub fn new<F, T>(field: F, term: T) -> Self
    where
        F: Into<String>,
        T: Into<String>,
    {
        TermQuery {
            field: field.into(),
            term: term.into(),
            boost: 1.0,
            skos_type: None,
        }
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn with_boost(mut self, boost: f32) -> Self {
        self.boost = boost;
        self
    }

    /// Record that the term came from a vocabulary expansion.
    pub fn with_skos_type(mut self, skos_type: Option<SkosType>) -> Self {
        self.skos_type = skos_type;
        self
    }
}

impl Query for TermQuery {
    fn boost(&self) -> f32 {
        self.boost
    }

    fn set_boost(&mut self, boost: f32) {
        self.boost = boost;
    }

    fn description(&self) -> String {
        if self.boost == 1.0 {
            format!("{}:{}", self.field, self.term)
        } else {
            format!("{}:{}^{}", self.field, self.term, self.boost)
        }
    }

    fn clone_box(&self) -> Box<dyn Query> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn field(&self) -> Option<&str> {
        Some(&self.field)
    }

    fn skos_type(&self) -> Option<SkosType> {
        self.skos_type
    }
}
