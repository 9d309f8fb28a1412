//! Phrase queries over term positions.
//!
//! Each term carries its position relative to the first one, so a gap left
//! by a removed stop word stays part of the phrase. Descriptions show a gap
//! as `?`.

use crate::query::query::Query;

/// Matches terms at fixed relative positions.
#[derive(Debug, Clone, PartialEq)]
pub struct PhraseQuery {
    field: String,
    terms: Vec<String>,
    positions: Vec<usize>,
    slop: u32,
    boost: f32,
}

impl PhraseQuery {
    /// A phrase of consecutive terms.
    pub fn new<F: Into<String>>(field: F, terms: Vec<String>) -> Self {
        let positions = (0..terms.len()).collect();
        PhraseQuery {
            field: field.into(),
            terms,
            positions,
            slop: 0,
            boost: 1.0,
        }
    }

    /// An empty phrase, filled with [`add_term`](Self::add_term).
    pub fn empty<F: Into<String>>(field: F) -> Self {
        Self::new(field, Vec::new())
    }

    /// Append a term at `position`, relative to the first term. Positions
    /// must not decrease.
    pub fn add_term<S: Into<String>>(&mut self, term: S, position: usize) {
        self.terms.push(term.into());
        self.positions.push(position);
    }

    /// Allow up to `slop` position moves between the terms.
    pub fn with_slop(mut self, slop: u32) -> Self {
        self.slop = slop;
        self
    }

    pub fn with_boost(mut self, boost: f32) -> Self {
        self.boost = boost;
        self
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn positions(&self) -> &[usize] {
        &self.positions
    }

    pub fn slop(&self) -> u32 {
        self.slop
    }
}

impl Query for PhraseQuery {
    fn boost(&self) -> f32 {
        self.boost
    }

    fn set_boost(&mut self, boost: f32) {
        self.boost = boost;
    }

    fn description(&self) -> String {
        let parts = self.terms.iter().cloned();
        let phrase = format!("{}:\"{}\"", self.field, join_with_gaps(&self.positions, parts));
        decorate(phrase, self.slop, self.boost)
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
}

/// A phrase where any position may be satisfied by one of several terms,
/// as produced when a phrase word has vocabulary expansions.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiPhraseQuery {
    field: String,
    terms: Vec<Vec<String>>,
    positions: Vec<usize>,
    slop: u32,
    boost: f32,
}

impl MultiPhraseQuery {
    pub fn new<F: Into<String>>(field: F) -> Self {
        MultiPhraseQuery {
            field: field.into(),
            terms: Vec::new(),
            positions: Vec::new(),
            slop: 0,
            boost: 1.0,
        }
    }

    /// Append alternative terms at the position after the last one.
    pub fn add_position(&mut self, terms: Vec<String>) {
        let position = self.positions.last().map_or(0, |last| last + 1);
        self.add_position_at(terms, position);
    }

    /// Append alternative terms at `position`, relative to the first group.
    /// Positions must not decrease.
    pub fn add_position_at(&mut self, terms: Vec<String>, position: usize) {
        self.terms.push(terms);
        self.positions.push(position);
    }

    pub fn with_slop(mut self, slop: u32) -> Self {
        self.slop = slop;
        self
    }

    /// The alternative terms of each group.
    pub fn terms(&self) -> &[Vec<String>] {
        &self.terms
    }

    pub fn positions(&self) -> &[usize] {
        &self.positions
    }
}

impl Query for MultiPhraseQuery {
    fn boost(&self) -> f32 {
        self.boost
    }

    fn set_boost(&mut self, boost: f32) {
        self.boost = boost;
    }

    fn description(&self) -> String {
        let parts = self.terms.iter().map(|terms| match terms.as_slice() {
            [single] => single.clone(),
            _ => format!("({})", terms.join(" ")),
        });

        let phrase = format!("{}:\"{}\"", self.field, join_with_gaps(&self.positions, parts));
        decorate(phrase, self.slop, self.boost)
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
}

/// Join phrase parts with spaces, writing `?` for each skipped position.
fn join_with_gaps<I>(positions: &[usize], parts: I) -> String
where
    I: Iterator<Item = String>,
{
    let mut out: Vec<String> = Vec::new();
    let mut previous: Option<usize> = None;

    for (&position, part) in positions.iter().zip(parts) {
        if let Some(previous) = previous {
            for _ in previous + 1..position {
                out.push("?".to_string());
            }
        }
        out.push(part);
        previous = Some(position);
    }

    out.join(" ")
}

fn decorate(mut phrase: String, slop: u32, boost: f32) -> String {
    if slop > 0 {
        phrase.push_str(&format!("~{slop}"));
    }
    if boost != 1.0 {
        phrase.push_str(&format!("^{boost}"));
    }
    phrase
}
