//! Shared machinery for the vocabulary expansion filters.
//!
//! Both expansion filters run the same two-state machine. In PASSTHROUGH
//! the next upstream token is returned unchanged, after any expansions
//! found for it have been pushed onto a pending stack. While that stack is
//! non-empty the stream is EMITTING: each pull pops one [`ExpandedTerm`]
//! and returns it stamped with the anchor token's position and a position
//! increment of 0.

use std::sync::Arc;

use log::{debug, warn};

use crate::analysis::analyzer::Analyzer;
use crate::analysis::token::Token;
use crate::error::{Result, SkosError};
use crate::skos::engine::SkosEngine;
use crate::skos::store::normalize_label;
use crate::skos::types::SkosType;

/// A label waiting to be emitted for the current anchor.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpandedTerm {
    pub text: String,
    pub skos_type: SkosType,
    /// Start offset of the matched window.
    pub start_offset: usize,
    /// End offset of the matched window.
    pub end_offset: usize,
    /// Number of input tokens the matched window spans.
    pub width: usize,
}

impl ExpandedTerm {
    /// The token emitted for this term, stacked on the anchor at `position`.
    pub fn into_token(self, position: usize) -> Token {
        Token::with_offsets(self.text, position, self.start_offset, self.end_offset)
            .with_position_increment(0)
            .with_position_length(self.width)
            .with_skos_type(self.skos_type)
    }
}

/// Brings expansion labels into the same shape as analyzed input text.
pub trait TextNormalizer: Send + Sync {
    /// Normalize `text`. Fails when nothing is left of it.
    fn normalize(&self, text: &str) -> Result<String>;
}

/// A [`TextNormalizer`] that runs an [`Analyzer`] and joins the resulting
/// tokens with single spaces.
#[derive(Clone)]
pub struct AnalyzerNormalizer {
    analyzer: Arc<dyn Analyzer>,
}

impl AnalyzerNormalizer {
    pub fn new(analyzer: Arc<dyn Analyzer>) -> Self {
        AnalyzerNormalizer { analyzer }
    }
}

impl TextNormalizer for AnalyzerNormalizer {
    fn normalize(&self, text: &str) -> Result<String> {
        let mut terms = Vec::new();
        for token in self.analyzer.analyze(text)? {
            if token.is_empty() {
                return Err(SkosError::analysis(format!(
                    "Empty token while normalizing {text:?}"
                )));
            }
            if !token.is_stopped() {
                terms.push(token.text);
            }
        }

        if terms.is_empty() {
            return Err(SkosError::analysis(format!(
                "{text:?} normalized to nothing"
            )));
        }

        Ok(terms.join(" "))
    }
}

impl std::fmt::Debug for AnalyzerNormalizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalyzerNormalizer")
            .field("analyzer", &self.analyzer.name())
            .finish()
    }
}

/// Looks up the expansion labels of matched concepts.
#[derive(Clone)]
pub(crate) struct Expander {
    pub(crate) engine: Arc<dyn SkosEngine>,
    pub(crate) types: Arc<[SkosType]>,
    pub(crate) normalizer: Option<Arc<dyn TextNormalizer>>,
    pub(crate) keep_identical_preferred: bool,
}

impl Expander {
    /// Expansion terms for `concepts` matched by the window covering
    /// `start..end`, in push order: concept, then configured type, then label.
    pub(crate) fn expand(
        &self,
        concepts: &[String],
        window_text: &str,
        start_offset: usize,
        end_offset: usize,
        width: usize,
    ) -> Vec<ExpandedTerm> {
        let window = normalize_label(window_text);
        let mut terms = Vec::new();

        for concept in concepts {
            for &skos_type in self.types.iter() {
                let labels = match self.engine.expansion_labels(concept, skos_type) {
                    Ok(labels) => labels,
                    Err(e) => {
                        warn!("No {skos_type} expansion for {concept}: {e}");
                        continue;
                    }
                };

                for label in labels {
                    if label == window
                        && !(self.keep_identical_preferred && skos_type == SkosType::Pref)
                    {
                        continue;
                    }

                    let text = match &self.normalizer {
                        Some(normalizer) => match normalizer.normalize(&label) {
                            Ok(text) => text,
                            Err(e) => {
                                debug!("Dropping expansion {label:?} of {concept}: {e}");
                                continue;
                            }
                        },
                        None => label,
                    };

                    terms.push(ExpandedTerm {
                        text,
                        skos_type,
                        start_offset,
                        end_offset,
                        width,
                    });
                }
            }
        }

        terms
    }
}

/// Expansion terms waiting to be emitted for one anchor.
#[derive(Debug, Default)]
pub(crate) struct PendingTerms {
    stack: Vec<ExpandedTerm>,
    position: usize,
}

impl PendingTerms {
    /// Replace the pending terms with `terms`, anchored at `position`.
    /// Terms pop in the order given.
    pub(crate) fn push_all(&mut self, mut terms: Vec<ExpandedTerm>, position: usize) {
        terms.reverse();
        self.stack = terms;
        self.position = position;
    }

    pub(crate) fn pop(&mut self) -> Option<Token> {
        self.stack.pop().map(|term| term.into_token(self.position))
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }
}

/// State of an expansion stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ExpansionState {
    Passthrough,
    Emitting,
}
