//! The read-only query interface shared by all concept stores.

use std::fmt::Debug;

use crate::error::Result;
use crate::skos::types::{LabelKind, RelationKind, SkosType};

/// Identifier of a concept: the IRI of its resource, compared exactly.
pub type ConceptId = String;

/// Queries over a published concept store.
///
/// Unknown concept identifiers are not an error: every lookup returns an
/// empty collection for them. Errors are reserved for I/O failures of a
/// persisted store and do not invalidate the store for later calls.
pub trait SkosEngine: Send + Sync + Debug {
    /// Concepts having a preferred, alternate or hidden label equal to
    /// `text` after case folding. No duplicates, in a stable order.
    fn concepts(&self, text: &str) -> Result<Vec<ConceptId>>;

    /// Labels of one kind attached to a concept.
    fn labels(&self, concept: &str, kind: LabelKind) -> Result<Vec<String>>;

    /// Targets of the concept's edges of one kind.
    fn related_concepts(&self, concept: &str, kind: RelationKind) -> Result<Vec<ConceptId>>;

    /// Number of concepts in the store.
    fn concept_count(&self) -> usize;

    /// Number of distinct label texts in the label index.
    fn label_count(&self) -> usize;

    /// Word count of the longest indexed preferred label, at least 1.
    fn max_pref_label_terms(&self) -> usize;

    /// Preferred and alternate labels of every concept related to `concept`
    /// by `kind`, in relation order.
    fn related_labels(&self, concept: &str, kind: RelationKind) -> Result<Vec<String>> {
        let mut labels = Vec::new();
        for related in self.related_concepts(concept, kind)? {
            labels.extend(self.labels(&related, LabelKind::Preferred)?);
            labels.extend(self.labels(&related, LabelKind::Alternate)?);
        }
        Ok(labels)
    }

    /// Alternate labels of every concept denoted by `text`.
    fn alt_terms(&self, text: &str) -> Result<Vec<String>> {
        let mut terms = Vec::new();
        for concept in self.concepts(text)? {
            terms.extend(self.labels(&concept, LabelKind::Alternate)?);
        }
        Ok(terms)
    }

    /// The texts a concept expands into for one expansion type: its own
    /// labels for label types, the labels of related concepts otherwise.
    fn expansion_labels(&self, concept: &str, skos_type: SkosType) -> Result<Vec<String>> {
        if let Some(kind) = skos_type.label_kind() {
            return self.labels(concept, kind);
        }
        match skos_type.relation_kind() {
            Some(kind) => self.related_labels(concept, kind),
            None => Ok(Vec::new()),
        }
    }

    fn pref_labels(&self, concept: &str) -> Result<Vec<String>> {
        self.labels(concept, LabelKind::Preferred)
    }

    fn alt_labels(&self, concept: &str) -> Result<Vec<String>> {
        self.labels(concept, LabelKind::Alternate)
    }

    fn hidden_labels(&self, concept: &str) -> Result<Vec<String>> {
        self.labels(concept, LabelKind::Hidden)
    }

    fn broader_concepts(&self, concept: &str) -> Result<Vec<ConceptId>> {
        self.related_concepts(concept, RelationKind::Broader)
    }

    fn narrower_concepts(&self, concept: &str) -> Result<Vec<ConceptId>> {
        self.related_concepts(concept, RelationKind::Narrower)
    }

    fn broader_transitive_concepts(&self, concept: &str) -> Result<Vec<ConceptId>> {
        self.related_concepts(concept, RelationKind::BroaderTransitive)
    }

    fn narrower_transitive_concepts(&self, concept: &str) -> Result<Vec<ConceptId>> {
        self.related_concepts(concept, RelationKind::NarrowerTransitive)
    }

    fn related_concepts_of(&self, concept: &str) -> Result<Vec<ConceptId>> {
        self.related_concepts(concept, RelationKind::Related)
    }

    fn broader_labels(&self, concept: &str) -> Result<Vec<String>> {
        self.related_labels(concept, RelationKind::Broader)
    }

    fn narrower_labels(&self, concept: &str) -> Result<Vec<String>> {
        self.related_labels(concept, RelationKind::Narrower)
    }

    fn broader_transitive_labels(&self, concept: &str) -> Result<Vec<String>> {
        self.related_labels(concept, RelationKind::BroaderTransitive)
    }

    fn narrower_transitive_labels(&self, concept: &str) -> Result<Vec<String>> {
        self.related_labels(concept, RelationKind::NarrowerTransitive)
    }

    fn related_labels_of(&self, concept: &str) -> Result<Vec<String>> {
        self.related_labels(concept, RelationKind::Related)
    }
}
