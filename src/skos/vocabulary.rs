//! IRIs of the RDF and SKOS terms the concept store understands.

use crate::skos::types::{LabelKind, RelationKind};

pub const RDF_NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
pub const SKOS_NS: &str = "http://www.w3.org/2004/02/skos/core#";
pub const XSD_NS: &str = "http://www.w3.org/2001/XMLSchema#";

pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
pub const RDF_LANG_STRING: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#langString";
pub const XSD_STRING: &str = "http://www.w3.org/2001/XMLSchema#string";
pub const XSD_INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";
pub const XSD_DECIMAL: &str = "http://www.w3.org/2001/XMLSchema#decimal";
pub const XSD_DOUBLE: &str = "http://www.w3.org/2001/XMLSchema#double";
pub const XSD_BOOLEAN: &str = "http://www.w3.org/2001/XMLSchema#boolean";

pub const SKOS_CONCEPT: &str = "http://www.w3.org/2004/02/skos/core#Concept";
pub const SKOS_PREF_LABEL: &str = "http://www.w3.org/2004/02/skos/core#prefLabel";
pub const SKOS_ALT_LABEL: &str = "http://www.w3.org/2004/02/skos/core#altLabel";
pub const SKOS_HIDDEN_LABEL: &str = "http://www.w3.org/2004/02/skos/core#hiddenLabel";
pub const SKOS_BROADER: &str = "http://www.w3.org/2004/02/skos/core#broader";
pub const SKOS_NARROWER: &str = "http://www.w3.org/2004/02/skos/core#narrower";
pub const SKOS_BROADER_TRANSITIVE: &str = "http://www.w3.org/2004/02/skos/core#broaderTransitive";
pub const SKOS_NARROWER_TRANSITIVE: &str =
    "http://www.w3.org/2004/02/skos/core#narrowerTransitive";
pub const SKOS_RELATED: &str = "http://www.w3.org/2004/02/skos/core#related";

/// The label kind a predicate IRI denotes, if any.
pub fn label_kind_of(predicate: &str) -> Option<LabelKind> {
    match predicate {
        SKOS_PREF_LABEL => Some(LabelKind::Preferred),
        SKOS_ALT_LABEL => Some(LabelKind::Alternate),
        SKOS_HIDDEN_LABEL => Some(LabelKind::Hidden),
        _ => None,
    }
}

/// The relation kind a predicate IRI denotes, if any.
pub fn relation_kind_of(predicate: &str) -> Option<RelationKind> {
    match predicate {
        SKOS_BROADER => Some(RelationKind::Broader),
        SKOS_NARROWER => Some(RelationKind::Narrower),
        SKOS_BROADER_TRANSITIVE => Some(RelationKind::BroaderTransitive),
        SKOS_NARROWER_TRANSITIVE => Some(RelationKind::NarrowerTransitive),
        SKOS_RELATED => Some(RelationKind::Related),
        _ => None,
    }
}

/// The predicate IRI for a label kind.
pub fn label_predicate(kind: LabelKind) -> &'static str {
    match kind {
        LabelKind::Preferred => SKOS_PREF_LABEL,
        LabelKind::Alternate => SKOS_ALT_LABEL,
        LabelKind::Hidden => SKOS_HIDDEN_LABEL,
    }
}

/// The predicate IRI for a relation kind.
pub fn relation_predicate(kind: RelationKind) -> &'static str {
    match kind {
        RelationKind::Broader => SKOS_BROADER,
        RelationKind::Narrower => SKOS_NARROWER,
        RelationKind::BroaderTransitive => SKOS_BROADER_TRANSITIVE,
        RelationKind::NarrowerTransitive => SKOS_NARROWER_TRANSITIVE,
        RelationKind::Related => SKOS_RELATED,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predicate_mapping() {
        for kind in LabelKind::ALL {
            assert_eq!(label_kind_of(label_predicate(kind)), Some(kind));
        }
        for kind in RelationKind::ALL {
            assert_eq!(relation_kind_of(relation_predicate(kind)), Some(kind));
        }
        assert_eq!(label_kind_of(RDF_TYPE), None);
        assert!(SKOS_CONCEPT.starts_with(SKOS_NS));
        assert!(RDF_TYPE.starts_with(RDF_NS));
        assert!(XSD_STRING.starts_with(XSD_NS));
    }
}
