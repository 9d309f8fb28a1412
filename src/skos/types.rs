//! The SKOS label and relation taxonomy.
//!
//! [`LabelKind`] and [`RelationKind`] describe the two halves of a concept
//! record. [`SkosType`] unifies them into one closed enum with stable
//! ordinals, which is what expansion tokens carry and what the one-byte
//! token payload encodes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SkosError};

/// The kind of a concept label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LabelKind {
    /// The canonical label (`skos:prefLabel`).
    Preferred,
    /// A synonym (`skos:altLabel`).
    Alternate,
    /// A non-displayed synonym, e.g. a common misspelling (`skos:hiddenLabel`).
    Hidden,
}

impl LabelKind {
    /// All label kinds in ordinal order.
    pub const ALL: [LabelKind; 3] = [LabelKind::Preferred, LabelKind::Alternate, LabelKind::Hidden];

    /// Index of this kind within [`LabelKind::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }
}

/// The kind of a directed edge between two concepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelationKind {
    Broader,
    Narrower,
    BroaderTransitive,
    NarrowerTransitive,
    Related,
}

impl RelationKind {
    /// All relation kinds in ordinal order.
    pub const ALL: [RelationKind; 5] = [
        RelationKind::Broader,
        RelationKind::Narrower,
        RelationKind::BroaderTransitive,
        RelationKind::NarrowerTransitive,
        RelationKind::Related,
    ];

    /// Index of this kind within [`RelationKind::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// The transitive counterpart of a direct hierarchy relation.
    pub fn transitive(self) -> Option<RelationKind> {
        match self {
            RelationKind::Broader => Some(RelationKind::BroaderTransitive),
            RelationKind::Narrower => Some(RelationKind::NarrowerTransitive),
            _ => None,
        }
    }
}

/// A label kind or relation kind, as attached to expansion terms.
///
/// The discriminants are stable and are what [`SkosType::to_payload`] writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SkosType {
    Pref = 0,
    Alt = 1,
    Hidden = 2,
    Broader = 3,
    Narrower = 4,
    BroaderTransitive = 5,
    NarrowerTransitive = 6,
    Related = 7,
}

/// Expansion types used when none are configured.
pub const DEFAULT_EXPANSION_TYPES: [SkosType; 6] = [
    SkosType::Pref,
    SkosType::Alt,
    SkosType::Broader,
    SkosType::BroaderTransitive,
    SkosType::Narrower,
    SkosType::NarrowerTransitive,
];

impl SkosType {
    /// All types in ordinal order.
    pub const ALL: [SkosType; 8] = [
        SkosType::Pref,
        SkosType::Alt,
        SkosType::Hidden,
        SkosType::Broader,
        SkosType::Narrower,
        SkosType::BroaderTransitive,
        SkosType::NarrowerTransitive,
        SkosType::Related,
    ];

    /// The stable ordinal of this type.
    pub fn ordinal(self) -> u8 {
        self as u8
    }

    /// Look up a type by ordinal.
    pub fn from_ordinal(ordinal: u8) -> Option<SkosType> {
        SkosType::ALL.get(ordinal as usize).copied()
    }

    /// Encode this type as a one-byte token payload.
    pub fn to_payload(self) -> [u8; 1] {
        [self.ordinal()]
    }

    /// Decode a token payload. Anything other than a single known ordinal is `None`.
    pub fn from_payload(payload: &[u8]) -> Option<SkosType> {
        match payload {
            [ordinal] => SkosType::from_ordinal(*ordinal),
            _ => None,
        }
    }

    /// The label kind this type reads, if it is a label type.
    pub fn label_kind(self) -> Option<LabelKind> {
        match self {
            SkosType::Pref => Some(LabelKind::Preferred),
            SkosType::Alt => Some(LabelKind::Alternate),
            SkosType::Hidden => Some(LabelKind::Hidden),
            _ => None,
        }
    }

    /// The relation kind this type follows, if it is a relation type.
    pub fn relation_kind(self) -> Option<RelationKind> {
        match self {
            SkosType::Broader => Some(RelationKind::Broader),
            SkosType::Narrower => Some(RelationKind::Narrower),
            SkosType::BroaderTransitive => Some(RelationKind::BroaderTransitive),
            SkosType::NarrowerTransitive => Some(RelationKind::NarrowerTransitive),
            SkosType::Related => Some(RelationKind::Related),
            _ => None,
        }
    }

    /// The canonical upper-case name, e.g. `BROADER_TRANSITIVE`.
    pub fn name(self) -> &'static str {
        match self {
            SkosType::Pref => "PREF",
            SkosType::Alt => "ALT",
            SkosType::Hidden => "HIDDEN",
            SkosType::Broader => "BROADER",
            SkosType::Narrower => "NARROWER",
            SkosType::BroaderTransitive => "BROADER_TRANSITIVE",
            SkosType::NarrowerTransitive => "NARROWER_TRANSITIVE",
            SkosType::Related => "RELATED",
        }
    }
}

impl From<LabelKind> for SkosType {
    fn from(kind: LabelKind) -> Self {
        match kind {
            LabelKind::Preferred => SkosType::Pref,
            LabelKind::Alternate => SkosType::Alt,
            LabelKind::Hidden => SkosType::Hidden,
        }
    }
}

impl From<RelationKind> for SkosType {
    fn from(kind: RelationKind) -> Self {
        match kind {
            RelationKind::Broader => SkosType::Broader,
            RelationKind::Narrower => SkosType::Narrower,
            RelationKind::BroaderTransitive => SkosType::BroaderTransitive,
            RelationKind::NarrowerTransitive => SkosType::NarrowerTransitive,
            RelationKind::Related => SkosType::Related,
        }
    }
}

impl fmt::Display for SkosType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SkosType {
    type Err = SkosError;

    /// Accepts the canonical names case-insensitively, with or without
    /// underscores, plus the SKOS property names (`prefLabel`, `broader`, ...).
    fn from_str(s: &str) -> Result<Self> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_ascii_lowercase();

        match normalized.as_str() {
            "pref" | "preflabel" | "preferred" => Ok(SkosType::Pref),
            "alt" | "altlabel" | "alternate" => Ok(SkosType::Alt),
            "hidden" | "hiddenlabel" => Ok(SkosType::Hidden),
            "broader" => Ok(SkosType::Broader),
            "narrower" => Ok(SkosType::Narrower),
            "broadertransitive" => Ok(SkosType::BroaderTransitive),
            "narrowertransitive" => Ok(SkosType::NarrowerTransitive),
            "related" => Ok(SkosType::Related),
            _ => Err(SkosError::invalid_argument(format!("unknown SKOS type: {s}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stable_ordinals() {
        assert_eq!(SkosType::Pref.ordinal(), 0);
        assert_eq!(SkosType::Alt.ordinal(), 1);
        assert_eq!(SkosType::Hidden.ordinal(), 2);
        assert_eq!(SkosType::Broader.ordinal(), 3);
        assert_eq!(SkosType::Narrower.ordinal(), 4);
        assert_eq!(SkosType::BroaderTransitive.ordinal(), 5);
        assert_eq!(SkosType::NarrowerTransitive.ordinal(), 6);
        assert_eq!(SkosType::Related.ordinal(), 7);

        for skos_type in SkosType::ALL {
            assert_eq!(SkosType::from_ordinal(skos_type.ordinal()), Some(skos_type));
        }
        assert_eq!(SkosType::from_ordinal(8), None);
    }

    #[test]
    fn test_payload() {
        assert_eq!(SkosType::Alt.to_payload(), [1]);
        assert_eq!(SkosType::from_payload(&[6]), Some(SkosType::NarrowerTransitive));
        assert_eq!(SkosType::from_payload(&[]), None);
        assert_eq!(SkosType::from_payload(&[1, 2]), None);
        assert_eq!(SkosType::from_payload(&[200]), None);
    }

    #[test]
    fn test_kind_conversions() {
        for kind in LabelKind::ALL {
            assert_eq!(SkosType::from(kind).label_kind(), Some(kind));
        }
        for kind in RelationKind::ALL {
            assert_eq!(SkosType::from(kind).relation_kind(), Some(kind));
        }
        assert_eq!(SkosType::Pref.relation_kind(), None);
        assert_eq!(SkosType::Related.label_kind(), None);
        assert_eq!(
            RelationKind::Narrower.transitive(),
            Some(RelationKind::NarrowerTransitive)
        );
        assert_eq!(RelationKind::Related.transitive(), None);
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("PREF".parse::<SkosType>().unwrap(), SkosType::Pref);
        assert_eq!("altLabel".parse::<SkosType>().unwrap(), SkosType::Alt);
        assert_eq!(
            "broader_transitive".parse::<SkosType>().unwrap(),
            SkosType::BroaderTransitive
        );
        assert_eq!(
            "narrowerTransitive".parse::<SkosType>().unwrap(),
            SkosType::NarrowerTransitive
        );
        assert!("cousin".parse::<SkosType>().is_err());
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&SkosType::BroaderTransitive).unwrap();
        assert_eq!(json, "\"BROADER_TRANSITIVE\"");

        let parsed: SkosType = serde_json::from_str("\"ALT\"").unwrap();
        assert_eq!(parsed, SkosType::Alt);
    }
}
