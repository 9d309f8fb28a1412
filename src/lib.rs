//! # Sarissa SKOS
//!
//! Vocabulary expansion for text analysis. A SKOS vocabulary is loaded into
//! a concept store, and analysis filters inject the preferred, alternate,
//! hidden, broader, narrower and related labels of the concepts mentioned
//! in a text at the position where they were mentioned.
//!
//! ## Features
//!
//! - Turtle and N-Triples vocabulary loading
//! - Language-filtered label index with transitive broader/narrower closure
//! - Greedy multi-word label matching with a bounded lookahead window
//! - Concept segments persisted through pluggable storage, and a store cache
//! - Query parsing with per-relation boosts

pub mod analysis;
pub mod cli;
pub mod error;
pub mod query;
pub mod rdf;
pub mod skos;
pub mod storage;
pub mod util;

pub mod prelude {
    pub use crate::analysis::analyzer::{Analyzer, ExpansionType, SkosAnalyzer, SkosAnalyzerConfig};
    pub use crate::analysis::token::{Token, TokenStream};
    pub use crate::error::{Result, SkosError};
    pub use crate::query::{Query, RelationBoost, SkosQueryParser};
    pub use crate::skos::{
        ConceptStore, ConceptStoreBuilder, LabelKind, PersistedConceptStore, RelationKind,
        SkosEngine, SkosType, StoreCache, StoreConfig,
    };
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
