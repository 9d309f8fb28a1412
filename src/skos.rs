//! The concept graph store.
//!
//! A vocabulary is loaded once into a [`ConceptStore`] (or reopened from a
//! persisted segment as a [`PersistedConceptStore`]) and then shared
//! read-only, usually as an `Arc<dyn SkosEngine>`, by every analyzer that
//! expands terms against it.
//!
//! # Examples
//!
//! ```
//! use sarissa_skos::skos::{ConceptStoreBuilder, LabelKind, SkosEngine, StoreConfig};
//!
//! let mut builder = ConceptStoreBuilder::new(StoreConfig::default());
//! builder.add_label("http://example.org/1", LabelKind::Preferred, "jumps", None);
//! builder.add_label("http://example.org/1", LabelKind::Alternate, "leaps", None);
//! let store = builder.build();
//!
//! assert_eq!(store.alt_terms("Jumps").unwrap(), vec!["leaps"]);
//! ```

pub mod cache;
pub mod engine;
pub mod segment;
pub mod store;
pub mod types;
pub mod vocabulary;

pub use cache::{StoreCache, StoreKey};
pub use engine::{ConceptId, SkosEngine};
pub use segment::PersistedConceptStore;
pub use store::{ConceptRecord, ConceptStore, ConceptStoreBuilder, StoreConfig, normalize_label};
pub use types::{DEFAULT_EXPANSION_TYPES, LabelKind, RelationKind, SkosType};
