//! Text analysis with vocabulary expansion.
//!
//! Analysis turns text into a [`TokenStream`](token::TokenStream): a
//! [`Tokenizer`](tokenizer::Tokenizer) splits the input, then a chain of
//! [`Filter`](token_filter::Filter)s rewrites the stream. The SKOS filters in
//! [`token_filter`] inject vocabulary labels at the position of the text they
//! were matched against, so a phrase over the literal words also matches the
//! same phrase over their synonyms.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//!
//! use sarissa_skos::analysis::analyzer::{Analyzer, SkosAnalyzer, SkosAnalyzerConfig};
//! use sarissa_skos::skos::{ConceptStoreBuilder, LabelKind, SkosEngine, StoreConfig};
//!
//! let mut builder = ConceptStoreBuilder::new(StoreConfig::default());
//! builder.add_label("ex:1", LabelKind::Preferred, "jumps", None);
//! builder.add_label("ex:1", LabelKind::Alternate, "leaps", None);
//! let store: Arc<dyn SkosEngine> = Arc::new(builder.build());
//!
//! let analyzer = SkosAnalyzer::new(store, SkosAnalyzerConfig::default()).unwrap();
//! let texts: Vec<String> = analyzer
//!     .analyze("The fox jumps")
//!     .unwrap()
//!     .map(|t| t.text)
//!     .collect();
//!
//! assert_eq!(texts, vec!["fox", "jumps", "leaps"]);
//! ```

pub mod analyzer;
pub mod batch;
pub mod token;
pub mod token_filter;
pub mod tokenizer;

pub use analyzer::{Analyzer, ExpansionType, PipelineAnalyzer, SkosAnalyzer, SkosAnalyzerConfig};
pub use token::{IntoTokenStream, Token, TokenStream};
pub use token_filter::Filter;
pub use tokenizer::Tokenizer;
