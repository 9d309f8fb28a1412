//! Query trees built from analyzed, expanded text.
//!
//! [`SkosQueryParser`](parser::SkosQueryParser) turns a query string into a
//! tree whose leaves remember which vocabulary relation produced them, and
//! [`RelationBoost`](relation_boost::RelationBoost) reweights those leaves.

pub mod boolean;
pub mod parser;
pub mod phrase;
pub mod query;
pub mod relation_boost;
pub mod term;

pub use boolean::{BooleanClause, BooleanQuery, Occur};
pub use parser::SkosQueryParser;
pub use phrase::{MultiPhraseQuery, PhraseQuery};
pub use query::Query;
pub use relation_boost::RelationBoost;
pub use term::TermQuery;
