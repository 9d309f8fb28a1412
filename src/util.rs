//! Utility modules shared across the SKOS components.

pub mod varint;
