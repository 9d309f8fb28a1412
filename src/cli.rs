//! Command line interface for inspecting vocabularies and expansions.

pub mod args;
pub mod commands;
pub mod output;

pub use args::*;
pub use commands::*;
pub use output::*;
