//! Error types for the Sarissa SKOS library.
//!
//! All fallible operations return [`Result`], whose error side is the
//! [`SkosError`] enum. Vocabulary loading failures surface as
//! [`SkosError::Load`], failures
//! while reading a persisted concept store surface as [`SkosError::Query`].
//!
//! # Examples
//!
//! ```
//! use sarissa_skos::error::{Result, SkosError};
//!
//! fn open_vocabulary(path: &str) -> Result<()> {
//!     Err(SkosError::load(format!("unsupported serialization: {path}")))
//! }
//!
//! assert!(open_vocabulary("thesaurus.csv").is_err());
//! ```

use std::io;

use thiserror::Error;

/// The main error type for Sarissa SKOS operations.
#[derive(Error, Debug)]
pub enum SkosError {
    /// I/O errors (file operations, network, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The vocabulary source could not be read or is in an unsupported format.
    #[error("Load error: {0}")]
    Load(String),

    /// Failure while reading a persisted concept store.
    #[error("Query error: {0}")]
    Query(String),

    /// Analysis-related errors (tokenization, filtering, etc.)
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// Storage-related errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),
}

/// Result type alias for operations that may fail with SkosError.
pub type Result<T> = std::result::Result<T, SkosError>;

impl SkosError {
    /// Create a new load error.
    pub fn load<S: Into<String>>(msg: S) -> Self {
        SkosError::Load(msg.into())
    }

    /// Create a new query error.
    pub fn query<S: Into<String>>(msg: S) -> Self {
        SkosError::Query(msg.into())
    }

    /// Create a new analysis error.
    pub fn analysis<S: Into<String>>(msg: S) -> Self {
        SkosError::Analysis(msg.into())
    }

    /// Create a new storage error.
    pub fn storage<S: Into<String>>(msg: S) -> Self {
        SkosError::Storage(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        SkosError::Other(msg.into())
    }

    /// Create a new invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        SkosError::Other(format!("Invalid argument: {}", msg.into()))
    }

    /// Create a new invalid config error.
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        SkosError::Other(format!("Invalid configuration: {}", msg.into()))
    }

    /// Whether this error means the vocabulary could not be loaded.
    pub fn is_load_error(&self) -> bool {
        matches!(self, SkosError::Load(_))
    }
}
