//! Token types for text analysis.
//!
//! A [`Token`] is the unit that flows through the analysis pipeline. Tokens
//! produced by a vocabulary expansion filter carry the [`SkosType`] of the
//! label they came from and sit at the same position as the text they
//! expand:
//!
//! ```text
//! Input: "lazy dog"
//! Vocabulary: "lazy dog" altLabel "odie"
//!
//!   Position 0: "lazy" (pos_inc=1, pos_len=1)
//!   Position 0: "odie" (pos_inc=0, pos_len=2, ALT)
//!   Position 1: "dog"  (pos_inc=1, pos_len=1)
//! ```
//!
//! # Examples
//!
//! ```
//! use sarissa_skos::analysis::token::Token;
//! use sarissa_skos::skos::SkosType;
//!
//! let token = Token::with_offsets("leaps", 0, 4, 9)
//!     .with_position_increment(0)
//!     .with_skos_type(SkosType::Alt);
//!
//! assert_eq!(token.payload(), Some([1]));
//! assert!(token.is_expansion());
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::skos::types::SkosType;

/// A single analyzed token.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Token {
    /// The token text.
    pub text: String,

    /// Position of the token in the stream.
    pub position: usize,

    /// Byte offset where the token starts in the original text.
    pub start_offset: usize,

    /// Byte offset where the token ends in the original text.
    pub end_offset: usize,

    /// Weight of the token.
    pub boost: f32,

    /// Whether a stop filter marked this token.
    pub stopped: bool,

    /// Vocabulary relation this token was expanded from, if any.
    pub skos_type: Option<SkosType>,

    /// Distance from the previous token; 0 stacks the token on the previous one.
    pub position_increment: usize,

    /// Number of positions the token spans.
    pub position_length: usize,
}

impl Token {
    /// Create a new token.
    pub fn new<S: Into<String>>(text: S, position: usize) -> Self {
        Token {
            text: text.into(),
            position,
            start_offset: 0,
            end_offset: 0,
            boost: 1.0,
            stopped: false,
            skos_type: None,
            position_increment: 1,
            position_length: 1,
        }
    }

    /// Create a new token with byte offsets.
    pub fn with_offsets<S: Into<String>>(
        text: S,
        position: usize,
        start_offset: usize,
        end_offset: usize,
    ) -> Self {
        Token {
            text: text.into(),
            position,
            start_offset,
            end_offset,
            boost: 1.0,
            stopped: false,
            skos_type: None,
            position_increment: 1,
            position_length: 1,
        }
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn with_boost(mut self, boost: f32) -> Self {
        self.boost = boost;
        self
    }

    /// Mark the token as stopped.
    pub fn stop(mut self) -> Self {
        self.stopped = true;
        self
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Tag the token with the vocabulary relation it was expanded from.
    pub fn with_skos_type(mut self, skos_type: SkosType) -> Self {
        self.skos_type = Some(skos_type);
        self
    }

    /// Whether the token was injected by an expansion filter.
    pub fn is_expansion(&self) -> bool {
        self.skos_type.is_some()
    }

    /// The one-byte payload handed to index sinks: the ordinal of the
    /// token's [`SkosType`].
    pub fn payload(&self) -> Option<[u8; 1]> {
        self.skos_type.map(SkosType::to_payload)
    }

    /// Copy of the token with different text.
    pub fn with_text<S: Into<String>>(&self, text: S) -> Self {
        let mut token = self.clone();
        token.text = text.into();
        token
    }

    /// Copy of the token at a different position.
    pub fn with_position(&self, position: usize) -> Self {
        let mut token = self.clone();
        token.position = position;
        token
    }

    pub fn with_position_increment(mut self, increment: usize) -> Self {
        self.position_increment = increment;
        self
    }

    pub fn with_position_length(mut self, length: usize) -> Self {
        self.position_length = length;
        self
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

/// A lazily evaluated stream of tokens.
pub type TokenStream = Box<dyn Iterator<Item = Token>>;

pub trait IntoTokenStream {
    fn into_token_stream(self) -> TokenStream;
}

impl IntoTokenStream for Vec<Token> {
    fn into_token_stream(self) -> TokenStream {
        Box::new(self.into_iter())
    }
}
