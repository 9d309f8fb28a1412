//! Tokenizers split raw text into the token stream that filters rewrite.

use crate::analysis::token::TokenStream;
use crate::error::Result;

/// Splits text into tokens.
pub trait Tokenizer: Send + Sync {
    /// Tokenize the given text.
    fn tokenize(&self, text: &str) -> Result<TokenStream>;

    /// Name of this tokenizer, used in analyzer names and debugging.
    fn name(&self) -> &'static str;
}

pub mod regex;
pub mod unicode_word;
pub mod whitespace;
pub mod whole;

pub use regex::RegexTokenizer;
pub use unicode_word::UnicodeWordTokenizer;
pub use whitespace::WhitespaceTokenizer;
pub use whole::WholeTokenizer;
