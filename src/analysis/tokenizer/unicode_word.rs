//! Unicode word tokenizer implementation.
//!
//! Splits text on Unicode word boundaries (UAX #29) and drops the segments
//! that are only punctuation or whitespace.
//!
//! # Examples
//!
//! ```
//! use sarissa_skos::analysis::tokenizer::{Tokenizer, UnicodeWordTokenizer};
//!
//! let tokenizer = UnicodeWordTokenizer::new();
//! let tokens: Vec<_> = tokenizer.tokenize("Chien, chat! Hund").unwrap().collect();
//!
//! assert_eq!(tokens[0].text, "Chien");
//! assert_eq!(tokens[2].text, "Hund");
//! ```

use unicode_segmentation::UnicodeSegmentation;

use crate::analysis::token::{Token, TokenStream};
use crate::analysis::tokenizer::Tokenizer;
use crate::error::Result;

#[derive(Clone, Debug, Default)]
pub struct UnicodeWordTokenizer;

impl UnicodeWordTokenizer {
    pub fn new() -> Self {
        UnicodeWordTokenizer
    }
}

impl Tokenizer for UnicodeWordTokenizer {
    fn tokenize(&self, text: &str) -> Result<TokenStream> {
        let tokens: Vec<Token> = text
            .split_word_bound_indices()
            .filter(|(_, word)| word.chars().any(char::is_alphanumeric))
            .enumerate()
            .map(|(position, (start, word))| {
                Token::with_offsets(word, position, start, start + word.len())
            })
            .collect();

        Ok(Box::new(tokens.into_iter()))
    }

    fn name(&self) -> &'static str {
        "unicode_word"
    }
}
