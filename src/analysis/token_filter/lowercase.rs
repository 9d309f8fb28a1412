//! Lowercase filter implementation.
//!
//! # Examples
//!
//! ```
//! use sarissa_skos::analysis::token::Token;
//! use sarissa_skos::analysis::token_filter::{Filter, LowercaseFilter};
//!
//! let filter = LowercaseFilter::new();
//! let tokens = vec![Token::new("Lazy", 0), Token::new("DOG", 1)];
//! let filtered: Vec<_> = filter.filter(Box::new(tokens.into_iter()))
//!     .unwrap()
//!     .collect();
//!
//! assert_eq!(filtered[0].text, "lazy");
//! assert_eq!(filtered[1].text, "dog");
//! ```

use crate::analysis::token::TokenStream;
use crate::analysis::token_filter::Filter;
use crate::error::Result;

#[derive(Clone, Debug, Default)]
pub struct LowercaseFilter;

impl LowercaseFilter {
    pub fn new() -> Self {
        LowercaseFilter
    }
}

impl Filter for LowercaseFilter {
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream> {
        Ok(Box::new(tokens.map(|mut token| {
            if !token.is_stopped() {
                token.text = token.text.to_lowercase();
            }
            token
        })))
    }

    fn name(&self) -> &'static str {
        "lowercase"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::token::Token;
    use crate::skos::SkosType;

    #[test]
    fn test_lowercase_filter() {
        let filter = LowercaseFilter::new();
        let tokens = vec![
            Token::new("Hello", 0),
            Token::new("WÖRLD", 1),
            Token::new("Leaps", 0).with_skos_type(SkosType::Alt),
        ];

        let result: Vec<Token> = filter.filter(Box::new(tokens.into_iter())).unwrap().collect();

        assert_eq!(result[0].text, "hello");
        assert_eq!(result[1].text, "wörld");
        assert_eq!(result[2].text, "leaps");
        assert_eq!(result[2].skos_type, Some(SkosType::Alt));
    }

    #[test]
    fn test_stopped_tokens_untouched() {
        let filter = LowercaseFilter::new();
        let tokens = vec![Token::new("The", 0).stop()];

        let result: Vec<Token> = filter.filter(Box::new(tokens.into_iter())).unwrap().collect();
        assert_eq!(result[0].text, "The");
    }
}
