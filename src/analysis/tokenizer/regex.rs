//! Regex-based tokenizer implementation.

use std::sync::Arc;

use regex::Regex;

use super::Tokenizer;
use crate::analysis::token::{Token, TokenStream};
use crate::error::{Result, SkosError};

/// Emits every match of a pattern as a token, or the text between matches
/// when built with [`RegexTokenizer::with_gaps`].
#[derive(Clone, Debug)]
pub struct RegexTokenizer {
    pattern: Arc<Regex>,
    gaps: bool,
}

impl RegexTokenizer {
    /// Tokenize on runs of word characters (`\w+`).
    pub fn new() -> Result<Self> {
        Self::with_pattern(r"\w+")
    }

    pub fn with_pattern(pattern: &str) -> Result<Self> {
        Ok(RegexTokenizer {
            pattern: Arc::new(compile(pattern)?),
            gaps: false,
        })
    }

    /// Treat `pattern` as the separator instead of the token.
    pub fn with_gaps(pattern: &str) -> Result<Self> {
        Ok(RegexTokenizer {
            pattern: Arc::new(compile(pattern)?),
            gaps: true,
        })
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    pub fn gaps(&self) -> bool {
        self.gaps
    }

    fn split_gaps(&self, text: &str) -> Vec<Token> {
        let mut tokens = Vec::new();
        let mut last_end = 0;

        for mat in self.pattern.find_iter(text) {
            if mat.start() > last_end {
                tokens.push(Token::with_offsets(
                    &text[last_end..mat.start()],
                    tokens.len(),
                    last_end,
                    mat.start(),
                ));
            }
            last_end = mat.end();
        }

        if last_end < text.len() {
            tokens.push(Token::with_offsets(
                &text[last_end..],
                tokens.len(),
                last_end,
                text.len(),
            ));
        }

        tokens
    }
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| SkosError::analysis(format!("Invalid regex pattern: {e}")))
}

impl Tokenizer for RegexTokenizer {
    fn tokenize(&self, text: &str) -> Result<TokenStream> {
        let tokens: Vec<Token> = if self.gaps {
            self.split_gaps(text)
        } else {
            self.pattern
                .find_iter(text)
                .enumerate()
                .map(|(position, mat)| {
                    Token::with_offsets(mat.as_str(), position, mat.start(), mat.end())
                })
                .collect()
        };

        Ok(Box::new(tokens.into_iter()))
    }

    fn name(&self) -> &'static str {
        "regex"
    }
}
