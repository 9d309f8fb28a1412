//! Drops tokens that repeat an earlier token at the same position.
//!
//! Expansion can put the same text on one position twice, for example when
//! two matched concepts share a label, or when an expansion lowercases to
//! the original word.

use ahash::AHashSet;

use crate::analysis::token::{Token, TokenStream};
use crate::analysis::token_filter::Filter;
use crate::error::Result;

#[derive(Clone, Debug, Default)]
pub struct RemoveDuplicatesFilter;

impl RemoveDuplicatesFilter {
    pub fn new() -> Self {
        RemoveDuplicatesFilter
    }
}

impl Filter for RemoveDuplicatesFilter {
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream> {
        Ok(Box::new(Dedup {
            upstream: tokens,
            position: None,
            seen: AHashSet::new(),
        }))
    }

    fn name(&self) -> &'static str {
        "remove_duplicates"
    }
}

struct Dedup {
    upstream: TokenStream,
    position: Option<usize>,
    seen: AHashSet<String>,
}

impl Iterator for Dedup {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        loop {
            let token = self.upstream.next()?;

            if self.position != Some(token.position) {
                self.position = Some(token.position);
                self.seen.clear();
            }

            if self.seen.insert(token.text.clone()) {
                return Some(token);
            }
        }
    }
}
