//! Separator-stripping token filter.
//!
//! Posting keys reserve one character as a segment separator, and that
//! character must never appear inside an indexed word. This filter strips
//! it from token text and drops tokens that become empty, so any pipeline
//! ending with it satisfies the key invariant. Posting creation validates
//! again, so custom pipelines that omit this filter fail loudly instead of
//! corrupting keys.

use crate::analysis::token::TokenStream;
use crate::analysis::token_filter::TokenFilter;
use crate::error::Result;
use crate::index::key::KEY_SEPARATOR;

/// A filter that removes the reserved key separator from token text.
#[derive(Clone, Debug, Default)]
pub struct SeparatorFilter;

impl SeparatorFilter {
    /// Create a new separator filter.
    pub fn new() -> Self {
        SeparatorFilter
    }
}

impl TokenFilter for SeparatorFilter {
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream> {
        Ok(Box::new(
            tokens
                .map(|mut token| {
                    if token.text.contains(KEY_SEPARATOR) {
                        token.text = token
                            .text
                            .chars()
                            .filter(|c| *c != KEY_SEPARATOR)
                            .collect();
                    }
                    token
                })
                .filter(|token| !token.text.is_empty()),
        ))
    }

    fn name(&self) -> &'static str {
        "separator"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::token::Token;

    #[test]
    fn test_strips_separator() {
        let filter = SeparatorFilter::new();
        let input: TokenStream = Box::new(vec![Token::new("a|b", 0)].into_iter());

        let output: Vec<Token> = filter.filter(input).unwrap().collect();
        assert_eq!(output.len(), 1);
        assert_eq!(output[0].text, "ab");
    }

    #[test]
    fn test_drops_empty_tokens() {
        let filter = SeparatorFilter::new();
        let input: TokenStream =
            Box::new(vec![Token::new("|||", 0), Token::new("ok", 1)].into_iter());

        let output: Vec<Token> = filter.filter(input).unwrap().collect();
        assert_eq!(output.len(), 1);
        assert_eq!(output[0].text, "ok");
        // the surviving token keeps its original position
        assert_eq!(output[0].position, 1);
    }
}
