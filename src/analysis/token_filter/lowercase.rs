//! Lowercase token filter.

use crate::analysis::token::TokenStream;
use crate::analysis::token_filter::TokenFilter;
use crate::error::Result;

/// A filter that lowercases token text (Unicode-aware case folding).
#[derive(Clone, Debug, Default)]
pub struct LowercaseFilter;

impl LowercaseFilter {
    /// Create a new lowercase filter.
    pub fn new() -> Self {
        LowercaseFilter
    }
}

impl TokenFilter for LowercaseFilter {
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream> {
        Ok(Box::new(tokens.map(|mut token| {
            if token.text.chars().any(|c| c.is_uppercase()) {
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

    #[test]
    fn test_lowercase_filter() {
        let filter = LowercaseFilter::new();
        let input: TokenStream = Box::new(
            vec![Token::new("Hello", 0), Token::new("WORLD", 1)].into_iter(),
        );

        let output: Vec<Token> = filter.filter(input).unwrap().collect();
        assert_eq!(output[0].text, "hello");
        assert_eq!(output[1].text, "world");
    }

    #[test]
    fn test_positions_untouched() {
        let filter = LowercaseFilter::new();
        let input: TokenStream = Box::new(vec![Token::new("Cat", 5)].into_iter());

        let output: Vec<Token> = filter.filter(input).unwrap().collect();
        assert_eq!(output[0].position, 5);
    }
}
