//! Regex tokenizer implementation.
//!
//! Emits one token per regex match. Useful when a deployment needs full
//! control over what counts as a word (e.g. product codes, hashtags).

use regex::Regex;

use crate::analysis::token::{Token, TokenStream};
use crate::analysis::tokenizer::Tokenizer;
use crate::error::{Result, SedgeError};

/// A tokenizer that emits every non-overlapping match of a pattern.
#[derive(Clone, Debug)]
pub struct RegexTokenizer {
    pattern: Regex,
}

impl RegexTokenizer {
    /// Create a new regex tokenizer from the given pattern.
    pub fn new(pattern: &str) -> Result<Self> {
        let pattern = Regex::new(pattern)
            .map_err(|e| SedgeError::analysis(format!("invalid tokenizer pattern: {e}")))?;
        Ok(RegexTokenizer { pattern })
    }

    /// The pattern this tokenizer matches.
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }
}

impl Default for RegexTokenizer {
    fn default() -> Self {
        // \w+ is a safe default close to the unicode_word tokenizer
        RegexTokenizer {
            pattern: Regex::new(r"\w+").unwrap(),
        }
    }
}

impl Tokenizer for RegexTokenizer {
    fn tokenize(&self, text: &str) -> Result<TokenStream> {
        let tokens: Vec<Token> = self
            .pattern
            .find_iter(text)
            .enumerate()
            .map(|(position, m)| Token::with_offsets(m.as_str(), position, m.start(), m.end()))
            .collect();

        Ok(Box::new(tokens.into_iter()))
    }

    fn name(&self) -> &'static str {
        "regex"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regex_tokenizer() {
        let tokenizer = RegexTokenizer::new(r"[a-z]+").unwrap();
        let tokens: Vec<Token> = tokenizer.tokenize("ab12cd").unwrap().collect();

        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].text, "ab");
        assert_eq!(tokens[1].text, "cd");
        assert_eq!(tokens[1].start_offset, 4);
    }

    #[test]
    fn test_invalid_pattern() {
        let result = RegexTokenizer::new("(unclosed");
        assert!(result.is_err());
    }

    #[test]
    fn test_default_pattern() {
        let tokenizer = RegexTokenizer::default();
        assert_eq!(tokenizer.pattern(), r"\w+");
    }
}
