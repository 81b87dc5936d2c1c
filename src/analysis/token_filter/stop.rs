//! Stop word token filter.
//!
//! Drops high-frequency words that carry little search value. Dropped
//! tokens leave positional gaps, which breaks exact phrase adjacency across
//! a removed word; for that reason the standard analyzer does not include
//! this filter by default.

use std::collections::HashSet;

use lazy_static::lazy_static;

use crate::analysis::token::TokenStream;
use crate::analysis::token_filter::TokenFilter;
use crate::error::Result;

lazy_static! {
    /// Default English stop words.
    static ref DEFAULT_STOP_WORDS: HashSet<&'static str> = {
        [
            "a", "an", "and", "are", "as", "at", "be", "but", "by", "for",
            "if", "in", "into", "is", "it", "no", "not", "of", "on", "or",
            "such", "that", "the", "their", "then", "there", "these",
            "they", "this", "to", "was", "will", "with",
        ]
        .into_iter()
        .collect()
    };
}

/// A filter that removes stop words from the token stream.
#[derive(Clone, Debug)]
pub struct StopFilter {
    stop_words: HashSet<String>,
}

impl StopFilter {
    /// Create a stop filter with the default English stop-word list.
    pub fn new() -> Self {
        StopFilter {
            stop_words: DEFAULT_STOP_WORDS.iter().map(|w| w.to_string()).collect(),
        }
    }

    /// Create a stop filter with a custom stop-word list.
    pub fn with_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        StopFilter {
            stop_words: words.into_iter().map(|w| w.into()).collect(),
        }
    }

    /// Number of stop words in this filter.
    pub fn len(&self) -> usize {
        self.stop_words.len()
    }

    /// Check if the stop-word list is empty.
    pub fn is_empty(&self) -> bool {
        self.stop_words.is_empty()
    }
}

impl Default for StopFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenFilter for StopFilter {
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream> {
        let stop_words = self.stop_words.clone();
        Ok(Box::new(
            tokens.filter(move |token| !stop_words.contains(&token.text)),
        ))
    }

    fn name(&self) -> &'static str {
        "stop"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::token::Token;

    #[test]
    fn test_stop_filter_default() {
        let filter = StopFilter::new();
        let input: TokenStream = Box::new(
            vec![
                Token::new("the", 0),
                Token::new("quick", 1),
                Token::new("fox", 2),
            ]
            .into_iter(),
        );

        let output: Vec<Token> = filter.filter(input).unwrap().collect();
        assert_eq!(output.len(), 2);
        assert_eq!(output[0].text, "quick");
        // positional gap where "the" was dropped
        assert_eq!(output[0].position, 1);
    }

    #[test]
    fn test_stop_filter_custom_words() {
        let filter = StopFilter::with_words(["quick"]);
        let input: TokenStream =
            Box::new(vec![Token::new("the", 0), Token::new("quick", 1)].into_iter());

        let output: Vec<Token> = filter.filter(input).unwrap().collect();
        assert_eq!(output.len(), 1);
        assert_eq!(output[0].text, "the");
    }
}
