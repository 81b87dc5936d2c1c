//! Query types for Sedge.
//!
//! Two query shapes are supported: a single-term lookup and an exact
//! phrase. Both resolve entirely through key-prefix scans over postings;
//! phrase matching then intersects the per-document occurrence lists and
//! keeps the start positions where every word of the phrase appears at
//! consecutive token positions.
//!
//! Query terms are normalized with the index's own analyzer at execution
//! time, so a query matches exactly what indexing would have produced for
//! the same text.

use ahash::{AHashMap, AHashSet};

use crate::error::{Result, SedgeError};
use crate::index::{DocId, InvertedIndex};

/// A query over one field of an index.
#[derive(Debug, Clone)]
pub enum Query {
    /// Match documents containing a single word.
    Term(TermQuery),
    /// Match documents containing an exact phrase.
    Phrase(PhraseQuery),
}

impl Query {
    /// Convenience constructor for a term query.
    pub fn term<F: Into<String>, W: Into<String>>(field: F, word: W) -> Self {
        Query::Term(TermQuery::new(field, word))
    }

    /// Convenience constructor for a phrase query.
    pub fn phrase<F: Into<String>>(field: F, phrase: &str) -> Self {
        Query::Phrase(PhraseQuery::from_phrase(field, phrase))
    }

    /// The field this query searches.
    pub fn field(&self) -> &str {
        match self {
            Query::Term(q) => q.field(),
            Query::Phrase(q) => q.field(),
        }
    }

    /// Execute this query against an index.
    pub fn execute(&self, index: &InvertedIndex) -> Result<Vec<SearchHit>> {
        match self {
            Query::Term(q) => q.execute(index),
            Query::Phrase(q) => q.execute(index),
        }
    }
}

/// A hit returned by query execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    /// The matching document.
    pub doc_id: DocId,

    /// Token positions of the match: word occurrences for a term query,
    /// phrase start positions for a phrase query.
    pub positions: Vec<u32>,
}

/// A query matching documents that contain a single word in a field.
#[derive(Debug, Clone)]
pub struct TermQuery {
    field: String,
    word: String,
}

impl TermQuery {
    /// Create a new term query.
    pub fn new<F: Into<String>, W: Into<String>>(field: F, word: W) -> Self {
        TermQuery {
            field: field.into(),
            word: word.into(),
        }
    }

    /// The field this query searches.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// The raw (un-normalized) query word.
    pub fn word(&self) -> &str {
        &self.word
    }

    fn execute(&self, index: &InvertedIndex) -> Result<Vec<SearchHit>> {
        let words = normalize(index, &self.word)?;
        let [word] = words.as_slice() else {
            return Err(SedgeError::query(format!(
                "term {:?} normalizes to {} words; use a phrase query",
                self.word,
                words.len()
            )));
        };

        let mut hits: Vec<SearchHit> = word_occurrences(index, &self.field, word)?
            .into_iter()
            .map(|(doc_id, positions)| SearchHit { doc_id, positions })
            .collect();
        hits.sort_by_key(|hit| hit.doc_id);
        Ok(hits)
    }
}

/// A query matching documents that contain an exact phrase in a field.
#[derive(Debug, Clone)]
pub struct PhraseQuery {
    field: String,
    terms: Vec<String>,
}

impl PhraseQuery {
    /// Create a phrase query from a whitespace-separated phrase.
    pub fn from_phrase<F: Into<String>>(field: F, phrase: &str) -> Self {
        PhraseQuery {
            field: field.into(),
            terms: phrase.split_whitespace().map(|s| s.to_string()).collect(),
        }
    }

    /// Create a phrase query from individual terms.
    pub fn new<F: Into<String>>(field: F, terms: Vec<String>) -> Self {
        PhraseQuery {
            field: field.into(),
            terms,
        }
    }

    /// The field this query searches.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// The raw (un-normalized) query terms.
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    fn execute(&self, index: &InvertedIndex) -> Result<Vec<SearchHit>> {
        let mut words = Vec::new();
        for term in &self.terms {
            words.extend(normalize(index, term)?);
        }
        if words.is_empty() {
            return Err(SedgeError::query("phrase normalizes to no words"));
        }

        let first = word_occurrences(index, &self.field, &words[0])?;
        let rest: Vec<AHashMap<DocId, AHashSet<u32>>> = words[1..]
            .iter()
            .map(|word| {
                word_occurrences(index, &self.field, word).map(|map| {
                    map.into_iter()
                        .map(|(doc_id, positions)| (doc_id, positions.into_iter().collect()))
                        .collect()
                })
            })
            .collect::<Result<_>>()?;

        let mut hits = Vec::new();
        for (doc_id, starts) in first {
            let mut matched: Vec<u32> = starts
                .into_iter()
                .filter(|&start| {
                    rest.iter().enumerate().all(|(offset, occurrences)| {
                        occurrences
                            .get(&doc_id)
                            .is_some_and(|set| set.contains(&(start + offset as u32 + 1)))
                    })
                })
                .collect();

            if !matched.is_empty() {
                matched.sort_unstable();
                hits.push(SearchHit {
                    doc_id,
                    positions: matched,
                });
            }
        }
        hits.sort_by_key(|hit| hit.doc_id);
        Ok(hits)
    }
}

/// Normalize a raw query term with the index's analyzer.
fn normalize(index: &InvertedIndex, term: &str) -> Result<Vec<String>> {
    Ok(index
        .analyzer()
        .analyze(term)?
        .map(|token| token.text)
        .collect())
}

/// Collect each document's occurrence list for a word.
fn word_occurrences(
    index: &InvertedIndex,
    field: &str,
    word: &str,
) -> Result<AHashMap<DocId, Vec<u32>>> {
    let mut map = AHashMap::new();
    for posting in index.postings_for_word(field, word)? {
        let posting = posting?;
        map.insert(posting.document_id(), posting.occurrences.clone());
    }
    Ok(map)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::document::Document;
    use crate::storage::{MemoryStorage, Storage};

    fn index_with_docs(texts: &[&str]) -> (InvertedIndex, Vec<DocId>) {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new_default());
        let index = InvertedIndex::open(storage, "test").unwrap();
        let ids = texts
            .iter()
            .map(|text| {
                index
                    .add_document(&Document::builder().add_text("body", *text).build())
                    .unwrap()
            })
            .collect();
        (index, ids)
    }

    #[test]
    fn test_term_query() {
        let (index, ids) = index_with_docs(&["cat dog", "dog only", "cat cat"]);

        let hits = index.search(&Query::term("body", "cat")).unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].doc_id, ids[0]);
        assert_eq!(hits[1].doc_id, ids[2]);
        assert_eq!(hits[1].positions, vec![0, 1]);
    }

    #[test]
    fn test_term_query_normalizes() {
        let (index, ids) = index_with_docs(&["Cat"]);

        let hits = index.search(&Query::term("body", "CAT")).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].doc_id, ids[0]);
    }

    #[test]
    fn test_phrase_query_requires_adjacency() {
        let (index, ids) = index_with_docs(&["quick brown fox", "quick red brown fox"]);

        let hits = index.search(&Query::phrase("body", "quick brown")).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].doc_id, ids[0]);
        assert_eq!(hits[0].positions, vec![0]);
    }

    #[test]
    fn test_phrase_query_repeated_match() {
        let (index, _) = index_with_docs(&["cat dog cat dog"]);

        let hits = index.search(&Query::phrase("body", "cat dog")).unwrap();
        assert_eq!(hits[0].positions, vec![0, 2]);
    }

    #[test]
    fn test_empty_phrase_is_an_error() {
        let (index, _) = index_with_docs(&["cat"]);

        let result = index.search(&Query::phrase("body", "|||"));
        assert!(matches!(result, Err(SedgeError::Query(_))));
    }

    #[test]
    fn test_phrase_from_explicit_terms() {
        let (index, ids) = index_with_docs(&["cat dog", "dog cat"]);

        let query = PhraseQuery::new("body", vec!["cat".to_string(), "dog".to_string()]);
        let hits = query.execute(&index).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].doc_id, ids[0]);
    }

    #[test]
    fn test_accessors() {
        let query = PhraseQuery::from_phrase("content", "quick brown");
        assert_eq!(query.field(), "content");
        assert_eq!(query.terms(), &["quick", "brown"]);
    }
}
