//! Integration tests for the document indexing lifecycle.

use std::sync::Arc;

use sedge::analysis::analyzer::{Analyzer, PipelineAnalyzer};
use sedge::analysis::token::TokenStream;
use sedge::document::{Document, FieldValue};
use sedge::error::{Result, SedgeError};
use sedge::index::key::{decode_document_id, encode_key};
use sedge::index::{IndexConfig, InvertedIndex, WordFieldIndex};
use sedge::storage::{MemoryStorage, Storage, WriteBatch};

fn open_index() -> Result<InvertedIndex> {
    let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new_default());
    InvertedIndex::open(storage, "articles")
}

#[test]
fn test_indexing_records_occurrences_and_count() -> Result<()> {
    let index = open_index()?;

    let doc = Document::builder()
        .add_text("title", "cat dog cat")
        .build();
    let doc_id = index.add_document(&doc)?;

    assert_eq!(index.doc_count()?, 1);

    let postings: Vec<WordFieldIndex> = index
        .postings_for_word("title", "cat")?
        .collect::<Result<_>>()?;
    assert_eq!(postings.len(), 1);
    assert_eq!(postings[0].document_id(), doc_id);
    assert_eq!(postings[0].occurrences, vec![0, 2]);

    let dog: Vec<WordFieldIndex> = index
        .postings_for_word("title", "dog")?
        .collect::<Result<_>>()?;
    assert_eq!(dog[0].occurrences, vec![1]);

    Ok(())
}

#[test]
fn test_delete_removes_all_postings_and_decrements_count() -> Result<()> {
    let index = open_index()?;

    let doc = Document::builder()
        .add_text("title", "alpha beta gamma")
        .add_text("body", "delta epsilon")
        .build();
    let doc_id = index.add_document(&doc)?;

    let keep = index.add_document(&Document::builder().add_text("title", "alpha").build())?;

    assert_eq!(index.doc_count()?, 2);
    assert_eq!(index.record(doc_id)?.posting_count(), 5);

    index.delete_document(doc_id)?;

    assert_eq!(index.doc_count()?, 1);
    let survivors: Vec<WordFieldIndex> = index.postings()?.collect::<Result<_>>()?;
    assert!(survivors.iter().all(|p| p.document_id() == keep));
    assert_eq!(survivors.len(), 1);

    assert!(matches!(
        index.delete_document(doc_id),
        Err(SedgeError::NotFound(_))
    ));

    Ok(())
}

#[test]
fn test_reconstruction_matches_indexed_data() -> Result<()> {
    let index = open_index()?;

    let doc = Document::builder()
        .add_text("title", "The Quick Brown Fox")
        .add_integer("rank", 12)
        .add_float("score", 0.5)
        .add_boolean("published", false)
        .build();
    let doc_id = index.add_document(&doc)?;

    // reconstruction returns the snapshot, not the normalized terms
    let fetched = index.get_document(doc_id)?;
    assert_eq!(fetched, doc);
    assert_eq!(
        fetched.get_field("title"),
        Some(&FieldValue::Text("The Quick Brown Fox".to_string()))
    );

    Ok(())
}

/// An analyzer that fails when it sees a marker word, to inject a failure
/// part-way through a multi-field indexing pass.
#[derive(Debug)]
struct TrippingAnalyzer {
    inner: PipelineAnalyzer,
}

impl Analyzer for TrippingAnalyzer {
    fn analyze(&self, text: &str) -> Result<TokenStream> {
        if text.contains("boom") {
            return Err(SedgeError::analysis("tripped"));
        }
        self.inner.analyze(text)
    }

    fn name(&self) -> &'static str {
        "tripping"
    }
}

#[test]
fn test_failed_indexing_leaves_no_partial_state() -> Result<()> {
    let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new_default());
    let index = InvertedIndex::open_with(
        storage,
        "articles",
        Arc::new(TrippingAnalyzer {
            inner: PipelineAnalyzer::standard(),
        }),
        IndexConfig::default(),
    )?;

    let doc = Document::builder()
        .add_text("title", "one two three four five")
        .add_text("body", "boom")
        .build();
    assert!(index.add_document(&doc).is_err());

    // nothing from the aborted operation is visible
    assert_eq!(index.doc_count()?, 0);
    assert_eq!(index.postings()?.count(), 0);

    // the index remains usable and the retry succeeds from scratch
    let doc_id = index.add_document(&Document::builder().add_text("title", "one").build())?;
    assert_eq!(index.doc_count()?, 1);
    assert_eq!(index.get_document(doc_id)?.len(), 1);

    Ok(())
}

#[test]
fn test_key_codec_round_trip() -> Result<()> {
    for (field, word, doc_id) in [
        ("title", "cat", 1u64),
        ("body", "longish-word", 99),
        ("f", "w", u64::MAX),
    ] {
        let key = encode_key(7, field, word, doc_id)?;
        assert_eq!(decode_document_id(Some(&key))?, Some(doc_id));
    }

    assert!(matches!(
        encode_key(7, "ti|tle", "cat", 1),
        Err(SedgeError::InvalidKey(_))
    ));
    assert_eq!(decode_document_id(None)?, None);

    Ok(())
}

#[test]
fn test_mutated_posting_fails_key_integrity() -> Result<()> {
    let mut posting = WordFieldIndex::new(3, 8, "title", "cat", vec![0])?;

    // bypass normal creation and mutate a key-relevant field in place
    posting.field_name = "body".to_string();

    let mut batch = WriteBatch::new();
    assert!(matches!(
        posting.save(&mut batch),
        Err(SedgeError::KeyIntegrity(_))
    ));

    Ok(())
}
