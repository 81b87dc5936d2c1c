//! Persistence tests: a file-backed index survives a reopen with its
//! postings, records, and counters intact.

use std::sync::Arc;

use tempfile::TempDir;

use sedge::document::Document;
use sedge::error::Result;
use sedge::index::InvertedIndex;
use sedge::query::Query;
use sedge::storage::{FileStorage, Storage, StorageConfig};

fn open_storage(dir: &TempDir) -> Result<Arc<dyn Storage>> {
    Ok(Arc::new(FileStorage::open(
        dir.path(),
        StorageConfig::default(),
    )?))
}

#[test]
fn test_index_survives_reopen() -> Result<()> {
    let dir = TempDir::new().unwrap();

    let doc_id = {
        let storage = open_storage(&dir)?;
        let index = InvertedIndex::open(storage, "articles")?;
        let doc = Document::builder()
            .add_text("title", "quick brown fox")
            .add_integer("rank", 4)
            .build();
        let doc_id = index.add_document(&doc)?;
        index.storage().sync()?;
        doc_id
    };

    let storage = open_storage(&dir)?;
    let index = InvertedIndex::open(storage, "articles")?;

    assert_eq!(index.doc_count()?, 1);

    let hits = index.search(&Query::phrase("title", "quick brown"))?;
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].doc_id, doc_id);

    let doc = index.get_document(doc_id)?;
    assert_eq!(doc.get_field("rank").and_then(|v| v.as_integer()), Some(4));

    Ok(())
}

#[test]
fn test_reopened_index_keeps_its_id_and_sequences() -> Result<()> {
    let dir = TempDir::new().unwrap();

    let (first_id, first_doc) = {
        let storage = open_storage(&dir)?;
        let index = InvertedIndex::open(storage, "articles")?;
        let doc_id =
            index.add_document(&Document::builder().add_text("title", "one").build())?;
        index.storage().sync()?;
        (index.id(), doc_id)
    };

    let storage = open_storage(&dir)?;
    let index = InvertedIndex::open(storage, "articles")?;
    assert_eq!(index.id(), first_id);

    // document ids keep counting, never reusing a persisted id
    let second_doc = index.add_document(&Document::builder().add_text("title", "two").build())?;
    assert!(second_doc > first_doc);

    Ok(())
}

#[test]
fn test_delete_after_reopen() -> Result<()> {
    let dir = TempDir::new().unwrap();

    let doc_id = {
        let storage = open_storage(&dir)?;
        let index = InvertedIndex::open(storage, "articles")?;
        let doc_id = index
            .add_document(&Document::builder().add_text("body", "ephemeral words").build())?;
        index.storage().sync()?;
        doc_id
    };

    {
        let storage = open_storage(&dir)?;
        let index = InvertedIndex::open(storage, "articles")?;
        index.delete_document(doc_id)?;
        index.storage().sync()?;
    }

    let storage = open_storage(&dir)?;
    let index = InvertedIndex::open(storage, "articles")?;
    assert_eq!(index.doc_count()?, 0);
    assert_eq!(index.postings()?.count(), 0);

    Ok(())
}

#[test]
fn test_two_indexes_share_one_store() -> Result<()> {
    let dir = TempDir::new().unwrap();
    let storage = open_storage(&dir)?;

    let news = InvertedIndex::open(Arc::clone(&storage), "news")?;
    let mail = InvertedIndex::open(Arc::clone(&storage), "mail")?;

    news.add_document(&Document::builder().add_text("body", "shared word").build())?;
    mail.add_document(&Document::builder().add_text("body", "shared word").build())?;
    mail.add_document(&Document::builder().add_text("body", "mail only").build())?;

    // postings and counters stay per-index despite the shared keyspace
    assert_eq!(news.doc_count()?, 1);
    assert_eq!(mail.doc_count()?, 2);
    assert_eq!(news.postings_for_word("body", "shared")?.count(), 1);
    assert_eq!(mail.postings_for_word("body", "shared")?.count(), 1);

    Ok(())
}
