//! The inverted index facade.
//!
//! Ties the entities together over a shared storage backend. Every
//! multi-entity operation (`add_document`, `delete_document`) stages all of
//! its writes (postings, record, and the document-counter update) into a
//! single [`WriteBatch`] and commits it atomically, so readers never
//! observe a record without its postings or a counter that disagrees with
//! the stored documents. A failed commit leaves nothing behind and is
//! retryable from scratch.

use std::sync::Arc;

use ahash::AHashMap;

use crate::analysis::analyzer::{Analyzer, PipelineAnalyzer};
use crate::document::Document;
use crate::error::{Result, SedgeError};
use crate::index::key;
use crate::index::posting::WordFieldIndex;
use crate::index::record::DocumentRecord;
use crate::index::stats::IndexStats;
use crate::index::{DocId, IndexId};
use crate::query::Query;
use crate::storage::{KeyScan, Storage, WriteBatch};

/// Configuration for an inverted index.
#[derive(Debug, Clone)]
pub struct IndexConfig {
    /// Maximum number of unique (field, word) terms in a single document.
    pub max_unique_terms: usize,
}

impl Default for IndexConfig {
    fn default() -> Self {
        IndexConfig {
            max_unique_terms: 10_000,
        }
    }
}

/// A word-level inverted index over an ordered key-value store.
pub struct InvertedIndex {
    /// The storage backend (shared with other indexes).
    storage: Arc<dyn Storage>,

    /// The analysis pipeline applied to text fields.
    analyzer: Arc<dyn Analyzer>,

    /// This index's identity and counters.
    stats: IndexStats,

    /// Index configuration.
    config: IndexConfig,
}

impl InvertedIndex {
    /// Open (or create) the index named `name` with the standard analyzer
    /// and default configuration.
    pub fn open(storage: Arc<dyn Storage>, name: &str) -> Result<Self> {
        Self::open_with(
            storage,
            name,
            Arc::new(PipelineAnalyzer::standard()),
            IndexConfig::default(),
        )
    }

    /// Open (or create) the index named `name` with a custom analyzer and
    /// configuration.
    pub fn open_with(
        storage: Arc<dyn Storage>,
        name: &str,
        analyzer: Arc<dyn Analyzer>,
        config: IndexConfig,
    ) -> Result<Self> {
        let stats = IndexStats::get_or_create(storage.as_ref(), name)?;
        Ok(InvertedIndex {
            storage,
            analyzer,
            stats,
            config,
        })
    }

    /// The index name.
    pub fn name(&self) -> &str {
        &self.stats.name
    }

    /// The index id (the leading segment of every posting key).
    pub fn id(&self) -> IndexId {
        self.stats.id
    }

    /// The index stats entity.
    pub fn stats(&self) -> &IndexStats {
        &self.stats
    }

    /// The storage backend for this index.
    pub fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }

    /// Number of documents currently in the index.
    pub fn doc_count(&self) -> Result<u64> {
        self.stats.document_count(self.storage.as_ref())
    }

    /// Index a document and return its generated id.
    ///
    /// Each text field is analyzed into (word, position) pairs; one posting
    /// is created per unique (field, word) with its occurrence list; the
    /// record snapshots every field for reconstruction. All writes plus the
    /// document-count increment commit in one atomic batch.
    pub fn add_document(&self, doc: &Document) -> Result<DocId> {
        let doc_id = self.stats.next_document_id(self.storage.as_ref())?;

        let mut terms: AHashMap<(String, String), WordFieldIndex> = AHashMap::new();
        for (field_name, value) in doc.fields() {
            let Some(text) = value.as_text() else {
                continue;
            };
            for token in self.analyzer.analyze(text)? {
                let position = token.position as u32;
                match terms.entry((field_name.clone(), token.text)) {
                    std::collections::hash_map::Entry::Occupied(mut entry) => {
                        entry.get_mut().push_occurrence(position);
                    }
                    std::collections::hash_map::Entry::Vacant(entry) => {
                        let posting = WordFieldIndex::new(
                            self.stats.id,
                            doc_id,
                            &entry.key().0,
                            &entry.key().1,
                            vec![position],
                        )?;
                        entry.insert(posting);
                    }
                }
            }
        }

        if terms.len() > self.config.max_unique_terms {
            return Err(SedgeError::indexing(format!(
                "document has {} unique terms, limit is {}",
                terms.len(),
                self.config.max_unique_terms
            )));
        }

        let mut record = DocumentRecord::new(doc_id, self.stats.id, doc.fields().clone());
        let mut batch = WriteBatch::new();
        for posting in terms.values() {
            posting.save(&mut batch)?;
            record.posting_keys.insert(posting.key().to_string());
        }
        batch.put(
            DocumentRecord::storage_key(self.stats.id, doc_id),
            record.encode()?,
        );
        batch.increment(IndexStats::count_key(self.stats.id), 1);

        self.storage
            .write(batch)
            .map_err(|e| SedgeError::indexing(format!("commit of document {doc_id} failed: {e}")))?;
        Ok(doc_id)
    }

    /// Remove a document and every posting it owns.
    ///
    /// The record's posting-key set drives an explicit fan-out delete; the
    /// deletions and the count decrement commit in one atomic batch. Fails
    /// with `NotFound` if the document is not in the index.
    pub fn delete_document(&self, doc_id: DocId) -> Result<()> {
        let record = DocumentRecord::load(self.storage.as_ref(), self.stats.id, doc_id)?;

        let mut batch = WriteBatch::new();
        for posting_key in &record.posting_keys {
            batch.delete(WordFieldIndex::storage_key(posting_key));
        }
        batch.delete(DocumentRecord::storage_key(self.stats.id, doc_id));
        batch.increment(IndexStats::count_key(self.stats.id), -1);

        self.storage.write(batch)?;
        Ok(())
    }

    /// Fetch a document, reconstructed from its stored snapshot.
    pub fn get_document(&self, doc_id: DocId) -> Result<Document> {
        Ok(self.record(doc_id)?.reconstruct())
    }

    /// Load the stored record for a document.
    pub fn record(&self, doc_id: DocId) -> Result<DocumentRecord> {
        DocumentRecord::load(self.storage.as_ref(), self.stats.id, doc_id)
    }

    /// Scan every posting in the index, in key order.
    pub fn postings(&self) -> Result<PostingScan> {
        self.scan(&key::index_prefix(self.stats.id))
    }

    /// Scan every posting of a field, in key order.
    pub fn postings_for_field(&self, field_name: &str) -> Result<PostingScan> {
        self.scan(&key::field_prefix(self.stats.id, field_name)?)
    }

    /// Scan every posting of a word within a field, in key order.
    pub fn postings_for_word(&self, field_name: &str, word: &str) -> Result<PostingScan> {
        self.scan(&key::word_prefix(self.stats.id, field_name, word)?)
    }

    /// Execute a query against this index.
    pub fn search(&self, query: &Query) -> Result<Vec<crate::query::SearchHit>> {
        query.execute(self)
    }

    /// The analyzer this index applies to text fields (and query terms).
    pub fn analyzer(&self) -> &Arc<dyn Analyzer> {
        &self.analyzer
    }

    fn scan(&self, key_prefix: &str) -> Result<PostingScan> {
        let scan = self
            .storage
            .scan_prefix(&WordFieldIndex::storage_key(key_prefix))?;
        Ok(PostingScan { scan })
    }
}

impl std::fmt::Debug for InvertedIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InvertedIndex")
            .field("name", &self.stats.name)
            .field("id", &self.stats.id)
            .field("analyzer", &self.analyzer.name())
            .finish()
    }
}

/// A lazy, restartable, key-ordered scan over decoded postings.
#[derive(Debug)]
pub struct PostingScan {
    scan: KeyScan,
}

impl PostingScan {
    /// Restart the scan from the beginning of its snapshot.
    pub fn rewind(&mut self) {
        self.scan.rewind();
    }
}

impl Iterator for PostingScan {
    type Item = Result<WordFieldIndex>;

    fn next(&mut self) -> Option<Self::Item> {
        self.scan
            .next()
            .map(|(_, bytes)| WordFieldIndex::decode(&bytes))
    }
}
