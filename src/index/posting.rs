//! Inverted-index postings.
//!
//! A `WordFieldIndex` is one posting: the fact that a word occurs in one
//! field of one document, at the recorded token positions. Its identity is
//! the composite key computed once at creation; the key never changes
//! afterwards. `save` recomputes the key from the current field values and
//! refuses to persist if it drifted: that situation means a caller mutated
//! a key-relevant field in place, which is a bug, and it fails fast rather
//! than silently splitting the posting's identity.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SedgeError};
use crate::index::key;
use crate::index::{DocId, IndexId};
use crate::storage::{Storage, WriteBatch};

/// Keyspace for stored postings.
pub(crate) const POSTING_KEYSPACE: &str = "postings/";

/// One inverted-index posting: (index, field, word) → document occurrence.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WordFieldIndex {
    /// The composite key (assigned at creation, immutable).
    key: String,

    /// The owning index.
    pub index_id: IndexId,

    /// The owning document record.
    pub doc_id: DocId,

    /// The field this occurrence came from.
    pub field_name: String,

    /// The normalized term.
    pub word: String,

    /// Ordered token positions at which the word occurs in the field.
    pub occurrences: Vec<u32>,
}

impl WordFieldIndex {
    /// Create a posting for an already-normalized word.
    ///
    /// Fails with [`SedgeError::Validation`] if the word is empty and with
    /// [`SedgeError::InvalidKey`] if the word or field name contains the
    /// reserved separator.
    pub fn new(
        index_id: IndexId,
        doc_id: DocId,
        field_name: &str,
        word: &str,
        occurrences: Vec<u32>,
    ) -> Result<Self> {
        if word.is_empty() {
            return Err(SedgeError::validation(format!(
                "normalization left an empty word for field {field_name:?}"
            )));
        }

        let key = key::encode_key(index_id, field_name, word, doc_id)?;
        Ok(WordFieldIndex {
            key,
            index_id,
            doc_id,
            field_name: field_name.to_string(),
            word: word.to_string(),
            occurrences,
        })
    }

    /// The composite key identifying this posting.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The id of the owning document, as embedded in the key.
    pub fn document_id(&self) -> DocId {
        self.doc_id
    }

    /// Decode the document id from a composite key without loading the
    /// posting. A `None` key is the defined no-op path.
    pub fn document_id_from_key(posting_key: Option<&str>) -> Result<Option<DocId>> {
        key::decode_document_id(posting_key)
    }

    /// Record another occurrence of the word in the same field.
    ///
    /// Occurrence lists only grow during the indexing pass that created the
    /// posting; the key is unaffected.
    pub fn push_occurrence(&mut self, position: u32) {
        self.occurrences.push(position);
    }

    /// Stage this posting into a write batch.
    ///
    /// The key is recomputed from the current fields and compared against
    /// the stored key; a mismatch fails with [`SedgeError::KeyIntegrity`].
    pub fn save(&self, batch: &mut WriteBatch) -> Result<()> {
        let recomputed =
            key::encode_key(self.index_id, &self.field_name, &self.word, self.doc_id)?;
        if recomputed != self.key {
            return Err(SedgeError::key_integrity(format!(
                "stored key {:?} but fields encode to {recomputed:?}",
                self.key
            )));
        }

        batch.put(Self::storage_key(&self.key), bincode::serialize(self)?);
        Ok(())
    }

    /// Load the posting stored under `key`, failing with `NotFound` if
    /// absent.
    pub fn load(storage: &dyn Storage, key: &str) -> Result<WordFieldIndex> {
        let bytes = storage
            .get(&Self::storage_key(key))?
            .ok_or_else(|| SedgeError::not_found(format!("posting {key:?}")))?;
        Self::decode(&bytes)
    }

    pub(crate) fn decode(bytes: &[u8]) -> Result<WordFieldIndex> {
        Ok(bincode::deserialize(bytes)?)
    }

    /// Storage key under which a posting with this composite key lives.
    pub(crate) fn storage_key(key: &str) -> String {
        format!("{POSTING_KEYSPACE}{key}")
    }
}
