//! Document records.
//!
//! A `DocumentRecord` is the stored representation of one indexed document.
//! It owns the set of composite keys of every posting created for the
//! document; deletion walks this set and removes each posting explicitly,
//! so nothing relies on implicit cascade semantics. It also carries the
//! snapshot of the document's fields taken at index time, from which the
//! document is reconstructed on fetch. Postings are a derived structure;
//! the snapshot is the source of truth for content.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::document::{Document, FieldValue};
use crate::error::{Result, SedgeError};
use crate::index::key::KEY_SEPARATOR;
use crate::index::{DocId, IndexId};
use crate::storage::Storage;

/// Keyspace for stored document records.
const RECORD_KEYSPACE: &str = "records/";

/// The stored representation of an indexed document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    /// The document id (the record's own identity).
    pub id: DocId,

    /// The owning index.
    pub index_id: IndexId,

    /// Composite keys of every posting belonging to this document.
    pub posting_keys: BTreeSet<String>,

    /// Field snapshot captured at index time, used for reconstruction.
    pub data: HashMap<String, FieldValue>,
}

impl DocumentRecord {
    /// Create a record with an empty posting set.
    pub(crate) fn new(id: DocId, index_id: IndexId, data: HashMap<String, FieldValue>) -> Self {
        DocumentRecord {
            id,
            index_id,
            posting_keys: BTreeSet::new(),
            data,
        }
    }

    /// Load the record for `doc_id`, failing with `NotFound` if absent.
    pub fn load(storage: &dyn Storage, index_id: IndexId, doc_id: DocId) -> Result<DocumentRecord> {
        let key = Self::storage_key(index_id, doc_id);
        let bytes = storage
            .get(&key)?
            .ok_or_else(|| SedgeError::not_found(format!("document {doc_id} in index {index_id}")))?;
        Ok(bincode::deserialize(&bytes)?)
    }

    /// Rebuild the document from the stored snapshot.
    ///
    /// Reconstruction reads only `data`; posting contents are never
    /// consulted.
    pub fn reconstruct(&self) -> Document {
        Document::from_fields(self.data.clone())
    }

    /// Number of postings this record owns.
    pub fn posting_count(&self) -> usize {
        self.posting_keys.len()
    }

    pub(crate) fn encode(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    pub(crate) fn storage_key(index_id: IndexId, doc_id: DocId) -> String {
        format!("{RECORD_KEYSPACE}{index_id}{KEY_SEPARATOR}{doc_id}")
    }
}
