//! Index statistics and identity.
//!
//! `IndexStats` is the root entity of an index: its id is the first segment
//! of every posting key, and its document counter is the only piece of
//! shared mutable state concurrent writers contend on. The counter lives in
//! a dedicated storage counter key and is only ever touched through atomic
//! increments that ride in the same write batch as the record they account
//! for, so the count can never drift from the stored documents.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SedgeError};
use crate::index::{DocId, IndexId};
use crate::storage::{Storage, WriteBatch};

/// Keyspace for stored index metadata.
const INDEX_KEYSPACE: &str = "indexes/";

/// Keyspace mapping index names to ids (unique-name invariant).
const NAME_KEYSPACE: &str = "index_names/";

/// Keyspace for per-index document counters.
const COUNT_KEYSPACE: &str = "counts/";

/// Counter key allocating index ids.
const INDEX_SEQ_KEY: &str = "seq/indexes";

/// Keyspace for per-index document-id sequences.
const DOC_SEQ_KEYSPACE: &str = "seq/docs/";

/// The stored representation of a named index.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IndexStats {
    /// Identifier used as the leading posting-key segment.
    pub id: IndexId,

    /// Unique index name.
    pub name: String,

    /// Creation time (seconds since epoch).
    pub created: i64,
}

impl IndexStats {
    /// Get the stats for `name`, creating them if absent.
    ///
    /// Idempotent and race-safe: creation goes through the storage layer's
    /// insert-if-absent commit, so two concurrent callers with the same
    /// name converge on one id; the loser of the race re-reads.
    pub fn get_or_create(storage: &dyn Storage, name: &str) -> Result<IndexStats> {
        if name.is_empty() {
            return Err(SedgeError::validation("index name must not be empty"));
        }

        if let Some(stats) = Self::lookup(storage, name)? {
            return Ok(stats);
        }

        let id = storage.increment(INDEX_SEQ_KEY, 1)? as IndexId;
        let stats = IndexStats {
            id,
            name: name.to_string(),
            created: Utc::now().timestamp(),
        };

        let mut batch = WriteBatch::new();
        batch.insert(Self::name_key(name), bincode::serialize(&id)?);
        batch.put(Self::storage_key(id), bincode::serialize(&stats)?);

        match storage.write(batch) {
            Ok(()) => Ok(stats),
            // lost the creation race: the name key now exists, use it
            Err(err) => match Self::lookup(storage, name)? {
                Some(stats) => Ok(stats),
                None => Err(err),
            },
        }
    }

    /// Get the stats for `name`, failing with `NotFound` if absent.
    pub fn open(storage: &dyn Storage, name: &str) -> Result<IndexStats> {
        Self::lookup(storage, name)?
            .ok_or_else(|| SedgeError::not_found(format!("index {name:?}")))
    }

    /// Number of documents currently in this index.
    pub fn document_count(&self, storage: &dyn Storage) -> Result<u64> {
        Ok(storage.counter(&Self::count_key(self.id))?.max(0) as u64)
    }

    /// Allocate the next document id for this index.
    pub(crate) fn next_document_id(&self, storage: &dyn Storage) -> Result<DocId> {
        let key = format!("{DOC_SEQ_KEYSPACE}{}", self.id);
        Ok(storage.increment(&key, 1)? as DocId)
    }

    /// Storage key of the per-index document counter.
    pub(crate) fn count_key(id: IndexId) -> String {
        format!("{COUNT_KEYSPACE}{id}")
    }

    fn storage_key(id: IndexId) -> String {
        format!("{INDEX_KEYSPACE}{id}")
    }

    fn name_key(name: &str) -> String {
        format!("{NAME_KEYSPACE}{name}")
    }

    fn lookup(storage: &dyn Storage, name: &str) -> Result<Option<IndexStats>> {
        let Some(bytes) = storage.get(&Self::name_key(name))? else {
            return Ok(None);
        };
        let id: IndexId = bincode::deserialize(&bytes)?;

        let bytes = storage.get(&Self::storage_key(id))?.ok_or_else(|| {
            SedgeError::storage(format!("index {name:?} has a name entry but no stats"))
        })?;
        Ok(Some(bincode::deserialize(&bytes)?))
    }
}
