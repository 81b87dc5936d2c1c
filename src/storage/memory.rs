//! In-memory storage implementation.
//!
//! Backed by a `BTreeMap`, which gives the key ordering that prefix scans
//! require. Useful for testing and for ephemeral indexes.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::Result;
use crate::storage::traits::{
    BatchOp, KeyScan, Storage, StorageConfig, StorageError, WriteBatch, decode_counter,
    encode_counter,
};

/// An in-memory ordered key-value storage implementation.
#[derive(Debug)]
pub struct MemoryStorage {
    /// The entries, ordered by key.
    entries: Arc<RwLock<BTreeMap<String, Vec<u8>>>>,
    /// Storage configuration.
    #[allow(dead_code)]
    config: StorageConfig,
    /// Whether the storage is closed.
    closed: bool,
}

impl MemoryStorage {
    /// Create a new memory storage.
    pub fn new(config: StorageConfig) -> Self {
        MemoryStorage {
            entries: Arc::new(RwLock::new(BTreeMap::new())),
            config,
            closed: false,
        }
    }

    /// Create a new memory storage with default configuration.
    pub fn new_default() -> Self {
        Self::new(StorageConfig::default())
    }

    /// Check if the storage is closed.
    fn check_closed(&self) -> Result<()> {
        if self.closed {
            Err(StorageError::StorageClosed.into())
        } else {
            Ok(())
        }
    }

    /// Get the number of entries stored.
    pub fn key_count(&self) -> usize {
        self.entries.read().len()
    }

    /// Clear all entries from storage.
    pub fn clear(&self) -> Result<()> {
        self.check_closed()?;
        self.entries.write().clear();
        Ok(())
    }
}

/// Validate and apply a batch against an entry map.
///
/// Validation runs first over every operation, so a failing batch leaves
/// the map untouched; the apply phase cannot fail.
pub(crate) fn apply_batch(
    entries: &mut BTreeMap<String, Vec<u8>>,
    batch: &WriteBatch,
) -> Result<()> {
    for op in batch.ops() {
        match op {
            BatchOp::Insert { key, .. } => {
                if entries.contains_key(key) {
                    return Err(StorageError::KeyExists(key.clone()).into());
                }
            }
            BatchOp::Increment { key, .. } => {
                if let Some(bytes) = entries.get(key) {
                    decode_counter(key, bytes)?;
                }
            }
            BatchOp::Put { .. } | BatchOp::Delete { .. } => {}
        }
    }

    for op in batch.ops() {
        match op {
            BatchOp::Put { key, value } | BatchOp::Insert { key, value } => {
                entries.insert(key.clone(), value.clone());
            }
            BatchOp::Delete { key } => {
                entries.remove(key);
            }
            BatchOp::Increment { key, delta } => {
                let current = match entries.get(key) {
                    // validated above, cannot fail here
                    Some(bytes) => decode_counter(key, bytes)?,
                    None => 0,
                };
                entries.insert(key.clone(), encode_counter(current + delta));
            }
        }
    }

    Ok(())
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.check_closed()?;
        Ok(self.entries.read().get(key).cloned())
    }

    fn contains(&self, key: &str) -> bool {
        self.entries.read().contains_key(key)
    }

    fn scan_prefix(&self, prefix: &str) -> Result<KeyScan> {
        self.check_closed()?;

        let entries = self.entries.read();
        let snapshot: Vec<(String, Vec<u8>)> = entries
            .range(prefix.to_string()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        Ok(KeyScan::new(snapshot))
    }

    fn write(&self, batch: WriteBatch) -> Result<()> {
        self.check_closed()?;

        let mut entries = self.entries.write();
        apply_batch(&mut entries, &batch)
    }

    fn increment(&self, key: &str, delta: i64) -> Result<i64> {
        self.check_closed()?;

        let mut entries = self.entries.write();
        let current = match entries.get(key) {
            Some(bytes) => decode_counter(key, bytes)?,
            None => 0,
        };
        let next = current + delta;
        entries.insert(key.to_string(), encode_counter(next));
        Ok(next)
    }

    fn counter(&self, key: &str) -> Result<i64> {
        self.check_closed()?;

        match self.entries.read().get(key) {
            Some(bytes) => decode_counter(key, bytes),
            None => Ok(0),
        }
    }

    fn sync(&self) -> Result<()> {
        self.check_closed()
    }

    fn close(&mut self) -> Result<()> {
        self.closed = true;
        Ok(())
    }
}
