//! Storage abstraction trait and common types.

use byteorder::{ByteOrder, LittleEndian};

use crate::error::{Result, SedgeError};

/// A trait for ordered key-value storage backends.
///
/// This provides a pluggable interface for different storage
/// implementations. Requirements on implementors:
///
/// - `scan_prefix` iterates in lexicographic key order;
/// - `write` applies a whole [`WriteBatch`] atomically: either every
///   operation is applied or none is, and no concurrent reader observes a
///   partially applied batch;
/// - `increment` is an atomic read-modify-write (no lost updates under
///   concurrent callers).
pub trait Storage: Send + Sync + std::fmt::Debug {
    /// Read the value stored at `key`.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Check if a key exists.
    fn contains(&self, key: &str) -> bool;

    /// Scan all entries whose key starts with `prefix`, in key order.
    ///
    /// The scan iterates a snapshot taken when the call returns: it is safe
    /// to run concurrently with writers, but may miss writes committed
    /// after the scan started (eventual consistency, no linearizability
    /// guarantee).
    fn scan_prefix(&self, prefix: &str) -> Result<KeyScan>;

    /// Atomically apply a batch of write operations.
    fn write(&self, batch: WriteBatch) -> Result<()>;

    /// Atomically add `delta` to the counter at `key`, returning the new
    /// value. A missing counter starts at zero.
    fn increment(&self, key: &str, delta: i64) -> Result<i64>;

    /// Read the counter at `key` (zero if absent).
    fn counter(&self, key: &str) -> Result<i64>;

    /// Sync all pending writes to durable storage.
    fn sync(&self) -> Result<()>;

    /// Close the storage and release resources.
    fn close(&mut self) -> Result<()>;
}

/// A single operation inside a [`WriteBatch`].
#[derive(Debug, Clone)]
pub enum BatchOp {
    /// Set `key` to `value`, overwriting any existing entry.
    Put { key: String, value: Vec<u8> },
    /// Set `key` to `value`; the whole batch fails if `key` exists.
    Insert { key: String, value: Vec<u8> },
    /// Remove `key` if present.
    Delete { key: String },
    /// Add `delta` to the counter at `key`.
    Increment { key: String, delta: i64 },
}

/// An ordered list of operations applied atomically by [`Storage::write`].
#[derive(Debug, Default)]
pub struct WriteBatch {
    ops: Vec<BatchOp>,
}

impl WriteBatch {
    /// Create an empty batch.
    pub fn new() -> Self {
        WriteBatch { ops: Vec::new() }
    }

    /// Stage a put.
    pub fn put<K: Into<String>>(&mut self, key: K, value: Vec<u8>) {
        self.ops.push(BatchOp::Put {
            key: key.into(),
            value,
        });
    }

    /// Stage an insert (fails the batch if the key already exists).
    pub fn insert<K: Into<String>>(&mut self, key: K, value: Vec<u8>) {
        self.ops.push(BatchOp::Insert {
            key: key.into(),
            value,
        });
    }

    /// Stage a delete.
    pub fn delete<K: Into<String>>(&mut self, key: K) {
        self.ops.push(BatchOp::Delete { key: key.into() });
    }

    /// Stage a counter increment.
    pub fn increment<K: Into<String>>(&mut self, key: K, delta: i64) {
        self.ops.push(BatchOp::Increment {
            key: key.into(),
            delta,
        });
    }

    /// The staged operations, in order.
    pub fn ops(&self) -> &[BatchOp] {
        &self.ops
    }

    /// Number of staged operations.
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Check if the batch is empty.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

/// A key-ordered scan over a snapshot of the keyspace.
///
/// The scan owns its entries, so it can be iterated lazily and restarted
/// (via [`KeyScan::rewind`]) without holding any storage lock.
#[derive(Debug)]
pub struct KeyScan {
    entries: Vec<(String, Vec<u8>)>,
    cursor: usize,
}

impl KeyScan {
    pub(crate) fn new(entries: Vec<(String, Vec<u8>)>) -> Self {
        KeyScan { entries, cursor: 0 }
    }

    /// Restart the scan from the beginning of the snapshot.
    pub fn rewind(&mut self) {
        self.cursor = 0;
    }
}

impl Iterator for KeyScan {
    type Item = (String, Vec<u8>);

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.entries.get(self.cursor).cloned();
        if entry.is_some() {
            self.cursor += 1;
        }
        entry
    }
}

/// Encode a counter value as stored bytes.
pub(crate) fn encode_counter(value: i64) -> Vec<u8> {
    let mut buf = vec![0u8; 8];
    LittleEndian::write_i64(&mut buf, value);
    buf
}

/// Decode a stored counter value.
pub(crate) fn decode_counter(key: &str, bytes: &[u8]) -> Result<i64> {
    if bytes.len() != 8 {
        return Err(StorageError::InvalidOperation(format!(
            "key {key} does not hold a counter"
        ))
        .into());
    }
    Ok(LittleEndian::read_i64(bytes))
}

/// Configuration for storage backends.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Whether to persist after every committed batch (file backend).
    pub sync_writes: bool,

    /// Buffer size for I/O operations.
    pub buffer_size: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig {
            sync_writes: false,
            buffer_size: 65536,
        }
    }
}

/// Error types specific to storage operations.
#[derive(Debug, Clone)]
pub enum StorageError {
    /// Key not found.
    KeyNotFound(String),

    /// Insert target already exists.
    KeyExists(String),

    /// Snapshot file is corrupt or has an unsupported format.
    CorruptSnapshot(String),

    /// Storage is closed.
    StorageClosed,

    /// Invalid operation.
    InvalidOperation(String),
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::KeyNotFound(key) => write!(f, "key not found: {key}"),
            StorageError::KeyExists(key) => write!(f, "key already exists: {key}"),
            StorageError::CorruptSnapshot(msg) => write!(f, "corrupt snapshot: {msg}"),
            StorageError::StorageClosed => write!(f, "storage is closed"),
            StorageError::InvalidOperation(msg) => write!(f, "invalid operation: {msg}"),
        }
    }
}

impl std::error::Error for StorageError {}

impl From<StorageError> for SedgeError {
    fn from(err: StorageError) -> Self {
        SedgeError::storage(err.to_string())
    }
}
