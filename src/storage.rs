//! Ordered key-value storage layer for Sedge.
//!
//! The index core only needs four things from a backend: point reads,
//! key-ordered prefix scans, atomic multi-entity write batches, and atomic
//! counters. Any ordered key-value store can satisfy this; Sedge ships an
//! in-memory backend and a snapshot-persisted file backend.

pub mod file;
pub mod memory;
pub mod traits;

pub use file::FileStorage;
pub use memory::MemoryStorage;
pub use traits::{BatchOp, KeyScan, Storage, StorageConfig, StorageError, WriteBatch};
