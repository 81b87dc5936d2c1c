//! The inverted-index core.
//!
//! Three entities make up an index, each stored under its own keyspace of
//! the shared ordered key-value store:
//!
//! - [`stats::IndexStats`]: the index root, holding the name, id, and the document
//!   counter every add/delete updates;
//! - [`record::DocumentRecord`]: one per indexed document, holding the owned set
//!   of posting keys plus the field snapshot used for reconstruction;
//! - [`posting::WordFieldIndex`]: one per (field, word, document), the
//!   actual inverted-index posting, addressed by a composite string key so
//!   that a single prefix scan retrieves every posting for an index, a
//!   field, or a word.

pub mod inverted;
pub mod key;
pub mod posting;
pub mod record;
pub mod stats;

/// Identifier of an index (allocated from a storage counter).
pub type IndexId = u64;

/// Identifier of an indexed document (allocated from a per-index counter).
pub type DocId = u64;

pub use inverted::{IndexConfig, InvertedIndex, PostingScan};
pub use posting::WordFieldIndex;
pub use record::DocumentRecord;
pub use stats::IndexStats;
