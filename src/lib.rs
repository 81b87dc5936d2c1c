//! # Sedge
//!
//! A lightweight full-text search index for Rust.
//!
//! ## Features
//!
//! - Word-level inverted index with positional postings
//! - Composite string keys: one prefix scan per term, no joins
//! - Atomic multi-entity writes (no partially indexed documents, ever)
//! - Document reconstruction from an index-time field snapshot
//! - Flexible text analysis pipeline
//! - Pluggable ordered key-value storage backends
//!
//! ## Quick start
//!
//! ```
//! use std::sync::Arc;
//!
//! use sedge::document::Document;
//! use sedge::index::InvertedIndex;
//! use sedge::query::Query;
//! use sedge::storage::{MemoryStorage, Storage};
//!
//! # fn main() -> sedge::error::Result<()> {
//! let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new_default());
//! let index = InvertedIndex::open(storage, "articles")?;
//!
//! let doc = Document::builder()
//!     .add_text("title", "The quick brown fox")
//!     .build();
//! let doc_id = index.add_document(&doc)?;
//!
//! let hits = index.search(&Query::phrase("title", "quick brown"))?;
//! assert_eq!(hits[0].doc_id, doc_id);
//! # Ok(())
//! # }
//! ```

pub mod analysis;
pub mod document;
pub mod error;
pub mod index;
pub mod query;
pub mod storage;

/// Commonly used types, re-exported for convenience.
pub mod prelude {
    pub use crate::analysis::analyzer::{Analyzer, PipelineAnalyzer};
    pub use crate::document::{Document, DocumentBuilder, FieldValue};
    pub use crate::error::{Result, SedgeError};
    pub use crate::index::{
        DocId, IndexConfig, IndexId, IndexStats, InvertedIndex, WordFieldIndex,
    };
    pub use crate::query::{PhraseQuery, Query, SearchHit, TermQuery};
    pub use crate::storage::{FileStorage, MemoryStorage, Storage, StorageConfig, WriteBatch};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
