//! Document types for Sedge.
//!
//! A [`document::Document`](crate::document::document::Document) is both the
//! input to indexing and the output of reconstruction: the index snapshots a
//! document's fields at index time and rebuilds the same value on fetch.

pub mod document;
pub mod field_value;

pub use document::{Document, DocumentBuilder};
pub use field_value::FieldValue;
