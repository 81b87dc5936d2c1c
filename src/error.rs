//! Error types for the Sedge library.
//!
//! All fallible operations return [`Result`], whose error type is the
//! [`SedgeError`] enum. Multi-entity write failures are always fully rolled
//! back by the storage layer before they surface here, so every error is
//! safe to retry from scratch except [`SedgeError::KeyIntegrity`], which
//! indicates a bug rather than a transient condition.

use std::io;

use anyhow;
use thiserror::Error;

/// The main error type for Sedge operations.
#[derive(Error, Debug)]
pub enum SedgeError {
    /// I/O errors (file operations, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A key component contains the reserved separator character.
    #[error("invalid key component: {0}")]
    InvalidKey(String),

    /// A composite key could not be decoded.
    #[error("malformed key: {0}")]
    MalformedKey(String),

    /// A recomputed composite key differs from the stored key.
    ///
    /// This is fatal: posting identity must never change after creation,
    /// so a mismatch indicates a bug, not a retryable condition.
    #[error("key integrity violation: {0}")]
    KeyIntegrity(String),

    /// Invalid input (empty normalized word, bad field name, etc.)
    #[error("validation error: {0}")]
    Validation(String),

    /// A failure during the atomic document-indexing sequence.
    ///
    /// Nothing was committed; the operation is retryable from scratch.
    #[error("indexing error: {0}")]
    Indexing(String),

    /// A document, record, or index is absent.
    #[error("not found: {0}")]
    NotFound(String),

    /// Storage-related errors
    #[error("storage error: {0}")]
    Storage(String),

    /// Analysis-related errors (tokenization, filtering, etc.)
    #[error("analysis error: {0}")]
    Analysis(String),

    /// Query-related errors
    #[error("query error: {0}")]
    Query(String),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for other cases
    #[error("error: {0}")]
    Other(String),

    /// Generic anyhow error
    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with [`SedgeError`].
pub type Result<T> = std::result::Result<T, SedgeError>;

impl SedgeError {
    /// Create a new invalid-key error.
    pub fn invalid_key<S: Into<String>>(msg: S) -> Self {
        SedgeError::InvalidKey(msg.into())
    }

    /// Create a new malformed-key error.
    pub fn malformed_key<S: Into<String>>(msg: S) -> Self {
        SedgeError::MalformedKey(msg.into())
    }

    /// Create a new key-integrity error.
    pub fn key_integrity<S: Into<String>>(msg: S) -> Self {
        SedgeError::KeyIntegrity(msg.into())
    }

    /// Create a new validation error.
    pub fn validation<S: Into<String>>(msg: S) -> Self {
        SedgeError::Validation(msg.into())
    }

    /// Create a new indexing error.
    pub fn indexing<S: Into<String>>(msg: S) -> Self {
        SedgeError::Indexing(msg.into())
    }

    /// Create a new not-found error.
    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        SedgeError::NotFound(msg.into())
    }

    /// Create a new storage error.
    pub fn storage<S: Into<String>>(msg: S) -> Self {
        SedgeError::Storage(msg.into())
    }

    /// Create a new analysis error.
    pub fn analysis<S: Into<String>>(msg: S) -> Self {
        SedgeError::Analysis(msg.into())
    }

    /// Create a new query error.
    pub fn query<S: Into<String>>(msg: S) -> Self {
        SedgeError::Query(msg.into())
    }

    /// Create a new serialization error.
    pub fn serialization<S: Into<String>>(msg: S) -> Self {
        SedgeError::Serialization(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        SedgeError::Other(msg.into())
    }
}

impl From<bincode::Error> for SedgeError {
    fn from(err: bincode::Error) -> Self {
        SedgeError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_construction() {
        let error = SedgeError::invalid_key("word contains '|'");
        assert_eq!(
            error.to_string(),
            "invalid key component: word contains '|'"
        );

        let error = SedgeError::validation("empty word");
        assert_eq!(error.to_string(), "validation error: empty word");

        let error = SedgeError::not_found("document 42");
        assert_eq!(error.to_string(), "not found: document 42");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let error = SedgeError::from(io_error);

        match error {
            SedgeError::Io(_) => {}
            _ => panic!("Expected IO error variant"),
        }
    }

    #[test]
    fn test_key_integrity_display() {
        let error = SedgeError::key_integrity("stored 1|a|b|2, recomputed 1|a|c|2");
        assert!(error.to_string().starts_with("key integrity violation"));
    }
}
