//! Composite posting-key codec.
//!
//! A posting's identity is a single string of four segments joined by a
//! reserved separator:
//!
//! ```text
//! <index_id>|<field_name>|<word>|<doc_id>
//! ```
//!
//! Putting the document id last makes a prefix scan over
//! `<index_id>|<field_name>|<word>|` return every posting for a term
//! without a join, and lets the document id be recovered from a key alone
//! without loading the record. The separator must therefore never appear
//! inside a field name or a normalized word; [`encode_key`] rejects such
//! components and the standard analyzer strips the character up front.

use crate::error::{Result, SedgeError};
use crate::index::{DocId, IndexId};

/// The reserved key separator character.
pub const KEY_SEPARATOR: char = '|';

/// Minimum number of segments in a well-formed posting key.
const MIN_SEGMENTS: usize = 4;

/// Encode the composite key for a posting.
///
/// Fails with [`SedgeError::InvalidKey`] if `field_name` or `word`
/// contains the reserved separator.
pub fn encode_key(
    index_id: IndexId,
    field_name: &str,
    word: &str,
    doc_id: DocId,
) -> Result<String> {
    check_component("field name", field_name)?;
    check_component("word", word)?;
    Ok(format!(
        "{index_id}{KEY_SEPARATOR}{field_name}{KEY_SEPARATOR}{word}{KEY_SEPARATOR}{doc_id}"
    ))
}

/// Decode the document id embedded in a posting key.
///
/// A `None` input is the defined no-op path and returns `Ok(None)`.
/// Fails with [`SedgeError::MalformedKey`] if the key has fewer than four
/// segments or the trailing segment is not a valid document id.
pub fn decode_document_id(key: Option<&str>) -> Result<Option<DocId>> {
    let Some(key) = key else {
        return Ok(None);
    };

    let segments: Vec<&str> = key.split(KEY_SEPARATOR).collect();
    if segments.len() < MIN_SEGMENTS {
        return Err(SedgeError::malformed_key(format!(
            "expected at least {MIN_SEGMENTS} segments, got {} in {key:?}",
            segments.len()
        )));
    }

    let last = segments[segments.len() - 1];
    let doc_id = last.parse::<DocId>().map_err(|_| {
        SedgeError::malformed_key(format!("trailing segment {last:?} is not a document id"))
    })?;
    Ok(Some(doc_id))
}

/// Prefix matching every posting of an index.
pub fn index_prefix(index_id: IndexId) -> String {
    format!("{index_id}{KEY_SEPARATOR}")
}

/// Prefix matching every posting of a field within an index.
pub fn field_prefix(index_id: IndexId, field_name: &str) -> Result<String> {
    check_component("field name", field_name)?;
    Ok(format!(
        "{index_id}{KEY_SEPARATOR}{field_name}{KEY_SEPARATOR}"
    ))
}

/// Prefix matching every posting of a word within a field.
pub fn word_prefix(index_id: IndexId, field_name: &str, word: &str) -> Result<String> {
    check_component("field name", field_name)?;
    check_component("word", word)?;
    Ok(format!(
        "{index_id}{KEY_SEPARATOR}{field_name}{KEY_SEPARATOR}{word}{KEY_SEPARATOR}"
    ))
}

fn check_component(kind: &str, value: &str) -> Result<()> {
    if value.contains(KEY_SEPARATOR) {
        return Err(SedgeError::invalid_key(format!(
            "{kind} {value:?} contains the reserved separator {KEY_SEPARATOR:?}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_decode_round_trip() {
        let key = encode_key(3, "title", "cat", 42).unwrap();
        assert_eq!(key, "3|title|cat|42");
        assert_eq!(decode_document_id(Some(&key)).unwrap(), Some(42));
    }

    #[test]
    fn test_encode_rejects_separator() {
        assert!(matches!(
            encode_key(1, "ti|tle", "cat", 2),
            Err(SedgeError::InvalidKey(_))
        ));
        assert!(matches!(
            encode_key(1, "title", "c|at", 2),
            Err(SedgeError::InvalidKey(_))
        ));
    }

    #[test]
    fn test_decode_none_is_noop() {
        assert_eq!(decode_document_id(None).unwrap(), None);
    }

    #[test]
    fn test_decode_too_few_segments() {
        assert!(matches!(
            decode_document_id(Some("1|title|cat")),
            Err(SedgeError::MalformedKey(_))
        ));
    }

    #[test]
    fn test_decode_bad_trailing_segment() {
        assert!(matches!(
            decode_document_id(Some("1|title|cat|xyz")),
            Err(SedgeError::MalformedKey(_))
        ));
    }

    #[test]
    fn test_prefixes_nest() {
        let index = index_prefix(7);
        let field = field_prefix(7, "body").unwrap();
        let word = word_prefix(7, "body", "dog").unwrap();
        let key = encode_key(7, "body", "dog", 1).unwrap();

        assert!(field.starts_with(&index));
        assert!(word.starts_with(&field));
        assert!(key.starts_with(&word));
    }
}
