//! Documents and the document factory
//!
//! A benchmark document carries nothing but its primary key, so the measured
//! cost is dominated by the identifier strategy rather than payload size.

use crate::ids::{IdStrategy, Identifier};
use serde::Serialize;

/// A single-field document: `{ _id: <identifier> }`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Document {
    /// Primary key
    #[serde(rename = "_id")]
    pub id: Identifier,
}

impl Document {
    /// Wrap an identifier as a document
    pub fn new(id: Identifier) -> Self {
        Self { id }
    }
}

/// Builds document sequences for a strategy
///
/// The output vector is allocated once at its final size and filled in
/// place; no intermediate collections are created.
pub struct DocumentFactory;

impl DocumentFactory {
    /// Generate `count` documents with fresh identifiers
    pub fn generate(strategy: IdStrategy, count: usize) -> Vec<Document> {
        let mut docs = Vec::with_capacity(count);
        Self::generate_into(strategy, &mut docs, count);
        docs
    }

    /// Replace the contents of `buf` with `count` fresh documents
    ///
    /// Reuses the buffer's allocation, which lets callers stream very large
    /// document counts through a fixed-size window.
    pub fn generate_into(strategy: IdStrategy, buf: &mut Vec<Document>, count: usize) {
        buf.clear();
        buf.reserve(count);
        buf.extend((0..count).map(|_| Document::new(strategy.generate())));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    #[test]
    fn test_generate_zero() {
        assert!(DocumentFactory::generate(IdStrategy::Ulid, 0).is_empty());
    }

    #[test]
    fn test_generate_into_reuses_buffer() {
        let mut buf = DocumentFactory::generate(IdStrategy::Uuid, 64);
        let first = buf[0];
        DocumentFactory::generate_into(IdStrategy::Uuid, &mut buf, 16);
        assert_eq!(buf.len(), 16);
        assert!(buf.capacity() >= 64);
        assert!(!buf.contains(&first));
    }

    #[test]
    fn test_document_serializes_as_id_field() {
        let doc = Document::new(IdStrategy::ObjectId.generate());
        let bson_doc = bson::to_document(&doc).unwrap();
        assert_eq!(bson_doc.len(), 1);
        assert!(bson_doc.get_object_id("_id").is_ok());

        let doc = Document::new(IdStrategy::Ulid.generate());
        let bson_doc = bson::to_document(&doc).unwrap();
        match bson_doc.get("_id") {
            Some(bson::Bson::Binary(bin)) => {
                assert_eq!(bin.subtype, bson::spec::BinarySubtype::Uuid);
                assert_eq!(bin.bytes.len(), 16);
            }
            other => panic!("expected binary _id, got {:?}", other),
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        #[test]
        fn generate_has_exact_len_and_distinct_ids(
            count in 0usize..100_000,
            idx in 0usize..3,
        ) {
            let strategy = IdStrategy::ALL[idx];
            let docs = DocumentFactory::generate(strategy, count);
            prop_assert_eq!(docs.len(), count);

            let distinct: HashSet<_> = docs.iter().map(|d| d.id).collect();
            prop_assert_eq!(distinct.len(), count);
        }
    }
}
