//! Store abstraction
//!
//! [`DocumentStore`] is the seam between the benchmark engine and the
//! database. The engine only ever talks to this trait, so scenario logic can
//! be exercised against an in-memory fake.

use idbench_core::{Document, Identifier, Result};

/// Blocking facade over the working collection
///
/// Implementations add no timing of their own; callers time each operation.
/// Every call is bounded by a per-call timeout, and a timeout is reported the
/// same way as any other connectivity failure.
pub trait DocumentStore {
    /// Insert a slice of documents in one round trip
    ///
    /// # Errors
    ///
    /// `StoreUnavailable` on connectivity failure or timeout, `WriteRejected`
    /// when the store refuses a document (e.g. duplicate key).
    fn insert_batch(&self, docs: &[Document]) -> Result<()>;

    /// Insert a single document
    ///
    /// # Errors
    ///
    /// Same failure kinds as [`DocumentStore::insert_batch`].
    fn insert_one(&self, doc: &Document) -> Result<()>;

    /// Point lookup by primary key; the result itself is discarded
    ///
    /// # Errors
    ///
    /// `StoreUnavailable` on connectivity failure or timeout, `QueryFailed`
    /// otherwise.
    fn find_by_id(&self, id: &Identifier) -> Result<()>;

    /// Delete every document, keeping the collection and its indexes
    ///
    /// # Errors
    ///
    /// `CleanupFailed` on any failure, timeouts included.
    fn clear(&self) -> Result<()>;

    /// Drop the working collection
    ///
    /// # Errors
    ///
    /// `CleanupFailed` on any failure, timeouts included.
    fn drop_collection(&self) -> Result<()>;

    /// Size in bytes of the primary-key index
    ///
    /// # Errors
    ///
    /// `StatsUnavailable` if the statistics response lacks the index size,
    /// `StoreUnavailable` on connectivity failure or timeout.
    fn index_byte_size(&self) -> Result<u64>;
}

impl<T: DocumentStore + ?Sized> DocumentStore for &T {
    fn insert_batch(&self, docs: &[Document]) -> Result<()> {
        (**self).insert_batch(docs)
    }

    fn insert_one(&self, doc: &Document) -> Result<()> {
        (**self).insert_one(doc)
    }

    fn find_by_id(&self, id: &Identifier) -> Result<()> {
        (**self).find_by_id(id)
    }

    fn clear(&self) -> Result<()> {
        (**self).clear()
    }

    fn drop_collection(&self) -> Result<()> {
        (**self).drop_collection()
    }

    fn index_byte_size(&self) -> Result<u64> {
        (**self).index_byte_size()
    }
}
