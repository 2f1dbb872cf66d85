//! In-memory store for exercising the engine without a database
//!
//! `RecordingStore` keeps the set of stored identifiers, records every call
//! in order, and can be told to fail a chosen call. Index sizes are served
//! from a queue so each strategy can be given its own value.
//!
//! # Example
//!
//! ```ignore
//! use idbench_store::testing::{RecordingStore, StoreCall, StoreOp};
//!
//! let store = RecordingStore::new().with_index_sizes([1000, 700]);
//! store.fail_nth(StoreOp::FindById, 0);
//! // ... run a scenario against &store ...
//! assert_eq!(store.count(StoreOp::DropCollection), 1);
//! ```

use crate::traits::DocumentStore;
use idbench_core::{Document, Error, Identifier, Result};
use parking_lot::Mutex;
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::VecDeque;

/// Kind of store operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    /// `insert_batch`
    InsertBatch,
    /// `insert_one`
    InsertOne,
    /// `find_by_id`
    FindById,
    /// `clear`
    Clear,
    /// `drop_collection`
    DropCollection,
    /// `index_byte_size`
    IndexByteSize,
}

/// Call recorded by [`RecordingStore`], in issue order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    /// Batch insert of this many documents
    InsertBatch(usize),
    /// Single-document insert
    InsertOne,
    /// Lookup of this identifier
    FindById(Identifier),
    /// Collection cleared
    Clear,
    /// Collection dropped
    DropCollection,
    /// Index size queried
    IndexByteSize,
}

impl StoreCall {
    /// Operation kind of this call
    pub fn op(&self) -> StoreOp {
        match self {
            StoreCall::InsertBatch(_) => StoreOp::InsertBatch,
            StoreCall::InsertOne => StoreOp::InsertOne,
            StoreCall::FindById(_) => StoreOp::FindById,
            StoreCall::Clear => StoreOp::Clear,
            StoreCall::DropCollection => StoreOp::DropCollection,
            StoreCall::IndexByteSize => StoreOp::IndexByteSize,
        }
    }
}

#[derive(Default)]
struct State {
    calls: Vec<StoreCall>,
    stored: FxHashSet<Identifier>,
    inserted: Vec<Identifier>,
    index_sizes: VecDeque<u64>,
    seen: FxHashMap<StoreOp, usize>,
    failures: FxHashMap<StoreOp, usize>,
}

/// Fake [`DocumentStore`] that records call order
#[derive(Default)]
pub struct RecordingStore {
    state: Mutex<State>,
}

impl RecordingStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue index sizes returned by successive `index_byte_size` calls
    ///
    /// Once the queue is empty the call fails with `StatsUnavailable`.
    pub fn with_index_sizes(self, sizes: impl IntoIterator<Item = u64>) -> Self {
        self.state.lock().index_sizes.extend(sizes);
        self
    }

    /// Make the `nth` (zero-based) call of `op` fail
    pub fn fail_nth(&self, op: StoreOp, nth: usize) {
        self.state.lock().failures.insert(op, nth);
    }

    /// Every call so far, in order
    pub fn calls(&self) -> Vec<StoreCall> {
        self.state.lock().calls.clone()
    }

    /// Number of calls of `op` so far
    pub fn count(&self, op: StoreOp) -> usize {
        self.state.lock().calls.iter().filter(|c| c.op() == op).count()
    }

    /// Sizes of all batch inserts, in order
    pub fn batch_sizes(&self) -> Vec<usize> {
        self.state
            .lock()
            .calls
            .iter()
            .filter_map(|c| match c {
                StoreCall::InsertBatch(n) => Some(*n),
                _ => None,
            })
            .collect()
    }

    /// Number of documents currently stored
    pub fn len(&self) -> usize {
        self.state.lock().stored.len()
    }

    /// Whether the collection is empty
    pub fn is_empty(&self) -> bool {
        self.state.lock().stored.is_empty()
    }

    /// Every identifier ever inserted, in insertion order
    ///
    /// Unlike [`RecordingStore::len`] this is not reset by cleanup.
    pub fn inserted(&self) -> Vec<Identifier> {
        self.state.lock().inserted.clone()
    }

    /// Whether `id` is currently stored
    pub fn contains(&self, id: &Identifier) -> bool {
        self.state.lock().stored.contains(id)
    }

    /// Forget recorded calls, keeping stored documents and configuration
    pub fn reset_calls(&self) {
        let mut state = self.state.lock();
        state.calls.clear();
        state.seen.clear();
    }
}

impl State {
    /// Record `call` and report whether it was configured to fail
    fn enter(&mut self, call: StoreCall) -> bool {
        let op = call.op();
        self.calls.push(call);
        let seen = self.seen.entry(op).or_insert(0);
        let nth = *seen;
        *seen += 1;
        self.failures.get(&op) == Some(&nth)
    }

    fn insert(&mut self, id: Identifier) -> Result<()> {
        if !self.stored.insert(id) {
            return Err(Error::WriteRejected {
                reason: format!("duplicate key {}", id),
            });
        }
        self.inserted.push(id);
        Ok(())
    }
}

fn injected(op: StoreOp) -> Error {
    let reason = format!("injected {:?} failure", op);
    match op {
        StoreOp::InsertBatch => Error::StoreUnavailable {
            operation: "insert_batch",
            reason,
        },
        StoreOp::InsertOne => Error::StoreUnavailable {
            operation: "insert_one",
            reason,
        },
        StoreOp::FindById => Error::QueryFailed { reason },
        StoreOp::Clear | StoreOp::DropCollection => Error::CleanupFailed { reason },
        StoreOp::IndexByteSize => Error::StatsUnavailable { reason },
    }
}

impl DocumentStore for RecordingStore {
    fn insert_batch(&self, docs: &[Document]) -> Result<()> {
        let mut state = self.state.lock();
        if state.enter(StoreCall::InsertBatch(docs.len())) {
            return Err(injected(StoreOp::InsertBatch));
        }
        for doc in docs {
            state.insert(doc.id)?;
        }
        Ok(())
    }

    fn insert_one(&self, doc: &Document) -> Result<()> {
        let mut state = self.state.lock();
        if state.enter(StoreCall::InsertOne) {
            return Err(injected(StoreOp::InsertOne));
        }
        state.insert(doc.id)
    }

    fn find_by_id(&self, id: &Identifier) -> Result<()> {
        let mut state = self.state.lock();
        if state.enter(StoreCall::FindById(*id)) {
            return Err(injected(StoreOp::FindById));
        }
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let mut state = self.state.lock();
        if state.enter(StoreCall::Clear) {
            return Err(injected(StoreOp::Clear));
        }
        state.stored.clear();
        Ok(())
    }

    fn drop_collection(&self) -> Result<()> {
        let mut state = self.state.lock();
        if state.enter(StoreCall::DropCollection) {
            return Err(injected(StoreOp::DropCollection));
        }
        state.stored = FxHashSet::default();
        Ok(())
    }

    fn index_byte_size(&self) -> Result<u64> {
        let mut state = self.state.lock();
        if state.enter(StoreCall::IndexByteSize) {
            return Err(injected(StoreOp::IndexByteSize));
        }
        state.index_sizes.pop_front().ok_or_else(|| Error::StatsUnavailable {
            reason: "no index size queued".to_string(),
        })
    }
}
