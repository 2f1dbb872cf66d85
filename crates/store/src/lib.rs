//! Store layer for idbench
//!
//! This crate implements the store boundary:
//! - DocumentStore: blocking facade the engine is generic over
//! - MongoStore: MongoDB implementation with per-call timeouts
//! - StoreConfig: connection settings read from the environment
//! - testing::RecordingStore: in-memory fake (feature `testing`)

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod mongo;
pub mod traits;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use config::StoreConfig;
pub use mongo::MongoStore;
pub use traits::DocumentStore;
