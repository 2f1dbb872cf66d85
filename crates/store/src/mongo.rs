//! MongoDB store adapter
//!
//! `MongoStore` owns a small tokio runtime and presents the async driver as
//! the blocking [`DocumentStore`] facade. Each driver future is wrapped in
//! `tokio::time::timeout`; an expired timeout surfaces exactly like a
//! connectivity failure.

use crate::config::StoreConfig;
use crate::traits::DocumentStore;
use bson::{doc, Bson};
use idbench_core::{Document, Error, Identifier, Result};
use mongodb::error::ErrorKind;
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection, Database};
use std::fmt;
use std::future::Future;
use std::time::Duration;
use tokio::runtime::Runtime;
use tracing::{debug, info, warn};

/// Name of the primary-key index in `collStats.indexSizes`
pub const PRIMARY_INDEX: &str = "_id_";

/// Failure of a single bounded driver call
enum CallError {
    Timeout(Duration),
    Driver(mongodb::error::Error),
}

impl CallError {
    /// Whether the failure says nothing about the request itself
    fn is_connectivity(&self) -> bool {
        match self {
            CallError::Timeout(_) => true,
            CallError::Driver(e) => matches!(
                e.kind.as_ref(),
                ErrorKind::Io(_)
                    | ErrorKind::ServerSelection { .. }
                    | ErrorKind::ConnectionPoolCleared { .. }
                    | ErrorKind::DnsResolve { .. }
            ),
        }
    }
}

impl fmt::Display for CallError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallError::Timeout(limit) => write!(f, "timed out after {:?}", limit),
            CallError::Driver(e) => write!(f, "{}", e),
        }
    }
}

fn connection_failed(reason: impl fmt::Display) -> Error {
    Error::ConnectionFailed {
        reason: reason.to_string(),
    }
}

/// Map a failed call to `StoreUnavailable` on connectivity, otherwise to
/// the error built by `rejected`
fn classify<F>(operation: &'static str, err: CallError, rejected: F) -> Error
where
    F: FnOnce(String) -> Error,
{
    if err.is_connectivity() {
        Error::StoreUnavailable {
            operation,
            reason: err.to_string(),
        }
    } else {
        rejected(err.to_string())
    }
}

fn write_error(operation: &'static str, err: CallError) -> Error {
    classify(operation, err, |reason| Error::WriteRejected { reason })
}

/// Blocking MongoDB adapter over one working collection
pub struct MongoStore {
    client: Client,
    database: Database,
    collection: Collection<Document>,
    lookup: Collection<bson::Document>,
    collection_name: String,
    operation_timeout: Duration,
    cleanup_timeout: Duration,
    // Declared last so driver handles are released before the runtime stops.
    runtime: Runtime,
}

impl MongoStore {
    /// Connect to the store and verify it answers a ping
    ///
    /// # Errors
    ///
    /// Returns `ConnectionFailed` if the runtime cannot start, the URI does
    /// not parse, or the ping fails or exceeds `connect_timeout`.
    pub fn connect(config: &StoreConfig) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("idbench-store")
            .enable_all()
            .build()
            .map_err(|e| connection_failed(format!("failed to start runtime: {}", e)))?;

        let limit = config.connect_timeout;
        let client = runtime.block_on(async {
            let mut options = tokio::time::timeout(limit, ClientOptions::parse(&config.uri))
                .await
                .map_err(|_| connection_failed(format!("parsing URI timed out after {:?}", limit)))?
                .map_err(connection_failed)?;
            options.app_name = Some("idbench".to_string());
            options.connect_timeout = Some(limit);
            options.server_selection_timeout = Some(limit);

            let client = Client::with_options(options).map_err(connection_failed)?;
            tokio::time::timeout(
                limit,
                client.database("admin").run_command(doc! { "ping": 1 }, None),
            )
            .await
            .map_err(|_| connection_failed(format!("ping timed out after {:?}", limit)))?
            .map_err(connection_failed)?;
            Ok::<_, Error>(client)
        })?;

        let database = client.database(&config.database);
        let collection = database.collection::<Document>(&config.collection);
        let lookup = database.collection::<bson::Document>(&config.collection);

        info!(
            target: "idbench::store",
            database = %config.database,
            collection = %config.collection,
            "Connected to document store"
        );

        Ok(Self {
            client,
            database,
            collection,
            lookup,
            collection_name: config.collection.clone(),
            operation_timeout: config.operation_timeout,
            cleanup_timeout: config.cleanup_timeout,
            runtime,
        })
    }

    /// Disconnect gracefully
    pub fn close(self) {
        let MongoStore {
            client,
            database,
            collection,
            lookup,
            operation_timeout,
            runtime,
            ..
        } = self;
        drop((database, collection, lookup));
        runtime.block_on(async move {
            if tokio::time::timeout(operation_timeout, client.shutdown())
                .await
                .is_err()
            {
                warn!(target: "idbench::store", "Client shutdown timed out");
            }
        });
        debug!(target: "idbench::store", "Disconnected from document store");
    }

    /// Drive one driver future to completion within `limit`
    fn call<T, F>(&self, limit: Duration, fut: F) -> std::result::Result<T, CallError>
    where
        F: Future<Output = mongodb::error::Result<T>>,
    {
        self.runtime.block_on(async move {
            match tokio::time::timeout(limit, fut).await {
                Ok(Ok(value)) => Ok(value),
                Ok(Err(e)) => Err(CallError::Driver(e)),
                Err(_) => Err(CallError::Timeout(limit)),
            }
        })
    }
}

impl DocumentStore for MongoStore {
    fn insert_batch(&self, docs: &[Document]) -> Result<()> {
        if docs.is_empty() {
            return Ok(());
        }
        self.call(self.operation_timeout, self.collection.insert_many(docs, None))
            .map(|_| ())
            .map_err(|e| write_error("insert_batch", e))
    }

    fn insert_one(&self, doc: &Document) -> Result<()> {
        self.call(self.operation_timeout, self.collection.insert_one(doc, None))
            .map(|_| ())
            .map_err(|e| write_error("insert_one", e))
    }

    fn find_by_id(&self, id: &Identifier) -> Result<()> {
        let filter = doc! { "_id": id.to_bson() };
        self.call(self.operation_timeout, self.lookup.find_one(filter, None))
            .map(|_| ())
            .map_err(|e| classify("find_by_id", e, |reason| Error::QueryFailed { reason }))
    }

    fn clear(&self) -> Result<()> {
        let result = self
            .call(self.cleanup_timeout, self.collection.delete_many(doc! {}, None))
            .map_err(|e| Error::CleanupFailed {
                reason: format!("delete_many: {}", e),
            })?;
        debug!(target: "idbench::store", deleted = result.deleted_count, "Collection cleared");
        Ok(())
    }

    fn drop_collection(&self) -> Result<()> {
        self.call(self.cleanup_timeout, self.collection.drop(None))
            .map_err(|e| Error::CleanupFailed {
                reason: format!("drop: {}", e),
            })?;
        debug!(target: "idbench::store", "Collection dropped");
        Ok(())
    }

    fn index_byte_size(&self) -> Result<u64> {
        let command = doc! { "collStats": self.collection_name.as_str() };
        let reply = self
            .call(self.operation_timeout, self.database.run_command(command, None))
            .map_err(|e| {
                classify("index_byte_size", e, |reason| Error::StatsUnavailable {
                    reason: format!("collStats failed: {}", reason),
                })
            })?;
        extract_index_size(&reply)
    }
}

/// Read the primary-key index size out of a `collStats` reply
///
/// Servers report the size as Int32, Int64 or Double depending on version
/// and magnitude.
pub fn extract_index_size(reply: &bson::Document) -> Result<u64> {
    let sizes = reply
        .get_document("indexSizes")
        .map_err(|_| Error::StatsUnavailable {
            reason: "collStats reply has no indexSizes document".to_string(),
        })?;

    match sizes.get(PRIMARY_INDEX) {
        Some(Bson::Int32(n)) if *n >= 0 => Ok(*n as u64),
        Some(Bson::Int64(n)) if *n >= 0 => Ok(*n as u64),
        Some(Bson::Double(n)) if n.is_finite() && *n >= 0.0 => Ok(*n as u64),
        Some(other) => Err(Error::StatsUnavailable {
            reason: format!(
                "{} index size has unexpected value {:?}",
                PRIMARY_INDEX, other
            ),
        }),
        None => Err(Error::StatsUnavailable {
            reason: format!("indexSizes has no {} entry", PRIMARY_INDEX),
        }),
    }
}
