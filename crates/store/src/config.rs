//! Store configuration from the environment
//!
//! Only the connection endpoint is required. Database and collection names
//! can be overridden; timeouts are fixed.

use idbench_core::{Error, Result};
use std::time::Duration;

/// Environment variable holding the connection string
pub const URI_ENV: &str = "MONGO_URI";
/// Environment variable overriding the database name
pub const DATABASE_ENV: &str = "IDBENCH_DATABASE";
/// Environment variable overriding the working collection name
pub const COLLECTION_ENV: &str = "IDBENCH_COLLECTION";

/// Default database and collection name
pub const DEFAULT_NAMESPACE: &str = "perftest";

/// Connection and timeout settings for [`crate::MongoStore`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Connection string, e.g. `mongodb://localhost:27017`
    pub uri: String,
    /// Database holding the working collection
    pub database: String,
    /// Working collection, exclusively used by the running scenario
    pub collection: String,
    /// Bound on connecting and pinging during setup
    pub connect_timeout: Duration,
    /// Bound on each insert, lookup and statistics call
    pub operation_timeout: Duration,
    /// Bound on each drop or clear of a possibly huge collection
    pub cleanup_timeout: Duration,
}

impl StoreConfig {
    /// Build a config for `uri` with default names and timeouts
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            database: DEFAULT_NAMESPACE.to_string(),
            collection: DEFAULT_NAMESPACE.to_string(),
            connect_timeout: Duration::from_secs(1),
            operation_timeout: Duration::from_secs(5),
            cleanup_timeout: Duration::from_secs(300),
        }
    }

    /// Read the config from process environment variables
    ///
    /// # Errors
    ///
    /// Returns `ConnectionFailed` if `MONGO_URI` is unset or empty.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the config through an arbitrary variable lookup
    ///
    /// # Errors
    ///
    /// Returns `ConnectionFailed` if the URI variable is missing or empty.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let uri = lookup(URI_ENV)
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| Error::ConnectionFailed {
                reason: format!("{} is not set", URI_ENV),
            })?;

        let mut config = Self::new(uri);
        if let Some(database) = lookup(DATABASE_ENV).filter(|v| !v.is_empty()) {
            config.database = database;
        }
        if let Some(collection) = lookup(COLLECTION_ENV).filter(|v| !v.is_empty()) {
            config.collection = collection;
        }
        Ok(config)
    }
}
