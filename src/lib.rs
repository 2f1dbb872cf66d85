//! idbench - primary-key strategy benchmark for MongoDB
//!
//! Measures bulk insertion, point lookups and primary-key index size for
//! ObjectId, ULID and UUID identifiers, and reports each strategy relative
//! to the ObjectId baseline.
//!
//! # Quick Start
//!
//! ```ignore
//! use idbench::{BenchmarkMatrix, MongoStore, Report, StoreConfig};
//!
//! let store = MongoStore::connect(&StoreConfig::from_env()?)?;
//! let results = BenchmarkMatrix::new(&store).run()?;
//! println!("{}", Report::build(results)?);
//! ```
//!
//! # Architecture
//!
//! - `idbench-core`: identifiers, documents, scenarios, results, errors
//! - `idbench-store`: the [`DocumentStore`] seam and its MongoDB driver
//! - `idbench-engine`: scenario execution and the scenario × strategy matrix
//! - `idbench-report`: percentage differences and the comparison table

pub use idbench_core::*;
pub use idbench_engine::{BenchmarkMatrix, ScenarioRunner};
pub use idbench_report::{
    calc_diff, format_bytes, format_diff, format_duration, metric_deltas, Metric, Report, Row,
};
pub use idbench_store::{DocumentStore, MongoStore, StoreConfig};
