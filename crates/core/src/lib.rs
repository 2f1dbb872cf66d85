//! Core types for idbench
//!
//! This crate defines the foundational types used throughout the benchmark:
//! - IdStrategy / Identifier: primary-key strategies and their values
//! - Document / DocumentFactory: single-field documents built in bulk
//! - ScenarioDefinition: the fixed benchmark matrix
//! - MetricBundle / ResultSet: measurements keyed by scenario
//! - Error: error taxonomy shared by every crate

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod document;
pub mod error;
pub mod ids;
pub mod metrics;
pub mod scenario;

pub use document::{Document, DocumentFactory};
pub use error::{Error, Result};
pub use ids::{IdStrategy, Identifier};
pub use metrics::{MetricBundle, ResultSet, ScenarioResult};
pub use scenario::{
    Cleanup, Phase, ScenarioDefinition, LOOKUP_PROBES, ONE_MILLION, PROVISION_BATCH_SIZE,
    SCENARIOS, TEN_MILLION,
};
