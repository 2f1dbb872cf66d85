//! Benchmark engine for idbench
//!
//! - ScenarioRunner: executes one scenario for one strategy
//! - BenchmarkMatrix: walks every scenario and strategy in order and builds
//!   the result set

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod matrix;
pub mod runner;

pub use matrix::BenchmarkMatrix;
pub use runner::ScenarioRunner;
